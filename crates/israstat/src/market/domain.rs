use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

/// Qualitative price drift of a neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Trend {
    Rising,
    Stable,
    Cooling,
}

impl Trend {
    pub const fn ordered() -> [Self; 3] {
        [Self::Rising, Self::Stable, Self::Cooling]
    }

    /// Fractional price change per month used when back-dating deals.
    pub const fn monthly_slope(self) -> f64 {
        match self {
            Self::Rising => 0.003,
            Self::Stable => 0.0005,
            Self::Cooling => -0.0015,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Stable => "stable",
            Self::Cooling => "cooling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rising => "Rising",
            Self::Stable => "Stable",
            Self::Cooling => "Cooling",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|trend| trend.code() == normalized)
    }

    /// Unknown values fall back to [`Trend::Cooling`], the weakest drift.
    pub fn parse_lossy(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|| {
            warn!(trend = raw, "unknown market trend, treating as cooling");
            Self::Cooling
        })
    }
}

impl From<String> for Trend {
    fn from(value: String) -> Self {
        Self::parse_lossy(&value)
    }
}

/// Direction measured from a generated batch, independent of the input [`Trend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Relative change beyond which a half-over-half move counts as a trend.
    pub const THRESHOLD: f64 = 0.02;

    pub fn from_change(pct: f64) -> Self {
        if pct > Self::THRESHOLD {
            Self::Up
        } else if pct < -Self::THRESHOLD {
            Self::Down
        } else {
            Self::Flat
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "Trending up",
            Self::Down => "Trending down",
            Self::Flat => "Flat",
        }
    }
}

/// Price band of a deal relative to its neighborhood average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealCategory {
    BelowMarket,
    Market,
    AboveMarket,
    Luxury,
}

impl DealCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::BelowMarket,
            Self::Market,
            Self::AboveMarket,
            Self::Luxury,
        ]
    }

    /// Bands on `price_per_sqm / avg_price_per_sqm`; upper edges are inclusive
    /// except for below-market.
    pub fn classify(price_per_sqm: f64, avg_price_per_sqm: f64) -> Self {
        let ratio = price_per_sqm / avg_price_per_sqm;
        if ratio < 0.88 {
            Self::BelowMarket
        } else if ratio <= 1.12 {
            Self::Market
        } else if ratio <= 1.35 {
            Self::AboveMarket
        } else {
            Self::Luxury
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::BelowMarket => "below-market",
            Self::Market => "market",
            Self::AboveMarket => "above-market",
            Self::Luxury => "luxury",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowMarket => "Below Market",
            Self::Market => "Market Rate",
            Self::AboveMarket => "Above Market",
            Self::Luxury => "Luxury",
        }
    }

    /// Hex color used by charts and list badges.
    pub const fn color(self) -> &'static str {
        match self {
            Self::BelowMarket => "#14694D",
            Self::Market => "#C8A84E",
            Self::AboveMarket => "#D97706",
            Self::Luxury => "#9333EA",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ordered()
            .into_iter()
            .find(|category| category.code() == normalized)
    }
}

/// One synthetic transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    /// Unique within its batch only.
    pub id: String,
    pub date: NaiveDate,
    pub price: i64,
    pub price_per_sqm: i64,
    pub sqm: u32,
    #[serde(serialize_with = "serialize_rooms")]
    pub rooms: f64,
    pub floor: u8,
    pub address: String,
    pub category: DealCategory,
}

/// Whole room counts are written as integers (`4`, not `4.0`).
fn serialize_rooms<S: Serializer>(rooms: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if rooms.fract() == 0.0 {
        serializer.serialize_i64(*rooms as i64)
    } else {
        serializer.serialize_f64(*rooms)
    }
}

/// A generated batch with its aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSummary {
    pub neighborhood_name: String,
    pub city: String,
    pub total_deals: usize,
    pub median_price: i64,
    pub median_price_per_sqm: i64,
    pub price_range: (i64, i64),
    pub trend_direction: TrendDirection,
    /// Sorted ascending by date.
    pub deals: Vec<Deal>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DealRequestError {
    #[error("count must be between 1 and {max}, got {count}")]
    CountOutOfRange { count: usize, max: usize },
    #[error("avgPricePerSqm must be a positive amount, got {0}")]
    NonPositivePrice(f64),
}
