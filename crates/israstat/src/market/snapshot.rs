use super::domain::{DealSummary, Trend};
use super::synthesizer::generate_deals;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Neighborhoods priced up to this multiple of the buyer's maximum still
/// count as opportunities.
pub const OPPORTUNITY_HEADROOM: f64 = 1.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
    pub name_he: String,
    /// Year-over-year percent.
    pub annual_growth: f64,
    pub avg_price_per_sqm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighborhood {
    pub name: String,
    pub name_he: String,
    pub city: String,
    pub avg_price: f64,
    pub avg_price_per_sqm: f64,
    pub trend: Trend,
    /// Typical apartment size, e.g. "3–4".
    pub rooms: String,
    /// Year-over-year percent.
    pub year_over_year: f64,
}

impl Neighborhood {
    pub fn deals(&self, count: usize) -> DealSummary {
        generate_deals(
            &self.name,
            &self.city,
            self.avg_price_per_sqm,
            self.trend,
            count,
        )
    }
}

/// Static market reference data consumed by the opportunity explorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub last_update: NaiveDate,
    pub cpi_value: f64,
    pub cpi_change: f64,
    pub construction_index: f64,
    pub construction_change: f64,
    pub regions: Vec<Region>,
    pub neighborhoods: Vec<Neighborhood>,
    pub alerts: Vec<String>,
}

impl MarketSnapshot {
    /// CBS snapshot as of February 2026.
    pub fn standard() -> Self {
        Self {
            last_update: NaiveDate::from_ymd_opt(2026, 2, 17).unwrap_or(NaiveDate::MIN),
            cpi_value: 103.3,
            cpi_change: -0.3,
            construction_index: 101.3,
            construction_change: 0.1,
            regions: vec![
                region("tlv", "Tel Aviv", "תל אביב", 5.2, 58_000.0),
                region("ctr", "Center", "מרכז", 4.5, 36_000.0),
                region("jlm", "Jerusalem", "ירושלים", 4.0, 38_500.0),
                region("hfa", "Haifa", "חיפה", 3.1, 22_000.0),
                region("sth", "South", "דרום", 2.0, 17_500.0),
                region("nth", "North", "צפון", 2.5, 18_200.0),
            ],
            neighborhoods: vec![
                neighborhood("Neve Tzedek", "נווה צדק", "Tel Aviv", 6_500_000.0, 72_000.0, Trend::Rising, "3–4", 6.1),
                neighborhood("Florentin", "פלורנטין", "Tel Aviv", 3_800_000.0, 52_000.0, Trend::Stable, "3", 3.2),
                neighborhood("Lev HaIr", "לב העיר", "Tel Aviv", 4_200_000.0, 55_000.0, Trend::Rising, "3", 4.8),
                neighborhood("Ramat Aviv", "רמת אביב", "Tel Aviv", 5_800_000.0, 62_000.0, Trend::Rising, "4", 5.5),
                neighborhood("Rehavia", "רחביה", "Jerusalem", 4_200_000.0, 42_000.0, Trend::Rising, "3–4", 4.3),
                neighborhood("Arnona", "ארנונה", "Jerusalem", 3_100_000.0, 33_000.0, Trend::Stable, "4", 2.8),
                neighborhood("German Colony", "המושבה הגרמנית", "Jerusalem", 5_000_000.0, 48_000.0, Trend::Rising, "4", 3.9),
                neighborhood("Bat Galim", "בת גלים", "Haifa", 2_200_000.0, 24_000.0, Trend::Rising, "3–4", 4.1),
                neighborhood("Denya", "דניה", "Haifa", 3_500_000.0, 28_000.0, Trend::Cooling, "4–5", -0.5),
                neighborhood("Carmel Center", "מרכז הכרמל", "Haifa", 2_800_000.0, 26_000.0, Trend::Stable, "4", 1.8),
                neighborhood("Kfar Saba Center", "כפר סבא מרכז", "Center", 2_900_000.0, 30_000.0, Trend::Rising, "4", 5.0),
                neighborhood("Ra'anana North", "רעננה צפון", "Center", 4_100_000.0, 38_000.0, Trend::Rising, "4–5", 4.6),
                neighborhood("Rehovot Center", "רחובות מרכז", "Center", 2_600_000.0, 27_000.0, Trend::Stable, "4", 2.9),
                neighborhood("Beer Sheva North", "באר שבע צפון", "South", 1_650_000.0, 16_000.0, Trend::Rising, "4", 3.5),
                neighborhood("Arad", "ערד", "South", 980_000.0, 10_500.0, Trend::Stable, "4", 1.2),
                neighborhood("Nahariya Center", "נהריה מרכז", "North", 1_500_000.0, 15_500.0, Trend::Rising, "4", 3.8),
                neighborhood("Tiberias", "טבריה", "North", 1_100_000.0, 12_000.0, Trend::Stable, "3–4", 1.5),
            ],
            alerts: vec![
                "Housing price index rose 0.7% in December 2025, marking 8 consecutive months of growth.".to_string(),
                "Average mortgage interest rate stabilized around 5.1% (blended, Jan 2026).".to_string(),
                "Construction input costs increased 0.1%, signaling potential supply-side pressure.".to_string(),
            ],
        }
    }

    /// Swaps in an imported neighborhood table, keeping indices and alerts.
    pub fn with_neighborhoods(mut self, neighborhoods: Vec<Neighborhood>) -> Self {
        self.neighborhoods = neighborhoods;
        self
    }

    /// Case-insensitive lookup by neighborhood name.
    pub fn neighborhood(&self, name: &str) -> Option<&Neighborhood> {
        let wanted = name.trim();
        self.neighborhoods
            .iter()
            .find(|candidate| candidate.name.eq_ignore_ascii_case(wanted))
    }

    /// Neighborhoods within reach of `max_property_price`, fastest growing first.
    pub fn opportunities(&self, max_property_price: i64) -> Vec<&Neighborhood> {
        let ceiling = max_property_price as f64 * OPPORTUNITY_HEADROOM;
        let mut matches: Vec<&Neighborhood> = self
            .neighborhoods
            .iter()
            .filter(|candidate| candidate.avg_price <= ceiling)
            .collect();
        matches.sort_by(|a, b| b.year_over_year.total_cmp(&a.year_over_year));
        matches
    }
}

fn region(
    id: &str,
    name: &str,
    name_he: &str,
    annual_growth: f64,
    avg_price_per_sqm: f64,
) -> Region {
    Region {
        id: id.to_string(),
        name: name.to_string(),
        name_he: name_he.to_string(),
        annual_growth,
        avg_price_per_sqm,
    }
}

#[allow(clippy::too_many_arguments)]
fn neighborhood(
    name: &str,
    name_he: &str,
    city: &str,
    avg_price: f64,
    avg_price_per_sqm: f64,
    trend: Trend,
    rooms: &str,
    year_over_year: f64,
) -> Neighborhood {
    Neighborhood {
        name: name.to_string(),
        name_he: name_he.to_string(),
        city: city.to_string(),
        avg_price,
        avg_price_per_sqm,
        trend,
        rooms: rooms.to_string(),
        year_over_year,
    }
}
