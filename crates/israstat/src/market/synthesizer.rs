use super::domain::{Deal, DealCategory, DealRequestError, DealSummary, Trend};
use super::rng::Mulberry32;
use super::stats::summarize;
use crate::rounding::round_half_up;
use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

pub const DEFAULT_DEAL_COUNT: usize = 40;

/// Largest batch accepted from callers outside the crate.
pub const MAX_DEAL_COUNT: usize = 500;

/// Deals are spread over this many months before the reference date.
pub const HISTORY_MONTHS: u32 = 24;

/// Day-of-month is drawn from `1..=MAX_DEAL_DAY` so every month can hold it.
pub const MAX_DEAL_DAY: u32 = 27;

pub const STREET_NAMES: [&str; 25] = [
    "Herzl",
    "Rothschild",
    "Ben Gurion",
    "Jabotinsky",
    "Weizmann",
    "HaNassi",
    "HaRav Kook",
    "Dizengoff",
    "Bialik",
    "Nordau",
    "Sokolov",
    "Basel",
    "Allenby",
    "King George",
    "Arlozorov",
    "Ben Yehuda",
    "HaYarkon",
    "Trumpeldor",
    "Sheinkin",
    "Nahalat Binyamin",
    "Kaplan",
    "Begin",
    "HaMelech David",
    "Emek Refaim",
    "Derech Hevron",
];

pub const ROOM_OPTIONS: [f64; 7] = [2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];

const SQM_PER_ROOM: f64 = 22.0;
const SQM_JITTER: f64 = 15.0;
const NOISE_FLOOR: f64 = 0.82;
const NOISE_SPAN: f64 = 0.36;
const TOP_FLOOR: u32 = 15;
const MAX_HOUSE_NUMBER: u32 = 80;

/// The "current" month that deal dates count back from.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 1).unwrap_or(NaiveDate::MIN)
}

/// Generates `count` comparable deals for a neighborhood.
///
/// The batch depends only on `(neighborhood_name, city)` for its random
/// stream, so identical arguments always yield identical output.
pub fn generate_deals(
    neighborhood_name: &str,
    city: &str,
    avg_price_per_sqm: f64,
    trend: Trend,
    count: usize,
) -> DealSummary {
    let seed_key = format!("{neighborhood_name}{city}");
    let mut rng = Mulberry32::from_key(&seed_key);
    let anchor = reference_date();
    let slope = trend.monthly_slope();
    let id_prefix = slug(neighborhood_name);

    debug!(
        neighborhood = neighborhood_name,
        city,
        count,
        trend = trend.code(),
        "generating synthetic deals"
    );

    let deals = (0..count)
        .map(|index| {
            let months_back = rng.next_below(HISTORY_MONTHS);
            let day = 1 + rng.next_below(MAX_DEAL_DAY);
            let date = deal_date(anchor, months_back, day);

            // Older deals sit further back along the trend line.
            let trend_adjustment = 1.0 + slope * f64::from(HISTORY_MONTHS - months_back);
            let noise = rng.next_span(NOISE_FLOOR, NOISE_SPAN);
            let price_per_sqm = round_half_up(avg_price_per_sqm * trend_adjustment * noise);

            let rooms = *rng.pick(&ROOM_OPTIONS);
            let sqm = round_half_up(rooms * SQM_PER_ROOM + rng.next_f64() * SQM_JITTER);
            let floor = 1 + rng.next_below(TOP_FLOOR);
            let street = rng.pick(&STREET_NAMES);
            let house_number = 1 + rng.next_below(MAX_HOUSE_NUMBER);

            let price = round_half_up(price_per_sqm * sqm);

            Deal {
                id: format!("{id_prefix}-{index}"),
                date,
                price: price as i64,
                price_per_sqm: price_per_sqm as i64,
                sqm: sqm as u32,
                rooms,
                floor: floor as u8,
                address: format!("{street} {house_number}"),
                category: DealCategory::classify(price_per_sqm, avg_price_per_sqm),
            }
        })
        .collect();

    summarize(neighborhood_name, city, deals)
}

/// Boundary check for externally supplied generation requests.
/// [`generate_deals`] itself accepts any count, including zero.
pub fn validate_deal_request(avg_price_per_sqm: f64, count: usize) -> Result<(), DealRequestError> {
    if count == 0 || count > MAX_DEAL_COUNT {
        return Err(DealRequestError::CountOutOfRange {
            count,
            max: MAX_DEAL_COUNT,
        });
    }
    if !avg_price_per_sqm.is_finite() || avg_price_per_sqm <= 0.0 {
        return Err(DealRequestError::NonPositivePrice(avg_price_per_sqm));
    }
    Ok(())
}

fn deal_date(anchor: NaiveDate, months_back: u32, day: u32) -> NaiveDate {
    anchor
        .checked_sub_months(Months::new(months_back))
        .and_then(|month| month.with_day(day))
        .unwrap_or(anchor)
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_whitespace() { '-' } else { ch })
        .collect::<String>()
        .to_lowercase()
}
