//! Synthetic comparable-deal data for neighborhood browsing.
//!
//! [`generate_deals`] is a pure function of its arguments: each call seeds its
//! own [`Mulberry32`] from the neighborhood name and city, so repeated calls
//! return identical batches and concurrent calls never interfere.

pub mod domain;
mod import;
pub mod projection;
mod rng;
mod snapshot;
mod stats;
mod synthesizer;

pub use domain::{Deal, DealCategory, DealRequestError, DealSummary, Trend, TrendDirection};
pub use import::{NeighborhoodCsvImporter, NeighborhoodImportError};
pub use projection::{
    category_counts, filter_by_category, rolling_trend_line, CategoryCountEntry, CategoryCounts,
    DealBrowserView, TrendPoint, TREND_WINDOW,
};
pub use rng::{seed_from_str, Mulberry32};
pub use snapshot::{MarketSnapshot, Neighborhood, Region, OPPORTUNITY_HEADROOM};
pub use stats::{measured_direction, upper_median};
pub use synthesizer::{
    generate_deals, reference_date, validate_deal_request, DEFAULT_DEAL_COUNT, HISTORY_MONTHS,
    MAX_DEAL_COUNT, MAX_DEAL_DAY, ROOM_OPTIONS, STREET_NAMES,
};
