use israstat::affordability::BuyerType;
use israstat::error::AppError;
use israstat::market::{
    DealCategory, MarketSnapshot, NeighborhoodCsvImporter, Trend, OPPORTUNITY_HEADROOM,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read-only market data shared by the HTTP handlers.
#[derive(Clone)]
pub(crate) struct MarketState {
    pub(crate) snapshot: Arc<MarketSnapshot>,
    pub(crate) deal_count: usize,
}

impl MarketState {
    pub(crate) fn new(snapshot: MarketSnapshot, deal_count: usize) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            deal_count,
        }
    }
}

/// Built-in snapshot, optionally with its neighborhood table replaced by a CSV export.
pub(crate) fn load_snapshot(csv: Option<&Path>) -> Result<MarketSnapshot, AppError> {
    let snapshot = MarketSnapshot::standard();
    let Some(path) = csv else {
        return Ok(snapshot);
    };

    let neighborhoods = NeighborhoodCsvImporter::from_path(path)?;
    Ok(snapshot.with_neighborhoods(neighborhoods))
}

/// Highest neighborhood average price still offered for `max_property_price`.
pub(crate) fn price_ceiling(max_property_price: i64) -> i64 {
    (max_property_price as f64 * OPPORTUNITY_HEADROOM).round() as i64
}

pub(crate) fn parse_buyer_type(raw: &str) -> Result<BuyerType, String> {
    BuyerType::parse(raw).ok_or_else(|| {
        format!("unknown buyer type '{raw}' (expected FIRST_HOME, MOVER or INVESTOR)")
    })
}

pub(crate) fn parse_trend(raw: &str) -> Result<Trend, String> {
    Trend::parse(raw)
        .ok_or_else(|| format!("unknown trend '{raw}' (expected rising, stable or cooling)"))
}

pub(crate) fn parse_category(raw: &str) -> Result<DealCategory, String> {
    DealCategory::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = DealCategory::ordered()
            .into_iter()
            .map(DealCategory::code)
            .collect();
        format!(
            "unknown deal category '{raw}' (expected one of {})",
            known.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parsers_are_strict() {
        assert_eq!(parse_buyer_type("mover"), Ok(BuyerType::Mover));
        assert!(parse_buyer_type("landlord")
            .expect_err("unknown buyer rejected")
            .contains("FIRST_HOME"));
        assert_eq!(parse_trend("Cooling"), Ok(Trend::Cooling));
        assert!(parse_trend("booming").is_err());
        assert_eq!(parse_category("luxury"), Ok(DealCategory::Luxury));
        assert!(parse_category("bargain")
            .expect_err("unknown category rejected")
            .contains("below-market"));
    }

    #[test]
    fn ceiling_includes_headroom() {
        assert_eq!(price_ceiling(1_000_000), 1_150_000);
        assert_eq!(price_ceiling(1_587_560), 1_825_694);
    }

    #[test]
    fn snapshot_defaults_to_built_in_table() {
        let snapshot = load_snapshot(None).expect("standard snapshot");
        assert_eq!(snapshot.neighborhoods.len(), 17);
    }

    #[test]
    fn missing_csv_is_reported() {
        let result = load_snapshot(Some(Path::new("does/not/exist.csv")));
        assert!(matches!(result, Err(AppError::Import(_))));
    }
}
