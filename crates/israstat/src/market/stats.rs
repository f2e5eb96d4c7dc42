use super::domain::{Deal, DealSummary, TrendDirection};

pub(crate) fn summarize(neighborhood_name: &str, city: &str, mut deals: Vec<Deal>) -> DealSummary {
    // Stable, so same-day deals keep generation order.
    deals.sort_by_key(|deal| deal.date);

    let mut prices: Vec<i64> = deals.iter().map(|deal| deal.price).collect();
    prices.sort_unstable();
    let mut prices_per_sqm: Vec<i64> = deals.iter().map(|deal| deal.price_per_sqm).collect();
    prices_per_sqm.sort_unstable();

    let price_range = match (prices.first(), prices.last()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => (0, 0),
    };

    DealSummary {
        neighborhood_name: neighborhood_name.to_string(),
        city: city.to_string(),
        total_deals: deals.len(),
        median_price: upper_median(&prices),
        median_price_per_sqm: upper_median(&prices_per_sqm),
        price_range,
        trend_direction: measured_direction(&deals),
        deals,
    }
}

/// Element at `len / 2` of an ascending slice; the upper of the two middle
/// values for even lengths, never their average.
pub fn upper_median(sorted: &[i64]) -> i64 {
    sorted.get(sorted.len() / 2).copied().unwrap_or(0)
}

/// Compares mean price/sqm of the later half of a date-sorted batch against
/// the earlier half.
pub fn measured_direction(date_sorted: &[Deal]) -> TrendDirection {
    let half = date_sorted.len() / 2;
    if half == 0 {
        return TrendDirection::Flat;
    }

    let (earlier, later) = date_sorted.split_at(half);
    let earlier_mean = mean_price_per_sqm(earlier);
    let later_mean = mean_price_per_sqm(later);
    TrendDirection::from_change((later_mean - earlier_mean) / earlier_mean)
}

fn mean_price_per_sqm(deals: &[Deal]) -> f64 {
    let total: i64 = deals.iter().map(|deal| deal.price_per_sqm).sum();
    total as f64 / deals.len() as f64
}
