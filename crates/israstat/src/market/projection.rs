//! Read-only views over a generated batch for charts and list filters.

use super::domain::{Deal, DealCategory, DealSummary, TrendDirection};
use chrono::NaiveDate;
use serde::Serialize;

/// Trailing window for the smoothed price/sqm line.
pub const TREND_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub avg_price_per_sqm: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCountEntry {
    pub category: DealCategory,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub all: usize,
    pub by_category: Vec<CategoryCountEntry>,
}

/// Everything a deal browser renders for one neighborhood.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealBrowserView {
    pub neighborhood_name: String,
    pub city: String,
    pub total_deals: usize,
    pub median_price: i64,
    pub median_price_per_sqm: i64,
    pub price_range: (i64, i64),
    pub trend_direction: TrendDirection,
    pub trend_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_category: Option<DealCategory>,
    pub category_counts: CategoryCounts,
    pub trend_line: Vec<TrendPoint>,
    pub deals: Vec<Deal>,
}

/// Mean price/sqm over a trailing window, one point per deal in date order.
pub fn rolling_trend_line(deals: &[Deal], window: usize) -> Vec<TrendPoint> {
    let window = window.max(1);
    let mut sorted: Vec<&Deal> = deals.iter().collect();
    sorted.sort_by_key(|deal| deal.date);

    (0..sorted.len())
        .map(|index| {
            let start = (index + 1).saturating_sub(window);
            let slice = &sorted[start..=index];
            let total: i64 = slice.iter().map(|deal| deal.price_per_sqm).sum();
            TrendPoint {
                date: sorted[index].date,
                avg_price_per_sqm: total as f64 / slice.len() as f64,
            }
        })
        .collect()
}

pub fn category_counts(deals: &[Deal]) -> CategoryCounts {
    let by_category = DealCategory::ordered()
        .into_iter()
        .map(|category| CategoryCountEntry {
            category,
            label: category.label(),
            color: category.color(),
            count: deals
                .iter()
                .filter(|deal| deal.category == category)
                .count(),
        })
        .collect();

    CategoryCounts {
        all: deals.len(),
        by_category,
    }
}

/// `None` keeps every deal.
pub fn filter_by_category(deals: &[Deal], category: Option<DealCategory>) -> Vec<&Deal> {
    deals
        .iter()
        .filter(|deal| category.map_or(true, |wanted| deal.category == wanted))
        .collect()
}

impl DealSummary {
    pub fn browser_view(&self, category: Option<DealCategory>) -> DealBrowserView {
        DealBrowserView {
            neighborhood_name: self.neighborhood_name.clone(),
            city: self.city.clone(),
            total_deals: self.total_deals,
            median_price: self.median_price,
            median_price_per_sqm: self.median_price_per_sqm,
            price_range: self.price_range,
            trend_direction: self.trend_direction,
            trend_label: self.trend_direction.label(),
            selected_category: category,
            category_counts: category_counts(&self.deals),
            trend_line: rolling_trend_line(&self.deals, TREND_WINDOW),
            deals: filter_by_category(&self.deals, category)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{generate_deals, Trend};

    fn deal(day: u32, price_per_sqm: i64, category: DealCategory) -> Deal {
        Deal {
            id: format!("d-{day}"),
            date: NaiveDate::from_ymd_opt(2025, 1, day).expect("valid day"),
            price: price_per_sqm * 80,
            price_per_sqm,
            sqm: 80,
            rooms: 3.5,
            floor: 2,
            address: "Basel 4".to_string(),
            category,
        }
    }

    #[test]
    fn trend_line_averages_trailing_window() {
        let deals = vec![
            deal(3, 300, DealCategory::Market),
            deal(1, 100, DealCategory::Market),
            deal(2, 200, DealCategory::Market),
        ];
        let line = rolling_trend_line(&deals, 2);
        let averages: Vec<f64> = line.iter().map(|point| point.avg_price_per_sqm).collect();
        assert_eq!(averages, vec![100.0, 150.0, 250.0]);
        assert_eq!(
            line[2].date,
            NaiveDate::from_ymd_opt(2025, 1, 3).expect("valid")
        );
    }

    #[test]
    fn counts_cover_every_category() {
        let deals = vec![
            deal(1, 100, DealCategory::Luxury),
            deal(2, 100, DealCategory::Market),
            deal(3, 100, DealCategory::Market),
        ];
        let counts = category_counts(&deals);
        assert_eq!(counts.all, 3);
        let per: Vec<usize> = counts.by_category.iter().map(|entry| entry.count).collect();
        assert_eq!(per, vec![0, 2, 0, 1]);
    }

    #[test]
    fn browser_view_filters_without_touching_summary() {
        let summary = generate_deals("Florentin", "Tel Aviv", 52_000.0, Trend::Stable, 40);
        let view = summary.browser_view(Some(DealCategory::Market));

        assert!(view
            .deals
            .iter()
            .all(|deal| deal.category == DealCategory::Market));
        let market = view
            .category_counts
            .by_category
            .iter()
            .find(|entry| entry.category == DealCategory::Market)
            .expect("market entry");
        assert_eq!(view.deals.len(), market.count);
        assert_eq!(view.trend_line.len(), 40);
        assert_eq!(summary.deals.len(), 40);

        let unfiltered = summary.browser_view(None);
        assert_eq!(unfiltered.deals, summary.deals);
    }
}
