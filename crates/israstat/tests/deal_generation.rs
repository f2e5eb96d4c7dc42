use chrono::{Months, NaiveDate};
use israstat::market::{
    generate_deals, reference_date, DealCategory, MarketSnapshot, Trend, DEFAULT_DEAL_COUNT,
    ROOM_OPTIONS, STREET_NAMES,
};
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn repeated_calls_are_identical() {
    let first = generate_deals("Florentin", "Tel Aviv", 52_000.0, Trend::Stable, 40);
    let second = generate_deals("Florentin", "Tel Aviv", 52_000.0, Trend::Stable, 40);
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first).expect("serializes");
    let second_json = serde_json::to_string(&second).expect("serializes");
    assert_eq!(first_json, second_json);
}

#[test]
fn summary_serializes_with_presentation_field_names() {
    let summary = generate_deals("Florentin", "Tel Aviv", 52_000.0, Trend::Stable, 40);
    let value = serde_json::to_value(&summary).expect("serializes");

    assert_eq!(value["totalDeals"], 40);
    assert_eq!(
        value["priceRange"],
        serde_json::json!([2_359_632, 7_038_736])
    );
    assert_eq!(value["trendDirection"], "up");
    assert_eq!(value["deals"][0]["date"], "2024-03-20");
    assert_eq!(value["deals"][0]["pricePerSqm"], 43_546);
    assert_eq!(value["deals"][0]["rooms"], 5);
    assert_eq!(value["deals"][0]["category"], "below-market");
}

#[test]
fn different_neighborhoods_get_different_streams() {
    let florentin = generate_deals("Florentin", "Tel Aviv", 52_000.0, Trend::Stable, 10);
    let rehavia = generate_deals("Rehavia", "Jerusalem", 52_000.0, Trend::Stable, 10);
    assert_ne!(florentin.deals, rehavia.deals);
}

#[test]
fn every_snapshot_neighborhood_generates_a_default_batch() {
    let snapshot = MarketSnapshot::standard();
    for neighborhood in &snapshot.neighborhoods {
        let summary = neighborhood.deals(DEFAULT_DEAL_COUNT);
        assert_eq!(
            summary.total_deals,
            DEFAULT_DEAL_COUNT,
            "{}",
            neighborhood.name
        );
        assert!(summary.price_range.0 <= summary.median_price);
        assert!(summary.median_price <= summary.price_range.1);
    }
}

#[test]
fn concurrent_generation_matches_sequential() {
    let expected = generate_deals("Bat Galim", "Haifa", 24_000.0, Trend::Rising, 60);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| generate_deals("Bat Galim", "Haifa", 24_000.0, Trend::Rising, 60))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("thread completes"), expected);
    }
}

fn any_trend() -> impl Strategy<Value = Trend> {
    prop::sample::select(Trend::ordered().to_vec())
}

fn earliest_date() -> NaiveDate {
    reference_date()
        .checked_sub_months(Months::new(23))
        .expect("valid history start")
}

proptest! {
    #[test]
    fn batch_invariants_hold(
        name in "[A-Za-z' ]{1,24}",
        city in "[A-Za-z ]{0,16}",
        avg in 5_000.0_f64..120_000.0,
        trend in any_trend(),
        count in 1_usize..200,
    ) {
        let summary = generate_deals(&name, &city, avg, trend, count);

        prop_assert_eq!(summary.deals.len(), count);
        prop_assert_eq!(summary.total_deals, count);

        let prices: Vec<i64> = summary.deals.iter().map(|deal| deal.price).collect();
        let min = prices.iter().copied().min().expect("non-empty");
        let max = prices.iter().copied().max().expect("non-empty");
        prop_assert_eq!(summary.price_range, (min, max));

        let ids: HashSet<&str> = summary.deals.iter().map(|deal| deal.id.as_str()).collect();
        prop_assert_eq!(ids.len(), count);

        let latest = reference_date()
            .checked_add_days(chrono::Days::new(26))
            .expect("valid");
        for pair in summary.deals.windows(2) {
            prop_assert!(pair[0].date <= pair[1].date);
        }
        for deal in &summary.deals {
            prop_assert!(deal.date >= earliest_date() && deal.date <= latest);
            prop_assert_eq!(
                deal.category,
                DealCategory::classify(deal.price_per_sqm as f64, avg)
            );
            prop_assert!(ROOM_OPTIONS.contains(&deal.rooms));
            prop_assert!((1..=15).contains(&deal.floor));
            prop_assert!(STREET_NAMES.iter().any(|street| deal.address.starts_with(street)));
            let sqm_floor = (deal.rooms * 22.0).round() as u32;
            prop_assert!(deal.sqm >= sqm_floor && deal.sqm <= sqm_floor + 15);
        }
    }
}
