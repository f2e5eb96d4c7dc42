use israstat::affordability::{calculate_mortgage, BuyerType, MortgageInputs};
use israstat::market::{
    DealCategory, MarketSnapshot, NeighborhoodCsvImporter, Trend, DEFAULT_DEAL_COUNT,
};
use std::io::Cursor;

fn buyer() -> MortgageInputs {
    MortgageInputs {
        initial_capital: 1_500_000.0,
        monthly_gross_income: 40_000.0,
        buyer_type: BuyerType::FirstHome,
        dsr: 0.33,
        interest_rate: 0.051,
        term_years: 30,
    }
}

#[test]
fn affordable_neighborhoods_feed_the_deal_browser() {
    let results = calculate_mortgage(&buyer());
    let snapshot = MarketSnapshot::standard();
    let opportunities = snapshot.opportunities(results.max_property_price);
    assert!(!opportunities.is_empty());

    let ceiling = results.max_property_price as f64 * 1.15;
    assert!(opportunities.iter().all(|n| n.avg_price <= ceiling));
    for pair in opportunities.windows(2) {
        assert!(pair[0].year_over_year >= pair[1].year_over_year);
    }

    let pick = opportunities[0];
    let summary = pick.deals(DEFAULT_DEAL_COUNT);
    let view = summary.browser_view(Some(DealCategory::BelowMarket));
    assert_eq!(view.neighborhood_name, pick.name);
    assert_eq!(view.category_counts.all, DEFAULT_DEAL_COUNT);
    assert!(view
        .deals
        .iter()
        .all(|deal| deal.category == DealCategory::BelowMarket));
}

#[test]
fn imported_table_replaces_builtin_neighborhoods() {
    let table = "name,nameHe,city,avgPrice,avgPricePerSqm,trend,rooms,yearOverYear\n\
        Harish,חריש,North,1400000,14000,rising,4,6.0\n\
        Modiin Center,מודיעין,Center,3300000,31000,stable,4–5,3.1\n";
    let neighborhoods =
        NeighborhoodCsvImporter::from_reader(Cursor::new(table)).expect("table parses");
    let snapshot = MarketSnapshot::standard().with_neighborhoods(neighborhoods);

    assert_eq!(snapshot.neighborhoods.len(), 2);
    assert_eq!(snapshot.regions.len(), 6);

    let harish = snapshot
        .neighborhood("harish")
        .expect("imported row present");
    assert_eq!(harish.trend, Trend::Rising);
    assert_eq!(harish.deals(12).total_deals, 12);

    let names: Vec<&str> = snapshot
        .opportunities(3_000_000)
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(names, vec!["Harish", "Modiin Center"]);
}
