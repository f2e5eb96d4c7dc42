use crate::infra::{load_snapshot, parse_buyer_type, parse_category, parse_trend, price_ceiling};
use clap::Args;
use israstat::affordability::{
    analyze, AffordabilityBreakdown, BuyerType, MortgageInputs, DSR_WARNING_THRESHOLD,
};
use israstat::error::AppError;
use israstat::market::{
    generate_deals, validate_deal_request, Deal, DealBrowserView, DealCategory, DealSummary,
    MarketSnapshot, Neighborhood, Trend, DEFAULT_DEAL_COUNT, OPPORTUNITY_HEADROOM,
};
use serde::Serialize;
use serde_json::json;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub(crate) struct MortgageArgs {
    /// Equity available for the purchase (ILS)
    #[arg(long, default_value_t = MortgageInputs::default().initial_capital)]
    pub(crate) capital: f64,
    /// Monthly gross (bruto) household income (ILS)
    #[arg(long, default_value_t = MortgageInputs::default().monthly_gross_income)]
    pub(crate) income: f64,
    /// FIRST_HOME, MOVER or INVESTOR
    #[arg(long, value_parser = parse_buyer_type, default_value = "FIRST_HOME")]
    pub(crate) buyer_type: BuyerType,
    /// Share of net income available for the monthly payment (0.20-0.40)
    #[arg(long, default_value_t = MortgageInputs::default().dsr)]
    pub(crate) dsr: f64,
    /// Annual interest rate as a fraction, e.g. 0.051
    #[arg(long, default_value_t = MortgageInputs::default().interest_rate)]
    pub(crate) rate: f64,
    /// Loan term in years (10-30)
    #[arg(long, default_value_t = MortgageInputs::default().term_years)]
    pub(crate) term_years: u32,
}

impl MortgageArgs {
    pub(crate) fn inputs(&self) -> MortgageInputs {
        MortgageInputs {
            initial_capital: self.capital,
            monthly_gross_income: self.income,
            buyer_type: self.buyer_type,
            dsr: self.dsr,
            interest_rate: self.rate,
            term_years: self.term_years,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct MortgageCommandArgs {
    #[command(flatten)]
    pub(crate) inputs: MortgageArgs,
    /// Print the estimate as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExploreArgs {
    #[command(flatten)]
    pub(crate) inputs: MortgageArgs,
    /// Neighborhood CSV export replacing the built-in table
    #[arg(long)]
    pub(crate) market_csv: Option<PathBuf>,
    /// Print the matching neighborhoods as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DealsArgs {
    /// Neighborhood name; known neighborhoods supply city, price and trend
    #[arg(long)]
    pub(crate) neighborhood: String,
    /// City, required for neighborhoods outside the market table
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Average price per square meter (ILS)
    #[arg(long)]
    pub(crate) avg_price_per_sqm: Option<f64>,
    /// rising, stable or cooling (defaults to stable for custom neighborhoods)
    #[arg(long, value_parser = parse_trend)]
    pub(crate) trend: Option<Trend>,
    /// Number of deals to generate
    #[arg(long, default_value_t = DEFAULT_DEAL_COUNT)]
    pub(crate) count: usize,
    /// Only list deals in this price band
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Option<DealCategory>,
    /// Neighborhood CSV export replacing the built-in table
    #[arg(long)]
    pub(crate) market_csv: Option<PathBuf>,
    /// Write the deal list as CSV to stdout
    #[arg(long, conflicts_with = "json")]
    pub(crate) csv: bool,
    /// Print the deal browser view as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Neighborhood CSV export replacing the built-in table
    #[arg(long)]
    pub(crate) market_csv: Option<PathBuf>,
    /// Deals generated for the featured neighborhood
    #[arg(long, default_value_t = DEFAULT_DEAL_COUNT)]
    pub(crate) count: usize,
    /// Most recent deals listed for the featured neighborhood
    #[arg(long, default_value_t = 5)]
    pub(crate) list: usize,
}

pub(crate) fn run_mortgage(args: MortgageCommandArgs) -> Result<(), AppError> {
    let inputs = args.inputs.inputs();
    inputs.validate()?;
    let breakdown = analyze(&inputs);

    if args.json {
        let results = breakdown.results();
        return print_json(&json!({
            "inputs": inputs,
            "results": results,
            "bindingConstraint": breakdown.binding,
        }));
    }

    render_mortgage(&breakdown);
    Ok(())
}

pub(crate) fn run_explore(args: ExploreArgs) -> Result<(), AppError> {
    let inputs = args.inputs.inputs();
    inputs.validate()?;
    let snapshot = load_snapshot(args.market_csv.as_deref())?;
    let max_property_price = analyze(&inputs).results().max_property_price;
    let matches = snapshot.opportunities(max_property_price);

    if args.json {
        return print_json(&json!({
            "maxPropertyPrice": max_property_price,
            "priceCeiling": price_ceiling(max_property_price),
            "neighborhoods": matches,
        }));
    }

    render_opportunities(max_property_price, &matches);
    Ok(())
}

pub(crate) fn run_deals(args: DealsArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot(args.market_csv.as_deref())?;
    let summary = deals_for(&args, &snapshot)?;
    let view = summary.browser_view(args.category);

    if args.csv {
        return write_deals_csv(&view.deals);
    }
    if args.json {
        return print_json(&view);
    }

    render_browser_view(&view, view.deals.len());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        market_csv,
        count,
        list,
    } = args;

    let snapshot = load_snapshot(market_csv.as_deref())?;
    println!("Israstat demo");
    render_market_header(&snapshot);

    println!("\nAffordability by buyer type (calculator defaults)");
    let baseline = MortgageInputs::default();
    for buyer_type in BuyerType::ordered() {
        let inputs = MortgageInputs {
            buyer_type,
            ..baseline
        };
        let breakdown = analyze(&inputs);
        let results = breakdown.results();
        println!(
            "- {:<9} max price {:>12} | loan {:>10} | {:>7}/month | bound by {}",
            buyer_type.label(),
            shekels(results.max_property_price),
            shekels(results.max_loan_amount),
            shekels(results.max_monthly_payment),
            breakdown.binding.label()
        );
    }

    println!();
    let breakdown = analyze(&baseline);
    render_mortgage(&breakdown);

    let max_property_price = breakdown.results().max_property_price;
    let matches = snapshot.opportunities(max_property_price);
    println!();
    render_opportunities(max_property_price, &matches);

    let featured = matches
        .first()
        .copied()
        .or_else(|| snapshot.neighborhoods.first());
    let Some(featured) = featured else {
        println!("\nNo neighborhoods loaded; skipping deal browsing.");
        return Ok(());
    };

    validate_deal_request(featured.avg_price_per_sqm, count)?;
    println!();
    let view = featured.deals(count).browser_view(None);
    render_browser_view(&view, list);
    Ok(())
}

/// Resolves the neighborhood against the market table, letting flags override it.
fn deals_for(args: &DealsArgs, snapshot: &MarketSnapshot) -> Result<DealSummary, AppError> {
    let known = snapshot.neighborhood(&args.neighborhood);
    let name = known.map_or(args.neighborhood.trim(), |entry| entry.name.as_str());
    let city = args
        .city
        .clone()
        .or_else(|| known.map(|entry| entry.city.clone()));
    let avg_price_per_sqm = args
        .avg_price_per_sqm
        .or_else(|| known.map(|entry| entry.avg_price_per_sqm));
    let trend = args
        .trend
        .or_else(|| known.map(|entry| entry.trend))
        .unwrap_or(Trend::Stable);

    let (Some(city), Some(avg_price_per_sqm)) = (city, avg_price_per_sqm) else {
        return Err(AppError::NotFound(format!(
            "neighborhood '{}' (pass --city and --avg-price-per-sqm to describe it)",
            args.neighborhood
        )));
    };

    validate_deal_request(avg_price_per_sqm, args.count)?;
    let summary = generate_deals(name, &city, avg_price_per_sqm, trend, args.count);
    Ok(summary)
}

fn render_market_header(snapshot: &MarketSnapshot) {
    println!(
        "Market snapshot {} | CPI {:.1} ({:+.1}%) | construction input {:.1} ({:+.1}%)",
        snapshot.last_update,
        snapshot.cpi_value,
        snapshot.cpi_change,
        snapshot.construction_index,
        snapshot.construction_change
    );
    for region in &snapshot.regions {
        println!(
            "  - {:<10} {:>8}/sqm | {:+.1}% yoy",
            region.name,
            shekels(region.avg_price_per_sqm as i64),
            region.annual_growth
        );
    }
    if !snapshot.alerts.is_empty() {
        println!("Alerts:");
        for alert in &snapshot.alerts {
            println!("  - {alert}");
        }
    }
}

fn render_mortgage(breakdown: &AffordabilityBreakdown) {
    let inputs = &breakdown.inputs;
    let results = breakdown.results();

    println!(
        "Mortgage affordability for {} ({})",
        inputs.buyer_type.label(),
        inputs.buyer_type.description()
    );
    println!(
        "- Estimated net income:   {} / month",
        shekels(results.estimated_net_income)
    );
    println!(
        "- Monthly payment:        {}",
        shekels(results.max_monthly_payment)
    );
    println!(
        "- Maximum loan:           {} (LTV ceiling {})",
        shekels(results.max_loan_amount),
        percent(results.ltv_limit)
    );
    println!(
        "- Maximum property price: {}",
        shekels(results.max_property_price)
    );
    println!(
        "- Total interest paid:    {} over {} years at {:.2}%",
        shekels(results.total_interest_paid),
        inputs.term_years,
        inputs.interest_rate * 100.0
    );
    println!("- Binding constraint:     {}", breakdown.binding.label());
    if results.is_warning {
        println!(
            "Warning: a DSR of {} exceeds the Bank of Israel {} guideline.",
            percent(inputs.dsr),
            percent(DSR_WARNING_THRESHOLD)
        );
    }
}

fn render_opportunities(max_property_price: i64, matches: &[&Neighborhood]) {
    println!(
        "Neighborhoods priced up to {} ({} maximum plus {} headroom)",
        shekels(price_ceiling(max_property_price)),
        shekels(max_property_price),
        percent(OPPORTUNITY_HEADROOM - 1.0)
    );
    if matches.is_empty() {
        println!("  None within reach; more capital or a longer term widens the search.");
        return;
    }
    for entry in matches {
        println!(
            "  - {} ({}) avg {} | {}/sqm | {} rooms | {:+.1}% yoy | {}",
            entry.name,
            entry.city,
            shekels(entry.avg_price as i64),
            shekels(entry.avg_price_per_sqm as i64),
            entry.rooms,
            entry.year_over_year,
            entry.trend.label()
        );
    }
}

fn render_browser_view(view: &DealBrowserView, list: usize) {
    println!(
        "{}, {}: {} synthetic deals ({})",
        view.neighborhood_name, view.city, view.total_deals, view.trend_label
    );
    println!(
        "- Median price {} | median {}/sqm",
        shekels(view.median_price),
        shekels(view.median_price_per_sqm)
    );
    println!(
        "- Price range {} to {}",
        shekels(view.price_range.0),
        shekels(view.price_range.1)
    );

    let counts: Vec<String> = view
        .category_counts
        .by_category
        .iter()
        .map(|entry| format!("{} {}", entry.label, entry.count))
        .collect();
    println!(
        "- Categories: All {} | {}",
        view.category_counts.all,
        counts.join(" | ")
    );

    if let Some(latest) = view.trend_line.last() {
        println!(
            "- Rolling price/sqm on {}: {}",
            latest.date,
            shekels(latest.avg_price_per_sqm.round() as i64)
        );
    }

    if let Some(category) = view.selected_category {
        println!("Showing {} deals ({})", category.label(), view.deals.len());
    }
    for deal in view.deals.iter().rev().take(list) {
        render_deal(deal);
    }
}

fn render_deal(deal: &Deal) {
    println!(
        "  {} {:<22} {:>12} | {:>8}/sqm | {:>3} sqm | {} rooms | floor {:>2} | {}",
        deal.date,
        deal.address,
        shekels(deal.price),
        shekels(deal.price_per_sqm),
        deal.sqm,
        deal.rooms,
        deal.floor,
        deal.category.label()
    );
}

fn write_deals_csv(deals: &[Deal]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for deal in deals {
        writer.serialize(deal).map_err(io::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

/// Whole shekels with thousands separators, e.g. `₪1,587,560`.
fn shekels(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}₪{grouped}")
}
