use crate::infra::{price_ceiling, AppState, MarketState};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use israstat::affordability::{
    analyze, BindingConstraint, BuyerType, MortgageInputs, MortgageResults,
};
use israstat::error::AppError;
use israstat::market::{
    generate_deals, validate_deal_request, DealBrowserView, DealCategory, DealSummary,
    MarketSnapshot, Neighborhood, Trend,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MortgageResponse {
    #[serde(flatten)]
    pub(crate) results: MortgageResults,
    pub(crate) buyer_type: BuyerType,
    pub(crate) buyer_label: &'static str,
    pub(crate) binding_constraint: BindingConstraint,
    pub(crate) binding_label: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DealsRequest {
    pub(crate) neighborhood_name: String,
    pub(crate) city: String,
    pub(crate) avg_price_per_sqm: f64,
    pub(crate) trend: Trend,
    #[serde(default)]
    pub(crate) count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NeighborhoodDealsQuery {
    #[serde(default)]
    pub(crate) count: Option<usize>,
    #[serde(default)]
    pub(crate) category: Option<DealCategory>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpportunitiesResponse {
    pub(crate) max_property_price: i64,
    pub(crate) price_ceiling: i64,
    pub(crate) neighborhoods: Vec<Neighborhood>,
}

pub(crate) fn router(market: MarketState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/mortgage", post(mortgage_endpoint))
        .route("/api/v1/deals", post(deals_endpoint))
        .route("/api/v1/market", get(market_endpoint))
        .route(
            "/api/v1/market/neighborhoods/:name/deals",
            get(neighborhood_deals_endpoint),
        )
        .route("/api/v1/opportunities", post(opportunities_endpoint))
        .with_state(market)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn mortgage_endpoint(
    Json(inputs): Json<MortgageInputs>,
) -> Result<Json<MortgageResponse>, AppError> {
    inputs.validate()?;
    let breakdown = analyze(&inputs);

    Ok(Json(MortgageResponse {
        results: breakdown.results(),
        buyer_type: inputs.buyer_type,
        buyer_label: inputs.buyer_type.label(),
        binding_constraint: breakdown.binding,
        binding_label: breakdown.binding.label(),
    }))
}

pub(crate) async fn deals_endpoint(
    State(market): State<MarketState>,
    Json(request): Json<DealsRequest>,
) -> Result<Json<DealSummary>, AppError> {
    let count = request.count.unwrap_or(market.deal_count);
    validate_deal_request(request.avg_price_per_sqm, count)?;

    Ok(Json(generate_deals(
        &request.neighborhood_name,
        &request.city,
        request.avg_price_per_sqm,
        request.trend,
        count,
    )))
}

pub(crate) async fn market_endpoint(State(market): State<MarketState>) -> Json<MarketSnapshot> {
    Json(market.snapshot.as_ref().clone())
}

pub(crate) async fn neighborhood_deals_endpoint(
    State(market): State<MarketState>,
    Path(name): Path<String>,
    Query(query): Query<NeighborhoodDealsQuery>,
) -> Result<Json<DealBrowserView>, AppError> {
    let neighborhood = market
        .snapshot
        .neighborhood(&name)
        .ok_or_else(|| AppError::NotFound(format!("neighborhood '{name}'")))?;
    let count = query.count.unwrap_or(market.deal_count);
    validate_deal_request(neighborhood.avg_price_per_sqm, count)?;

    let summary = neighborhood.deals(count);
    Ok(Json(summary.browser_view(query.category)))
}

pub(crate) async fn opportunities_endpoint(
    State(market): State<MarketState>,
    Json(inputs): Json<MortgageInputs>,
) -> Result<Json<OpportunitiesResponse>, AppError> {
    inputs.validate()?;
    let results = analyze(&inputs).results();

    let neighborhoods = market
        .snapshot
        .opportunities(results.max_property_price)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(OpportunitiesResponse {
        max_property_price: results.max_property_price,
        price_ceiling: price_ceiling(results.max_property_price),
        neighborhoods,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        router(MarketState::new(MarketSnapshot::standard(), 40)).layer(Extension(state))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app(true).oneshot(request).await.expect("request handled");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collected");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    fn reference_inputs() -> Value {
        json!({
            "initialCapital": 800000,
            "monthlyGrossIncome": 25000,
            "buyerType": "FIRST_HOME",
            "dsr": 0.30,
            "interestRate": 0.051,
            "termYears": 25
        })
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false)
            .oneshot(get_request("/ready"))
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = send(get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn mortgage_endpoint_returns_flat_results() {
        let (status, body) = send(post_json("/api/v1/mortgage", reference_inputs())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["estimatedNetIncome"], 15_500);
        assert_eq!(body["maxMonthlyPayment"], 4_650);
        assert_eq!(body["maxLoanAmount"], 787_560);
        assert_eq!(body["maxPropertyPrice"], 1_587_560);
        assert_eq!(body["totalInterestPaid"], 607_440);
        assert_eq!(body["isWarning"], false);
        assert_eq!(body["buyerLabel"], "1st Home");
        assert_eq!(body["bindingConstraint"], "debt_service");
    }

    #[tokio::test]
    async fn mortgage_endpoint_rejects_out_of_range_dsr() {
        let mut inputs = reference_inputs();
        inputs["dsr"] = json!(0.55);
        let (status, body) = send(post_json("/api/v1/mortgage", inputs)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("dsr"));
    }

    #[tokio::test]
    async fn deals_endpoint_is_deterministic() {
        let request = json!({
            "neighborhoodName": "Florentin",
            "city": "Tel Aviv",
            "avgPricePerSqm": 52000,
            "trend": "stable"
        });
        let (status, first) = send(post_json("/api/v1/deals", request.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["totalDeals"], 40);
        assert_eq!(first["medianPrice"], 4_920_698);
        assert_eq!(first["priceRange"], json!([2_359_632, 7_038_736]));
        assert_eq!(first["trendDirection"], "up");
        assert_eq!(first["deals"][0]["date"], "2024-03-20");

        let (_, second) = send(post_json("/api/v1/deals", request)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn deals_endpoint_bounds_count() {
        let request = json!({
            "neighborhoodName": "Florentin",
            "city": "Tel Aviv",
            "avgPricePerSqm": 52000,
            "trend": "stable",
            "count": 0
        });
        let (status, _) = send(post_json("/api/v1/deals", request)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn neighborhood_deals_filter_by_category() {
        let (status, body) = send(get_request(
            "/api/v1/market/neighborhoods/florentin/deals?count=40&category=below-market",
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["neighborhoodName"], "Florentin");
        assert_eq!(body["selectedCategory"], "below-market");
        assert_eq!(body["categoryCounts"]["all"], 40);
        let deals = body["deals"].as_array().expect("deal list");
        assert!(!deals.is_empty());
        assert!(deals.iter().all(|deal| deal["category"] == "below-market"));
        assert_eq!(body["trendLine"].as_array().map(Vec::len), Some(40));
    }

    #[tokio::test]
    async fn unknown_neighborhood_is_not_found() {
        let (status, body) = send(get_request("/api/v1/market/neighborhoods/Atlantis/deals")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("Atlantis"));
    }

    #[tokio::test]
    async fn market_endpoint_serves_snapshot() {
        let (status, body) = send(get_request("/api/v1/market")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lastUpdate"], "2026-02-17");
        assert_eq!(body["regions"].as_array().map(Vec::len), Some(6));
        assert_eq!(body["neighborhoods"].as_array().map(Vec::len), Some(17));
    }

    #[tokio::test]
    async fn opportunities_are_sorted_by_growth() {
        let (status, body) = send(post_json("/api/v1/opportunities", reference_inputs())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["maxPropertyPrice"], 1_587_560);
        let names: Vec<&str> = body["neighborhoods"]
            .as_array()
            .expect("neighborhood list")
            .iter()
            .filter_map(|entry| entry["name"].as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Nahariya Center", "Beer Sheva North", "Tiberias", "Arad"]
        );
    }
}
