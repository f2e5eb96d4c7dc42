use crate::cli::ServeArgs;
use crate::infra::{load_snapshot, AppState, MarketState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use israstat::config::AppConfig;
use israstat::error::AppError;
use israstat::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let snapshot = load_snapshot(config.market.snapshot_csv.as_deref())?;
    let neighborhoods = snapshot.neighborhoods.len();
    let market = MarketState::new(snapshot, config.market.deal_count);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = router(market)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        neighborhoods,
        deal_count = config.market.deal_count,
        "israstat service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
