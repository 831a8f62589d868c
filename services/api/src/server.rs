use crate::cli::ServeArgs;
use crate::infra::{in_memory_facade, AppState};
use crate::routes::with_grant_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use grant_flow::config::AppConfig;
use grant_flow::error::AppError;
use grant_flow::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let facade = in_memory_facade(config.grants);

    let app = with_grant_routes(facade)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = ?config.environment,
        %addr,
        strict_evaluation = config.grants.strict_evaluation,
        require_evaluated_decision = config.grants.require_evaluated_decision,
        "grant lifecycle service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
