use crate::cli::ServeArgs;
use crate::infra::{load_reference, AppState};
use crate::routes::placement_routes;
use admission_placement::config::AppConfig;
use admission_placement::error::AppError;
use admission_placement::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
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

    let reference = load_reference(args.bundle.as_deref())?;
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::new(prometheus_handle, config.placement.clone(), reference);
    let readiness_flag = app_state.readiness.clone();

    let app = placement_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placement analysis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
