use crate::cli::ServeArgs;
use crate::infra::{analysis_service, AppState};
use crate::routes::with_analysis_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fundmatch_ai::config::AppConfig;
use fundmatch_ai::error::AppError;
use fundmatch_ai::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = analysis_service(&config.analysis, args.offline)?;

    let app = with_analysis_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        module_timeout_secs = config.analysis.module_timeout.as_secs(),
        "funding analysis service ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag))
        .await?;
    Ok(())
}

async fn shutdown_signal(readiness: Arc<std::sync::atomic::AtomicBool>) {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    readiness.store(false, Ordering::Release);
    info!("shutdown signal received, draining connections");
}
