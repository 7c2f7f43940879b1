use crate::cli::ServeArgs;
use crate::infra::{load_service, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use candidate_insights::config::AppConfig;
use candidate_insights::dashboard::candidate_router;
use candidate_insights::error::AppError;
use candidate_insights::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if !args.feeds.is_empty() {
        config.feed.sources = std::mem::take(&mut args.feeds);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let sources = config.feed.sources.clone();
    let (service, status) = tokio::task::spawn_blocking(move || load_service(sources))
        .await
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))?;
    if !status.is_loaded() {
        warn!("starting with an empty candidate dataset; POST /api/v1/candidates/reload to retry");
    }

    let app = with_operational_routes(candidate_router(Arc::new(service)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "candidate insights service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
