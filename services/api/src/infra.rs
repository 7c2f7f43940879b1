use candidate_insights::config::AppConfig;
use candidate_insights::dashboard::{DashboardService, FeedStatus};
use candidate_insights::error::AppError;
use candidate_insights::feed::FallbackFeed;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Feed paths from the command line, or the configured list when none given.
pub(crate) fn feed_paths(overrides: Vec<PathBuf>) -> Result<Vec<PathBuf>, AppError> {
    if !overrides.is_empty() {
        return Ok(overrides);
    }
    Ok(AppConfig::load()?.feed.sources)
}

/// Build a service over `paths` and attempt the first load.
pub(crate) fn load_service(paths: Vec<PathBuf>) -> (DashboardService, FeedStatus) {
    let service = DashboardService::new(FallbackFeed::from_paths(paths));
    let status = service.reload();
    (service, status)
}
