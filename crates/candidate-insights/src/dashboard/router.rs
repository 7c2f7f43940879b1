use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::classification::EducationTier;
use super::domain::{Candidate, FilterState};
use super::options::FilterOptions;
use super::service::{DashboardService, FeedStatus};
use super::stats::{HeadlineFigures, StatsSummary};
use crate::error::AppError;

pub const DEFAULT_PAGE_LIMIT: usize = 50;
pub const MAX_PAGE_LIMIT: usize = 500;

/// Query-string filters shared by every candidate endpoint.
///
/// Numbers arrive as text so that blank values read as absent and malformed
/// ones produce the JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateQuery {
    pub province: Option<String>,
    pub district: Option<String>,
    pub party: Option<String>,
    pub qualification: Option<String>,
    pub gender: Option<String>,
    pub constituency: Option<String>,
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    pub search: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl CandidateQuery {
    pub fn filters(&self) -> Result<FilterState, AppError> {
        let qualification = present(&self.qualification)
            .map(|label| label.parse::<EducationTier>())
            .transpose()
            .map_err(|err| AppError::InvalidQuery(err.to_string()))?;

        Ok(FilterState::new()
            .with_province(present(&self.province))
            .with_district(present(&self.district))
            .with_constituency(number("constituency", &self.constituency)?)
            .with_party(present(&self.party))
            .with_qualification(qualification)
            .with_gender(present(&self.gender))
            .with_age_range(
                number("age_min", &self.age_min)?,
                number("age_max", &self.age_max)?,
            )
            .with_search(present(&self.search)))
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn number<T: FromStr>(name: &str, value: &Option<String>) -> Result<Option<T>, AppError> {
    present(value)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| {
                AppError::InvalidQuery(format!("{name} must be a non-negative integer, got '{raw}'"))
            })
        })
        .transpose()
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub filters: FilterState,
    pub matched: usize,
    pub headline: HeadlineFigures,
    pub summary: StatsSummary,
    pub feed: FeedStatus,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    /// The requested selection with stale values cleared.
    pub selection: FilterState,
    pub options: FilterOptions,
}

#[derive(Debug, Serialize)]
pub struct CandidatePage {
    pub matched: usize,
    pub offset: usize,
    pub limit: usize,
    pub candidates: Vec<Candidate>,
}

/// Router builder exposing the dashboard's read endpoints and feed reload.
pub fn candidate_router(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/v1/candidates", get(list_handler))
        .route("/api/v1/candidates/stats", get(stats_handler))
        .route("/api/v1/candidates/options", get(options_handler))
        .route("/api/v1/candidates/reload", post(reload_handler))
        .with_state(service)
}

pub(crate) async fn stats_handler(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let filters = query.filters()?;
    let snapshot = service.snapshot(&filters);

    Ok(Json(StatsResponse {
        filters,
        matched: snapshot.matched,
        headline: snapshot.headline.clone(),
        summary: snapshot.stats.summary(),
        feed: service.status(),
    }))
}

pub(crate) async fn options_handler(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<OptionsResponse>, AppError> {
    let filters = query.filters()?;
    let options = service.options(&filters);

    Ok(Json(OptionsResponse {
        selection: options.revalidate(&filters),
        options: options.as_ref().clone(),
    }))
}

pub(crate) async fn list_handler(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<CandidatePage>, AppError> {
    let filters = query.filters()?;
    let offset = number::<usize>("offset", &query.offset)?.unwrap_or(0);
    let limit = number::<usize>("limit", &query.limit)?
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    let (matched, candidates) = service.page(&filters, offset, limit);

    Ok(Json(CandidatePage {
        matched,
        offset,
        limit,
        candidates,
    }))
}

pub(crate) async fn reload_handler(
    State(service): State<Arc<DashboardService>>,
) -> Result<Response, AppError> {
    let status = tokio::task::spawn_blocking(move || service.reload())
        .await
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err)))?;

    let code = if status.is_loaded() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok((code, Json(status)).into_response())
}
