use super::cache::{Dashboard, DashboardSnapshot};
use super::domain::{Candidate, FilterState};
use super::options::FilterOptions;
use crate::feed::{Acquisition, FailedAttempt, FallbackFeed};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Outcome of the most recent feed acquisition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedStatus {
    Pending,
    Loaded {
        source: String,
        records: usize,
        skipped: usize,
        loaded_at: DateTime<Utc>,
    },
    Unavailable {
        attempts: Vec<FailedAttempt>,
        checked_at: DateTime<Utc>,
    },
}

impl FeedStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FeedStatus::Loaded { .. })
    }
}

struct ServiceState {
    dashboard: Dashboard,
    status: FeedStatus,
}

/// Shared entry point for every presentation surface: owns the feed, the
/// loaded dataset and its memoized statistics.
pub struct DashboardService {
    feed: FallbackFeed,
    /// Held across fetch and install so reloads apply in the order they ran.
    reload: Mutex<()>,
    state: Mutex<ServiceState>,
}

impl DashboardService {
    /// Create a service with an empty dataset. Call [`Self::reload`] to fetch.
    pub fn new(feed: FallbackFeed) -> Self {
        Self {
            feed,
            reload: Mutex::new(()),
            state: Mutex::new(ServiceState {
                dashboard: Dashboard::new(Vec::new()),
                status: FeedStatus::Pending,
            }),
        }
    }

    /// Acquire the feed again. A failed reload keeps whatever dataset was
    /// loaded before; on first load that is the empty list. Readers are not
    /// blocked while the feed is fetched.
    pub fn reload(&self) -> FeedStatus {
        let _reloading = self.reload.lock().expect("reload mutex poisoned");
        let acquisition = self.feed.acquire();
        let mut state = self.state.lock().expect("dashboard mutex poisoned");

        let status = match acquisition {
            Acquisition::Loaded(load) => {
                let records = load.candidates.len();
                state.dashboard.replace(load.candidates);
                info!(
                    source = %load.source,
                    records,
                    generation = state.dashboard.generation(),
                    "dashboard dataset replaced"
                );
                FeedStatus::Loaded {
                    source: load.source,
                    records,
                    skipped: load.skipped,
                    loaded_at: Utc::now(),
                }
            }
            Acquisition::Unavailable { attempts } => FeedStatus::Unavailable {
                attempts,
                checked_at: Utc::now(),
            },
        };

        state.status = status.clone();
        status
    }

    pub fn status(&self) -> FeedStatus {
        self.state
            .lock()
            .expect("dashboard mutex poisoned")
            .status
            .clone()
    }

    pub fn snapshot(&self, filters: &FilterState) -> Arc<DashboardSnapshot> {
        self.state
            .lock()
            .expect("dashboard mutex poisoned")
            .dashboard
            .snapshot(filters)
    }

    pub fn options(&self, filters: &FilterState) -> Arc<FilterOptions> {
        self.state
            .lock()
            .expect("dashboard mutex poisoned")
            .dashboard
            .options(filters)
    }

    pub fn page(&self, filters: &FilterState, offset: usize, limit: usize) -> (usize, Vec<Candidate>) {
        self.state
            .lock()
            .expect("dashboard mutex poisoned")
            .dashboard
            .page(filters, offset, limit)
    }
}
