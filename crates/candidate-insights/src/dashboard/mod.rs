//! Candidate dataset classification, filtering, aggregation and option derivation.

mod cache;
pub mod classification;
pub mod domain;
pub mod filter;
pub mod options;
pub mod router;
pub mod service;
pub mod stats;

pub use cache::{Dashboard, DashboardSnapshot};
pub use classification::{
    classify_age, classify_qualification, AgeBracket, EducationTier, PARTY_PRIORITY,
};
pub use domain::{Candidate, FilterState};
pub use filter::{count_matching, filter_candidates, matches};
pub use options::{derive_options, FilterOptions};
pub use router::candidate_router;
pub use service::{DashboardService, FeedStatus};
pub use stats::{aggregate, AggregatedStats, CountEntry, HeadlineFigures, StatsSummary};
