use super::domain::{Candidate, FilterState};
use super::filter::filter_candidates;
use super::options::{derive_options, FilterOptions};
use super::stats::{aggregate, AggregatedStats, HeadlineFigures};
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// Statistics for one filter selection over one dataset generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub filters: FilterState,
    pub matched: usize,
    pub stats: AggregatedStats,
    pub headline: HeadlineFigures,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OptionsKey {
    province: Option<String>,
    district: Option<String>,
}

impl OptionsKey {
    fn from_filters(filters: &FilterState) -> Self {
        Self {
            province: filters.province.clone(),
            district: filters.district.clone(),
        }
    }
}

/// Loaded dataset plus single-entry memos for the last snapshot and options.
///
/// Recomputation is cheap enough to run on every filter change; the memos only
/// absorb repeated requests for the same selection.
#[derive(Debug)]
pub struct Dashboard {
    candidates: Arc<[Candidate]>,
    generation: u64,
    last_snapshot: Option<Arc<DashboardSnapshot>>,
    last_options: Option<(OptionsKey, Arc<FilterOptions>)>,
}

impl Dashboard {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates: candidates.into(),
            generation: 0,
            last_snapshot: None,
            last_options: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swap in a freshly loaded dataset and forget memoized results.
    pub fn replace(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates.into();
        self.generation += 1;
        self.last_snapshot = None;
        self.last_options = None;
    }

    pub fn snapshot(&mut self, filters: &FilterState) -> Arc<DashboardSnapshot> {
        if let Some(cached) = &self.last_snapshot {
            if cached.filters == *filters {
                trace!(generation = self.generation, "dashboard snapshot cache hit");
                return Arc::clone(cached);
            }
        }

        trace!(generation = self.generation, "dashboard snapshot cache miss");
        let filtered = filter_candidates(&self.candidates, filters);
        let stats = aggregate(filtered.iter().copied());
        let headline = stats.headline(filtered.iter().copied());
        let snapshot = Arc::new(DashboardSnapshot {
            filters: filters.clone(),
            matched: filtered.len(),
            stats,
            headline,
        });
        self.last_snapshot = Some(Arc::clone(&snapshot));
        snapshot
    }

    pub fn options(&mut self, filters: &FilterState) -> Arc<FilterOptions> {
        let key = OptionsKey::from_filters(filters);
        if let Some((cached_key, cached)) = &self.last_options {
            if *cached_key == key {
                trace!(generation = self.generation, "filter options cache hit");
                return Arc::clone(cached);
            }
        }

        trace!(generation = self.generation, "filter options cache miss");
        let options = Arc::new(derive_options(&self.candidates, filters));
        self.last_options = Some((key, Arc::clone(&options)));
        options
    }

    /// A page of matching candidates plus the total match count.
    pub fn page(&self, filters: &FilterState, offset: usize, limit: usize) -> (usize, Vec<Candidate>) {
        let filtered = filter_candidates(&self.candidates, filters);
        let matched = filtered.len();
        let page = filtered
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        (matched, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u64, province: &str, district: &str, party: &str) -> Candidate {
        Candidate {
            id,
            name: format!("Candidate {id}"),
            party: Some(party.to_string()),
            province: Some(province.to_string()),
            district: Some(district.to_string()),
            constituency: Some(1),
            gender: Some("Female".to_string()),
            age: Some(40),
            qualification: "Bachelor".to_string(),
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(vec![
            candidate(1, "Bagmati", "Kathmandu", "A"),
            candidate(2, "Bagmati", "Lalitpur", "B"),
            candidate(3, "Koshi", "Morang", "A"),
        ])
    }

    #[test]
    fn identical_filters_reuse_snapshot() {
        let mut dashboard = dashboard();
        let filters = FilterState::new().with_party(Some("A".to_string()));
        let first = dashboard.snapshot(&filters);
        let second = dashboard.snapshot(&filters.clone());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.matched, 2);

        let other = dashboard.snapshot(&FilterState::new());
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(other.matched, 3);
    }

    #[test]
    fn options_ignore_unrelated_filter_changes() {
        let mut dashboard = dashboard();
        let base = FilterState::new().with_province(Some("Bagmati".to_string()));
        let first = dashboard.options(&base);
        let second = dashboard.options(&base.clone().with_party(Some("B".to_string())));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.districts, vec!["Kathmandu", "Lalitpur"]);
    }

    #[test]
    fn replace_invalidates_memos() {
        let mut dashboard = dashboard();
        let filters = FilterState::new();
        let before = dashboard.snapshot(&filters);
        dashboard.replace(vec![candidate(9, "Gandaki", "Kaski", "C")]);
        let after = dashboard.snapshot(&filters);
        assert_eq!(dashboard.generation(), 1);
        assert_eq!(before.matched, 3);
        assert_eq!(after.matched, 1);
        assert_eq!(dashboard.options(&filters).provinces, vec!["Gandaki"]);
    }

    #[test]
    fn page_applies_offset_and_limit() {
        let dashboard = dashboard();
        let (matched, page) = dashboard.page(&FilterState::new(), 1, 1);
        assert_eq!(matched, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 2);
    }
}
