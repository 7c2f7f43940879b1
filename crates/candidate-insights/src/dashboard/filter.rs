use super::domain::{Candidate, FilterState};

/// Whether `candidate` satisfies every present field of `filters`.
///
/// All constraints, search text included, are AND-ed. A constraint on a field
/// the candidate lacks never matches.
pub fn matches(candidate: &Candidate, filters: &FilterState) -> bool {
    if !text_matches(candidate.province.as_deref(), filters.province.as_deref())
        || !text_matches(candidate.district.as_deref(), filters.district.as_deref())
        || !text_matches(candidate.party.as_deref(), filters.party.as_deref())
        || !text_matches(candidate.gender.as_deref(), filters.gender.as_deref())
    {
        return false;
    }

    if let Some(tier) = filters.qualification {
        if candidate.education_tier() != tier {
            return false;
        }
    }

    if let Some(constituency) = filters.constituency {
        if candidate.constituency != Some(constituency) {
            return false;
        }
    }

    if filters.age_min.is_some() || filters.age_max.is_some() {
        let Some(age) = candidate.age else {
            return false;
        };
        if filters.age_min.is_some_and(|min| age < min)
            || filters.age_max.is_some_and(|max| age > max)
        {
            return false;
        }
    }

    match filters.search_text() {
        Some(needle) => search_matches(candidate, needle),
        None => true,
    }
}

fn text_matches(value: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        Some(wanted) => value == Some(wanted),
        None => true,
    }
}

fn search_matches(candidate: &Candidate, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    [
        Some(candidate.name.as_str()),
        candidate.party.as_deref(),
        candidate.district.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Candidates matching `filters`, in input order.
pub fn filter_candidates<'a>(candidates: &'a [Candidate], filters: &FilterState) -> Vec<&'a Candidate> {
    candidates
        .iter()
        .filter(|candidate| matches(candidate, filters))
        .collect()
}

pub fn count_matching(candidates: &[Candidate], filters: &FilterState) -> usize {
    candidates
        .iter()
        .filter(|candidate| matches(candidate, filters))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::classification::EducationTier;

    fn candidate(id: u64, name: &str, party: &str, district: &str, age: Option<u16>) -> Candidate {
        Candidate {
            id,
            name: name.to_string(),
            party: Some(party.to_string()),
            province: Some("Bagmati".to_string()),
            district: Some(district.to_string()),
            constituency: Some(1),
            gender: Some("Male".to_string()),
            age,
            qualification: "Bachelor".to_string(),
        }
    }

    #[test]
    fn empty_filters_match_everything() {
        let record = candidate(1, "Ram", "A", "Kathmandu", None);
        assert!(matches(&record, &FilterState::new()));
    }

    #[test]
    fn structural_fields_use_exact_equality() {
        let record = candidate(1, "Ram", "A", "Kathmandu", Some(40));
        let filters = FilterState::new().with_district(Some("kathmandu".to_string()));
        assert!(!matches(&record, &filters));
        let filters = FilterState::new().with_district(Some("Kathmandu".to_string()));
        assert!(matches(&record, &filters));
        let filters = filters.with_constituency(Some(2));
        assert!(!matches(&record, &filters));
    }

    #[test]
    fn qualification_filter_uses_classified_tier() {
        let record = candidate(1, "Ram", "A", "Kathmandu", Some(40));
        let filters = FilterState::new().with_qualification(Some(EducationTier::Bachelors));
        assert!(matches(&record, &filters));
        let filters = filters.with_qualification(Some(EducationTier::Masters));
        assert!(!matches(&record, &filters));
    }

    #[test]
    fn age_bounds_are_inclusive_and_require_an_age() {
        let record = candidate(1, "Ram", "A", "Kathmandu", Some(40));
        let inclusive = FilterState::new().with_age_range(Some(40), Some(40));
        assert!(matches(&record, &inclusive));
        let above = FilterState::new().with_age_range(Some(41), None);
        assert!(!matches(&record, &above));
        let below = FilterState::new().with_age_range(None, Some(39));
        assert!(!matches(&record, &below));

        let ageless = candidate(2, "Hari", "A", "Kathmandu", None);
        assert!(!matches(&ageless, &inclusive));
    }

    #[test]
    fn search_covers_name_party_and_district_case_insensitively() {
        let record = candidate(1, "Ram Bahadur", "Green Party", "Lalitpur", None);
        for needle in ["bahadur", "GREEN", "lalit"] {
            let filters = FilterState::new().with_search(Some(needle.to_string()));
            assert!(matches(&record, &filters), "{needle} should match");
        }
        let filters = FilterState::new().with_search(Some("Bagmati".to_string()));
        assert!(!matches(&record, &filters));
    }

    #[test]
    fn search_is_and_ed_with_other_filters() {
        let record = candidate(1, "Ram", "A", "Kathmandu", None);
        let filters = FilterState::new()
            .with_search(Some("ram".to_string()))
            .with_party(Some("B".to_string()));
        assert!(!matches(&record, &filters));
    }

    #[test]
    fn filter_and_count_agree() {
        let records = vec![
            candidate(1, "Ram", "A", "Kathmandu", Some(30)),
            candidate(2, "Sita", "B", "Kathmandu", Some(50)),
            candidate(3, "Gita", "A", "Lalitpur", Some(60)),
        ];
        let filters = FilterState::new().with_party(Some("A".to_string()));
        let filtered = filter_candidates(&records, &filters);
        assert_eq!(filtered.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(count_matching(&records, &filters), 2);
        assert_eq!(count_matching(&[], &filters), 0);
    }
}
