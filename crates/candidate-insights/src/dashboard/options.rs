use super::classification::{party_priority, EducationTier};
use super::domain::{Candidate, FilterState};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Option lists for the dashboard's filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub provinces: Vec<String>,
    pub districts: Vec<String>,
    pub constituencies: Vec<u32>,
    pub parties: Vec<String>,
    pub qualifications: Vec<EducationTier>,
    pub genders: Vec<String>,
}

/// Compute option lists from the full candidate list.
///
/// Only the province and district selections narrow anything: districts are
/// scoped to the selected province, constituencies to the selected district.
pub fn derive_options(candidates: &[Candidate], filters: &FilterState) -> FilterOptions {
    let provinces = distinct_sorted(candidates.iter().map(|c| c.province.as_deref()));

    let districts = distinct_sorted(
        candidates
            .iter()
            .filter(|c| scoped(c.province.as_deref(), filters.province.as_deref()))
            .map(|c| c.district.as_deref()),
    );

    let constituencies = candidates
        .iter()
        .filter(|c| scoped(c.district.as_deref(), filters.district.as_deref()))
        .filter_map(|c| c.constituency)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut parties = distinct_sorted(candidates.iter().map(|c| c.party.as_deref()));
    parties.sort_by(|a, b| compare_parties(a, b));

    let qualifications = candidates
        .iter()
        .map(Candidate::education_tier)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let genders = distinct_sorted(candidates.iter().map(|c| c.gender.as_deref()));

    FilterOptions {
        provinces,
        districts,
        constituencies,
        parties,
        qualifications,
        genders,
    }
}

fn scoped(value: Option<&str>, selected: Option<&str>) -> bool {
    match selected {
        Some(selected) => value == Some(selected),
        None => true,
    }
}

fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = Option<&'a str>>,
{
    values
        .flatten()
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Priority parties first in declared order, then everything else by name.
pub fn compare_parties(a: &str, b: &str) -> Ordering {
    match (party_priority(a), party_priority(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

impl FilterOptions {
    /// Drop selections that no longer appear among the available options.
    pub fn revalidate(&self, filters: &FilterState) -> FilterState {
        let mut next = filters.clone();

        if !contains(&self.provinces, next.province.as_deref()) {
            next = next.with_province(None);
        }
        if !contains(&self.districts, next.district.as_deref()) {
            next = next.with_district(None);
        }
        if next
            .constituency
            .is_some_and(|id| !self.constituencies.contains(&id))
        {
            next.constituency = None;
        }
        if !contains(&self.parties, next.party.as_deref()) {
            next.party = None;
        }
        if next
            .qualification
            .is_some_and(|tier| !self.qualifications.contains(&tier))
        {
            next.qualification = None;
        }
        if !contains(&self.genders, next.gender.as_deref()) {
            next.gender = None;
        }

        next
    }
}

fn contains(options: &[String], selected: Option<&str>) -> bool {
    match selected {
        Some(selected) => options.iter().any(|option| option == selected),
        None => true,
    }
}
