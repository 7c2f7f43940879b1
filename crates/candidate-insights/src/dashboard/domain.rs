use super::classification::{classify_qualification, AgeBracket, EducationTier};
use serde::{Deserialize, Serialize};

/// One contesting candidate, normalized at the feed boundary.
///
/// Optional text fields are never `Some("")`; the feed maps blank values to
/// `None` so downstream grouping only has to check presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
    pub party: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub constituency: Option<u32>,
    pub gender: Option<String>,
    pub age: Option<u16>,
    pub qualification: String,
}

impl Candidate {
    pub fn education_tier(&self) -> EducationTier {
        classify_qualification(&self.qualification)
    }

    pub fn age_bracket(&self) -> Option<AgeBracket> {
        self.age.and_then(AgeBracket::for_years)
    }
}

/// Currently selected dashboard filters. `None` means "no constraint".
///
/// Values are replaced rather than mutated: every `with_*` method consumes
/// the state and returns the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub province: Option<String>,
    pub district: Option<String>,
    pub party: Option<String>,
    pub qualification: Option<EducationTier>,
    pub gender: Option<String>,
    pub constituency: Option<u32>,
    pub age_min: Option<u16>,
    pub age_max: Option<u16>,
    pub search: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Selecting a different province invalidates the district and
    /// constituency, which are scoped to it.
    pub fn with_province(mut self, province: Option<String>) -> Self {
        if self.province != province {
            self.district = None;
            self.constituency = None;
        }
        self.province = province;
        self
    }

    pub fn with_district(mut self, district: Option<String>) -> Self {
        if self.district != district {
            self.constituency = None;
        }
        self.district = district;
        self
    }

    pub fn with_party(mut self, party: Option<String>) -> Self {
        self.party = party;
        self
    }

    pub fn with_qualification(mut self, qualification: Option<EducationTier>) -> Self {
        self.qualification = qualification;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_constituency(mut self, constituency: Option<u32>) -> Self {
        self.constituency = constituency;
        self
    }

    pub fn with_age_range(mut self, age_min: Option<u16>, age_max: Option<u16>) -> Self {
        self.age_min = age_min;
        self.age_max = age_max;
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    /// Search text with surrounding whitespace removed; blank counts as absent.
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
