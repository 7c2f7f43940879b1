use super::classification::{AgeBracket, EducationTier};
use super::domain::Candidate;
use serde::Serialize;
use std::collections::HashMap;

/// Grouped counts over one (already filtered) list of candidates.
///
/// Key iteration order is unspecified; use [`AggregatedStats::summary`] for
/// display-ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedStats {
    pub total: usize,
    pub by_party: HashMap<String, usize>,
    pub by_province: HashMap<String, usize>,
    pub by_district: HashMap<String, usize>,
    pub by_gender: HashMap<String, usize>,
    pub by_qualification: HashMap<EducationTier, usize>,
    pub by_age_group: HashMap<AgeBracket, usize>,
}

/// Fold candidates into grouped counts in a single pass.
///
/// Every tier and bracket is present even at zero. Records missing a keyed
/// field still count towards `total` and the other groups.
pub fn aggregate<'a, I>(candidates: I) -> AggregatedStats
where
    I: IntoIterator<Item = &'a Candidate>,
{
    let mut stats = AggregatedStats {
        by_qualification: EducationTier::ordered()
            .into_iter()
            .map(|tier| (tier, 0))
            .collect(),
        by_age_group: AgeBracket::ordered()
            .into_iter()
            .map(|bracket| (bracket, 0))
            .collect(),
        ..AggregatedStats::default()
    };

    for candidate in candidates {
        stats.total += 1;
        bump(&mut stats.by_party, candidate.party.as_deref());
        bump(&mut stats.by_province, candidate.province.as_deref());
        bump(&mut stats.by_district, candidate.district.as_deref());
        bump(&mut stats.by_gender, candidate.gender.as_deref());

        *stats
            .by_qualification
            .entry(candidate.education_tier())
            .or_insert(0) += 1;

        if let Some(bracket) = candidate.age_bracket() {
            *stats.by_age_group.entry(bracket).or_insert(0) += 1;
        }
    }

    stats
}

fn bump(counts: &mut HashMap<String, usize>, key: Option<&str>) {
    if let Some(key) = key.filter(|key| !key.is_empty()) {
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
    /// Percentage of the aggregated total, one decimal place.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    pub parties: Vec<CountEntry>,
    pub provinces: Vec<CountEntry>,
    pub districts: Vec<CountEntry>,
    pub genders: Vec<CountEntry>,
    pub qualifications: Vec<CountEntry>,
    pub age_groups: Vec<CountEntry>,
}

impl StatsSummary {
    pub fn top_parties(&self, n: usize) -> &[CountEntry] {
        &self.parties[..n.min(self.parties.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineFigures {
    pub total: usize,
    pub parties: usize,
    pub districts: usize,
    pub female_share: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_age: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_party: Option<String>,
}

const FEMALE_LABELS: &[&str] = &["female", "महिला"];

impl AggregatedStats {
    /// Display rows: free-text groups by count descending then label, tiers
    /// and brackets in their fixed order including zero rows.
    pub fn summary(&self) -> StatsSummary {
        let total = self.total;

        let qualifications = EducationTier::ordered()
            .into_iter()
            .map(|tier| {
                let count = self.by_qualification.get(&tier).copied().unwrap_or(0);
                entry(tier.label().to_string(), count, total)
            })
            .collect();

        let age_groups = AgeBracket::ordered()
            .into_iter()
            .map(|bracket| {
                let count = self.by_age_group.get(&bracket).copied().unwrap_or(0);
                entry(bracket.label().to_string(), count, total)
            })
            .collect();

        StatsSummary {
            total,
            parties: ranked(&self.by_party, total),
            provinces: ranked(&self.by_province, total),
            districts: ranked(&self.by_district, total),
            genders: ranked(&self.by_gender, total),
            qualifications,
            age_groups,
        }
    }

    /// Summary-card figures. `candidates` must be the list these stats were
    /// aggregated from; it supplies the age average.
    pub fn headline<'a, I>(&self, candidates: I) -> HeadlineFigures
    where
        I: IntoIterator<Item = &'a Candidate>,
    {
        let female = self
            .by_gender
            .iter()
            .filter(|(gender, _)| {
                let lowered = gender.to_lowercase();
                FEMALE_LABELS.contains(&lowered.as_str())
            })
            .map(|(_, count)| *count)
            .sum::<usize>();

        let (age_sum, aged) = candidates
            .into_iter()
            .filter_map(|candidate| candidate.age)
            .fold((0u64, 0u64), |(sum, n), age| (sum + u64::from(age), n + 1));
        let average_age = (aged > 0).then(|| round_one(age_sum as f64 / aged as f64));

        let leading_party = ranked(&self.by_party, self.total)
            .into_iter()
            .next()
            .map(|entry| entry.label);

        HeadlineFigures {
            total: self.total,
            parties: self.by_party.len(),
            districts: self.by_district.len(),
            female_share: percentage(female, self.total),
            average_age,
            leading_party,
        }
    }
}

fn ranked(counts: &HashMap<String, usize>, total: usize) -> Vec<CountEntry> {
    let mut rows: Vec<(&String, usize)> = counts.iter().map(|(k, v)| (k, *v)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows.into_iter()
        .map(|(label, count)| entry(label.clone(), count, total))
        .collect()
}

fn entry(label: String, count: usize, total: usize) -> CountEntry {
    CountEntry {
        label,
        count,
        share: percentage(count, total),
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one(count as f64 * 100.0 / total as f64)
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(party: Option<&str>, gender: Option<&str>, age: Option<u16>, qualification: &str) -> Candidate {
        Candidate {
            id: 0,
            name: "Test".to_string(),
            party: party.map(str::to_string),
            province: Some("Koshi".to_string()),
            district: None,
            constituency: None,
            gender: gender.map(str::to_string),
            age,
            qualification: qualification.to_string(),
        }
    }

    #[test]
    fn empty_input_pre_seeds_tiers_and_brackets() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_party.is_empty());
        assert!(stats.by_province.is_empty());
        assert!(stats.by_district.is_empty());
        assert!(stats.by_gender.is_empty());
        assert_eq!(stats.by_qualification.len(), 8);
        assert!(stats.by_qualification.values().all(|count| *count == 0));
        assert_eq!(stats.by_age_group.len(), 6);
        assert!(stats.by_age_group.values().all(|count| *count == 0));

        let headline = stats.headline(&[]);
        assert_eq!(headline.female_share, 0.0);
        assert!(headline.average_age.is_none());
        assert!(headline.leading_party.is_none());
    }

    #[test]
    fn missing_fields_only_drop_out_of_their_group() {
        let records = vec![
            candidate(Some("A"), Some("Male"), Some(30), "SLC"),
            candidate(None, None, None, ""),
            candidate(Some("A"), Some("Female"), Some(130), "MBA"),
        ];
        let stats = aggregate(&records);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_party.get("A"), Some(&2));
        assert_eq!(stats.by_party.values().sum::<usize>(), 2);
        assert_eq!(stats.by_gender.values().sum::<usize>(), 2);
        assert_eq!(stats.by_province.get("Koshi"), Some(&3));
        assert_eq!(stats.by_qualification.values().sum::<usize>(), 3);
        assert_eq!(stats.by_age_group.values().sum::<usize>(), 1);
        assert_eq!(stats.by_qualification[&EducationTier::Other], 1);
    }

    #[test]
    fn summary_orders_free_text_by_count_then_label() {
        let records = vec![
            candidate(Some("Zeta"), None, None, ""),
            candidate(Some("Beta"), None, None, ""),
            candidate(Some("Alpha"), None, None, ""),
            candidate(Some("Zeta"), None, None, ""),
        ];
        let summary = aggregate(&records).summary();
        let labels: Vec<_> = summary.parties.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Beta"]);
        assert_eq!(summary.parties[0].share, 50.0);
        assert_eq!(summary.top_parties(1).len(), 1);
        assert_eq!(summary.top_parties(10).len(), 3);

        let tiers: Vec<_> = summary.qualifications.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(tiers.first(), Some(&"Ph.D/M.Phil"));
        assert_eq!(tiers.last(), Some(&"Other"));
        assert_eq!(summary.age_groups.len(), 6);
    }

    #[test]
    fn headline_reports_share_average_and_leader() {
        let records = vec![
            candidate(Some("B"), Some("Female"), Some(30), ""),
            candidate(Some("A"), Some("महिला"), Some(41), ""),
            candidate(Some("A"), Some("Male"), None, ""),
            candidate(Some("B"), Some("Male"), Some(50), ""),
        ];
        let stats = aggregate(&records);
        let headline = stats.headline(&records);
        assert_eq!(headline.total, 4);
        assert_eq!(headline.parties, 2);
        assert_eq!(headline.female_share, 50.0);
        assert_eq!(headline.average_age, Some(40.3));
        assert_eq!(headline.leading_party.as_deref(), Some("A"));
    }
}
