use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest completed credential, derived from a free-text qualification string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EducationTier {
    #[serde(rename = "Ph.D/M.Phil")]
    PhdMphil,
    #[serde(rename = "Masters")]
    Masters,
    #[serde(rename = "Bachelors")]
    Bachelors,
    #[serde(rename = "+2/Diploma")]
    PlusTwoDiploma,
    #[serde(rename = "SLC/SEE")]
    SlcSee,
    #[serde(rename = "Below SLC")]
    BelowSlc,
    #[serde(rename = "Literate")]
    Literate,
    #[serde(rename = "Other")]
    Other,
}

impl EducationTier {
    /// Hierarchy order, highest credential first. Used for display and option sorting.
    pub const fn ordered() -> [Self; 8] {
        [
            Self::PhdMphil,
            Self::Masters,
            Self::Bachelors,
            Self::PlusTwoDiploma,
            Self::SlcSee,
            Self::BelowSlc,
            Self::Literate,
            Self::Other,
        ]
    }

    /// Keyword matching order. `BelowSlc` precedes `SlcSee` because its
    /// keywords embed "slc"/"see"; `Other` is the fallback and owns no keywords.
    pub const fn declaration_order() -> [Self; 7] {
        [
            Self::PhdMphil,
            Self::Masters,
            Self::Bachelors,
            Self::PlusTwoDiploma,
            Self::BelowSlc,
            Self::SlcSee,
            Self::Literate,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PhdMphil => "Ph.D/M.Phil",
            Self::Masters => "Masters",
            Self::Bachelors => "Bachelors",
            Self::PlusTwoDiploma => "+2/Diploma",
            Self::SlcSee => "SLC/SEE",
            Self::BelowSlc => "Below SLC",
            Self::Literate => "Literate",
            Self::Other => "Other",
        }
    }

    /// Lowercase substrings that identify the tier in Latin or Devanagari script.
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::PhdMphil => &[
                "ph.d",
                "phd",
                "ph. d",
                "doctorate",
                "m.phil",
                "mphil",
                "विद्यावारिधि",
                "पीएचडी",
                "एमफिल",
            ],
            Self::Masters => &[
                "master",
                "post graduate",
                "postgraduate",
                "m.a",
                "mba",
                "m.b.a",
                "m.sc",
                "msc",
                "m.com",
                "mcom",
                "m.ed",
                "llm",
                "ll.m",
                "स्नातकोत्तर",
                "एम.ए",
                "एमए",
                "एमबीए",
                "एम.बी.ए",
            ],
            Self::Bachelors => &[
                "bachelor",
                "graduate",
                "b.a",
                "b.sc",
                "bsc",
                "bba",
                "bbs",
                "b.b.s",
                "b.com",
                "bcom",
                "b.ed",
                "b.e.",
                "b.tech",
                "mbbs",
                "llb",
                "ll.b",
                "स्नातक",
                "बी.ए",
                "बीए",
            ],
            Self::PlusTwoDiploma => &[
                "+2",
                "plus two",
                "plus 2",
                "intermediate",
                "i.sc",
                "i.com",
                "proficiency",
                "pcl",
                "diploma",
                "higher secondary",
                "hseb",
                "class 12",
                "grade 12",
                "+२",
                "प्रमाणपत्र तह",
                "प्रवीणता",
                "उच्च माध्यमिक",
                "कक्षा १२",
                "डिप्लोमा",
            ],
            Self::BelowSlc => &[
                "below slc",
                "below see",
                "under slc",
                "under see",
                "non slc",
                "non-slc",
                "pre slc",
                "class 8",
                "class 9",
                "grade 8",
                "primary",
                "lower secondary",
                "एसएलसी भन्दा कम",
                "एसएलसी भन्दा तल",
                "कक्षा ८",
                "कक्षा ९",
                "प्राथमिक",
                "निम्न माध्यमिक",
            ],
            Self::SlcSee => &[
                "slc",
                "s.l.c",
                "see",
                "s.e.e",
                "matric",
                "class 10",
                "grade 10",
                "secondary",
                "एसएलसी",
                "एस.एल.सी",
                "एसईई",
                "कक्षा १०",
                "माध्यमिक",
            ],
            Self::Literate => &[
                "literate",
                "literacy",
                "read and write",
                "साक्षर",
                "लेखपढ",
            ],
            Self::Other => &[],
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ordered()
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for EducationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown education tier '{0}'")]
pub struct UnknownTier(pub String);

impl FromStr for EducationTier {
    type Err = UnknownTier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value).ok_or_else(|| UnknownTier(value.to_string()))
    }
}

/// Map a raw qualification string onto its education tier.
///
/// Tiers are tested in [`EducationTier::declaration_order`] and the first tier
/// with a keyword contained in the lowercased input wins. Empty input and
/// unmatched text fall back to [`EducationTier::Other`].
pub fn classify_qualification(raw: &str) -> EducationTier {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return EducationTier::Other;
    }

    EducationTier::declaration_order()
        .into_iter()
        .find(|tier| {
            tier.keywords()
                .iter()
                .any(|keyword| normalized.contains(keyword))
        })
        .unwrap_or(EducationTier::Other)
}

/// Disjoint inclusive age ranges used for the age-group breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    From36To45,
    #[serde(rename = "46-55")]
    From46To55,
    #[serde(rename = "56-65")]
    From56To65,
    #[serde(rename = "66+")]
    From66,
}

impl AgeBracket {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::From18To25,
            Self::From26To35,
            Self::From36To45,
            Self::From46To55,
            Self::From56To65,
            Self::From66,
        ]
    }

    /// Inclusive `(min, max)` years.
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::From18To25 => (18, 25),
            Self::From26To35 => (26, 35),
            Self::From36To45 => (36, 45),
            Self::From46To55 => (46, 55),
            Self::From56To65 => (56, 65),
            Self::From66 => (66, 120),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::From18To25 => "18-25",
            Self::From26To35 => "26-35",
            Self::From36To45 => "36-45",
            Self::From46To55 => "46-55",
            Self::From56To65 => "56-65",
            Self::From66 => "66+",
        }
    }

    pub fn for_years(years: u16) -> Option<Self> {
        Self::ordered().into_iter().find(|bracket| {
            let (min, max) = bracket.bounds();
            (min..=max).contains(&years)
        })
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Find the bracket containing `age`. Non-finite values, fractional values
/// between two brackets and anything outside the covered span return `None`.
pub fn classify_age(age: f64) -> Option<AgeBracket> {
    if !age.is_finite() {
        return None;
    }

    AgeBracket::ordered().into_iter().find(|bracket| {
        let (min, max) = bracket.bounds();
        age >= f64::from(min) && age <= f64::from(max)
    })
}

/// Major parties listed ahead of everything else in party dropdowns.
pub const PARTY_PRIORITY: &[&str] = &[
    "नेपाली काँग्रेस",
    "Nepali Congress",
    "नेपाल कम्युनिष्ट पार्टी (एकीकृत मार्क्सवादी लेनिनवादी)",
    "CPN-UML",
    "नेपाल कम्युनिष्ट पार्टी (माओवादी केन्द्र)",
    "CPN (Maoist Centre)",
    "राष्ट्रिय स्वतन्त्र पार्टी",
    "Rastriya Swatantra Party",
    "राष्ट्रिय प्रजातन्त्र पार्टी",
    "Rastriya Prajatantra Party",
    "जनता समाजवादी पार्टी, नेपाल",
    "Janata Samajwadi Party",
    "नेपाल कम्युनिष्ट पार्टी (एकीकृत समाजवादी)",
    "CPN (Unified Socialist)",
    "लोकतान्त्रिक समाजवादी पार्टी, नेपाल",
    "Loktantrik Samajwadi Party",
];

/// Index of `party` in [`PARTY_PRIORITY`], if it is a major party.
pub fn party_priority(party: &str) -> Option<usize> {
    PARTY_PRIORITY.iter().position(|name| *name == party)
}
