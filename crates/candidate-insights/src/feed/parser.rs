use super::normalizer::normalize_text;
use super::FeedError;
use crate::dashboard::Candidate;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// On-disk encoding of a candidate feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Json,
    Csv,
}

impl FeedFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// JSON documents open with `[` or `{`; anything else is read as CSV.
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes.iter().find(|byte| !byte.is_ascii_whitespace()) {
            Some(b'[') | Some(b'{') => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Candidates recovered from one feed document.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub candidates: Vec<Candidate>,
    /// Rows that could not be read as a candidate at all.
    pub skipped: usize,
}

pub(crate) fn parse_bytes(bytes: &[u8], format: FeedFormat) -> Result<ParsedFeed, FeedError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match format {
        FeedFormat::Json => parse_json(bytes),
        FeedFormat::Csv => parse_csv(bytes),
    }
}

fn parse_json(bytes: &[u8]) -> Result<ParsedFeed, FeedError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let rows = match document {
        Value::Array(rows) => rows,
        Value::Object(mut fields) => match fields.remove("candidates").or_else(|| fields.remove("data")) {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(FeedError::UnrecognizedFormat(
                    "JSON object has no `candidates` or `data` array".to_string(),
                ))
            }
        },
        _ => {
            return Err(FeedError::UnrecognizedFormat(
                "JSON document is neither an array nor an object".to_string(),
            ))
        }
    };

    let mut parsed = ParsedFeed::default();
    for (index, row) in rows.iter().enumerate() {
        let position = index + 1;
        match row {
            Value::Object(fields) => {
                let raw = RawCandidate::from_lookup(|alias| fields.get(alias).and_then(json_text));
                parsed.candidates.push(raw.into_candidate(position));
            }
            other => {
                warn!(row = position, kind = json_kind(other), "skipping non-object candidate row");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

/// Scalar JSON values as text; nested values count as absent.
fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => normalize_text(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Cells are read as raw strings so values like `+2` or `007` survive intact.
fn parse_csv(bytes: &[u8]) -> Result<ParsedFeed, FeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = csv_reader.headers()?.clone();
    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| (header, index))
        .collect();

    let mut parsed = ParsedFeed::default();
    for (index, record) in csv_reader.records().enumerate() {
        let position = index + 1;
        match record {
            Ok(record) => {
                let raw = RawCandidate::from_lookup(|alias| {
                    columns
                        .get(alias)
                        .and_then(|column| record.get(*column))
                        .and_then(normalize_text)
                });
                parsed.candidates.push(raw.into_candidate(position));
            }
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(row = position, error = %err, "skipping malformed candidate row");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

/// Whole number from a normalized cell, accepting integral decimals and
/// Devanagari digits.
fn parse_integer(value: &str) -> Option<i64> {
    let digits = ascii_digits(value);
    digits
        .parse::<i64>()
        .ok()
        .or_else(|| digits.parse::<f64>().ok().and_then(whole))
}

fn whole(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn ascii_digits(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '०'..='९' => char::from(b'0' + (ch as u32 - '०' as u32) as u8),
            other => other,
        })
        .collect()
}

/// Candidate attributes a feed row may carry, each under several column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Id,
    Name,
    Party,
    Province,
    District,
    Constituency,
    Gender,
    Age,
    Qualification,
}

impl Column {
    const ALL: [Self; 9] = [
        Self::Id,
        Self::Name,
        Self::Party,
        Self::Province,
        Self::District,
        Self::Constituency,
        Self::Gender,
        Self::Age,
        Self::Qualification,
    ];

    /// Accepted spellings in preference order. The first one holding a usable
    /// value wins, so rows carrying two spellings are not rejected.
    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Id => &["id", "CandidateID", "candidate_id", "candidateId"],
            Self::Name => &["name", "CandidateName", "candidate_name", "candidateName"],
            Self::Party => &["partyName", "PoliticalPartyName", "party_name", "party"],
            Self::Province => &["provinceName", "StateName", "province_name", "province"],
            Self::District => &["districtName", "DistrictName", "district_name", "district"],
            Self::Constituency => &[
                "constituencyId",
                "SCConstID",
                "constituency_id",
                "constituency",
            ],
            Self::Gender => &["gender", "Gender"],
            Self::Age => &["age", "AGE_YR", "Age"],
            Self::Qualification => &["qualification", "QUALIFICATION", "Qualification"],
        }
    }
}

/// One feed row reduced to normalized text per column, before typing.
#[derive(Debug, Default)]
struct RawCandidate {
    cells: HashMap<Column, String>,
}

impl RawCandidate {
    /// Resolve every column through `lookup`, which maps a column name to its
    /// normalized text. A malformed cell only blanks its own column.
    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cells = Column::ALL
            .into_iter()
            .filter_map(|column| {
                column
                    .aliases()
                    .iter()
                    .find_map(|alias| lookup(alias))
                    .map(|value| (column, value))
            })
            .collect();
        Self { cells }
    }

    fn text(&self, column: Column) -> Option<String> {
        self.cells.get(&column).cloned()
    }

    fn integer(&self, column: Column) -> Option<i64> {
        self.cells.get(&column).and_then(|value| parse_integer(value))
    }

    /// Normalize into a [`Candidate`]. Rows without a usable id fall back to
    /// their 1-based position in the feed.
    fn into_candidate(self, position: usize) -> Candidate {
        let id = self
            .integer(Column::Id)
            .and_then(|id| u64::try_from(id).ok())
            .unwrap_or(position as u64);

        let age = self
            .integer(Column::Age)
            .and_then(|age| u16::try_from(age).ok());

        let constituency = self
            .integer(Column::Constituency)
            .and_then(|id| u32::try_from(id).ok())
            .filter(|id| *id > 0);

        Candidate {
            id,
            name: self.text(Column::Name).unwrap_or_default(),
            party: self.text(Column::Party),
            province: self.text(Column::Province),
            district: self.text(Column::District),
            constituency,
            gender: self.text(Column::Gender),
            age,
            qualification: self.text(Column::Qualification).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
pub(crate) fn parse_for_tests(input: &str, format: FeedFormat) -> Result<ParsedFeed, FeedError> {
    parse_bytes(input.as_bytes(), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::EducationTier;

    #[test]
    fn json_rows_accept_public_dataset_columns() {
        let feed = r#"[
            {"CandidateID": 3401, "CandidateName": " Ram  Thapa ", "PoliticalPartyName": "Nepali Congress",
             "StateName": "Bagmati", "DistrictName": "Kathmandu", "SCConstID": 4, "Gender": "पुरुष",
             "AGE_YR": "४५", "QUALIFICATION": "स्नातक", "SYMBOLCODE": 12}
        ]"#;
        let parsed = parse_for_tests(feed, FeedFormat::Json).expect("parse");
        assert_eq!(parsed.skipped, 0);
        let candidate = &parsed.candidates[0];
        assert_eq!(candidate.id, 3401);
        assert_eq!(candidate.name, "Ram Thapa");
        assert_eq!(candidate.party.as_deref(), Some("Nepali Congress"));
        assert_eq!(candidate.constituency, Some(4));
        assert_eq!(candidate.age, Some(45));
        assert_eq!(candidate.qualification, "स्नातक");
    }

    #[test]
    fn json_rows_accept_camel_case_and_wrapped_documents() {
        let feed = r#"{"data": [
            {"id": "7", "name": "Sita", "partyName": "A", "provinceName": "Koshi",
             "districtName": "Morang", "constituencyId": null, "gender": "Female",
             "age": 38.0, "qualification": null}
        ]}"#;
        let parsed = parse_for_tests(feed, FeedFormat::Json).expect("parse");
        let candidate = &parsed.candidates[0];
        assert_eq!(candidate.id, 7);
        assert_eq!(candidate.constituency, None);
        assert_eq!(candidate.age, Some(38));
        assert_eq!(candidate.qualification, "");
    }

    #[test]
    fn malformed_fields_degrade_to_absent() {
        let feed = r#"[
            {"name": "Hari", "partyName": "  ", "age": "unknown", "constituencyId": 0},
            {"name": "Gita", "age": -4, "constituencyId": "2.5"},
            {"name": {"first": "Bad"}, "partyName": "C", "age": {"years": 40}},
            "not an object"
        ]"#;
        let parsed = parse_for_tests(feed, FeedFormat::Json).expect("parse");
        assert_eq!(parsed.candidates.len(), 3);
        assert_eq!(parsed.skipped, 1);

        let hari = &parsed.candidates[0];
        assert_eq!(hari.id, 1);
        assert!(hari.party.is_none());
        assert!(hari.age.is_none());
        assert!(hari.constituency.is_none());

        let gita = &parsed.candidates[1];
        assert_eq!(gita.id, 2);
        assert!(gita.age.is_none());
        assert!(gita.constituency.is_none());

        let nested = &parsed.candidates[2];
        assert_eq!(nested.id, 3);
        assert_eq!(nested.name, "");
        assert_eq!(nested.party.as_deref(), Some("C"));
        assert!(nested.age.is_none());
    }

    #[test]
    fn duplicate_spellings_keep_the_row() {
        let feed = r#"[
            {"name": "Sita", "partyName": "B", "party": "Other"},
            {"name": "Ram", "partyName": " ", "party": "A", "age": 40, "Age": 41}
        ]"#;
        let parsed = parse_for_tests(feed, FeedFormat::Json).expect("parse");
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.candidates[0].party.as_deref(), Some("B"));
        assert_eq!(parsed.candidates[1].party.as_deref(), Some("A"));
        assert_eq!(parsed.candidates[1].age, Some(40));
    }

    #[test]
    fn csv_cells_stay_text() {
        let feed = "CandidateName,QUALIFICATION,PoliticalPartyName,DistrictName,AGE_YR\n\
Ram,+2,007,1.50,४२\n";
        let parsed = parse_for_tests(feed, FeedFormat::Csv).expect("parse");
        let candidate = &parsed.candidates[0];
        assert_eq!(candidate.qualification, "+2");
        assert_eq!(candidate.education_tier(), EducationTier::PlusTwoDiploma);
        assert_eq!(candidate.party.as_deref(), Some("007"));
        assert_eq!(candidate.district.as_deref(), Some("1.50"));
        assert_eq!(candidate.age, Some(42));
    }

    #[test]
    fn csv_rows_parse_with_headers() {
        let feed = "\u{feff}CandidateID,CandidateName,PoliticalPartyName,StateName,DistrictName,SCConstID,Gender,AGE_YR,QUALIFICATION\n\
1,Ram,A,Bagmati,Kathmandu,1,Male,35,Bachelor's degree\n\
2,Sita,B,Koshi,Morang,,Female,,\n";
        let parsed = parse_for_tests(feed, FeedFormat::Csv).expect("parse");
        assert_eq!(parsed.candidates.len(), 2);
        assert_eq!(parsed.candidates[0].age, Some(35));
        assert_eq!(parsed.candidates[0].province.as_deref(), Some("Bagmati"));
        assert_eq!(parsed.candidates[1].constituency, None);
        assert_eq!(parsed.candidates[1].age, None);
    }

    #[test]
    fn rejects_scalar_json_documents() {
        let error = parse_for_tests("42", FeedFormat::Json).expect_err("scalar rejected");
        assert!(matches!(error, FeedError::UnrecognizedFormat(_)));
        let error = parse_for_tests("{\"rows\": []}", FeedFormat::Json).expect_err("no rows");
        assert!(matches!(error, FeedError::UnrecognizedFormat(_)));
        let error = parse_for_tests("[1,", FeedFormat::Json).expect_err("truncated");
        assert!(matches!(error, FeedError::Json(_)));
    }

    #[test]
    fn format_detection() {
        assert_eq!(FeedFormat::from_path(Path::new("a/b.JSON")), Some(FeedFormat::Json));
        assert_eq!(FeedFormat::from_path(Path::new("a/b.csv")), Some(FeedFormat::Csv));
        assert_eq!(FeedFormat::from_path(Path::new("a/b")), None);
        assert_eq!(FeedFormat::sniff(b"  \n[{}]"), FeedFormat::Json);
        assert_eq!(FeedFormat::sniff(b"id,name"), FeedFormat::Csv);
    }
}
