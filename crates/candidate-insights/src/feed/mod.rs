//! Acquisition and normalization of the raw candidate feed.
//!
//! Sources are tried in order; the first one that yields a document wins. When
//! every source fails the caller still receives an empty candidate list along
//! with the failed attempts so it can surface a retryable error.

mod normalizer;
mod parser;

use crate::dashboard::Candidate;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use parser::{FeedFormat, ParsedFeed};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read candidate feed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid candidate CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unrecognized candidate feed: {0}")]
    UnrecognizedFormat(String),
}

pub struct CandidateImporter;

impl CandidateImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ParsedFeed, FeedError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, FeedFormat::from_path(path))
    }

    /// Read a whole feed document. Without an explicit format the first
    /// non-whitespace byte decides between JSON and CSV.
    pub fn from_reader<R: Read>(
        mut reader: R,
        format: Option<FeedFormat>,
    ) -> Result<ParsedFeed, FeedError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let format = format.unwrap_or_else(|| FeedFormat::sniff(&bytes));
        parser::parse_bytes(&bytes, format)
    }
}

/// Candidates obtained from one source.
#[derive(Debug, Clone)]
pub struct FeedLoad {
    pub source: String,
    pub candidates: Vec<Candidate>,
    pub skipped: usize,
}

/// One place a candidate feed can be read from.
pub trait CandidateSource: Send + Sync {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<FeedLoad, FeedError>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl CandidateSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<FeedLoad, FeedError> {
        let parsed = CandidateImporter::from_path(&self.path)?;
        Ok(FeedLoad {
            source: self.describe(),
            candidates: parsed.candidates,
            skipped: parsed.skipped,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAttempt {
    pub source: String,
    pub error: String,
}

#[derive(Debug)]
pub enum Acquisition {
    Loaded(FeedLoad),
    Unavailable { attempts: Vec<FailedAttempt> },
}

/// Ordered list of sources with first-success semantics.
#[derive(Default)]
pub struct FallbackFeed {
    sources: Vec<Box<dyn CandidateSource>>,
}

impl FallbackFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths
            .into_iter()
            .fold(Self::new(), |feed, path| feed.with_source(FileSource::new(path)))
    }

    pub fn with_source<S: CandidateSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn acquire(&self) -> Acquisition {
        let mut attempts = Vec::new();

        for source in &self.sources {
            let description = source.describe();
            info!(source = %description, "loading candidate feed");
            match source.fetch() {
                Ok(load) => {
                    info!(
                        source = %description,
                        records = load.candidates.len(),
                        skipped = load.skipped,
                        "candidate feed loaded"
                    );
                    return Acquisition::Loaded(load);
                }
                Err(err) => {
                    warn!(source = %description, error = %err, "candidate feed source failed");
                    attempts.push(FailedAttempt {
                        source: description,
                        error: err.to_string(),
                    });
                }
            }
        }

        warn!(attempts = attempts.len(), "no candidate feed source succeeded");
        Acquisition::Unavailable { attempts }
    }
}
