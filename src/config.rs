//! Export configuration.
//!
//! One [`ExportConfig`] value carries everything a conversion needs to know
//! besides the network id: where the tables live and which policies apply.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Ranking table looked up next to the nodes table when none is given.
pub const DEFAULT_RANKING_FILE: &str = "ranking_minorities.csv";

// ============================================================================
// Policies
// ============================================================================

/// Where network attributes come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RankingSource {
    /// `ranking_minorities.csv` in the nodes table's directory.
    #[default]
    Sibling,
    /// An explicit table.
    Path(PathBuf),
    /// Never join attributes.
    Disabled,
}

/// What to do when the attributes table has several rows for one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// First matching row wins; the rest are not looked at.
    #[default]
    FirstMatch,
    /// A second matching row fails the conversion.
    Reject,
}

/// What a batch does when one network fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the whole batch at the first failure.
    #[default]
    Abort,
    /// Log and record the failure, then move on to the next id.
    Skip,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "first-match" => Ok(DuplicatePolicy::FirstMatch),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!("unknown duplicate policy '{other}' (expected first or reject)")),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(format!("unknown failure policy '{other}' (expected abort or skip)")),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DuplicatePolicy::FirstMatch => "first",
            DuplicatePolicy::Reject => "reject",
        })
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Skip => "skip",
        })
    }
}

// ============================================================================
// ExportConfig
// ============================================================================

/// Inputs and policies for converting networks.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub ranking: RankingSource,
    pub duplicates: DuplicatePolicy,
    pub on_error: FailurePolicy,
}

impl ExportConfig {
    pub fn new(nodes: impl Into<PathBuf>, edges: impl Into<PathBuf>) -> Self {
        Self {
            nodes: nodes.into(),
            edges: edges.into(),
            ranking: RankingSource::default(),
            duplicates: DuplicatePolicy::default(),
            on_error: FailurePolicy::default(),
        }
    }

    pub fn with_ranking(mut self, ranking: RankingSource) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_ranking_path(self, path: impl Into<PathBuf>) -> Self {
        self.with_ranking(RankingSource::Path(path.into()))
    }

    pub fn without_ranking(self) -> Self {
        self.with_ranking(RankingSource::Disabled)
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_failure_policy(mut self, on_error: FailurePolicy) -> Self {
        self.on_error = on_error;
        self
    }

    /// The attributes table to join, if any.
    pub fn ranking_path(&self) -> Option<PathBuf> {
        match &self.ranking {
            RankingSource::Sibling => Some(sibling(&self.nodes, DEFAULT_RANKING_FILE)),
            RankingSource::Path(p) => Some(p.clone()),
            RankingSource::Disabled => None,
        }
    }
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    match path.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
