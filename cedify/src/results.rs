use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::convert::AmountConversion;

/// Outcome of rewriting one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RewriteStatus {
    /// File was written back; counts come from the two conversion passes
    Updated { amounts: usize, bare: usize },
    /// Reading, decoding, backing up or writing failed
    Failed { message: String },
}

/// Result for a single file, as reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteResult {
    /// The path to the file
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: RewriteStatus,
}

impl RewriteResult {
    pub fn updated(path: impl Into<PathBuf>, amounts: usize, bare: usize) -> Self {
        Self {
            path: path.into(),
            status: RewriteStatus::Updated { amounts, bare },
        }
    }

    pub fn failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: RewriteStatus::Failed {
                message: message.into(),
            },
        }
    }

    pub fn success(&self) -> bool {
        matches!(self.status, RewriteStatus::Updated { .. })
    }

    /// Human-readable status line for this file
    pub fn message(&self) -> String {
        match &self.status {
            RewriteStatus::Updated { .. } => {
                format!("Successfully updated {}", self.path.display())
            }
            RewriteStatus::Failed { message } => {
                format!("Error processing {}: {}", self.path.display(), message)
            }
        }
    }
}

/// Aggregated results of a conversion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Results per file, in processing order
    pub results: Vec<RewriteResult>,
    /// Number of files attempted
    pub total: usize,
    /// Number of files written successfully
    pub succeeded: usize,
}

impl RunSummary {
    /// Creates a new empty summary
    pub fn new() -> Self {
        Default::default()
    }

    /// Records one file's result
    pub fn add(&mut self, result: RewriteResult) {
        self.total += 1;
        if result.success() {
            self.succeeded += 1;
        }
        self.results.push(result);
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    /// True when discovery found nothing to convert
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Failed results only
    pub fn failures(&self) -> impl Iterator<Item = &RewriteResult> {
        self.results.iter().filter(|r| !r.success())
    }
}

/// What converting a file would do, computed without writing
#[derive(Debug, Clone, Serialize)]
pub struct FilePreview {
    pub path: PathBuf,
    /// Every amount the first pass would rewrite, in order
    pub amounts: Vec<AmountConversion>,
    /// Every `$` in the file, amounts included
    pub dollar_count: usize,
    #[serde(skip)]
    pub original: String,
    #[serde(skip)]
    pub converted: String,
}

impl FilePreview {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_changes(&self) -> bool {
        self.dollar_count > 0
    }
}
