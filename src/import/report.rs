//! Collected import errors and the end-of-run report.

use indexmap::IndexMap;
use log::{error, info, warn};
use std::fmt;

/// Why a file or title did not import cleanly. None of these stop a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportErrorKind {
    /// Slot content is not valid JSON; the text was kept as is
    #[error("cannot decode JSON: {0}")]
    Decode(String),

    /// Rewritten JSON could not be encoded; the original text was kept
    #[error("cannot encode JSON: {0}")]
    Encode(String),

    /// Key order could not be reproduced exactly
    #[error("key order not preserved: {0}")]
    Ordering(String),

    /// The derived page name is not a valid title
    #[error("cannot resolve title: {0}")]
    UnresolvedTitle(String),

    /// The file name does not follow `base.slot[.model]`
    #[error("cannot classify file: {0}")]
    ClassificationSkip(String),

    /// The file could not be read
    #[error("cannot read file: {0}")]
    Read(String),

    /// No content model could be chosen for a slot; the slot was dropped
    #[error("{0}")]
    ModelUnresolved(String),

    /// The page write was rejected
    #[error("write failed: {0}")]
    Write(String),
}

/// One collected problem: where it happened and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    pub context: String,
    pub kind: ImportErrorKind,
}

impl ImportError {
    pub fn new(context: impl Into<String>, kind: ImportErrorKind) -> Self {
        Self {
            context: context.into(),
            kind,
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.kind)
    }
}

impl std::error::Error for ImportError {}

/// Outcome of a full import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Files turned into slots
    pub files_found: usize,
    /// Titles written successfully, in import order
    pub imported: Vec<String>,
    /// Title -> message for every rejected write
    pub failed: IndexMap<String, String>,
    /// Everything collected during planning and writing
    pub errors: Vec<ImportError>,
}

impl ImportReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Lines of the final tally. Always at least one line, even with no
    /// failures.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "(JsonForms) {} of {} articles failed to import",
            self.failed.len(),
            self.imported.len() + self.failed.len()
        )];
        for (title, message) in &self.failed {
            lines.push(format!("Failed to import: {} - Error: {}", title, message));
        }
        lines
    }

    /// Log collected errors followed by the failure tally.
    pub fn log_summary(&self) {
        if !self.errors.is_empty() {
            warn!("{} problems were collected during import:", self.errors.len());
            for err in &self.errors {
                warn!("  - {}", err);
            }
        }

        for (index, line) in self.summary_lines().into_iter().enumerate() {
            if index == 0 && !self.has_failures() {
                info!("{}", line);
            } else {
                error!("{}", line);
            }
        }
    }
}
