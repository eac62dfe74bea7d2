//! Pipeline stage definitions
//!
//! Every error record is tagged with the stage it happened in. The first three
//! stages belong to the per-URL pipeline; the rest describe failures around it.

use crate::state::Label;
use std::fmt;

/// A step of the per-URL pipeline, or the context a failure was caught in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    // ===== Pipeline Stages =====
    /// Reachability check
    Validation,

    /// Fetching the page and pulling out visible text
    Extraction,

    /// Remote topic classification (includes unknown topics)
    Classification,

    // ===== Catch-all Stages =====
    /// Unexpected failure (panic) inside one of the pipeline stages
    Processing,

    /// The task exceeded its wall-clock budget
    Timeout,

    /// The task could not be scheduled or died without reporting
    Executor,
}

impl Stage {
    /// All stages, in report order
    pub const ALL: [Stage; 6] = [
        Self::Validation,
        Self::Extraction,
        Self::Classification,
        Self::Processing,
        Self::Timeout,
        Self::Executor,
    ];

    /// Returns the lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Extraction => "extraction",
            Self::Classification => "classification",
            Self::Processing => "processing",
            Self::Timeout => "timeout",
            Self::Executor => "executor",
        }
    }

    /// Label given to a URL whose pipeline failed at this stage
    ///
    /// A classification failure means the page was read but could not be
    /// judged, which is reported as unrelated rather than inaccessible.
    pub fn fallback_label(&self) -> Label {
        match self {
            Self::Classification => Label::Unrelated,
            _ => Label::Inaccessible,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
