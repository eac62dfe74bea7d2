//! Per-URL results and error records

use crate::state::{Label, Stage};
use thiserror::Error;

/// Final record for one input URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResult {
    /// The URL as written to the labels artifact
    pub url: String,

    /// The final label
    pub label: Label,
}

impl UrlResult {
    pub fn new(url: impl Into<String>, label: Label) -> Self {
        Self {
            url: url.into(),
            label,
        }
    }

    /// Formats the result as a labels-artifact line (without newline)
    pub fn to_line(&self) -> String {
        format!("{} {}", self.url, self.label)
    }
}

/// A single categorized failure
///
/// Records are append-only: once handed to the recorder they are only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub stage: Stage,
    pub url: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(stage: Stage, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns the message text up to its first colon
    ///
    /// Messages without a colon are returned whole. Used to bucket similar
    /// errors whose details differ.
    pub fn error_type(&self) -> &str {
        match self.message.split_once(':') {
            Some((head, _)) => head.trim(),
            None => self.message.trim(),
        }
    }

    /// Returns the `"{stage} - {error_type}"` bucket key
    pub fn bucket(&self) -> String {
        format!("{} - {}", self.stage, self.error_type())
    }
}

/// Reason a pipeline stage failed
///
/// The `Display` output is the message that ends up in the error report, so
/// the text before the first colon doubles as the error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    #[error("Content extraction error: {0}")]
    Extraction(String),

    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    #[error("No text content extracted")]
    EmptyContent,

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Classifier API error: {0}")]
    Classifier(String),

    #[error("Indeterminate reply: classifier returned {0}")]
    Indeterminate(Label),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// A stage failure tagged with the stage it happened in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: StageError,
}

impl StageFailure {
    pub fn new(stage: Stage, error: StageError) -> Self {
        Self { stage, error }
    }

    /// Label the URL receives because of this failure
    pub fn label(&self) -> Label {
        self.stage.fallback_label()
    }

    /// Converts the failure into an error record for `url`
    pub fn into_record(self, url: &str) -> ErrorRecord {
        ErrorRecord::new(self.stage, url, self.error.to_string())
    }
}

/// Outcome of a single pipeline stage
pub type StageOutcome<T> = std::result::Result<T, StageFailure>;
