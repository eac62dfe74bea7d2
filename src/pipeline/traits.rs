//! Collaborator traits and their error types
//!
//! The pipeline talks to the network only through these traits. The
//! production implementations are `HttpFetcher` and `GeminiClassifier`; tests
//! substitute in-memory fakes.

use crate::classify::Topic;
use crate::state::Label;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by a page fetcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    #[error("{0}")]
    Transport(String),

    /// The response arrived but its body could not be decoded
    #[error("{0}")]
    Parse(String),
}

/// Errors returned by a classifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unexpected reply '{0}'")]
    UnexpectedReply(String),
}

/// Fetches pages for the validation and extraction stages
///
/// Implementations must be safe to share between tasks.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Requests the URL and returns the final HTTP status code
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to check (scheme already present)
    /// * `timeout` - Budget for the whole request
    async fn fetch_status(&self, url: &str, timeout: Duration) -> Result<u16, FetchError>;

    /// Requests the URL and returns its visible text
    ///
    /// Returns `Ok(None)` when the page has no text to extract.
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<Option<String>, FetchError>;
}

/// Classifies page text against a topic
///
/// Implementations are constructed once and shared read-only by all tasks.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Returns the label for `text` with respect to `topic`
    ///
    /// `text` has already been truncated by the pipeline.
    async fn classify(&self, text: &str, topic: &Topic) -> Result<Label, ClassifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_is_raw_text() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_classify_error_display() {
        let err = ClassifyError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 429: quota exceeded");
        assert_eq!(
            ClassifyError::UnexpectedReply("p".to_string()).to_string(),
            "unexpected reply 'p'"
        );
    }
}
