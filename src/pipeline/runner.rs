//! Per-URL stage runner
//!
//! Runs the four pipeline stages for one URL, in order, stopping at the first
//! failure:
//!
//! 1. Normalize: add a missing scheme (never fails)
//! 2. Validate: the URL must answer with a 2xx status
//! 3. Extract: the page must yield non-blank visible text
//! 4. Classify: the text is judged against the topic
//!
//! The runner touches no shared state. It returns the result and, on failure,
//! the error record for the dispatcher to funnel into the aggregators.

use crate::classify::TopicTable;
use crate::pipeline::parser::truncate_chars;
use crate::pipeline::{Classifier, FetchError, PageFetcher};
use crate::state::{ErrorRecord, Label, Stage, StageError, StageFailure, StageOutcome, UrlResult};
use crate::url::ensure_scheme;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for each network stage
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on the characters passed to the classifier
pub const DEFAULT_MAX_TEXT_CHARS: usize = 40_000;

/// Executes the pipeline stages for a single URL
///
/// Cheap to clone: collaborators are shared behind `Arc`s.
#[derive(Clone)]
pub struct StageRunner {
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn Classifier>,
    topics: Arc<TopicTable>,
    stage_timeout: Duration,
    max_text_chars: usize,
}

impl StageRunner {
    /// Creates a runner with default limits
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn Classifier>,
        topics: Arc<TopicTable>,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            topics,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }

    /// Sets the timeout handed to the fetcher for each network stage
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Sets the maximum number of characters passed to the classifier
    pub fn with_max_text_chars(mut self, max_chars: usize) -> Self {
        self.max_text_chars = max_chars.max(1);
        self
    }

    /// Runs every stage for `raw_url`
    ///
    /// # Arguments
    ///
    /// * `raw_url` - The URL as read from the input file
    /// * `topic` - The topic key to classify against
    ///
    /// # Returns
    ///
    /// The URL's result, plus an error record when a stage failed. A panic in
    /// any stage is caught and reported under the `processing` stage.
    pub async fn run(&self, raw_url: &str, topic: &str) -> (UrlResult, Option<ErrorRecord>) {
        let url = ensure_scheme(raw_url);

        let attempt = AssertUnwindSafe(self.run_stages(&url, topic))
            .catch_unwind()
            .await;

        match attempt {
            Ok(Ok(label)) => {
                tracing::debug!("{} -> {}", url, label);
                (UrlResult::new(url, label), None)
            }
            Ok(Err(failure)) => {
                tracing::debug!("{} failed at {}: {}", url, failure.stage, failure.error);
                let label = failure.label();
                let record = failure.into_record(&url);
                (UrlResult::new(url, label), Some(record))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::warn!("Stage panicked for {}: {}", url, message);
                let failure =
                    StageFailure::new(Stage::Processing, StageError::Unexpected(message));
                let label = failure.label();
                let record = failure.into_record(&url);
                (UrlResult::new(url, label), Some(record))
            }
        }
    }

    async fn run_stages(&self, url: &str, topic: &str) -> StageOutcome<Label> {
        self.validate(url).await?;
        let text = self.extract(url).await?;
        self.classify(&text, topic).await
    }

    /// Validation stage: the URL must answer with a success status
    async fn validate(&self, url: &str) -> StageOutcome<()> {
        let fail = |error| StageFailure::new(Stage::Validation, error);

        match self.fetcher.fetch_status(url, self.stage_timeout).await {
            Ok(status) if (200..300).contains(&status) => Ok(()),
            Ok(status) => Err(fail(StageError::HttpStatus(status))),
            Err(e) => Err(fail(StageError::Connection(e.to_string()))),
        }
    }

    /// Extraction stage: returns the page text, truncated
    async fn extract(&self, url: &str) -> StageOutcome<String> {
        let fail = |error| StageFailure::new(Stage::Extraction, error);

        let text = match self.fetcher.fetch_text(url, self.stage_timeout).await {
            Ok(text) => text,
            Err(FetchError::Transport(message)) => {
                return Err(fail(StageError::Extraction(message)))
            }
            Err(FetchError::Parse(message)) => return Err(fail(StageError::HtmlParse(message))),
        };

        let text = text.unwrap_or_default();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(fail(StageError::EmptyContent));
        }

        Ok(truncate_chars(trimmed, self.max_text_chars).to_string())
    }

    /// Classification stage: resolves the topic and asks the classifier
    ///
    /// Only `h` and `u` count as a verdict. An `i` reply means the classifier
    /// could not judge a page that did have text, and is recorded as a
    /// classification failure.
    async fn classify(&self, text: &str, topic_key: &str) -> StageOutcome<Label> {
        let fail = |error| StageFailure::new(Stage::Classification, error);

        let topic = self
            .topics
            .get(topic_key)
            .ok_or_else(|| fail(StageError::UnknownTopic(topic_key.to_string())))?;

        match self.classifier.classify(text, &topic).await {
            Ok(label) if label.is_determined() => Ok(label),
            Ok(label) => Err(fail(StageError::Indeterminate(label))),
            Err(e) => Err(fail(StageError::Classifier(e.to_string()))),
        }
    }
}

/// Extracts the message from a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{topics, FakeFetcher, KeywordClassifier, PageBehavior};
    use super::*;
    use crate::pipeline::ClassifyError;
    use std::sync::atomic::Ordering;

    fn runner(fetcher: FakeFetcher, classifier: KeywordClassifier) -> StageRunner {
        StageRunner::new(Arc::new(fetcher), Arc::new(classifier), topics())
    }

    #[tokio::test]
    async fn test_hit_has_no_error_record() {
        let fetcher = FakeFetcher::new().page("http://example.com", "buy cannabis here");
        let runner = runner(fetcher, KeywordClassifier::new("cannabis"));

        let (result, record) = runner.run("example.com", "drugs").await;

        assert_eq!(result, UrlResult::new("http://example.com", Label::Hit));
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_unrelated_has_no_error_record() {
        let fetcher = FakeFetcher::new().page("https://example.com", "gardening tips");
        let runner = runner(fetcher, KeywordClassifier::new("cannabis"));

        let (result, record) = runner.run("https://example.com", "drugs").await;

        assert_eq!(result.label, Label::Unrelated);
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_is_validation_failure() {
        let runner = runner(FakeFetcher::new(), KeywordClassifier::new("x"));

        let (result, record) = runner.run("unreachable.test", "drugs").await;
        let record = record.unwrap();

        assert_eq!(result.label, Label::Inaccessible);
        assert_eq!(result.url, "http://unreachable.test");
        assert_eq!(record.stage, Stage::Validation);
        assert_eq!(record.message, "Connection error: dns error: no such host");
    }

    #[tokio::test]
    async fn test_error_status_is_validation_failure() {
        let fetcher = FakeFetcher::new().with(
            "http://example.com/gone",
            PageBehavior::Page {
                status: 404,
                text: None,
            },
        );
        let runner = runner(fetcher, KeywordClassifier::new("x"));

        let (result, record) = runner.run("http://example.com/gone", "drugs").await;
        let record = record.unwrap();

        assert_eq!(result.label, Label::Inaccessible);
        assert_eq!(record.stage, Stage::Validation);
        assert_eq!(record.message, "HTTP error: status 404");
    }

    #[tokio::test]
    async fn test_empty_and_blank_text_are_extraction_failures() {
        let fetcher = FakeFetcher::new()
            .with(
                "http://empty.test",
                PageBehavior::Page {
                    status: 200,
                    text: None,
                },
            )
            .page("http://blank.test", "  \n\t ");
        let classifier = Arc::new(KeywordClassifier::new("x"));
        let runner = StageRunner::new(Arc::new(fetcher), classifier.clone(), topics());

        for url in ["empty.test", "blank.test"] {
            let (result, record) = runner.run(url, "drugs").await;
            let record = record.unwrap();
            assert_eq!(result.label, Label::Inaccessible);
            assert_eq!(record.stage, Stage::Extraction);
            assert_eq!(record.message, "No text content extracted");
        }

        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_extraction_failure() {
        let fetcher = FakeFetcher::new().with(
            "http://binary.test",
            PageBehavior::Undecodable("invalid utf-8".to_string()),
        );
        let runner = runner(fetcher, KeywordClassifier::new("x"));

        let (result, record) = runner.run("binary.test", "drugs").await;
        let record = record.unwrap();

        assert_eq!(result.label, Label::Inaccessible);
        assert_eq!(record.stage, Stage::Extraction);
        assert_eq!(record.error_type(), "HTML parsing error");
    }

    #[tokio::test]
    async fn test_classifier_failure_defaults_to_unrelated() {
        let fetcher = FakeFetcher::new().page("http://example.com", "text");
        let runner = runner(
            fetcher,
            KeywordClassifier::failing(ClassifyError::Status {
                status: 503,
                body: "overloaded".to_string(),
            }),
        );

        let (result, record) = runner.run("example.com", "drugs").await;
        let record = record.unwrap();

        assert_eq!(result.label, Label::Unrelated);
        assert_eq!(record.stage, Stage::Classification);
        assert_eq!(record.message, "Classifier API error: HTTP 503: overloaded");
    }

    #[tokio::test]
    async fn test_indeterminate_reply_is_recorded() {
        let fetcher = FakeFetcher::new().page("http://example.com", "some page text");
        let runner = runner(fetcher, KeywordClassifier::replying(Label::Inaccessible));

        let (result, record) = runner.run("example.com", "drugs").await;
        let record = record.expect("an i reply must leave a record");

        assert_eq!(result.label, Label::Unrelated);
        assert_eq!(record.stage, Stage::Classification);
        assert_eq!(record.message, "Indeterminate reply: classifier returned i");
        assert_eq!(record.error_type(), "Indeterminate reply");
    }

    #[tokio::test]
    async fn test_unknown_topic_skips_classifier() {
        let fetcher = FakeFetcher::new().page("http://example.com", "text");
        let classifier = Arc::new(KeywordClassifier::new("x"));
        let runner = StageRunner::new(Arc::new(fetcher), classifier.clone(), topics());

        let (result, record) = runner.run("example.com", "cats").await;
        let record = record.unwrap();

        assert_eq!(result.label, Label::Unrelated);
        assert_eq!(record.stage, Stage::Classification);
        assert_eq!(record.message, "Unknown topic: cats");
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_text_is_truncated_before_classification() {
        let long_text = "a".repeat(100);
        let fetcher = FakeFetcher::new().page("http://long.test", &long_text);
        let classifier = Arc::new(KeywordClassifier::new("x"));
        let runner = StageRunner::new(Arc::new(fetcher), classifier.clone(), topics())
            .with_max_text_chars(10);

        runner.run("long.test", "drugs").await;

        let seen = classifier.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &["a".repeat(10)]);
    }

    #[tokio::test]
    async fn test_panic_becomes_processing_failure() {
        let fetcher = FakeFetcher::new().with("http://boom.test", PageBehavior::Panic);
        let runner = runner(fetcher, KeywordClassifier::new("x"));

        let (result, record) = runner.run("boom.test", "drugs").await;
        let record = record.unwrap();

        assert_eq!(result.label, Label::Inaccessible);
        assert_eq!(record.stage, Stage::Processing);
        assert_eq!(record.message, "Unexpected error: status check exploded");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(payload.as_ref()), "task panicked");
    }
}
