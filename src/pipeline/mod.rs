//! Pipeline module for per-URL processing
//!
//! This module contains the core processing logic, including:
//! - The collaborator traits for fetching and classifying
//! - HTTP fetching and visible-text extraction
//! - The four-stage per-URL runner
//! - Bounded-concurrency dispatch with per-task timeouts
//! - Overall job coordination

mod coordinator;
mod dispatcher;
mod fetcher;
mod parser;
mod runner;
mod traits;

pub use coordinator::{
    plan_job, read_url_list, run_job, topic_from_path, JobPlan, JobSpec, JobSummary,
};
pub use dispatcher::{
    CompletedTask, DispatchOutcome, Dispatcher, Progress, DEFAULT_CONCURRENCY,
    DEFAULT_TASK_TIMEOUT,
};
pub use fetcher::{build_http_client, HttpFetcher};
pub use parser::{extract_visible_text, truncate_chars};
pub use runner::{StageRunner, DEFAULT_MAX_TEXT_CHARS, DEFAULT_STAGE_TIMEOUT};
pub use traits::{ClassifyError, Classifier, FetchError, PageFetcher};
