//! Topic-Sieve: concurrent URL topic labeler
//!
//! This crate reads a list of URLs, checks that each one is reachable, extracts
//! the visible text of the page and asks a remote classifier whether the text
//! relates to a topic. Every URL receives exactly one label and every failure
//! is recorded with the pipeline stage it happened in.

pub mod classify;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Topic-Sieve operations
///
/// These are run-level failures. Per-URL failures never surface here; they
/// become error records in the report instead.
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read input file {path}: {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid input file {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("Failed to load environment file: {0}")]
    EnvFile(String),

    #[error("Unknown topic set '{0}' (expected 'small', 'medium' or 'max')")]
    UnknownTopicSet(String),
}

/// Result type alias for Topic-Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classify::{GeminiClassifier, Topic, TopicTable};
pub use config::Config;
pub use pipeline::{run_job, Dispatcher, HttpFetcher, JobSpec, JobSummary, StageRunner};
pub use state::{ErrorRecord, Label, Stage, UrlResult};
