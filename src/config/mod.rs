//! Configuration module for Topic-Sieve
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional; every key has a default.
//!
//! # Example
//!
//! ```no_run
//! use topic_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sieve.toml")).unwrap();
//! println!("Workers: {}", config.pipeline.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClassifierConfig, Config, FetcherConfig, PipelineConfig, ReportConfig};

// Re-export parser and validation functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_env_file, parse_config,
    read_api_key,
};
pub use validation::{validate, validate_concurrency, MAX_CONCURRENCY};
