use crate::classify::TopicSet;
use crate::config::types::{
    ClassifierConfig, Config, FetcherConfig, PipelineConfig, ReportConfig,
};
use crate::ConfigError;
use std::collections::BTreeMap;
use url::Url;

/// Upper bound for the worker pool size
pub const MAX_CONCURRENCY: usize = 500;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_pipeline_config(&config.pipeline)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_classifier_config(&config.classifier)?;
    validate_report_config(&config.report)?;
    validate_topics(&config.topics)?;
    Ok(())
}

/// Validates a worker count coming from the config file or the command line
pub fn validate_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if concurrency < 1 || concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, concurrency
        )));
    }
    Ok(())
}

/// Validates pipeline configuration
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    validate_concurrency(config.concurrency)?;

    if config.task_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "task_timeout_secs must be >= 1, got {}",
            config.task_timeout_secs
        )));
    }

    if config.stage_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "stage_timeout_secs must be >= 1, got {}",
            config.stage_timeout_secs
        )));
    }

    if config.stage_timeout_secs > config.task_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "stage_timeout_secs ({}) cannot exceed task_timeout_secs ({})",
            config.stage_timeout_secs, config.task_timeout_secs
        )));
    }

    if config.max_text_chars < 1 {
        return Err(ConfigError::Validation(
            "max_text_chars must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    validate_user_agent(&config.user_agent)?;

    if config.max_body_bytes < 1 {
        return Err(ConfigError::Validation(
            "max_body_bytes must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the fetcher user agent
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent contains control characters: '{}'",
            user_agent.escape_debug()
        )));
    }

    Ok(())
}

/// Validates classifier configuration
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    let base = Url::parse(&config.api_base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base_url: {}", e)))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_base_url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if config.api_key_env.is_empty()
        || !config
            .api_key_env
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "api_key_env must be a non-empty environment variable name, got '{}'",
            config.api_key_env
        )));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            config.temperature
        )));
    }

    config.topic_set.parse::<TopicSet>().map(|_| ())
}

/// Validates report configuration
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.max_urls_per_message < 1 {
        return Err(ConfigError::Validation(
            "max_urls_per_message must be >= 1".to_string(),
        ));
    }

    if config.max_entries_per_stage < 1 {
        return Err(ConfigError::Validation(
            "max_entries_per_stage must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates custom topic entries
fn validate_topics(topics: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    for (key, description) in topics {
        if key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "topic keys cannot be empty".to_string(),
            ));
        }

        if description.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "topic '{}' has an empty description",
                key
            )));
        }
    }

    Ok(())
}
