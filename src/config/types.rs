use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Topic-Sieve
///
/// Every section and key has a default, so an empty file (or no file at all)
/// is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub report: ReportConfig,
    /// Extra or overriding topic descriptions, keyed by topic
    #[serde(default)]
    pub topics: BTreeMap<String, String>,
}

/// Worker pool and per-stage limits
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PipelineConfig {
    /// Maximum number of URLs processed at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Wall-clock budget for one URL, all stages included (seconds)
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,

    /// Timeout for each network stage (seconds)
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,

    /// Extracted text is cut to this many characters before classification
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl PipelineConfig {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            task_timeout_secs: default_task_timeout_secs(),
            stage_timeout_secs: default_stage_timeout_secs(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FetcherConfig {
    /// User-Agent header sent with every page request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Page bodies are read up to this many bytes; the rest is discarded
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Remote classifier configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Model name passed to the generateContent endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the API, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Built-in topic table to start from ("small", "medium" or "max")
    #[serde(default = "default_topic_set")]
    pub topic_set: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            topic_set: default_topic_set(),
        }
    }
}

/// Error report configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReportConfig {
    /// URLs listed under one grouped error message before "... and N more"
    #[serde(default = "default_max_urls_per_message")]
    pub max_urls_per_message: usize,

    /// Entries listed per stage in the detailed section
    #[serde(default = "default_max_entries_per_stage")]
    pub max_entries_per_stage: usize,

    /// Directory for the output artifacts (defaults to the input file's directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_urls_per_message: default_max_urls_per_message(),
            max_entries_per_stage: default_max_entries_per_stage(),
            output_dir: None,
        }
    }
}

fn default_concurrency() -> usize {
    10
}

fn default_task_timeout_secs() -> u64 {
    60
}

fn default_stage_timeout_secs() -> u64 {
    10
}

fn default_max_text_chars() -> usize {
    40_000
}

fn default_user_agent() -> String {
    format!("topic-sieve/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_topic_set() -> String {
    "medium".to_string()
}

fn default_max_urls_per_message() -> usize {
    5
}

fn default_max_entries_per_stage() -> usize {
    20
}
