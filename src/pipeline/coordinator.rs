//! Job coordinator - end-to-end run orchestration
//!
//! This module ties one run together:
//! - Reading the URL list and deriving the topic from the file name
//! - Building the stage runner and dispatcher from the configuration
//! - Restoring input order and computing run statistics
//! - Rendering and writing both artifacts

use crate::classify::TopicTable;
use crate::config::Config;
use crate::output::{self, ReportContext, RunStats};
use crate::pipeline::{Classifier, Dispatcher, PageFetcher, StageRunner};
use crate::state::UrlResult;
use crate::SieveError;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything needed to run one job
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// Text file with one URL per line; its stem names the topic
    pub input_path: PathBuf,

    /// Effective configuration, command-line overrides already applied
    pub config: Config,

    /// Hash of the config file, when one was loaded
    pub config_hash: Option<String>,
}

impl JobSpec {
    pub fn new(input_path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            input_path: input_path.into(),
            config,
            config_hash: None,
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }
}

/// What a job will do, resolved without touching the network
#[derive(Debug, Clone)]
pub struct JobPlan {
    pub urls: Vec<String>,
    pub topic: String,

    /// Whether the topic exists in the topic table
    pub topic_known: bool,

    pub concurrency: usize,
    pub labels_path: PathBuf,
    pub errors_path: PathBuf,
}

/// Outcome of a finished job
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub topic: String,
    pub labels_path: PathBuf,
    pub errors_path: PathBuf,

    /// One result per input URL, in input order
    pub results: Vec<UrlResult>,

    pub stats: RunStats,
}

/// Reads the URL list from `path`
///
/// Lines are trimmed and blank lines skipped. Each remaining line is one task.
pub fn read_url_list(path: &Path) -> Result<Vec<String>, SieveError> {
    let content = fs::read_to_string(path).map_err(|source| SieveError::InputRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_url_list(&content))
}

fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derives the topic key from the input file name (`drugs.txt` → `drugs`)
pub fn topic_from_path(path: &Path) -> Result<String, SieveError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_string())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| SieveError::InvalidInput {
            path: path.to_path_buf(),
            message: "cannot derive a topic from the file name".to_string(),
        })
}

/// Resolves the input, topic, and output paths of a job
///
/// # Returns
///
/// * `Ok(JobPlan)` - The job can run
/// * `Err(SieveError)` - The input file is unreadable, or the config names an
///   unknown topic set
pub fn plan_job(job: &JobSpec) -> Result<JobPlan, SieveError> {
    let urls = read_url_list(&job.input_path)?;
    let topic = topic_from_path(&job.input_path)?;
    let topics = TopicTable::from_config(&job.config)?;
    let (labels_path, errors_path) =
        output::artifact_paths(&job.input_path, job.config.report.output_dir.as_deref());

    Ok(JobPlan {
        topic_known: topics.contains(&topic),
        urls,
        topic,
        concurrency: job.config.pipeline.concurrency,
        labels_path,
        errors_path,
    })
}

/// Runs a whole job and writes both artifacts
///
/// # Arguments
///
/// * `job` - Input file and configuration
/// * `fetcher` - Page fetcher shared by every task
/// * `classifier` - Classifier shared by every task
///
/// # Returns
///
/// * `Ok(JobSummary)` - Artifacts written; individual URLs may still have
///   failed, see the error report
/// * `Err(SieveError)` - The job could not start or its artifacts could not be
///   written
pub async fn run_job(
    job: &JobSpec,
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn Classifier>,
) -> Result<JobSummary, SieveError> {
    let plan = plan_job(job)?;
    let config = &job.config;

    tracing::info!(
        "Processing {} URLs from {} for topic '{}'",
        plan.urls.len(),
        job.input_path.display(),
        plan.topic
    );
    if !plan.topic_known {
        tracing::warn!(
            "Topic '{}' is not in the topic table; pages will not be classified",
            plan.topic
        );
    }

    let topics = Arc::new(TopicTable::from_config(config)?);
    let runner = StageRunner::new(fetcher, classifier, topics)
        .with_stage_timeout(config.pipeline.stage_timeout())
        .with_max_text_chars(config.pipeline.max_text_chars);
    let dispatcher = Dispatcher::new(runner, plan.concurrency, config.pipeline.task_timeout())?;

    let start_time = Utc::now();
    let outcome = dispatcher.run(&plan.urls, &plan.topic).await;
    let end_time = Utc::now();

    let results = output::in_input_order(&plan.urls, outcome.completed);
    let errors = outcome.errors;

    let stats = RunStats {
        start_time,
        end_time,
        urls_total: plan.urls.len(),
        error_count: errors.len(),
        worker_count: dispatcher.concurrency(),
    };

    let context = ReportContext {
        generated_at: end_time,
        input: job.input_path.display().to_string(),
        topic: plan.topic.clone(),
        config_hash: job.config_hash.clone(),
        max_urls_per_message: config.report.max_urls_per_message,
        max_entries_per_stage: config.report.max_entries_per_stage,
    };

    let artifacts = output::finalize(&results, &errors, &stats, &context);
    output::write_artifact(&plan.labels_path, &artifacts.labels)?;
    output::write_artifact(&plan.errors_path, &artifacts.errors)?;

    let (hits, unrelated, inaccessible) = output::label_counts(&results);
    tracing::info!(
        "Done in {:.2}s: {} hit, {} unrelated, {} inaccessible, {} errors ({:.2}% success)",
        stats.elapsed_secs(),
        hits,
        unrelated,
        inaccessible,
        stats.error_count,
        stats.success_rate()
    );

    Ok(JobSummary {
        topic: plan.topic,
        labels_path: plan.labels_path,
        errors_path: plan.errors_path,
        results,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::runner::test_support::{FakeFetcher, KeywordClassifier, PageBehavior};
    use crate::state::Label;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn scenario_fetcher() -> Arc<FakeFetcher> {
        Arc::new(
            FakeFetcher::new()
                .page("http://example.com", "where to buy cannabis")
                .with(
                    "http://unreachable.test",
                    PageBehavior::Slow(Duration::from_secs(5)),
                ),
        )
    }

    fn fast_config(concurrency: usize) -> Config {
        let mut config = Config::default();
        config.pipeline.concurrency = concurrency;
        config.pipeline.task_timeout_secs = 1;
        config.pipeline.stage_timeout_secs = 1;
        config
    }

    #[test]
    fn test_parse_url_list_skips_blank_lines() {
        let urls = parse_url_list("  example.com  \n\n\t\nbad://\r\nunreachable.test\n");
        assert_eq!(urls, vec!["example.com", "bad://", "unreachable.test"]);
    }

    #[test]
    fn test_topic_from_path() {
        assert_eq!(topic_from_path(Path::new("lists/drugs.txt")).unwrap(), "drugs");
        assert_eq!(topic_from_path(Path::new("weapon")).unwrap(), "weapon");
        assert!(topic_from_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_missing_input_is_input_error() {
        let job = JobSpec::new("/nonexistent/drugs.txt", Config::default());
        assert!(matches!(plan_job(&job), Err(SieveError::InputRead { .. })));
    }

    #[test]
    fn test_plan_job() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "drugs.txt", "example.com\n\nbad://\n");
        let plan = plan_job(&JobSpec::new(&input, fast_config(4))).unwrap();

        assert_eq!(plan.urls.len(), 2);
        assert_eq!(plan.topic, "drugs");
        assert!(plan.topic_known);
        assert_eq!(plan.concurrency, 4);
        assert_eq!(plan.labels_path, dir.path().join("drugs_labeled.txt"));
        assert_eq!(plan.errors_path, dir.path().join("drugs_error_messages.log"));
    }

    #[tokio::test]
    async fn test_scenario_run_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "drugs.txt", "example.com\nbad://\nunreachable.test\n");
        let job = JobSpec::new(&input, fast_config(10)).with_config_hash("deadbeef");

        let summary = run_job(
            &job,
            scenario_fetcher(),
            Arc::new(KeywordClassifier::new("cannabis")),
        )
        .await
        .unwrap();

        let labels = fs::read_to_string(&summary.labels_path).unwrap();
        assert_eq!(labels, "http://example.com h\nbad:// i\nunreachable.test i\n");

        let report = fs::read_to_string(&summary.errors_path).unwrap();
        assert!(report.contains("Config hash: deadbeef"));
        assert!(report.contains("Success rate: 33.33%"));
        assert!(report.contains("[validation] 1 errors"));
        assert!(report.contains("[timeout] 1 errors"));
        assert!(report.contains("timeout | unreachable.test | Task timed out"));

        assert_eq!(summary.stats.urls_total, 3);
        assert_eq!(summary.stats.error_count, 2);
        assert_eq!(summary.results[0].label, Label::Hit);
    }

    #[tokio::test]
    async fn test_concurrency_one_and_ten_match() {
        let dir = TempDir::new().unwrap();
        let content = "example.com\nbad://\nnowhere.test\nexample.com\nhttps://other.test\n";

        let mut outputs = Vec::new();
        for (name, concurrency) in [("serial", 1), ("parallel", 10)] {
            let input = write_input(&dir, "drugs.txt", content);
            let mut config = fast_config(concurrency);
            config.report.output_dir = Some(dir.path().join(name));

            let summary = run_job(
                &JobSpec::new(&input, config),
                scenario_fetcher(),
                Arc::new(KeywordClassifier::new("cannabis")),
            )
            .await
            .unwrap();
            outputs.push(fs::read_to_string(summary.labels_path).unwrap());
        }

        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0].lines().count(), 5);
    }

    #[tokio::test]
    async fn test_empty_input_writes_empty_artifacts() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "drugs.txt", "\n  \n");

        let summary = run_job(
            &JobSpec::new(&input, fast_config(2)),
            scenario_fetcher(),
            Arc::new(KeywordClassifier::new("x")),
        )
        .await
        .unwrap();

        assert_eq!(fs::read_to_string(&summary.labels_path).unwrap(), "");
        let report = fs::read_to_string(&summary.errors_path).unwrap();
        assert!(report.contains("Success rate: 0.00%"));
        assert!(report.contains("No errors were recorded during processing."));
    }
}
