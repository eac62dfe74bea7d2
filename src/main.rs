//! Topic-Sieve main entry point
//!
//! This is the command-line interface for the Topic-Sieve URL labeler.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use topic_sieve::config::{load_config_with_hash, load_env_file, validate, Config};
use topic_sieve::pipeline::{plan_job, run_job, HttpFetcher, JobSpec};
use topic_sieve::GeminiClassifier;
use tracing_subscriber::EnvFilter;

/// Topic-Sieve: concurrent URL topic labeler
///
/// Reads one URL per line from INPUT, checks each page, and labels it `h`
/// (related to the topic), `u` (unrelated) or `i` (inaccessible). The topic is
/// the input file name without its extension, so `drugs.txt` is checked
/// against the `drugs` topic.
#[derive(Parser, Debug)]
#[command(name = "topic-sieve")]
#[command(version)]
#[command(about = "Concurrent URL topic labeler", long_about = None)]
struct Cli {
    /// Text file with one URL per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Number of URLs processed at once (overrides the config file)
    #[arg(value_name = "CONCURRENCY")]
    concurrency: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-URL timeout in seconds (overrides the config file; the stage
    /// timeout is lowered to match when it would exceed it)
    #[arg(long, value_name = "SECS")]
    task_timeout: Option<u64>,

    /// Directory for the output files (defaults to the input's directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate config and show what would be processed without touching the network
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // The classifier credential may live in a .env file
    if load_env_file(Path::new(".env")).context("Failed to load .env")? {
        tracing::debug!("Loaded environment from .env");
    }

    let (config, config_hash) = load_effective_config(&cli)?;

    let mut job = JobSpec::new(&cli.input, config);
    if let Some(hash) = config_hash {
        job = job.with_config_hash(hash);
    }

    if cli.dry_run {
        handle_dry_run(&job)
    } else {
        handle_run(&job).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so they never mix with printed output.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("topic_sieve=info,warn"),
            1 => EnvFilter::new("topic_sieve=debug,info"),
            2 => EnvFilter::new("topic_sieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> Result<(Config, Option<String>)> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(concurrency) = cli.concurrency {
        config.pipeline.concurrency = concurrency;
    }
    if let Some(secs) = cli.task_timeout {
        apply_task_timeout(&mut config, secs);
    }
    if let Some(dir) = &cli.output_dir {
        config.report.output_dir = Some(dir.clone());
    }

    validate(&config).context("Invalid configuration")?;

    Ok((config, config_hash))
}

/// Sets the task timeout, lowering the stage timeout so it still fits
fn apply_task_timeout(config: &mut Config, secs: u64) {
    config.pipeline.task_timeout_secs = secs;
    if config.pipeline.stage_timeout_secs > secs {
        tracing::info!(
            "Stage timeout lowered from {}s to {}s to fit the task timeout",
            config.pipeline.stage_timeout_secs,
            secs
        );
        config.pipeline.stage_timeout_secs = secs;
    }
}

/// Handles the --dry-run mode: resolves the job and prints what would run
fn handle_dry_run(job: &JobSpec) -> Result<()> {
    let plan = plan_job(job).context("Failed to prepare job")?;
    let config = &job.config;

    println!("=== Topic-Sieve Dry Run ===\n");

    println!("Input:");
    println!("  File: {}", job.input_path.display());
    println!("  URLs: {}", plan.urls.len());
    println!(
        "  Topic: {}{}",
        plan.topic,
        if plan.topic_known { "" } else { " (not in topic table)" }
    );

    println!("\nPipeline:");
    println!("  Concurrency: {}", plan.concurrency);
    println!("  Task timeout: {}s", config.pipeline.task_timeout_secs);
    println!("  Stage timeout: {}s", config.pipeline.stage_timeout_secs);
    println!("  Max text chars: {}", config.pipeline.max_text_chars);

    println!("\nClassifier:");
    println!("  Model: {}", config.classifier.model);
    println!("  Endpoint: {}", config.classifier.api_base_url);
    println!("  Credential variable: {}", config.classifier.api_key_env);
    println!("  Topic set: {}", config.classifier.topic_set);

    println!("\nOutput:");
    println!("  Labels: {}", plan.labels_path.display());
    println!("  Errors: {}", plan.errors_path.display());

    println!("\n✓ Configuration is valid");
    println!("✓ Would process {} URLs", plan.urls.len());

    Ok(())
}

/// Handles the main processing run
async fn handle_run(job: &JobSpec) -> Result<()> {
    let classifier = GeminiClassifier::from_env(&job.config.classifier)
        .context("Failed to set up the classifier")?;
    let fetcher =
        HttpFetcher::new(&job.config.fetcher).context("Failed to build the HTTP client")?;

    tracing::info!(
        "Starting run with model {} ({})",
        job.config.classifier.model,
        classifier.endpoint()
    );

    let summary = run_job(job, Arc::new(fetcher), Arc::new(classifier))
        .await
        .context("Run failed")?;

    println!("Results written to {}", summary.labels_path.display());
    println!("Error summary written to {}", summary.errors_path.display());

    Ok(())
}
