//! Bounded-concurrency task dispatcher
//!
//! Spawns one task per URL, lets at most `concurrency` of them run stage work
//! at once, and collects results in completion order. Each task runs under a
//! wall-clock timeout that starts once it holds a permit.

use crate::config::validate_concurrency;
use crate::output::ErrorRecorder;
use crate::pipeline::StageRunner;
use crate::state::{ErrorRecord, Label, Stage, UrlResult};
use crate::ConfigResult;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};

/// Default number of URLs processed at once
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default wall-clock budget for one URL
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(60);

/// Message recorded when a task exceeds its budget
const TIMEOUT_MESSAGE: &str = "Task timed out";

/// What one worker task returns
type TaskOutput = (UrlResult, Option<ErrorRecord>);

/// A finished task and the input position it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTask {
    pub index: usize,
    pub result: UrlResult,
}

/// Everything a dispatch run produced
#[derive(Debug)]
pub struct DispatchOutcome {
    /// One entry per input URL, in completion order
    pub completed: Vec<CompletedTask>,

    /// Every failure recorded during the run
    pub errors: ErrorRecorder,
}

/// Shared completion counter
///
/// Cloning yields a handle to the same counter, so observers can read it while
/// the dispatcher updates it.
#[derive(Debug, Clone)]
pub struct Progress {
    inner: Arc<ProgressInner>,
}

#[derive(Debug)]
struct ProgressInner {
    total: usize,
    completed: AtomicUsize,
    last_logged_decile: AtomicUsize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            inner: Arc::new(ProgressInner {
                total,
                completed: AtomicUsize::new(0),
                last_logged_decile: AtomicUsize::new(0),
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.inner.total
    }

    pub fn completed(&self) -> usize {
        self.inner.completed.load(Ordering::Relaxed)
    }

    /// Percentage of tasks finished, 100 for an empty run
    pub fn percent(&self) -> f64 {
        if self.inner.total == 0 {
            return 100.0;
        }
        self.completed() as f64 / self.inner.total as f64 * 100.0
    }

    /// Marks one task as finished, logging each time another 10% is reached
    pub fn advance(&self) {
        let completed = self.inner.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if self.inner.total == 0 {
            return;
        }

        let decile = completed * 10 / self.inner.total;
        let previous = self
            .inner
            .last_logged_decile
            .fetch_max(decile, Ordering::Relaxed);
        if decile > previous {
            tracing::info!(
                "Progress: {}/{} URLs ({:.0}%)",
                completed,
                self.inner.total,
                self.percent()
            );
        }
    }
}

/// Runs the stage runner over a URL list with bounded concurrency
pub struct Dispatcher {
    runner: StageRunner,
    concurrency: usize,
    task_timeout: Duration,
}

impl Dispatcher {
    /// Creates a dispatcher
    ///
    /// # Arguments
    ///
    /// * `runner` - The per-URL stage runner, cloned into every task
    /// * `concurrency` - Maximum number of tasks running at once
    /// * `task_timeout` - Wall-clock budget for one URL
    ///
    /// # Returns
    ///
    /// * `Ok(Dispatcher)` - Ready to run
    /// * `Err(ConfigError)` - `concurrency` is 0 or above the allowed maximum
    pub fn new(runner: StageRunner, concurrency: usize, task_timeout: Duration) -> ConfigResult<Self> {
        validate_concurrency(concurrency)?;

        Ok(Self {
            runner,
            concurrency,
            task_timeout,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn task_timeout(&self) -> Duration {
        self.task_timeout
    }

    /// Processes every URL and returns once all tasks have finished
    pub async fn run(&self, urls: &[String], topic: &str) -> DispatchOutcome {
        self.run_with_progress(urls, topic, Progress::new(urls.len()))
            .await
    }

    /// Like [`run`](Self::run), reporting completions to `progress`
    pub async fn run_with_progress(
        &self,
        urls: &[String],
        topic: &str,
        progress: Progress,
    ) -> DispatchOutcome {
        tracing::info!(
            "Dispatching {} URLs with {} workers (task timeout {}s)",
            urls.len(),
            self.concurrency,
            self.task_timeout.as_secs_f64()
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let topic: Arc<str> = Arc::from(topic);
        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::with_capacity(urls.len());

        for (index, raw_url) in urls.iter().enumerate() {
            let runner = self.runner.clone();
            let semaphore = Arc::clone(&semaphore);
            let topic = Arc::clone(&topic);
            let raw_url = raw_url.clone();
            let task_timeout = self.task_timeout;

            let handle = tasks.spawn(async move {
                run_task(&runner, &semaphore, &raw_url, &topic, task_timeout).await
            });
            task_index.insert(handle.id(), index);
        }

        let outcome = collect(tasks, &task_index, urls, &progress).await;

        tracing::info!(
            "Dispatch finished: {} URLs, {} errors",
            outcome.completed.len(),
            outcome.errors.len()
        );

        outcome
    }
}

/// Drains the task set, giving every input URL exactly one result
///
/// `task_index` maps each spawned task to its input position. A task that
/// dies without reporting gets an executor record carrying its own join error.
async fn collect(
    mut tasks: JoinSet<TaskOutput>,
    task_index: &HashMap<Id, usize>,
    urls: &[String],
    progress: &Progress,
) -> DispatchOutcome {
    let errors = ErrorRecorder::new();
    let mut completed = Vec::with_capacity(urls.len());
    let mut reported = vec![false; urls.len()];
    let mut join_failures: HashMap<usize, String> = HashMap::new();

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, (result, record))) => {
                let Some(&index) = task_index.get(&id) else {
                    tracing::warn!("Result from unknown task {}", id);
                    continue;
                };
                if let Some(record) = record {
                    errors.push(record);
                }
                reported[index] = true;
                completed.push(CompletedTask { index, result });
                progress.advance();
            }
            Err(e) => {
                tracing::error!("Worker task failed: {}", e);
                if let Some(&index) = task_index.get(&e.id()) {
                    join_failures.insert(index, e.to_string());
                }
            }
        }
    }

    // Tasks that died without reporting still owe their URL a result
    for (index, raw_url) in urls.iter().enumerate() {
        if reported[index] {
            continue;
        }
        let reason = join_failures
            .get(&index)
            .map(String::as_str)
            .unwrap_or("task ended without reporting a result");
        let (result, record) = executor_failure(raw_url, reason);
        errors.push(record);
        completed.push(CompletedTask { index, result });
        progress.advance();
    }

    DispatchOutcome { completed, errors }
}

/// Body of one worker task
async fn run_task(
    runner: &StageRunner,
    semaphore: &Semaphore,
    raw_url: &str,
    topic: &str,
    task_timeout: Duration,
) -> TaskOutput {
    let _permit = match semaphore.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            let (result, record) = executor_failure(raw_url, &e.to_string());
            return (result, Some(record));
        }
    };

    match tokio::time::timeout(task_timeout, runner.run(raw_url, topic)).await {
        Ok(outcome) => outcome,
        Err(_) => (
            UrlResult::new(raw_url, Label::Inaccessible),
            Some(ErrorRecord::new(Stage::Timeout, raw_url, TIMEOUT_MESSAGE)),
        ),
    }
}

/// Result and record for a task that could not run or report
fn executor_failure(raw_url: &str, reason: &str) -> (UrlResult, ErrorRecord) {
    (
        UrlResult::new(raw_url, Label::Inaccessible),
        ErrorRecord::new(
            Stage::Executor,
            raw_url,
            format!("Task execution error: {}", reason),
        ),
    )
}
