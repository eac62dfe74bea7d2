//! Thread-safe error accumulator
//!
//! Every failed URL ends up here as an [`ErrorRecord`]. Records are appended
//! from the dispatcher while tasks complete and only read once the run is
//! over.

use crate::state::{ErrorRecord, Stage};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Summary text used when a run recorded no failures
pub const NO_ERRORS_MESSAGE: &str = "No errors were recorded during processing.";

/// Default number of URLs listed under one grouped message
pub const DEFAULT_MAX_URLS_PER_MESSAGE: usize = 5;

/// Collects categorized error records
///
/// All methods take `&self`; the record list sits behind a mutex so the
/// recorder can be shared between tasks.
#[derive(Debug, Default)]
pub struct ErrorRecorder {
    records: Mutex<Vec<ErrorRecord>>,
}

/// Records sharing one message within a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageGroup {
    pub message: String,
    pub urls: Vec<String>,
}

impl ErrorRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a failure for `url`
    pub fn record(&self, stage: Stage, url: impl Into<String>, message: impl Into<String>) {
        self.push(ErrorRecord::new(stage, url, message));
    }

    /// Appends an already built record
    pub fn push(&self, record: ErrorRecord) {
        tracing::warn!("[{}] {}: {}", record.stage, record.url, record.message);
        self.lock().push(record);
    }

    /// Returns a snapshot of every record in insertion order
    pub fn records(&self) -> Vec<ErrorRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Counts records per `"{stage} - {error_type}"` bucket
    ///
    /// Sorted by descending count, ties broken alphabetically.
    pub fn ranked_error_types(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in self.lock().iter() {
            *counts.entry(record.bucket()).or_insert(0) += 1;
        }

        let mut ranked: Vec<_> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Groups records by stage, then by identical message
    ///
    /// Stages follow [`Stage::ALL`] order. Within a stage, groups are ordered
    /// by descending size, then message text. URLs keep insertion order.
    pub fn grouped_by_stage(&self) -> Vec<(Stage, Vec<MessageGroup>)> {
        let mut by_stage: BTreeMap<Stage, BTreeMap<String, Vec<String>>> = BTreeMap::new();
        for record in self.lock().iter() {
            by_stage
                .entry(record.stage)
                .or_default()
                .entry(record.message.clone())
                .or_default()
                .push(record.url.clone());
        }

        by_stage
            .into_iter()
            .map(|(stage, messages)| {
                let mut groups: Vec<MessageGroup> = messages
                    .into_iter()
                    .map(|(message, urls)| MessageGroup { message, urls })
                    .collect();
                // BTreeMap already yields messages in text order; the sort is stable
                groups.sort_by(|a, b| b.urls.len().cmp(&a.urls.len()));
                (stage, groups)
            })
            .collect()
    }

    /// Renders the error summary
    ///
    /// # Arguments
    ///
    /// * `max_urls_per_message` - How many URLs to list under each message
    ///   before collapsing the rest into a count
    ///
    /// # Returns
    ///
    /// The formatted summary, or [`NO_ERRORS_MESSAGE`] when nothing was
    /// recorded.
    pub fn summary(&self, max_urls_per_message: usize) -> String {
        if self.is_empty() {
            return NO_ERRORS_MESSAGE.to_string();
        }

        let mut out = String::new();
        out.push_str(&format!("Total errors: {}\n\n", self.len()));

        out.push_str("Errors by type:\n");
        for (bucket, count) in self.ranked_error_types() {
            out.push_str(&format!("  {}: {}\n", bucket, count));
        }

        for (stage, groups) in self.grouped_by_stage() {
            let stage_total: usize = groups.iter().map(|g| g.urls.len()).sum();
            out.push('\n');
            out.push_str(&format!(
                "{} ERRORS ({}):\n",
                stage.as_str().to_uppercase(),
                stage_total
            ));
            out.push_str(&"-".repeat(40));
            out.push('\n');

            for group in groups {
                out.push_str(&format!("Error: {}\n", group.message));
                out.push_str(&format!("Occurred in {} URLs:\n", group.urls.len()));
                for url in group.urls.iter().take(max_urls_per_message) {
                    out.push_str(&format!("  - {}\n", url));
                }
                if group.urls.len() > max_urls_per_message {
                    out.push_str(&format!(
                        "  - ... and {} more URLs\n",
                        group.urls.len() - max_urls_per_message
                    ));
                }
            }
        }

        out
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ErrorRecord>> {
        // A poisoned lock still holds valid records
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
