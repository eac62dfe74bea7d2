//! Run statistics
//!
//! Computed once, after every task has finished, and printed at the top of
//! the error report.

use chrono::{DateTime, Utc};

/// Statistics for one processing run
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    /// When dispatching started
    pub start_time: DateTime<Utc>,

    /// When the last task finished
    pub end_time: DateTime<Utc>,

    /// Number of URLs read from the input file
    pub urls_total: usize,

    /// Number of error records
    pub error_count: usize,

    /// Concurrency the run used
    pub worker_count: usize,
}

impl RunStats {
    /// Percentage of URLs without an error record
    ///
    /// Returns 0 for an empty run. Never negative, even if a URL collected
    /// more than one record.
    pub fn success_rate(&self) -> f64 {
        if self.urls_total == 0 {
            return 0.0;
        }
        let succeeded = self.urls_total.saturating_sub(self.error_count);
        (succeeded as f64 / self.urls_total as f64) * 100.0
    }

    /// Wall-clock duration of the run in seconds
    pub fn elapsed_secs(&self) -> f64 {
        let elapsed = self.end_time - self.start_time;
        elapsed
            .to_std()
            .map(|duration| duration.as_secs_f64())
            .unwrap_or(0.0)
    }
}
