//! Result aggregation
//!
//! Tasks finish in whatever order the network allows. The aggregator puts the
//! results back in input order and guarantees one result per input URL.

use crate::pipeline::CompletedTask;
use crate::state::{Label, UrlResult};

/// Restores input order for a set of completed tasks
///
/// # Arguments
///
/// * `urls` - The input URL list, as dispatched
/// * `completed` - Completed tasks in completion order
///
/// # Returns
///
/// Exactly one `UrlResult` per input URL, at the URL's input position. A
/// position without a completed task gets its raw URL labelled `i`; if a
/// position was reported twice the first report wins.
pub fn in_input_order(urls: &[String], completed: Vec<CompletedTask>) -> Vec<UrlResult> {
    let mut slots: Vec<Option<UrlResult>> = vec![None; urls.len()];

    for task in completed {
        match slots.get_mut(task.index) {
            Some(slot) if slot.is_none() => *slot = Some(task.result),
            Some(_) => {
                tracing::warn!("Duplicate result for input line {}, keeping the first", task.index + 1);
            }
            None => {
                tracing::warn!("Result for unknown input index {} ignored", task.index);
            }
        }
    }

    slots
        .into_iter()
        .zip(urls)
        .map(|(slot, url)| slot.unwrap_or_else(|| UrlResult::new(url.as_str(), Label::Inaccessible)))
        .collect()
}

/// Counts results per label, as `(hits, unrelated, inaccessible)`
pub fn label_counts(results: &[UrlResult]) -> (usize, usize, usize) {
    results
        .iter()
        .fold((0, 0, 0), |(h, u, i), result| match result.label {
            Label::Hit => (h + 1, u, i),
            Label::Unrelated => (h, u + 1, i),
            Label::Inaccessible => (h, u, i + 1),
        })
}
