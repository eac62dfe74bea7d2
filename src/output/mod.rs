//! Output module for aggregating results and writing the run artifacts
//!
//! This module handles:
//! - Collecting error records from concurrent tasks
//! - Restoring input order for completed results
//! - Computing run statistics
//! - Rendering and writing the labels file and the error report

pub mod aggregate;
mod recorder;
pub mod report;
pub mod stats;

pub use aggregate::{in_input_order, label_counts};
pub use recorder::{ErrorRecorder, MessageGroup, DEFAULT_MAX_URLS_PER_MESSAGE, NO_ERRORS_MESSAGE};
pub use report::{render_error_report, render_labels, ReportContext, DEFAULT_MAX_ENTRIES_PER_STAGE};
pub use stats::RunStats;

use crate::state::UrlResult;
use crate::SieveError;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of the labels artifact, appended to the input file stem
pub const LABELS_SUFFIX: &str = "_labeled.txt";

/// Suffix of the error report, appended to the input file stem
pub const ERRORS_SUFFIX: &str = "_error_messages.log";

/// The rendered contents of both artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub labels: String,
    pub errors: String,
}

/// Renders both artifacts for a finished run
///
/// # Arguments
///
/// * `results` - One result per input URL, already in input order
/// * `recorder` - Every error recorded during the run
/// * `stats` - Run statistics
/// * `context` - Header details and report caps
pub fn finalize(
    results: &[UrlResult],
    recorder: &ErrorRecorder,
    stats: &RunStats,
    context: &ReportContext,
) -> Artifacts {
    Artifacts {
        labels: render_labels(results),
        errors: render_error_report(recorder, stats, context),
    }
}

/// Paths of the two artifacts for an input file
///
/// The files land next to the input unless `output_dir` is given.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use topic_sieve::output::artifact_paths;
///
/// let (labels, errors) = artifact_paths(Path::new("lists/drugs.txt"), None);
/// assert_eq!(labels, Path::new("lists/drugs_labeled.txt"));
/// assert_eq!(errors, Path::new("lists/drugs_error_messages.log"));
/// ```
pub fn artifact_paths(input: &Path, output_dir: Option<&Path>) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    (
        dir.join(format!("{}{}", stem, LABELS_SUFFIX)),
        dir.join(format!("{}{}", stem, ERRORS_SUFFIX)),
    )
}

/// Writes one artifact, creating its parent directory if needed
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), SieveError> {
    let to_error = |source| SieveError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, contents).map_err(to_error)?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}
