//! Artifact rendering
//!
//! Produces the text of the labels file and the error report. Nothing here
//! touches the filesystem.

use crate::output::recorder::ErrorRecorder;
use crate::output::stats::RunStats;
use crate::state::{Stage, UrlResult};
use chrono::{DateTime, Utc};

/// Default number of records listed per stage in the detailed section
pub const DEFAULT_MAX_ENTRIES_PER_STAGE: usize = 20;

const RULE_WIDTH: usize = 80;
const SECTION_RULE_WIDTH: usize = 40;

/// Run details printed in the error report header
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Input file as given on the command line
    pub input: String,

    /// Topic key the URLs were classified against
    pub topic: String,

    /// SHA-256 of the config file, when one was loaded
    pub config_hash: Option<String>,

    pub max_urls_per_message: usize,
    pub max_entries_per_stage: usize,
}

/// Renders the labels artifact: one `"<url> <label>"` line per result
pub fn render_labels(results: &[UrlResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&result.to_line());
        out.push('\n');
    }
    out
}

/// Renders the full error report
///
/// # Sections
///
/// 1. Header with the generation timestamp and run details
/// 2. `PROCESSING STATISTICS`
/// 3. The recorder summary (ranked error types and grouped listing)
/// 4. `DETAILED ERRORS BY STAGE`, capped per stage
/// 5. `FULL ERROR LOG`, every record with a 1-based index
///
/// Sections 4 and 5 are left out when no errors were recorded.
pub fn render_error_report(recorder: &ErrorRecorder, stats: &RunStats, context: &ReportContext) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "Error Summary Report - {}\n",
        context.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!("Input file: {}\n", context.input));
    out.push_str(&format!("Topic: {}\n", context.topic));
    if let Some(hash) = &context.config_hash {
        out.push_str(&format!("Config hash: {}\n", hash));
    }
    out.push('\n');

    // Statistics
    push_section_title(&mut out, "PROCESSING STATISTICS");
    out.push_str(&format!("Total URLs processed: {}\n", stats.urls_total));
    out.push_str(&format!("Errors recorded: {}\n", stats.error_count));
    out.push_str(&format!("Success rate: {:.2}%\n", stats.success_rate()));
    out.push_str(&format!("Elapsed time: {:.2} seconds\n", stats.elapsed_secs()));
    out.push_str(&format!("Worker count: {}\n", stats.worker_count));
    out.push('\n');

    // Summary
    push_section_title(&mut out, "ERROR SUMMARY");
    out.push_str(recorder.summary(context.max_urls_per_message).trim_end());
    out.push('\n');

    let records = recorder.records();
    if records.is_empty() {
        return out;
    }

    // Detailed listing
    out.push('\n');
    push_section_title(&mut out, "DETAILED ERRORS BY STAGE");
    for stage in Stage::ALL {
        let stage_records: Vec<_> = records.iter().filter(|r| r.stage == stage).collect();
        if stage_records.is_empty() {
            continue;
        }

        out.push_str(&format!("[{}] {} errors\n", stage, stage_records.len()));
        for (n, record) in stage_records
            .iter()
            .take(context.max_entries_per_stage)
            .enumerate()
        {
            out.push_str(&format!("  {}. {} - {}\n", n + 1, record.url, record.message));
        }
        if stage_records.len() > context.max_entries_per_stage {
            out.push_str(&format!(
                "  ... {} more {} errors not shown\n",
                stage_records.len() - context.max_entries_per_stage,
                stage
            ));
        }
        out.push('\n');
    }

    // Full log
    push_section_title(&mut out, "FULL ERROR LOG");
    for (n, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {} | {} | {}\n",
            n + 1,
            record.stage,
            record.url,
            record.message
        ));
    }

    out
}

fn push_section_title(out: &mut String, title: &str) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(SECTION_RULE_WIDTH));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::recorder::NO_ERRORS_MESSAGE;
    use crate::state::Label;

    fn context() -> ReportContext {
        ReportContext {
            generated_at: Utc::now(),
            input: "drugs.txt".to_string(),
            topic: "drugs".to_string(),
            config_hash: Some("abc123".to_string()),
            max_urls_per_message: 5,
            max_entries_per_stage: 2,
        }
    }

    fn stats(urls_total: usize, error_count: usize) -> RunStats {
        let now = Utc::now();
        RunStats {
            start_time: now,
            end_time: now,
            urls_total,
            error_count,
            worker_count: 10,
        }
    }

    #[test]
    fn test_render_labels() {
        let results = vec![
            UrlResult::new("http://example.com", Label::Hit),
            UrlResult::new("bad://", Label::Inaccessible),
        ];
        assert_eq!(render_labels(&results), "http://example.com h\nbad:// i\n");
        assert_eq!(render_labels(&[]), "");
    }

    #[test]
    fn test_report_without_errors() {
        let report = render_error_report(&ErrorRecorder::new(), &stats(2, 0), &context());

        assert!(report.starts_with("Error Summary Report - "));
        assert!(report.contains("Config hash: abc123\n"));
        assert!(report.contains("Success rate: 100.00%\n"));
        assert!(report.contains(NO_ERRORS_MESSAGE));
        assert!(!report.contains("FULL ERROR LOG"));
    }

    #[test]
    fn test_report_sections_with_errors() {
        let recorder = ErrorRecorder::new();
        recorder.record(Stage::Validation, "bad://", "Connection error: unsupported URL scheme");
        recorder.record(Stage::Timeout, "unreachable.test", "Task timed out");

        let report = render_error_report(&recorder, &stats(3, 2), &context());

        assert!(report.contains("Total URLs processed: 3\n"));
        assert!(report.contains("Errors recorded: 2\n"));
        assert!(report.contains("Success rate: 33.33%\n"));
        assert!(report.contains("Worker count: 10\n"));
        assert!(report.contains("Total errors: 2"));
        assert!(report.contains("[validation] 1 errors\n"));
        assert!(report.contains("[1] validation | bad:// | Connection error: unsupported URL scheme\n"));
        assert!(report.contains("[2] timeout | unreachable.test | Task timed out\n"));

        let stats_at = report.find("PROCESSING STATISTICS").unwrap();
        let detail_at = report.find("DETAILED ERRORS BY STAGE").unwrap();
        let log_at = report.find("FULL ERROR LOG").unwrap();
        assert!(stats_at < detail_at && detail_at < log_at);
    }

    #[test]
    fn test_detailed_section_is_capped() {
        let recorder = ErrorRecorder::new();
        for i in 0..5 {
            recorder.record(Stage::Extraction, format!("http://{}.test", i), "No text content extracted");
        }

        let report = render_error_report(&recorder, &stats(5, 5), &context());

        assert!(report.contains("  2. http://1.test - No text content extracted\n"));
        assert!(!report.contains("  3. http://2.test"));
        assert!(report.contains("  ... 3 more extraction errors not shown\n"));
        // The full log is never capped
        assert!(report.contains("[5] extraction | http://4.test"));
    }

    #[test]
    fn test_header_without_config_hash() {
        let mut ctx = context();
        ctx.config_hash = None;
        let report = render_error_report(&ErrorRecorder::new(), &stats(0, 0), &ctx);

        assert!(!report.contains("Config hash"));
        assert!(report.contains("Success rate: 0.00%\n"));
    }
}
