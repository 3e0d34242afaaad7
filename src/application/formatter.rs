//! Console summary of an export run.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ExportReport, TargetOutcome};

/// Formats the per-table outcome of a run as a table.
pub fn format_report(report: &ExportReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Table", "Fetched", "Written", "Failed", "Status"]);

    for outcome in &report.outcomes {
        table.add_row(vec![
            outcome.table.clone(),
            outcome.fetched.to_string(),
            outcome.written.to_string(),
            outcome.failed.to_string(),
            status_label(outcome),
        ]);
    }

    table.to_string()
}

/// Formats a one-line total for the run.
pub fn format_totals(report: &ExportReport) -> String {
    let written = report.files_written();
    let failures = report.failures();

    let failures = if failures == 0 {
        "0 failures".green().to_string()
    } else {
        format!("{failures} failures").red().to_string()
    };

    format!(
        "{} {written} files written, {failures}",
        "📦 Export:".bold()
    )
}

fn status_label(outcome: &TargetOutcome) -> String {
    match &outcome.error {
        Some(error) => error.clone(),
        None if outcome.is_success() => "ok".to_string(),
        None => "partial".to_string(),
    }
}
