//! Report rendering: colored text for terminals, JSON for tools

use serde::Serialize;

use branchsweep_core::{
    BranchRecord, BranchStatus, ClassifyReport, DeleteOutcome, DeleteReport, DeleteResult,
    branch_noun,
};

use crate::colors::{COLORS, paint};

const SCHEMA_VERSION: &str = "1";

/// Width of the status column in the text report
const STATUS_WIDTH: usize = 10;

/// JSON response envelope
#[derive(Debug, Clone, Serialize)]
pub struct JsonResponse<T> {
    /// Schema version for forward compatibility
    pub schema_version: String,
    /// Command that generated this response
    pub command: String,
    /// Status: "ok" or "error"
    pub status: String,
    /// Command-specific payload
    pub data: T,
    /// Skipped branches, fatal errors, etc.
    pub issues: Vec<JsonIssue>,
}

impl<T> JsonResponse<T> {
    /// Create a successful response with issues
    pub fn ok_with_issues(command: &str, data: T, issues: Vec<JsonIssue>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: "ok".to_string(),
            data,
            issues,
        }
    }

    /// Create an error response
    pub fn error(command: &str, data: T, issues: Vec<JsonIssue>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: "error".to_string(),
            data,
            issues,
        }
    }
}

/// Issue object structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonIssue {
    /// Error code (e.g., "E011")
    pub code: String,
    /// "error" or "warning"
    pub severity: String,
    pub message: String,
    /// Branch the issue concerns, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl JsonIssue {
    pub fn error(code: &str, message: String) -> Self {
        Self {
            code: code.to_string(),
            severity: "error".to_string(),
            message,
            branch: None,
        }
    }
}

/// Data payload for a sweep run
#[derive(Debug, Clone, Serialize)]
pub struct SweepData {
    pub report: ClassifyReport,
    /// Present when `--auto` requested deletions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletions: Option<DeleteReport>,
}

/// Build the JSON envelope for a finished run
pub fn sweep_response(
    report: ClassifyReport,
    deletions: Option<DeleteReport>,
) -> JsonResponse<SweepData> {
    let issues = report
        .skipped
        .iter()
        .map(|s| JsonIssue {
            code: "E011".to_string(),
            severity: "warning".to_string(),
            message: s.error.clone(),
            branch: Some(s.name.clone()),
        })
        .collect();
    JsonResponse::ok_with_issues("sweep", SweepData { report, deletions }, issues)
}

pub fn print_json<T: Serialize>(response: &JsonResponse<T>) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("error: failed to serialize JSON: {}", e),
    }
}

fn status_badge(status: BranchStatus, color: bool) -> String {
    let label = format!("{:<width$}", status.to_string().to_uppercase(), width = STATUS_WIDTH);
    match status {
        BranchStatus::Deprecated => paint(&label, COLORS.fail, color),
        BranchStatus::Stale => paint(&label, COLORS.warning, color),
        BranchStatus::Active => label,
    }
}

/// Text report: header, one block per branch, footer with counts
pub fn render_report(report: &ClassifyReport, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Trunk: {}  (stale after {} days, or {} commits behind with none ahead)\n",
        paint(&report.trunk, COLORS.active, color),
        report.thresholds.stale_days,
        report.thresholds.behind_commits
    ));

    let indent = " ".repeat(STATUS_WIDTH + 2);
    for record in &report.records {
        out.push('\n');
        out.push_str(&format!(
            "{}  {}\n",
            status_badge(record.status, color),
            paint(&record.name, COLORS.active, color)
        ));
        if !record.last_commit.is_empty() {
            out.push_str(&format!("{}{}\n", indent, record.last_commit));
        }
        for reason in &record.reasons {
            out.push_str(&format!("{}- {}\n", indent, reason));
        }
    }

    for skipped in &report.skipped {
        out.push_str(&format!(
            "\n{}  {}: {}\n",
            paint("warning:", COLORS.warning, color),
            skipped.name,
            skipped.error
        ));
    }

    out.push_str(&format!(
        "\n{} deprecated, {} stale ({} {} examined)\n",
        report.count(BranchStatus::Deprecated),
        report.count(BranchStatus::Stale),
        report.examined,
        branch_noun(report.examined)
    ));
    out
}

/// Dry-run listing of the branches a deletion would touch
pub fn render_dry_run(records: &[BranchRecord], names: &[String], color: bool) -> String {
    if names.is_empty() {
        return "Dry run: nothing would be deleted\n".to_string();
    }
    let mut out = format!(
        "Dry run: would delete {} {}\n",
        names.len(),
        branch_noun(names.len())
    );
    for name in names {
        let status = records
            .iter()
            .find(|r| &r.name == name)
            .map(|r| r.status)
            .unwrap_or(BranchStatus::Active);
        out.push_str(&format!("  {}  {}\n", status_badge(status, color), name));
    }
    out
}

/// One line per finished deletion
pub fn render_result(result: &DeleteResult, color: bool) -> String {
    let outcome = result.outcome.to_string();
    let outcome = match result.outcome {
        DeleteOutcome::Deleted | DeleteOutcome::ForceDeleted => {
            paint(&outcome, COLORS.success, color)
        }
        DeleteOutcome::Skipped { .. } => paint(&outcome, COLORS.warning, color),
        DeleteOutcome::Failed { .. } => paint(&outcome, COLORS.fail, color),
    };
    format!("  {}: {}", result.branch, outcome)
}

pub fn render_summary(report: &DeleteReport) -> String {
    format!(
        "{} deleted, {} skipped, {} failed",
        report.deleted(),
        report.skipped(),
        report.failed()
    )
}
