// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::evaluation::RuleSpec;
use crate::limits::REPORT_SCHEMA_VERSION;
use crate::scan::ScanReport;
use crate::validate::{FileFailure, ValidationError};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExitCode {
    Success = 0,
    Violations = 1,
    Usage = 2,
    Fatal = 3,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Violations => "violations",
            Self::Usage => "usage",
            Self::Fatal => "fatal",
        }
    }

    #[must_use]
    pub const fn status(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Serialize)]
struct ReportSummary {
    files: usize,
    validation_errors: usize,
    file_errors: usize,
    total: usize,
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    schema_version: u32,
    root: String,
    status: &'static str,
    summary: ReportSummary,
    violations: &'a [ValidationError],
    file_failures: &'a [FileFailure],
}

#[must_use]
pub fn render_text_summary(report: &ScanReport) -> String {
    format!(
        "summary: files={} validation_errors={} file_errors={} total={}",
        report.files_scanned,
        report.validation_errors.len(),
        report.file_failures.len(),
        report.total_errors(),
    )
}

#[must_use]
pub fn render_text(report: &ScanReport) -> String {
    let mut lines = vec![format!(
        "Validating token metadata in {}",
        report.root.display()
    )];
    if !report.validation_errors.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Found {} token validation error(s):",
            report.validation_errors.len()
        ));
        for err in &report.validation_errors {
            lines.push(format!("  x {}", err.message));
            lines.push(format!("    file: {}", err.file));
            lines.push(format!("    path: {}", err.token_path));
            lines.push(format!("    rule: {}", err.rule));
        }
    }
    if !report.file_failures.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Found {} file error(s):",
            report.file_failures.len()
        ));
        for failure in &report.file_failures {
            lines.push(format!("  x {failure}"));
        }
    }
    lines.push(String::new());
    lines.push(render_text_summary(report));
    lines.push(if report.is_clean() {
        "OK: all token metadata is consistent".to_string()
    } else {
        "FAILED: fix the errors above".to_string()
    });
    lines.join("\n")
}

pub fn render_json(report: &ScanReport) -> Result<String, serde_json::Error> {
    let doc = ReportDocument {
        schema_version: REPORT_SCHEMA_VERSION,
        root: report.root.display().to_string(),
        status: report.exit_code().as_str(),
        summary: ReportSummary {
            files: report.files_scanned,
            validation_errors: report.validation_errors.len(),
            file_errors: report.file_failures.len(),
            total: report.total_errors(),
        },
        violations: &report.validation_errors,
        file_failures: &report.file_failures,
    };
    serde_json::to_string_pretty(&doc)
}

#[must_use]
pub fn render_rules_text(rules: &[RuleSpec]) -> String {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{:>2}. {}\t{}", i + 1, rule.id, rule.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_rules_json(rules: &[RuleSpec]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rules)
}
