// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::adapters::{discover_token_files, display_path};
use crate::report::ExitCode;
use crate::schema::{default_required_modes, TokenPolicyConfig, ViolationMode};
use crate::validate::{FileFailure, ScanError, ValidationError};
use crate::walk::{walk_document, WalkOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub mode: ViolationMode,
    pub required_modes: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            mode: ViolationMode::FirstViolation,
            required_modes: default_required_modes(),
        }
    }
}

impl From<&TokenPolicyConfig> for ScanOptions {
    fn from(cfg: &TokenPolicyConfig) -> Self {
        Self {
            mode: cfg.violation_mode,
            required_modes: cfg.required_modes.clone(),
        }
    }
}

impl ScanOptions {
    fn walk_options(&self) -> WalkOptions<'_> {
        WalkOptions {
            mode: self.mode,
            required_modes: &self.required_modes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub validation_errors: Vec<ValidationError>,
    pub file_failures: Vec<FileFailure>,
}

impl ScanReport {
    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.validation_errors.len() + self.file_failures.len()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.total_errors() == 0
    }

    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.is_clean() {
            ExitCode::Success
        } else {
            ExitCode::Violations
        }
    }
}

/// Validates an in-memory token document.
#[must_use]
pub fn validate_document(document: &Value, file: &str, opts: &ScanOptions) -> Vec<ValidationError> {
    walk_document(document, file, opts.walk_options())
}

/// Scans every token file under `root`.
///
/// Per-file read and parse problems are collected into the report; only a
/// missing or non-directory root is returned as an error.
pub fn scan_token_dir(root: &Path, opts: &ScanOptions) -> Result<ScanReport, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootMissing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::RootNotDirectory(root.to_path_buf()));
    }

    let (files, discovery_failures) = discover_token_files(root);
    for failure in &discovery_failures {
        warn!(file = failure.file(), "token discovery failed: {failure}");
    }
    let report = scan_files(root, &files, discovery_failures, opts);
    info!(
        root = %root.display(),
        files = report.files_scanned,
        validation_errors = report.validation_errors.len(),
        file_errors = report.file_failures.len(),
        mode = opts.mode.as_str(),
        "token scan finished"
    );
    Ok(report)
}

fn scan_files(
    root: &Path,
    files: &[PathBuf],
    mut file_failures: Vec<FileFailure>,
    opts: &ScanOptions,
) -> ScanReport {
    let mut validation_errors = Vec::new();
    for path in files {
        let file = display_path(root, path);
        match check_file(path, &file, opts) {
            Ok(errors) => {
                debug!(file = %file, violations = errors.len(), "checked token file");
                validation_errors.extend(errors);
            }
            Err(failure) => {
                warn!(file = %file, "token file skipped: {failure}");
                file_failures.push(failure);
            }
        }
    }
    ScanReport {
        root: root.to_path_buf(),
        files_scanned: files.len(),
        validation_errors,
        file_failures,
    }
}

fn check_file(
    path: &Path,
    file: &str,
    opts: &ScanOptions,
) -> Result<Vec<ValidationError>, FileFailure> {
    let raw = fs::read(path).map_err(|e| FileFailure::Io {
        file: file.to_string(),
        message: e.to_string(),
    })?;
    // JSON text must be UTF-8; invalid bytes surface as a positioned parse error.
    let document: Value =
        serde_json::from_slice(&raw).map_err(|e| FileFailure::parse(file, &e))?;
    Ok(validate_document(&document, file, opts))
}

/// Scans `root` with the default options and returns a process status:
/// `0` when no errors of any kind were found, `1` otherwise.
#[must_use]
pub fn validate_token_dir(root: &Path) -> i32 {
    match scan_token_dir(root, &ScanOptions::default()) {
        Ok(report) => report.exit_code().status(),
        Err(err) => {
            warn!("token scan aborted: {err}");
            ExitCode::Violations.status()
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    const THEMEABLE_PRIMITIVE: &str = r##"{"c": {"$value": "#fff", "$extensions": {"lufa": {"level": "primitive", "themeable": true}}}}"##;

    #[test]
    fn unreadable_file_is_collected_and_batch_continues() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        let vanished = root.join("a-vanished.json");
        let present = root.join("b-present.json");
        fs::write(&present, THEMEABLE_PRIMITIVE).expect("write");

        let files = vec![vanished, present];
        let report = scan_files(root, &files, Vec::new(), &ScanOptions::default());

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.file_failures.len(), 1);
        assert!(matches!(
            &report.file_failures[0],
            FileFailure::Io { file, .. } if file == "a-vanished.json"
        ));
        assert_eq!(report.validation_errors.len(), 1);
        assert_eq!(report.validation_errors[0].file, "b-present.json");
        assert_eq!(report.exit_code(), ExitCode::Violations);
    }

    #[test]
    fn discovery_failures_are_kept_ahead_of_file_failures() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let discovery = vec![FileFailure::Io {
            file: "locked".to_string(),
            message: "permission denied".to_string(),
        }];
        let report = scan_files(tmp.path(), &[], discovery, &ScanOptions::default());
        assert_eq!(report.files_scanned, 0);
        assert_eq!(report.file_failures[0].file(), "locked");
        assert!(!report.is_clean());
    }

    #[test]
    fn invalid_utf8_is_a_parse_failure_with_position() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("latin1.json");
        fs::write(&path, b"{\n  \"x\": \"\xFF\"\n}").expect("write");

        let failure = check_file(&path, "latin1.json", &ScanOptions::default())
            .expect_err("invalid utf-8");
        match failure {
            FileFailure::Parse { file, line, .. } => {
                assert_eq!(file, "latin1.json");
                assert_eq!(line, 2);
            }
            FileFailure::Io { .. } => panic!("expected parse failure"),
        }
    }
}
