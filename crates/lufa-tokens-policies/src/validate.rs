// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::schema::TokenPolicyConfig;

/// A token that breaks one of the architectural rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{file}: {message}")]
pub struct ValidationError {
    pub rule: &'static str,
    pub message: String,
    pub token_path: String,
    pub file: String,
}

/// A token file that could not be validated at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileFailure {
    #[error("{file}:{line}:{column}: invalid JSON: {message}")]
    Parse {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("{file}: {message}")]
    Io { file: String, message: String },
}

impl FileFailure {
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::Parse { file, .. } | Self::Io { file, .. } => file,
        }
    }

    #[must_use]
    pub fn parse(file: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::Parse {
            file: file.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Conditions that stop a scan before any file is looked at.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScanError {
    #[error("token directory does not exist: {}", .0.display())]
    RootMissing(PathBuf),
    #[error("token directory is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PolicyConfigError {
    #[error("read token policy config failed: {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse token policy config failed: {source}")]
    Parse { source: serde_json::Error },
    #[error("invalid token policy config: {0}")]
    Invalid(String),
}

pub fn validate_policy_config(cfg: &TokenPolicyConfig) -> Result<(), PolicyConfigError> {
    if cfg.tokens_dir.trim().is_empty() {
        return Err(PolicyConfigError::Invalid(
            "tokens_dir must be non-empty".to_string(),
        ));
    }
    if cfg.required_modes.is_empty() {
        return Err(PolicyConfigError::Invalid(
            "required_modes must not be empty".to_string(),
        ));
    }
    let mut seen = BTreeSet::new();
    for mode in &cfg.required_modes {
        if mode.trim().is_empty() {
            return Err(PolicyConfigError::Invalid(
                "required_modes entries must be non-empty".to_string(),
            ));
        }
        if !seen.insert(mode.as_str()) {
            return Err(PolicyConfigError::Invalid(format!(
                "required_modes entry duplicated: {mode}"
            )));
        }
    }
    Ok(())
}

pub fn parse_policy_config_json(raw: &str) -> Result<TokenPolicyConfig, PolicyConfigError> {
    let cfg: TokenPolicyConfig =
        serde_json::from_str(raw).map_err(|source| PolicyConfigError::Parse { source })?;
    validate_policy_config(&cfg)?;
    Ok(cfg)
}
