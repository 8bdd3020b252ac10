// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::limits::{ENV_LUFA_TOKENS_DIR, TOKEN_FILE_EXTENSION};
use crate::schema::TokenPolicyConfig;
use crate::validate::{parse_policy_config_json, FileFailure, PolicyConfigError};

const TOKEN_POLICY_CONFIG_PATH: &str = "configs/tokens/token-policy.json";

#[must_use]
pub fn policy_config_path(root: &Path) -> PathBuf {
    root.join(TOKEN_POLICY_CONFIG_PATH)
}

pub fn load_policy_config(path: &Path) -> Result<TokenPolicyConfig, PolicyConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| PolicyConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_policy_config_json(&raw)
}

/// Loads the workspace config when one is checked in, otherwise the defaults.
pub fn load_policy_from_workspace(root: &Path) -> Result<TokenPolicyConfig, PolicyConfigError> {
    let path = policy_config_path(root);
    if path.is_file() {
        load_policy_config(&path)
    } else {
        Ok(TokenPolicyConfig::default())
    }
}

/// Token directory for a workspace: `LUFA_TOKENS_DIR` when set and non-blank,
/// else the configured `tokens_dir`, both relative to `root`.
#[must_use]
pub fn resolve_tokens_dir(root: &Path, cfg: &TokenPolicyConfig) -> PathBuf {
    let configured = std::env::var(ENV_LUFA_TOKENS_DIR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| cfg.tokens_dir.clone());
    root.join(configured)
}

/// Every `.json` file below `root`, sorted by path.
///
/// Entries the walker cannot read are returned as failures instead of
/// aborting discovery.
#[must_use]
pub fn discover_token_files(root: &Path) -> (Vec<PathBuf>, Vec<FileFailure>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(TOKEN_FILE_EXTENSION)
                {
                    files.push(path.to_path_buf());
                }
            }
            Err(err) => {
                let file = err
                    .path()
                    .map_or_else(|| root.display().to_string(), |p| display_path(root, p));
                failures.push(FileFailure::Io {
                    file,
                    message: err.to_string(),
                });
            }
        }
    }
    files.sort();
    (files, failures)
}

/// Path of `file` relative to `root`, for stable report output.
#[must_use]
pub fn display_path(root: &Path, file: &Path) -> String {
    file.strip_prefix(root)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}
