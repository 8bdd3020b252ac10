// SPDX-License-Identifier: Apache-2.0
//! Architectural consistency rules for Lufa design-token trees.
//!
//! A token tree is a directory of Design Tokens Format JSON files. Each token
//! may carry `$extensions.lufa` metadata; this crate walks the tree, checks
//! that metadata against the tier rules, and aggregates a report.

#![forbid(unsafe_code)]
#![deny(clippy::dbg_macro, clippy::print_stdout, clippy::print_stderr)]

mod adapters;
mod evaluation;
mod limits;
mod report;
mod scan;
mod schema;
mod validate;
mod walk;

pub use adapters::{
    discover_token_files, display_path, load_policy_config, load_policy_from_workspace,
    policy_config_path, resolve_tokens_dir,
};
pub use evaluation::{evaluate_token, rule_catalog, validate_token, RuleSpec, TokenSite};
pub use limits::{
    DEFAULT_TOKENS_DIR, ENV_LUFA_TOKENS_DIR, LEGACY_THEMABLE_KEY, REPORT_SCHEMA_VERSION,
    REQUIRED_MODES,
};
pub use report::{
    render_json, render_rules_json, render_rules_text, render_text, render_text_summary, ExitCode,
};
pub use scan::{scan_token_dir, validate_document, validate_token_dir, ScanOptions, ScanReport};
pub use schema::{
    is_truthy, LufaExtensions, PolicySchemaVersion, TokenLevel, TokenPolicyConfig, ViolationMode,
};
pub use validate::{
    parse_policy_config_json, validate_policy_config, FileFailure, PolicyConfigError, ScanError,
    ValidationError,
};
pub use walk::{walk_document, TokenNode, WalkOptions};

pub const CRATE_NAME: &str = "lufa-tokens-policies";
