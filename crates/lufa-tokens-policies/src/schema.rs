// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::limits::{DEFAULT_TOKENS_DIR, LEGACY_THEMABLE_KEY, REQUIRED_MODES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PolicySchemaVersion {
    #[serde(rename = "1")]
    V1,
}

impl PolicySchemaVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
        }
    }
}

/// Tier of a token in the primitive → semantic → component hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLevel {
    Primitive,
    Semantic,
    Component,
    Layout,
    Other(String),
}

impl TokenLevel {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "primitive" => Self::Primitive,
            "semantic" => Self::Semantic,
            "component" => Self::Component,
            "layout" => Self::Layout,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Primitive => "primitive",
            Self::Semantic => "semantic",
            Self::Component => "component",
            Self::Layout => "layout",
            Self::Other(raw) => raw,
        }
    }
}

/// Typed view of a token's `$extensions.lufa` object.
///
/// Boolean flags are set only when the document holds a literal `true`;
/// `modes` and `themes` are kept only when their value is truthy, and
/// `responsive` is kept whenever the key is present at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LufaExtensions {
    pub level: Option<TokenLevel>,
    pub themeable: bool,
    pub mode_aware: bool,
    pub modes: Option<Value>,
    pub themes: Option<Value>,
    pub fluid: bool,
    pub responsive: Option<Value>,
    pub legacy_themable: bool,
}

impl LufaExtensions {
    /// Decodes the `lufa` extension object. Anything that is not a JSON
    /// object carries no metadata and yields `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_map)
    }

    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            level: map.get("level").and_then(Value::as_str).map(TokenLevel::parse),
            themeable: is_literal_true(map.get("themeable")),
            mode_aware: is_literal_true(map.get("modeAware")),
            modes: map.get("modes").filter(|v| is_truthy(v)).cloned(),
            themes: map.get("themes").filter(|v| is_truthy(v)).cloned(),
            fluid: is_literal_true(map.get("fluid")),
            responsive: map.get("responsive").cloned(),
            legacy_themable: map.contains_key(LEGACY_THEMABLE_KEY),
        }
    }

    #[must_use]
    pub fn is_level(&self, level: &TokenLevel) -> bool {
        self.level.as_ref() == Some(level)
    }

    /// Keys of the `modes` object; a truthy non-object value has none.
    pub fn mode_names(&self) -> impl Iterator<Item = &str> {
        self.modes
            .as_ref()
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }
}

fn is_literal_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// JavaScript-style truthiness over JSON values.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationMode {
    /// One error per token: the first rule, in catalog order, that fails.
    #[default]
    FirstViolation,
    /// Every failing rule of a token is reported.
    AllViolations,
}

impl ViolationMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstViolation => "first_violation",
            Self::AllViolations => "all_violations",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenPolicyConfig {
    pub schema_version: PolicySchemaVersion,
    #[serde(default = "default_tokens_dir")]
    pub tokens_dir: String,
    #[serde(default)]
    pub violation_mode: ViolationMode,
    #[serde(default = "default_required_modes")]
    pub required_modes: Vec<String>,
}

impl Default for TokenPolicyConfig {
    fn default() -> Self {
        Self {
            schema_version: PolicySchemaVersion::V1,
            tokens_dir: default_tokens_dir(),
            violation_mode: ViolationMode::default(),
            required_modes: default_required_modes(),
        }
    }
}

fn default_tokens_dir() -> String {
    DEFAULT_TOKENS_DIR.to_string()
}

pub(crate) fn default_required_modes() -> Vec<String> {
    REQUIRED_MODES.iter().map(ToString::to_string).collect()
}
