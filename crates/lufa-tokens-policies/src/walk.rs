// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::evaluation::{evaluate_token, TokenSite};
use crate::limits::{LUFA_EXTENSION_KEY, TOKEN_EXTENSIONS_KEY, TOKEN_VALUE_KEY};
use crate::schema::{LufaExtensions, ViolationMode};
use crate::validate::ValidationError;

/// Shape of one value in a token document.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode<'a> {
    /// Object carrying `$value` or `$extensions`. `group` holds the object
    /// again when it has no `$value` and its children must still be walked.
    Token {
        lufa: Option<LufaExtensions>,
        group: Option<&'a Map<String, Value>>,
    },
    Namespace(&'a Map<String, Value>),
    /// Array; its items are walked with their index as the path segment.
    Sequence(&'a [Value]),
    Leaf,
}

impl<'a> TokenNode<'a> {
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            Value::Array(items) => return Self::Sequence(items),
            _ => return Self::Leaf,
        };
        let has_value = map.contains_key(TOKEN_VALUE_KEY);
        if !has_value && !map.contains_key(TOKEN_EXTENSIONS_KEY) {
            return Self::Namespace(map);
        }
        let lufa = map
            .get(TOKEN_EXTENSIONS_KEY)
            .and_then(|ext| ext.get(LUFA_EXTENSION_KEY))
            .and_then(LufaExtensions::from_value);
        Self::Token {
            lufa,
            group: (!has_value).then_some(map),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WalkOptions<'a> {
    pub mode: ViolationMode,
    pub required_modes: &'a [String],
}

/// Walks one parsed token document and returns every violation found.
///
/// Keys beginning with `$` are metadata and are never descended into.
/// Arrays are walked item by item, so a token at `shadows[0]` is reported
/// as `shadows.0`.
#[must_use]
pub fn walk_document(root: &Value, file: &str, opts: WalkOptions<'_>) -> Vec<ValidationError> {
    let mut out = Vec::new();
    if let Value::Object(map) = root {
        let mut path = Vec::new();
        walk_entries(map, &mut path, file, opts, &mut out);
    }
    out
}

fn walk_entries<'a>(
    map: &'a Map<String, Value>,
    path: &mut Vec<Cow<'a, str>>,
    file: &str,
    opts: WalkOptions<'_>,
    out: &mut Vec<ValidationError>,
) {
    for (key, value) in map {
        if key.starts_with('$') {
            continue;
        }
        path.push(Cow::Borrowed(key.as_str()));
        visit(value, path, file, opts, out);
        path.pop();
    }
}

fn visit<'a>(
    value: &'a Value,
    path: &mut Vec<Cow<'a, str>>,
    file: &str,
    opts: WalkOptions<'_>,
    out: &mut Vec<ValidationError>,
) {
    match TokenNode::classify(value) {
        TokenNode::Token { lufa, group } => {
            let joined = path.join(".");
            let site = TokenSite {
                path: &joined,
                file,
            };
            out.extend(evaluate_token(
                lufa.as_ref(),
                site,
                opts.mode,
                opts.required_modes,
            ));
            if let Some(children) = group {
                walk_entries(children, path, file, opts, out);
            }
        }
        TokenNode::Namespace(children) => walk_entries(children, path, file, opts, out),
        TokenNode::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(Cow::Owned(index.to_string()));
                visit(item, path, file, opts, out);
                path.pop();
            }
        }
        TokenNode::Leaf => {}
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::schema::default_required_modes;
    use serde_json::json;

    fn walk(doc: &Value, mode: ViolationMode) -> Vec<ValidationError> {
        let required = default_required_modes();
        walk_document(
            doc,
            "tokens.json",
            WalkOptions {
                mode,
                required_modes: &required,
            },
        )
    }

    #[test]
    fn classify_distinguishes_tokens_namespaces_and_leaves() {
        let token = json!({ "$value": "#fff" });
        assert_eq!(
            TokenNode::classify(&token),
            TokenNode::Token {
                lufa: None,
                group: None
            }
        );
        let ns = json!({ "red": { "$value": "#f00" } });
        assert!(matches!(TokenNode::classify(&ns), TokenNode::Namespace(_)));
        assert_eq!(TokenNode::classify(&json!("#fff")), TokenNode::Leaf);
        assert!(matches!(
            TokenNode::classify(&json!([1])),
            TokenNode::Sequence(items) if items.len() == 1
        ));
        let group = json!({ "$extensions": {}, "child": { "$value": 1 } });
        assert!(matches!(
            TokenNode::classify(&group),
            TokenNode::Token { group: Some(_), .. }
        ));
    }

    #[test]
    fn nested_paths_are_dotted() {
        let doc = json!({
            "color": {
                "$description": "palette",
                "brand": {
                    "primary": {
                        "$value": "#00f",
                        "$extensions": { "lufa": { "level": "primitive", "themeable": true } }
                    }
                }
            }
        });
        let errors = walk(&doc, ViolationMode::FirstViolation);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].token_path, "color.brand.primary");
        assert_eq!(errors[0].file, "tokens.json");
    }

    #[test]
    fn extension_only_groups_are_checked_and_descended() {
        let doc = json!({
            "spacing": {
                "$extensions": { "lufa": { "level": "layout", "themeable": true } },
                "gutter": {
                    "$value": "1rem",
                    "$extensions": { "lufa": { "fluid": true, "responsive": {} } }
                }
            }
        });
        let paths = walk(&doc, ViolationMode::FirstViolation)
            .into_iter()
            .map(|e| e.token_path)
            .collect::<Vec<_>>();
        assert_eq!(paths, vec!["spacing", "spacing.gutter"]);
    }

    #[test]
    fn tokens_with_value_are_not_descended() {
        let doc = json!({
            "size": {
                "$value": "4px",
                "nested": {
                    "$value": "1px",
                    "$extensions": { "lufa": { "themable": true } }
                }
            }
        });
        assert!(walk(&doc, ViolationMode::FirstViolation).is_empty());
    }

    #[test]
    fn dollar_keys_at_root_are_skipped() {
        let doc = json!({
            "$schema": { "$value": 1, "$extensions": { "lufa": { "themable": true } } },
            "ok": { "$value": 1 }
        });
        assert!(walk(&doc, ViolationMode::FirstViolation).is_empty());
    }

    #[test]
    fn non_object_documents_yield_nothing() {
        assert!(walk(&json!([1, 2, 3]), ViolationMode::AllViolations).is_empty());
        assert!(walk(&json!("x"), ViolationMode::AllViolations).is_empty());
    }

    #[test]
    fn tokens_inside_arrays_are_checked_with_index_paths() {
        let doc = json!({
            "shadows": [
                { "$value": "0 1px 2px #000" },
                {
                    "$value": "0 2px 4px #000",
                    "$extensions": { "lufa": { "level": "primitive", "modeAware": true } }
                },
                "plain",
                [{ "$value": 1, "$extensions": { "lufa": { "themable": true } } }]
            ]
        });
        let paths = walk(&doc, ViolationMode::FirstViolation)
            .into_iter()
            .map(|e| e.token_path)
            .collect::<Vec<_>>();
        assert_eq!(paths, vec!["shadows.1", "shadows.3.0"]);
    }

    #[test]
    fn all_violations_mode_reports_every_rule() {
        let doc = json!({
            "c": {
                "$value": "#fff",
                "$extensions": { "lufa": {
                    "level": "primitive",
                    "themeable": true,
                    "themable": true
                } }
            }
        });
        assert_eq!(walk(&doc, ViolationMode::FirstViolation).len(), 1);
        assert_eq!(walk(&doc, ViolationMode::AllViolations).len(), 2);
    }
}
