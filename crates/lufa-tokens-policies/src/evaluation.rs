// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::schema::{default_required_modes, LufaExtensions, TokenLevel, ViolationMode};
use crate::validate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    PrimitiveThemeable,
    PrimitiveModeAware,
    PrimitiveModes,
    ModesRequireModeAware,
    ThemesRequireThemeable,
    LayoutThemeable,
    LayoutModeAware,
    ModesComplete,
    LegacyThemableKey,
    FluidResponsiveExclusive,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleSpec {
    pub id: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    kind: RuleKind,
}

/// Rules in evaluation order. In first-violation mode the earliest failing
/// entry is the only one reported for a token.
const TOKEN_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "tokens.primitive.themeable.forbidden",
        description: "primitive tokens are immutable and cannot be themeable",
        kind: RuleKind::PrimitiveThemeable,
    },
    RuleSpec {
        id: "tokens.primitive.mode_aware.forbidden",
        description: "primitive tokens are immutable and cannot be modeAware",
        kind: RuleKind::PrimitiveModeAware,
    },
    RuleSpec {
        id: "tokens.primitive.modes.forbidden",
        description: "primitive tokens cannot define modes",
        kind: RuleKind::PrimitiveModes,
    },
    RuleSpec {
        id: "tokens.modes.requires_mode_aware",
        description: "tokens with modes must declare modeAware: true",
        kind: RuleKind::ModesRequireModeAware,
    },
    RuleSpec {
        id: "tokens.themes.requires_themeable",
        description: "tokens with themes must declare themeable: true",
        kind: RuleKind::ThemesRequireThemeable,
    },
    RuleSpec {
        id: "tokens.layout.themeable.forbidden",
        description: "layout tokens are structural constants and cannot be themeable",
        kind: RuleKind::LayoutThemeable,
    },
    RuleSpec {
        id: "tokens.layout.mode_aware.forbidden",
        description: "layout tokens are structural constants and cannot be modeAware",
        kind: RuleKind::LayoutModeAware,
    },
    RuleSpec {
        id: "tokens.modes.incomplete",
        description: "modes must define every required mode",
        kind: RuleKind::ModesComplete,
    },
    RuleSpec {
        id: "tokens.legacy.themable_typo",
        description: "the deprecated key `themable` must be spelled `themeable`",
        kind: RuleKind::LegacyThemableKey,
    },
    RuleSpec {
        id: "tokens.scaling.fluid_responsive_exclusive",
        description: "fluid and responsive scaling are mutually exclusive",
        kind: RuleKind::FluidResponsiveExclusive,
    },
];

#[must_use]
pub fn rule_catalog() -> &'static [RuleSpec] {
    TOKEN_RULES
}

/// Location of the token under evaluation, carried into every error.
#[derive(Debug, Clone, Copy)]
pub struct TokenSite<'a> {
    pub path: &'a str,
    pub file: &'a str,
}

/// Validates one token's metadata, stopping at the first failing rule.
///
/// Tokens without `lufa` metadata are exempt and always pass.
pub fn validate_token(
    lufa: Option<&LufaExtensions>,
    token_path: &str,
    file: &str,
) -> Result<(), ValidationError> {
    let site = TokenSite {
        path: token_path,
        file,
    };
    let required = default_required_modes();
    match evaluate_token(lufa, site, ViolationMode::FirstViolation, &required)
        .into_iter()
        .next()
    {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[must_use]
pub fn evaluate_token(
    lufa: Option<&LufaExtensions>,
    site: TokenSite<'_>,
    mode: ViolationMode,
    required_modes: &[String],
) -> Vec<ValidationError> {
    let mut out = Vec::new();
    let Some(ext) = lufa else {
        return out;
    };
    for rule in TOKEN_RULES {
        if let Some(message) = apply_rule(ext, rule.kind, site.path, required_modes) {
            out.push(ValidationError {
                rule: rule.id,
                message,
                token_path: site.path.to_string(),
                file: site.file.to_string(),
            });
            if mode == ViolationMode::FirstViolation {
                break;
            }
        }
    }
    out
}

fn apply_rule(
    ext: &LufaExtensions,
    kind: RuleKind,
    path: &str,
    required_modes: &[String],
) -> Option<String> {
    let primitive = ext.is_level(&TokenLevel::Primitive);
    let layout = ext.is_level(&TokenLevel::Layout);
    match kind {
        RuleKind::PrimitiveThemeable => (primitive && ext.themeable).then(|| {
            format!("Token \"{path}\": primitive tokens cannot be themeable (themeable: true is forbidden at level primitive)")
        }),
        RuleKind::PrimitiveModeAware => (primitive && ext.mode_aware).then(|| {
            format!("Token \"{path}\": primitive tokens cannot be modeAware (modeAware: true is forbidden at level primitive)")
        }),
        RuleKind::PrimitiveModes => (primitive && ext.modes.is_some()).then(|| {
            format!("Token \"{path}\": primitive tokens cannot define modes (modes imply modeAware, which primitives cannot set)")
        }),
        RuleKind::ModesRequireModeAware => (ext.modes.is_some() && !ext.mode_aware).then(|| {
            format!("Token \"{path}\": has modes but modeAware is not true")
        }),
        RuleKind::ThemesRequireThemeable => (ext.themes.is_some() && !ext.themeable).then(|| {
            format!("Token \"{path}\": has themes but themeable is not true")
        }),
        RuleKind::LayoutThemeable => (layout && ext.themeable).then(|| {
            format!("Token \"{path}\": layout tokens are structural constants and cannot be themeable")
        }),
        RuleKind::LayoutModeAware => (layout && ext.mode_aware).then(|| {
            format!("Token \"{path}\": layout tokens are structural constants and cannot be modeAware")
        }),
        RuleKind::ModesComplete => {
            ext.modes.as_ref()?;
            let present = ext.mode_names().collect::<Vec<_>>();
            let missing = required_modes
                .iter()
                .filter(|m| !present.contains(&m.as_str()))
                .map(String::as_str)
                .collect::<Vec<_>>();
            (!missing.is_empty()).then(|| {
                format!(
                    "Token \"{path}\": modes is missing required modes: {}",
                    missing.join(", ")
                )
            })
        }
        RuleKind::LegacyThemableKey => ext.legacy_themable.then(|| {
            format!("Token \"{path}\": uses deprecated spelling \"themable\"; use \"themeable\"")
        }),
        RuleKind::FluidResponsiveExclusive => (ext.fluid && ext.responsive.is_some()).then(|| {
            format!("Token \"{path}\": fluid and responsive are mutually exclusive scaling strategies (fluid uses clamp(), responsive uses breakpoint overrides)")
        }),
    }
}
