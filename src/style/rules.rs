//! Ordered style-matching rules.
//!
//! Style assignment walks an explicit, ordered rule list derived from the
//! catalog; the first satisfying rule wins. Matching is by tagged variant,
//! never by probing arbitrary properties at runtime.

use crate::model::{StyleCatalog, StyleKind};

/// A single matching rule, tied to the catalog entry it was derived from.
#[derive(Debug, Clone)]
pub enum StyleRule {
    /// Matches on font size within one point and exact bold/italic flags.
    FontMatch {
        style_name: String,
        size: f32,
        bold: bool,
        italic: bool,
    },
    /// Always matches; terminates the rule walk.
    Fallback { style_name: String },
}

impl StyleRule {
    /// The catalog style this rule assigns.
    pub fn style_name(&self) -> &str {
        match self {
            StyleRule::FontMatch { style_name, .. } => style_name,
            StyleRule::Fallback { style_name } => style_name,
        }
    }

    /// Whether a paragraph's observed formatting satisfies this rule.
    pub fn matches(&self, font_size: f32, bold: bool, italic: bool) -> bool {
        match self {
            StyleRule::FontMatch {
                size,
                bold: rule_bold,
                italic: rule_italic,
                ..
            } => {
                (size - font_size).abs() <= 1.0 && *rule_bold == bold && *rule_italic == italic
            }
            StyleRule::Fallback { .. } => true,
        }
    }
}

/// Derive the ordered rule list from a catalog: one `FontMatch` per
/// paragraph style in catalog order, then a `Fallback` on the body style.
pub fn rules_from_catalog(catalog: &StyleCatalog, fallback: &str) -> Vec<StyleRule> {
    let mut rules: Vec<StyleRule> = catalog
        .iter()
        .filter(|def| def.kind == StyleKind::Paragraph)
        .map(|def| StyleRule::FontMatch {
            style_name: def.name.clone(),
            size: def.font.size,
            bold: def.font.bold,
            italic: def.font.italic,
        })
        .collect();
    rules.push(StyleRule::Fallback {
        style_name: fallback.to_string(),
    });
    rules
}

/// Walk the rules and return the first satisfied style name.
pub fn match_style<'a>(
    rules: &'a [StyleRule],
    font_size: f32,
    bold: bool,
    italic: bool,
) -> &'a str {
    rules
        .iter()
        .find(|r| r.matches(font_size, bold, italic))
        .map(|r| r.style_name())
        .expect("rule list always ends with a fallback")
}
