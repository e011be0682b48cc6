//! Style catalog types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// WordprocessingML `w:jc` value.
    pub fn wml_value(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// What a style definition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleKind {
    /// WordprocessingML `w:type` value.
    pub fn wml_value(self) -> &'static str {
        match self {
            StyleKind::Paragraph => "paragraph",
            StyleKind::Character => "character",
            StyleKind::Table => "table",
            StyleKind::Numbering => "numbering",
        }
    }
}

/// Run-level font properties of a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontProps {
    /// Font family name (already substituted to a Word-compatible family)
    pub family: String,
    /// Font size in points
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// Hex color without '#' (e.g., "000000")
    pub color: String,
}

impl Default for FontProps {
    fn default() -> Self {
        Self {
            family: "Times New Roman".to_string(),
            size: 12.0,
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            color: "000000".to_string(),
        }
    }
}

/// Paragraph-level properties of a style. Spacing values are in twips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphProps {
    pub alignment: Alignment,
    /// Space before the paragraph, twips
    pub space_before: u32,
    /// Space after the paragraph, twips
    pub space_after: u32,
    /// Line spacing multiplier (1.0 = single)
    pub line_spacing: f32,
    /// Left indent, twips
    pub indent_left: u32,
    /// Keep with next paragraph
    pub keep_next: bool,
    /// Force a page break before the paragraph
    pub page_break_before: bool,
}

impl Default for ParagraphProps {
    fn default() -> Self {
        Self {
            alignment: Alignment::Left,
            space_before: 0,
            space_after: 120, // 6pt
            line_spacing: 1.0,
            indent_left: 0,
            keep_next: false,
            page_break_before: false,
        }
    }
}

/// A named formatting preset emitted with the output body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleDefinition {
    pub name: String,
    pub kind: StyleKind,
    /// Name of the style this one inherits from
    pub based_on: Option<String>,
    pub font: FontProps,
    pub paragraph: ParagraphProps,
}

impl StyleDefinition {
    /// Create a paragraph style with default properties.
    pub fn paragraph(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StyleKind::Paragraph,
            based_on: None,
            font: FontProps::default(),
            paragraph: ParagraphProps::default(),
        }
    }

    /// Create a table style with default properties.
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StyleKind::Table,
            based_on: None,
            font: FontProps::default(),
            paragraph: ParagraphProps::default(),
        }
    }

    /// Set the parent style.
    pub fn based_on(mut self, parent: impl Into<String>) -> Self {
        self.based_on = Some(parent.into());
        self
    }

    /// Style id: the name with spaces removed, stable across runs.
    pub fn style_id(&self) -> String {
        self.name.replace(' ', "")
    }
}

/// Insertion-ordered name → definition map.
///
/// Order matters twice: the emitted styles part lists definitions in
/// insertion order, and style matching walks them first-match-wins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StyleCatalog {
    styles: Vec<StyleDefinition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl StyleCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing any existing style with the same name.
    pub fn insert(&mut self, def: StyleDefinition) {
        if let Some(&i) = self.index.get(&def.name) {
            self.styles[i] = def;
        } else {
            self.index.insert(def.name.clone(), self.styles.len());
            self.styles.push(def);
        }
    }

    /// Look up a style by name.
    pub fn get(&self, name: &str) -> Option<&StyleDefinition> {
        self.index.get(name).map(|&i| &self.styles[i])
    }

    /// Whether a style with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.iter()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Check that every `based_on` reference resolves within the catalog.
    pub fn validate(&self) -> Result<(), String> {
        for def in &self.styles {
            if let Some(parent) = &def.based_on {
                if !self.contains(parent) {
                    return Err(format!(
                        "style '{}' is based on undefined style '{}'",
                        def.name, parent
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_insertion_order() {
        let mut catalog = StyleCatalog::new();
        catalog.insert(StyleDefinition::paragraph("Normal"));
        catalog.insert(StyleDefinition::paragraph("Heading 1").based_on("Normal"));
        catalog.insert(StyleDefinition::paragraph("Heading 2").based_on("Normal"));

        let names: Vec<&str> = catalog.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Normal", "Heading 1", "Heading 2"]);
    }

    #[test]
    fn test_catalog_replace_keeps_position() {
        let mut catalog = StyleCatalog::new();
        catalog.insert(StyleDefinition::paragraph("Normal"));
        catalog.insert(StyleDefinition::paragraph("Heading 1"));

        let mut replacement = StyleDefinition::paragraph("Normal");
        replacement.font.size = 11.0;
        catalog.insert(replacement);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().next().unwrap().font.size, 11.0);
    }

    #[test]
    fn test_validate_detects_dangling_based_on() {
        let mut catalog = StyleCatalog::new();
        catalog.insert(StyleDefinition::paragraph("Orphan").based_on("Missing"));
        assert!(catalog.validate().is_err());

        catalog.insert(StyleDefinition::paragraph("Missing"));
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_style_id_strips_spaces() {
        let def = StyleDefinition::paragraph("List Paragraph");
        assert_eq!(def.style_id(), "ListParagraph");
    }

    #[test]
    fn test_alignment_wml_values() {
        assert_eq!(Alignment::Justify.wml_value(), "both");
        assert_eq!(Alignment::Center.wml_value(), "center");
    }
}
