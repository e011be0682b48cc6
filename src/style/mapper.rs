//! Style catalog construction and content annotation.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::model::{
    Alignment, AnalyzedContent, FontProps, ParagraphContent, ParagraphProps, SectionContent,
    StyleCatalog, StyleDefinition, StyleKind,
};

use super::rules::{match_style, rules_from_catalog};

/// Fixed substitution table from common PDF base fonts to Word families.
static FONT_SUBSTITUTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Times-Roman", "Times New Roman"),
        ("Times-Bold", "Times New Roman"),
        ("Times-Italic", "Times New Roman"),
        ("Times-BoldItalic", "Times New Roman"),
        ("Helvetica", "Arial"),
        ("Helvetica-Bold", "Arial"),
        ("Helvetica-Oblique", "Arial"),
        ("Helvetica-BoldOblique", "Arial"),
        ("Courier", "Courier New"),
        ("Courier-Bold", "Courier New"),
        ("Courier-Oblique", "Courier New"),
        ("Courier-BoldOblique", "Courier New"),
        ("Symbol", "Symbol"),
        ("ZapfDingbats", "Wingdings"),
    ])
});

/// Options for style mapping.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    /// Keep unmapped source font names instead of the default family
    pub preserve_original_fonts: bool,
    pub default_font_family: String,
    pub default_font_size: f32,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            preserve_original_fonts: false,
            default_font_family: "Times New Roman".to_string(),
            default_font_size: 12.0,
        }
    }
}

/// Builds the style catalog and annotates analyzed content with style
/// references.
pub struct StyleMapper {
    options: StyleOptions,
}

impl StyleMapper {
    pub fn new() -> Self {
        Self {
            options: StyleOptions::default(),
        }
    }

    pub fn with_options(options: StyleOptions) -> Self {
        Self { options }
    }

    /// Seed defaults, promote repeated formats to custom styles, then
    /// annotate every paragraph with its first-matching style.
    pub fn map(&self, content: &mut AnalyzedContent) -> StyleCatalog {
        let mut catalog = self.default_styles();

        self.promote_repeated_formats(content, &mut catalog);

        let rules = rules_from_catalog(&catalog, "Normal");
        let annotate = |paragraph: &mut ParagraphContent| {
            let name = match_style(&rules, paragraph.font_size, paragraph.bold, paragraph.italic);
            paragraph.style = Some(name.to_string());
            for run in &mut paragraph.runs {
                run.font_name = self.substitute_font(&run.font_name);
            }
        };

        for item in &mut content.preamble {
            if let SectionContent::Paragraph(p) = item {
                annotate(p);
            }
        }
        for idx in 0..content.sections.len() {
            if let Some(section) = content.sections.get_mut(idx) {
                for item in &mut section.content {
                    if let SectionContent::Paragraph(p) = item {
                        annotate(p);
                    }
                }
            }
        }

        debug_assert!(catalog.validate().is_ok());
        catalog
    }

    /// The fixed default catalog: body, six headings, list, table grid.
    fn default_styles(&self) -> StyleCatalog {
        let mut catalog = StyleCatalog::new();

        let mut normal = StyleDefinition::paragraph("Normal");
        normal.font = FontProps {
            family: self.options.default_font_family.clone(),
            size: self.options.default_font_size,
            ..FontProps::default()
        };
        catalog.insert(normal);

        // Decreasing sizes by level; tighter spacing below level 2.
        let heading_sizes = [20.0, 18.0, 16.0, 14.0, 12.0, 11.0];
        for (i, &size) in heading_sizes.iter().enumerate() {
            let level = i + 1;
            let mut heading = StyleDefinition::paragraph(format!("Heading {level}"));
            heading.based_on = Some("Normal".to_string());
            heading.font = FontProps {
                family: self.options.default_font_family.clone(),
                size,
                bold: true,
                ..FontProps::default()
            };
            heading.paragraph = ParagraphProps {
                space_before: if level <= 2 { 240 } else { 120 },
                space_after: if level <= 2 { 120 } else { 60 },
                keep_next: true,
                ..ParagraphProps::default()
            };
            catalog.insert(heading);
        }

        let mut list = StyleDefinition::paragraph("List Paragraph");
        list.based_on = Some("Normal".to_string());
        list.font.family = self.options.default_font_family.clone();
        list.paragraph.indent_left = 360;
        catalog.insert(list);

        let mut table = StyleDefinition::table("Table Grid");
        table.font.family = self.options.default_font_family.clone();
        catalog.insert(table);

        catalog
    }

    /// Any (size, family, bold, italic, underline, alignment) combination
    /// occurring more than once is worth a named style.
    fn promote_repeated_formats(&self, content: &AnalyzedContent, catalog: &mut StyleCatalog) {
        #[derive(PartialEq, Eq, Hash, Clone)]
        struct FormatKey {
            size: i32,
            family: String,
            bold: bool,
            italic: bool,
            underline: bool,
            alignment: Alignment,
        }

        // Hash-count, but keep first-seen order so promoted names are
        // deterministic across runs.
        let mut counts: HashMap<FormatKey, usize> = HashMap::new();
        let mut order: Vec<FormatKey> = Vec::new();

        for paragraph in &content.paragraphs {
            let key = FormatKey {
                size: paragraph.font_size.round() as i32,
                family: paragraph.font_name.clone(),
                bold: paragraph.bold,
                italic: paragraph.italic,
                underline: paragraph.underline,
                alignment: paragraph.alignment,
            };
            let entry = counts.entry(key.clone()).or_insert(0);
            if *entry == 0 {
                order.push(key);
            }
            *entry += 1;
        }

        let mut custom_index = 0;
        for key in order {
            if counts[&key] <= 1 {
                continue;
            }
            custom_index += 1;
            let mut style = StyleDefinition::paragraph(format!("Custom Style {custom_index}"));
            style.based_on = Some("Normal".to_string());
            style.font = FontProps {
                family: self.substitute_font(&key.family),
                size: key.size as f32,
                bold: key.bold,
                italic: key.italic,
                underline: key.underline,
                ..FontProps::default()
            };
            style.paragraph.alignment = key.alignment;
            catalog.insert(style);
        }
    }

    /// Map a source font name to a Word-compatible family.
    pub fn substitute_font(&self, name: &str) -> String {
        if let Some(mapped) = FONT_SUBSTITUTIONS.get(name) {
            return (*mapped).to_string();
        }

        // Prefix heuristics for subset-tagged or vendor-suffixed names.
        let lower = name.to_lowercase();
        if lower.contains("times") || lower.contains("serif") {
            return "Times New Roman".to_string();
        }
        if lower.contains("helvetica") || lower.contains("arial") || lower.contains("sans") {
            return "Arial".to_string();
        }
        if lower.contains("courier") || lower.contains("mono") {
            return "Courier New".to_string();
        }
        if lower.contains("symbol") {
            return "Symbol".to_string();
        }
        if lower.contains("zapf") || lower.contains("dingbat") {
            return "Wingdings".to_string();
        }

        if self.options.preserve_original_fonts {
            name.to_string()
        } else {
            self.options.default_font_family.clone()
        }
    }
}

impl Default for StyleMapper {
    fn default() -> Self {
        Self::new()
    }
}
