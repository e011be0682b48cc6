//! Stage 6: container serialization.
//!
//! Assembles the OOXML parts into a deterministic ZIP archive: fixed part
//! order, fixed compression settings, fixed timestamps. Identical inputs
//! produce byte-identical output.

mod document;
mod props;
mod styles;
mod xml;

pub use document::document_xml;
pub use styles::{numbering_xml, styles_xml};
pub use xml::{escape_xml, needs_space_preserve, style_id};

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::model::{
    DocProperties, DocumentTree, DocxParagraph, NumberingDefinition, StyleCatalog,
    StyleDefinition,
};

/// ZIP local-file-header signature; callers can sanity-check output
/// against it without parsing the archive.
pub const CONTAINER_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Fixed Deflate level; part of the determinism contract.
const COMPRESSION_LEVEL: i64 = 6;

/// Serializes the document tree into the output container.
pub struct DocxPackager;

impl DocxPackager {
    /// Assemble the container. Fails with `Error::Serialize` when the tree
    /// references styles or numbering that were never defined, or when the
    /// archive itself cannot be written.
    pub fn package(
        tree: &DocumentTree,
        catalog: &StyleCatalog,
        numberings: &[NumberingDefinition],
    ) -> Result<Vec<u8>> {
        validate_references(tree, catalog, numberings)?;

        let parts: [(&str, String); 9] = [
            ("[Content_Types].xml", props::content_types_xml()),
            ("_rels/.rels", props::root_rels_xml()),
            ("word/_rels/document.xml.rels", props::document_rels_xml()),
            ("word/document.xml", document::document_xml(tree)),
            ("word/styles.xml", styles::styles_xml(catalog)),
            ("word/numbering.xml", styles::numbering_xml(numberings)),
            ("word/settings.xml", props::settings_xml()),
            ("docProps/core.xml", props::core_xml(&tree.properties)),
            ("docProps/app.xml", props::app_xml(&tree.properties)),
        ];

        write_archive(&parts)
    }

    /// Build the minimal fallback container: a valid archive carrying an
    /// explanatory notice instead of the converted body. Callers receive
    /// this rather than a truncated file when primary assembly fails.
    pub fn fallback_package(reason: &str, title: &str) -> Result<Vec<u8>> {
        let mut catalog = StyleCatalog::new();
        catalog.insert(StyleDefinition::paragraph("Normal"));

        let mut properties = DocProperties::default();
        if !title.is_empty() {
            properties.title = title.to_string();
        }
        let mut tree = DocumentTree::new(properties);
        tree.push_paragraph(DocxParagraph::styled(
            "Normal",
            format!("Conversion of \"{title}\" could not be completed."),
        ));
        tree.push_paragraph(DocxParagraph::styled("Normal", format!("Reason: {reason}")));

        Self::package(&tree, &catalog, &[])
    }
}

/// Style and numbering integrity: every reference in the tree must resolve.
fn validate_references(
    tree: &DocumentTree,
    catalog: &StyleCatalog,
    numberings: &[NumberingDefinition],
) -> Result<()> {
    catalog
        .validate()
        .map_err(Error::Serialize)?;

    for name in tree.referenced_styles() {
        if !catalog.contains(name) {
            return Err(Error::Serialize(format!(
                "body references undefined style '{name}'"
            )));
        }
    }

    for id in tree.referenced_numbering_ids() {
        if !numberings.iter().any(|n| n.numbering_id == id) {
            return Err(Error::Serialize(format!(
                "body references undefined numbering id {id}"
            )));
        }
    }

    Ok(())
}

/// Write the parts in fixed order with fixed compression settings and a
/// fixed modification timestamp.
fn write_archive(parts: &[(&str, String)]) -> Result<Vec<u8>> {
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        .last_modified_time(zip::DateTime::default());

    for (name, content) in parts {
        archive.start_file(*name, options)?;
        archive.write_all(content.as_bytes())?;
    }

    let cursor = archive.finish()?;
    Ok(cursor.into_inner())
}
