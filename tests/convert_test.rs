//! End-to-end pipeline tests over synthetic PDF documents.

use std::io::{Cursor, Read};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use docweave::{
    convert, Docweave, DocumentType, Error, CONTAINER_SIGNATURE,
};

/// One positioned text line on a page.
struct Line {
    text: &'static str,
    x: f32,
    y: f32,
    size: f32,
    bold: bool,
}

impl Line {
    fn new(text: &'static str, x: f32, y: f32, size: f32) -> Self {
        Self {
            text,
            x,
            y,
            size,
            bold: false,
        }
    }

    fn bold(text: &'static str, x: f32, y: f32, size: f32) -> Self {
        Self {
            text,
            x,
            y,
            size,
            bold: true,
        }
    }
}

/// Build a PDF with one content stream per page from positioned lines.
fn build_pdf(pages: &[Vec<Line>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for line in lines {
            let font = if line.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![font.into(), Object::Real(line.size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(line.x), Object::Real(line.y)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.text)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

const BODY: &str = "This paragraph is deliberately long enough to clear the eighty \
    character header cutoff, so the analyzer treats it as body text.";

/// The reference scenario: a title page with three paragraphs, then a
/// bulleted list page.
fn scenario_pdf() -> Vec<u8> {
    build_pdf(&[
        vec![
            Line::bold("Title", 50.0, 720.0, 20.0),
            Line::new(BODY, 50.0, 650.0, 12.0),
            Line::new(BODY, 50.0, 580.0, 12.0),
            Line::new(BODY, 50.0, 510.0, 12.0),
        ],
        vec![
            Line::new("- First item", 50.0, 700.0, 12.0),
            Line::new("- Second item", 50.0, 650.0, 12.0),
            Line::new("- Third item", 50.0, 600.0, 12.0),
        ],
    ])
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

/// Collect every attribute value following `needle` in an XML string.
fn attribute_values(xml: &str, needle: &str) -> Vec<String> {
    xml.match_indices(needle)
        .filter_map(|(i, _)| {
            let rest = &xml[i + needle.len()..];
            rest.split('"').nth(0).map(|v| v.to_string())
        })
        .collect()
}

#[test]
fn converts_valid_pdf_to_container_signature() {
    let pdf = scenario_pdf();
    let docx = convert(&pdf).expect("conversion should succeed");
    assert!(docx.starts_with(&CONTAINER_SIGNATURE));
    assert!(docx.starts_with(b"PK\x03\x04"));
}

#[test]
fn identical_input_produces_identical_output() {
    let pdf = scenario_pdf();
    let first = convert(&pdf).unwrap();
    let second = convert(&pdf).unwrap();
    assert_eq!(first, second, "conversion must be deterministic");
}

#[test]
fn plain_text_input_is_a_parse_error() {
    let result = convert(b"Just some plain text, no signature.");
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn truncated_signature_is_a_parse_error() {
    let result = convert(b"%PDF");
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn encrypted_pdf_is_rejected_as_unsupported() {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::String(vec![0u8; 32], lopdf::StringFormat::Hexadecimal),
        "U" => Object::String(vec![0u8; 32], lopdf::StringFormat::Hexadecimal),
        "P" => -44,
    });
    doc.trailer.set("Encrypt", encrypt_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();

    let result = convert(&buffer);
    assert!(
        matches!(result, Err(Error::Unsupported(_)) | Err(Error::Parse(_))),
        "encrypted input must be rejected, got {result:?}",
    );
    // Whatever the load path reports, it must never be a crash or a
    // successful-but-empty conversion.
    assert!(result.is_err());
}

#[test]
fn scenario_analysis_matches_expected_structure() {
    let pdf = scenario_pdf();
    let analyzed = Docweave::new().analyze(&pdf).unwrap();

    assert_eq!(analyzed.headers.len(), 1);
    assert_eq!(analyzed.headers[0].level, 1);
    assert_eq!(analyzed.headers[0].text, "Title");

    assert_eq!(analyzed.sections.len(), 1);
    let section = analyzed.sections.get(0).unwrap();
    let paragraph_count = section
        .content
        .iter()
        .filter(|c| matches!(c, docweave::model::SectionContent::Paragraph(_)))
        .count();
    assert_eq!(paragraph_count, 3);

    assert_eq!(analyzed.lists.len(), 1);
    assert_eq!(analyzed.lists[0].items.len(), 3);

    assert_eq!(analyzed.document_type, DocumentType::General);
}

#[test]
fn scenario_body_contains_heading_and_numbered_items() {
    let pdf = scenario_pdf();
    let docx = convert(&pdf).unwrap();
    let body = read_part(&docx, "word/document.xml");

    assert!(body.contains("<w:pStyle w:val=\"Heading1\"/>"));
    assert!(body.contains("Title"));
    assert!(body.contains("First item"));
    assert_eq!(body.matches("<w:numPr>").count(), 3);
    // A level-1 header forces a page break before itself.
    assert!(body.contains("<w:pageBreakBefore/>"));
}

#[test]
fn every_style_reference_resolves_in_styles_part() {
    let pdf = scenario_pdf();
    let docx = convert(&pdf).unwrap();

    let body = read_part(&docx, "word/document.xml");
    let styles = read_part(&docx, "word/styles.xml");

    let referenced = attribute_values(&body, "<w:pStyle w:val=\"");
    assert!(!referenced.is_empty());
    let defined = attribute_values(&styles, "w:styleId=\"");
    for style in referenced {
        assert!(
            defined.contains(&style),
            "style '{style}' referenced but not defined"
        );
    }
}

#[test]
fn every_numbering_reference_resolves_in_numbering_part() {
    let pdf = scenario_pdf();
    let docx = convert(&pdf).unwrap();

    let body = read_part(&docx, "word/document.xml");
    let numbering = read_part(&docx, "word/numbering.xml");

    let referenced = attribute_values(&body, "<w:numId w:val=\"");
    assert!(!referenced.is_empty());
    for id in referenced {
        assert!(
            numbering.contains(&format!("<w:num w:numId=\"{id}\">")),
            "numbering id {id} referenced but not defined"
        );
    }
}

#[test]
fn aligned_columns_produce_a_table() {
    let pdf = build_pdf(&[vec![
        Line::new("Name", 50.0, 700.0, 12.0),
        Line::new("Age", 300.0, 700.0, 12.0),
        Line::new("Alice", 50.0, 670.0, 12.0),
        Line::new("30", 300.0, 670.0, 12.0),
        Line::new("Bob", 50.0, 640.0, 12.0),
        Line::new("25", 300.0, 640.0, 12.0),
    ]]);

    let analyzed = Docweave::new().analyze(&pdf).unwrap();
    assert_eq!(analyzed.tables.len(), 1);
    assert_eq!(analyzed.tables[0].column_count, 2);
    assert_eq!(analyzed.tables[0].row_count(), 3);

    let docx = convert(&pdf).unwrap();
    let body = read_part(&docx, "word/document.xml");
    assert!(body.contains("<w:tbl>"));
    assert!(body.contains("Alice"));
    assert!(body.contains("<w:tblStyle w:val=\"TableGrid\"/>"));
}

#[test]
fn headers_nest_into_section_hierarchy() {
    let pdf = build_pdf(&[vec![
        Line::bold("Chapter", 50.0, 720.0, 20.0),
        Line::bold("Detail Section", 50.0, 650.0, 16.0),
        Line::new(BODY, 50.0, 580.0, 12.0),
    ]]);

    let analyzed = Docweave::new().analyze(&pdf).unwrap();
    assert_eq!(analyzed.sections.len(), 2);
    assert!(analyzed.sections.is_descendant_of(1, 0));
    assert!(analyzed.sections.validate().is_ok());
    // The body paragraph attaches to the innermost open section.
    assert_eq!(analyzed.sections.get(1).unwrap().content.len(), 1);
}

#[test]
fn metadata_title_flows_into_core_properties() {
    let mut pdf_doc = Document::with_version("1.5");
    let pages_id = pdf_doc.new_object_id();
    let font_id = pdf_doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = pdf_doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Real(12.0)]),
            Operation::new("Td", vec![Object::Real(50.0), Object::Real(700.0)]),
            Operation::new("Tj", vec![Object::string_literal(BODY)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id =
        pdf_doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = pdf_doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    pdf_doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = pdf_doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf_doc.add_object(dictionary! {
        "Title" => Object::string_literal("Annual Report"),
        "Author" => Object::string_literal("Jordan Example"),
        "CreationDate" => Object::string_literal("D:20240115103045"),
    });
    pdf_doc.trailer.set("Root", catalog_id);
    pdf_doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    pdf_doc.save_to(&mut buffer).unwrap();

    let docx = convert(&buffer).unwrap();
    let core = read_part(&docx, "docProps/core.xml");
    assert!(core.contains("<dc:title>Annual Report</dc:title>"));
    assert!(core.contains("<dc:creator>Jordan Example</dc:creator>"));
    assert!(core.contains("2024-01-15"));
}

#[test]
fn special_characters_are_escaped_in_output() {
    let pdf = build_pdf(&[vec![Line::new(
        "Profits & losses for <Q1> were \"mixed\"; see the long discussion that follows in this report.",
        50.0,
        700.0,
        12.0,
    )]]);

    let docx = convert(&pdf).unwrap();
    let body = read_part(&docx, "word/document.xml");
    assert!(body.contains("Profits &amp; losses"));
    assert!(body.contains("&lt;Q1&gt;"));
    assert!(body.contains("&quot;mixed&quot;"));
}

#[test]
fn academic_keywords_set_document_type() {
    let pdf = build_pdf(&[vec![
        Line::bold("Abstract", 50.0, 720.0, 16.0),
        Line::new(BODY, 50.0, 650.0, 12.0),
        Line::bold("Introduction", 50.0, 580.0, 16.0),
        Line::new(BODY, 50.0, 510.0, 12.0),
        Line::bold("Methodology", 50.0, 440.0, 16.0),
        Line::new(BODY, 50.0, 370.0, 12.0),
    ]]);

    let analyzed = Docweave::new().analyze(&pdf).unwrap();
    assert_eq!(analyzed.document_type, DocumentType::Academic);
}

#[test]
fn output_is_a_well_formed_archive() {
    let pdf = scenario_pdf();
    let docx = convert(&pdf).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    assert!(archive.len() >= 9);
    // Every part must decompress cleanly.
    for i in 0..archive.len() {
        let mut part = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        part.read_to_end(&mut content).unwrap();
        assert!(!content.is_empty());
    }
}
