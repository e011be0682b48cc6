//! Main body part generation: `word/document.xml`.

use crate::model::{
    Alignment, DocumentTree, DocxElement, DocxParagraph, DocxRun, DocxTable, SectionProperties,
};

use super::xml::{escape_xml, push_text_element, style_id, REL_NS, WML_NS, XML_HEADER};

/// Render the document body part.
pub fn document_xml(tree: &DocumentTree) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str("<w:document xmlns:w=\"");
    xml.push_str(WML_NS);
    xml.push_str("\" xmlns:r=\"");
    xml.push_str(REL_NS);
    xml.push_str("\"><w:body>");

    for element in &tree.body {
        match element {
            DocxElement::Paragraph(p) => push_paragraph(&mut xml, p),
            DocxElement::Table(t) => push_table(&mut xml, t),
        }
    }

    push_section_properties(&mut xml, &tree.section);

    xml.push_str("</w:body></w:document>");
    xml
}

fn push_paragraph(xml: &mut String, paragraph: &DocxParagraph) {
    xml.push_str("<w:p>");
    push_paragraph_properties(xml, paragraph);
    for run in &paragraph.runs {
        push_run(xml, run);
    }
    xml.push_str("</w:p>");
}

fn push_paragraph_properties(xml: &mut String, paragraph: &DocxParagraph) {
    let has_props = paragraph.style.is_some()
        || paragraph.numbering.is_some()
        || paragraph.alignment.is_some()
        || paragraph.page_break_before;
    if !has_props {
        return;
    }

    xml.push_str("<w:pPr>");

    if let Some(style) = &paragraph.style {
        xml.push_str("<w:pStyle w:val=\"");
        xml.push_str(&escape_xml(&style_id(style)));
        xml.push_str("\"/>");
    }

    if let Some((num_id, level)) = paragraph.numbering {
        xml.push_str("<w:numPr><w:ilvl w:val=\"");
        xml.push_str(&level.to_string());
        xml.push_str("\"/><w:numId w:val=\"");
        xml.push_str(&num_id.to_string());
        xml.push_str("\"/></w:numPr>");
    }

    if let Some(alignment) = paragraph.alignment {
        if alignment != Alignment::Left {
            xml.push_str("<w:jc w:val=\"");
            xml.push_str(alignment.wml_value());
            xml.push_str("\"/>");
        }
    }

    if paragraph.page_break_before {
        xml.push_str("<w:pageBreakBefore/>");
    }

    xml.push_str("</w:pPr>");
}

fn push_run(xml: &mut String, run: &DocxRun) {
    xml.push_str("<w:r>");
    push_run_properties(xml, run);
    push_text_element(xml, &run.text);
    xml.push_str("</w:r>");
}

fn push_run_properties(xml: &mut String, run: &DocxRun) {
    let has_props = run.bold
        || run.italic
        || run.underline
        || run.strike
        || run.font_size.is_some()
        || run.font_family.is_some()
        || run.color.is_some();
    if !has_props {
        return;
    }

    xml.push_str("<w:rPr>");

    if let Some(family) = &run.font_family {
        let family = escape_xml(family);
        xml.push_str("<w:rFonts w:ascii=\"");
        xml.push_str(&family);
        xml.push_str("\" w:hAnsi=\"");
        xml.push_str(&family);
        xml.push_str("\"/>");
    }
    if run.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    if run.italic {
        xml.push_str("<w:i/><w:iCs/>");
    }
    if run.strike {
        xml.push_str("<w:strike/>");
    }
    if let Some(color) = &run.color {
        xml.push_str("<w:color w:val=\"");
        xml.push_str(&escape_xml(color));
        xml.push_str("\"/>");
    }
    if let Some(size) = run.font_size {
        let half_points = (size * 2.0).round() as u32;
        xml.push_str("<w:sz w:val=\"");
        xml.push_str(&half_points.to_string());
        xml.push_str("\"/><w:szCs w:val=\"");
        xml.push_str(&half_points.to_string());
        xml.push_str("\"/>");
    }
    if run.underline {
        xml.push_str("<w:u w:val=\"single\"/>");
    }

    xml.push_str("</w:rPr>");
}

fn push_table(xml: &mut String, table: &DocxTable) {
    xml.push_str("<w:tbl><w:tblPr><w:tblStyle w:val=\"");
    xml.push_str(&escape_xml(&style_id(&table.style)));
    xml.push_str("\"/><w:tblW w:w=\"5000\" w:type=\"pct\"/>");
    xml.push_str("<w:tblBorders>");
    for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        xml.push_str("<w:");
        xml.push_str(edge);
        xml.push_str(" w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>");
    }
    xml.push_str("</w:tblBorders></w:tblPr>");

    for row in &table.rows {
        xml.push_str("<w:tr>");
        if row.is_header {
            xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
        }
        for cell in &row.cells {
            xml.push_str("<w:tc><w:tcPr><w:tcW w:w=\"0\" w:type=\"auto\"/></w:tcPr>");
            push_paragraph(xml, &cell.paragraph);
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
}

fn push_section_properties(xml: &mut String, section: &SectionProperties) {
    xml.push_str("<w:sectPr><w:pgSz w:w=\"");
    xml.push_str(&section.page_width.to_string());
    xml.push_str("\" w:h=\"");
    xml.push_str(&section.page_height.to_string());
    xml.push_str("\"/><w:pgMar w:top=\"");
    xml.push_str(&section.margin_top.to_string());
    xml.push_str("\" w:right=\"");
    xml.push_str(&section.margin_right.to_string());
    xml.push_str("\" w:bottom=\"");
    xml.push_str(&section.margin_bottom.to_string());
    xml.push_str("\" w:left=\"");
    xml.push_str(&section.margin_left.to_string());
    xml.push_str("\" w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>");
}
