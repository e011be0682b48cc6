//! Styles and numbering part generation.

use crate::model::{
    Alignment, NumberingDefinition, StyleCatalog, StyleDefinition, StyleKind,
};

use super::xml::{escape_xml, style_id, WML_NS, XML_HEADER};

/// Render `word/styles.xml`, preserving basedOn inheritance chains.
pub fn styles_xml(catalog: &StyleCatalog) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str("<w:styles xmlns:w=\"");
    xml.push_str(WML_NS);
    xml.push_str("\">");

    push_doc_defaults(&mut xml);

    for def in catalog.iter() {
        push_style(&mut xml, def);
    }

    xml.push_str("</w:styles>");
    xml
}

fn push_doc_defaults(xml: &mut String) {
    xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
    xml.push_str(
        "<w:rFonts w:ascii=\"Times New Roman\" w:eastAsia=\"Times New Roman\" \
         w:hAnsi=\"Times New Roman\" w:cs=\"Times New Roman\"/>",
    );
    xml.push_str("<w:sz w:val=\"24\"/><w:szCs w:val=\"24\"/>");
    xml.push_str("<w:lang w:val=\"en-US\" w:eastAsia=\"en-US\" w:bidi=\"ar-SA\"/>");
    xml.push_str("</w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>");
}

fn push_style(xml: &mut String, def: &StyleDefinition) {
    xml.push_str("<w:style w:type=\"");
    xml.push_str(def.kind.wml_value());
    xml.push_str("\" w:styleId=\"");
    xml.push_str(&escape_xml(&style_id(&def.name)));
    xml.push_str("\"><w:name w:val=\"");
    xml.push_str(&escape_xml(&def.name));
    xml.push_str("\"/>");

    if let Some(parent) = &def.based_on {
        xml.push_str("<w:basedOn w:val=\"");
        xml.push_str(&escape_xml(&style_id(parent)));
        xml.push_str("\"/>");
    }

    if def.kind == StyleKind::Table {
        xml.push_str("<w:tblPr><w:tblBorders>");
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            xml.push_str("<w:");
            xml.push_str(edge);
            xml.push_str(" w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>");
        }
        xml.push_str("</w:tblBorders>");
        xml.push_str(
            "<w:tblCellMar>\
             <w:top w:w=\"0\" w:type=\"dxa\"/><w:left w:w=\"108\" w:type=\"dxa\"/>\
             <w:bottom w:w=\"0\" w:type=\"dxa\"/><w:right w:w=\"108\" w:type=\"dxa\"/>\
             </w:tblCellMar></w:tblPr>",
        );
    } else {
        push_style_paragraph_properties(xml, def);
    }

    push_style_run_properties(xml, def);

    xml.push_str("</w:style>");
}

fn push_style_paragraph_properties(xml: &mut String, def: &StyleDefinition) {
    let p = &def.paragraph;
    let has_props = p.alignment != Alignment::Left
        || p.space_before > 0
        || p.space_after > 0
        || p.indent_left > 0
        || p.keep_next
        || p.page_break_before;
    if !has_props {
        return;
    }

    xml.push_str("<w:pPr>");
    if p.keep_next {
        xml.push_str("<w:keepNext/>");
    }
    if p.page_break_before {
        xml.push_str("<w:pageBreakBefore/>");
    }
    if p.space_before > 0 || p.space_after > 0 {
        xml.push_str("<w:spacing");
        if p.space_before > 0 {
            xml.push_str(" w:before=\"");
            xml.push_str(&p.space_before.to_string());
            xml.push('"');
        }
        if p.space_after > 0 {
            xml.push_str(" w:after=\"");
            xml.push_str(&p.space_after.to_string());
            xml.push('"');
        }
        xml.push_str("/>");
    }
    if p.indent_left > 0 {
        xml.push_str("<w:ind w:left=\"");
        xml.push_str(&p.indent_left.to_string());
        xml.push_str("\"/>");
    }
    if p.alignment != Alignment::Left {
        xml.push_str("<w:jc w:val=\"");
        xml.push_str(p.alignment.wml_value());
        xml.push_str("\"/>");
    }
    xml.push_str("</w:pPr>");
}

fn push_style_run_properties(xml: &mut String, def: &StyleDefinition) {
    let f = &def.font;
    xml.push_str("<w:rPr>");

    let family = escape_xml(&f.family);
    xml.push_str("<w:rFonts w:ascii=\"");
    xml.push_str(&family);
    xml.push_str("\" w:hAnsi=\"");
    xml.push_str(&family);
    xml.push_str("\"/>");

    if f.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    if f.italic {
        xml.push_str("<w:i/><w:iCs/>");
    }
    if f.strike {
        xml.push_str("<w:strike/>");
    }
    if f.color != "000000" {
        xml.push_str("<w:color w:val=\"");
        xml.push_str(&escape_xml(&f.color));
        xml.push_str("\"/>");
    }

    let half_points = (f.size * 2.0).round() as u32;
    xml.push_str("<w:sz w:val=\"");
    xml.push_str(&half_points.to_string());
    xml.push_str("\"/><w:szCs w:val=\"");
    xml.push_str(&half_points.to_string());
    xml.push_str("\"/>");

    if f.underline {
        xml.push_str("<w:u w:val=\"single\"/>");
    }

    xml.push_str("</w:rPr>");
}

/// Render `word/numbering.xml`: all abstract definitions first, then the
/// instances that reference them.
pub fn numbering_xml(definitions: &[NumberingDefinition]) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str("<w:numbering xmlns:w=\"");
    xml.push_str(WML_NS);
    xml.push_str("\">");

    for def in definitions {
        xml.push_str("<w:abstractNum w:abstractNumId=\"");
        xml.push_str(&def.abstract_id.to_string());
        xml.push_str("\">");
        for level in &def.levels {
            xml.push_str("<w:lvl w:ilvl=\"");
            xml.push_str(&level.level.to_string());
            xml.push_str("\"><w:start w:val=\"1\"/><w:numFmt w:val=\"");
            xml.push_str(level.format.wml_value());
            xml.push_str("\"/><w:lvlText w:val=\"");
            xml.push_str(&escape_xml(&level.marker_text));
            xml.push_str("\"/><w:lvlJc w:val=\"left\"/><w:pPr><w:ind w:left=\"");
            xml.push_str(&level.indent_left.to_string());
            xml.push_str("\" w:hanging=\"");
            xml.push_str(&level.indent_hanging.to_string());
            xml.push_str("\"/></w:pPr><w:rPr><w:rFonts w:ascii=\"");
            xml.push_str(&escape_xml(&level.font_family));
            xml.push_str("\" w:hAnsi=\"");
            xml.push_str(&escape_xml(&level.font_family));
            xml.push_str("\"/><w:sz w:val=\"");
            xml.push_str(&level.font_half_size.to_string());
            xml.push_str("\"/></w:rPr></w:lvl>");
        }
        xml.push_str("</w:abstractNum>");
    }

    for def in definitions {
        xml.push_str("<w:num w:numId=\"");
        xml.push_str(&def.numbering_id.to_string());
        xml.push_str("\"><w:abstractNumId w:val=\"");
        xml.push_str(&def.abstract_id.to_string());
        xml.push_str("\"/></w:num>");
    }

    xml.push_str("</w:numbering>");
    xml
}
