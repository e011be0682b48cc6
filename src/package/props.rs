//! Fixed parts: content types, relationships, settings, core/app metadata.

use crate::model::DocProperties;

use super::xml::{escape_xml, XML_HEADER};

/// `[Content_Types].xml`
pub fn content_types_xml() -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
         <Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
         <Override PartName=\"/word/numbering.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml\"/>\
         <Override PartName=\"/word/settings.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml\"/>\
         <Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
         <Override PartName=\"/docProps/app.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.extended-properties+xml\"/>\
         </Types>",
    );
    xml
}

/// `_rels/.rels`
pub fn root_rels_xml() -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
         <Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties\" Target=\"docProps/app.xml\"/>\
         </Relationships>",
    );
    xml
}

/// `word/_rels/document.xml.rels`
pub fn document_rels_xml() -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering\" Target=\"numbering.xml\"/>\
         <Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings\" Target=\"settings.xml\"/>\
         </Relationships>",
    );
    xml
}

/// `word/settings.xml`
pub fn settings_xml() -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str("<w:settings xmlns:w=\"");
    xml.push_str(super::xml::WML_NS);
    xml.push_str("\">");
    xml.push_str("<w:defaultTabStop w:val=\"708\"/>");
    xml.push_str("<w:characterSpacingControl w:val=\"doNotCompress\"/>");
    xml.push_str(
        "<w:compat><w:compatSetting w:name=\"compatibilityMode\" \
         w:uri=\"http://schemas.microsoft.com/office/word\" w:val=\"15\"/></w:compat>",
    );
    xml.push_str("</w:settings>");
    xml
}

/// `docProps/core.xml`
pub fn core_xml(props: &DocProperties) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(
        "<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
    );

    if !props.title.is_empty() {
        xml.push_str("<dc:title>");
        xml.push_str(&escape_xml(&props.title));
        xml.push_str("</dc:title>");
    }
    if !props.author.is_empty() {
        xml.push_str("<dc:creator>");
        xml.push_str(&escape_xml(&props.author));
        xml.push_str("</dc:creator>");
    }
    if !props.subject.is_empty() {
        xml.push_str("<dc:subject>");
        xml.push_str(&escape_xml(&props.subject));
        xml.push_str("</dc:subject>");
    }
    if !props.keywords.is_empty() {
        xml.push_str("<cp:keywords>");
        xml.push_str(&escape_xml(&props.keywords));
        xml.push_str("</cp:keywords>");
    }
    if let Some(created) = &props.created {
        xml.push_str("<dcterms:created xsi:type=\"dcterms:W3CDTF\">");
        xml.push_str(&escape_xml(created));
        xml.push_str("</dcterms:created>");
    }
    if let Some(modified) = &props.modified {
        xml.push_str("<dcterms:modified xsi:type=\"dcterms:W3CDTF\">");
        xml.push_str(&escape_xml(modified));
        xml.push_str("</dcterms:modified>");
    }

    xml.push_str("</cp:coreProperties>");
    xml
}

/// `docProps/app.xml`
pub fn app_xml(props: &DocProperties) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(
        "<Properties \
         xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\" \
         xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">",
    );
    xml.push_str("<Application>");
    xml.push_str(&escape_xml(&props.application));
    xml.push_str("</Application>");
    xml.push_str("<DocSecurity>0</DocSecurity>");
    xml.push_str("<ScaleCrop>false</ScaleCrop>");
    xml.push_str("<SharedDoc>false</SharedDoc>");
    xml.push_str("<HyperlinksChanged>false</HyperlinksChanged>");
    xml.push_str("<AppVersion>1.0000</AppVersion>");
    xml.push_str("</Properties>");
    xml
}
