//! XML text helpers for part generation.

/// XML declaration shared by every part.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// WordprocessingML main namespace.
pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Relationships namespace.
pub const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Escape the five reserved markup characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether a run text needs `xml:space="preserve"`: leading or trailing
/// whitespace, or a doubled internal space.
pub fn needs_space_preserve(text: &str) -> bool {
    text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.contains("  ")
}

/// Style id for a style name: the name with spaces removed. Stable across
/// runs, shared by the body and styles parts.
pub fn style_id(name: &str) -> String {
    name.replace(' ', "")
}

/// Append a `<w:t>` element, preserving significant whitespace.
pub fn push_text_element(xml: &mut String, text: &str) {
    if needs_space_preserve(text) {
        xml.push_str("<w:t xml:space=\"preserve\">");
    } else {
        xml.push_str("<w:t>");
    }
    xml.push_str(&escape_xml(text));
    xml.push_str("</w:t>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_five() {
        assert_eq!(
            escape_xml("a & b < c > d \" e ' f"),
            "a &amp; b &lt; c &gt; d &quot; e &apos; f"
        );
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_space_preserve_rules() {
        assert!(needs_space_preserve(" leading"));
        assert!(needs_space_preserve("trailing "));
        assert!(needs_space_preserve("double  internal"));
        assert!(!needs_space_preserve("normal text"));
    }

    #[test]
    fn test_style_ids() {
        assert_eq!(style_id("Heading 1"), "Heading1");
        assert_eq!(style_id("List Paragraph"), "ListParagraph");
        assert_eq!(style_id("Normal"), "Normal");
    }

    #[test]
    fn test_text_element_preserve() {
        let mut xml = String::new();
        push_text_element(&mut xml, " padded ");
        assert_eq!(xml, "<w:t xml:space=\"preserve\"> padded </w:t>");

        let mut xml = String::new();
        push_text_element(&mut xml, "tight");
        assert_eq!(xml, "<w:t>tight</w:t>");
    }
}
