//! PDF document parser built on lopdf.

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use rayon::prelude::*;

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{SourceDocument, SourceMetadata, SourcePage};

use super::content::extract_page_elements;
use super::options::{ErrorMode, ParseOptions};

/// PDF document parser.
///
/// Validates the format signature before structural decode, rejects
/// encrypted documents, and degrades unreadable pages to empty placeholder
/// pages in lenient mode.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfParser {
    /// Parse a PDF from bytes with default options.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        // Signature check is fatal and happens before any structural decode.
        detect_format_from_bytes(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => {
                Error::Unsupported("document is encrypted".to_string())
            }
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            return Err(Error::Unsupported("document is encrypted".to_string()));
        }

        Ok(Self { doc, options })
    }

    /// Parse the document into a `SourceDocument`.
    pub fn parse(&self) -> Result<SourceDocument> {
        let mut document = SourceDocument::new();

        document.metadata = self.extract_metadata()?;

        let page_ids: Vec<(u32, ObjectId)> = self
            .doc
            .get_pages()
            .iter()
            .map(|(num, id)| (*num, *id))
            .collect();
        document.metadata.page_count = page_ids.len() as u32;

        let pages: Result<Vec<SourcePage>> = if self.options.parallel {
            page_ids
                .par_iter()
                .map(|(num, id)| self.parse_page(*num, *id))
                .collect()
        } else {
            page_ids
                .iter()
                .map(|(num, id)| self.parse_page(*num, *id))
                .collect()
        };
        document.pages = pages?;

        Ok(document)
    }

    /// Parse a single page; in lenient mode failures yield a placeholder.
    fn parse_page(&self, page_num: u32, page_id: ObjectId) -> Result<SourcePage> {
        let (width, height) = self.page_dimensions(page_id);
        let mut page = SourcePage::new(page_num, width, height);
        page.images = self.page_image_names(page_id);

        match extract_page_elements(&self.doc, page_id) {
            Ok(elements) => {
                page.elements = elements;
            }
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                // Placeholder page; the analyzer records the extraction note.
                log::warn!("failed to extract text from page {page_num}: {e}");
            }
        }

        Ok(page)
    }

    /// Extract document metadata from the Info dictionary.
    fn extract_metadata(&self) -> Result<SourceMetadata> {
        let mut metadata = SourceMetadata::with_version(self.doc.version.to_string());

        if let Ok(info) = self.doc.trailer.get(b"Info") {
            if let Ok(info_ref) = info.as_reference() {
                if let Ok(info_dict) = self.doc.get_dictionary(info_ref) {
                    metadata.title = get_string_from_dict(info_dict, b"Title");
                    metadata.author = get_string_from_dict(info_dict, b"Author");
                    metadata.subject = get_string_from_dict(info_dict, b"Subject");
                    metadata.keywords = get_string_from_dict(info_dict, b"Keywords");
                    metadata.creator = get_string_from_dict(info_dict, b"Creator");
                    metadata.producer = get_string_from_dict(info_dict, b"Producer");

                    if let Some(date_str) = get_string_from_dict(info_dict, b"CreationDate") {
                        metadata.created = parse_pdf_date(&date_str);
                    }
                    if let Some(date_str) = get_string_from_dict(info_dict, b"ModDate") {
                        metadata.modified = parse_pdf_date(&date_str);
                    }
                }
            }
        }

        metadata.encrypted = self.doc.is_encrypted();

        Ok(metadata)
    }

    /// Page dimensions from the MediaBox, defaulting to US Letter.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        let width = array[2].as_float().unwrap_or(612.0);
                        let height = array[3].as_float().unwrap_or(792.0);
                        return (width, height);
                    }
                }
            }
        }
        (612.0, 792.0)
    }

    /// Names of image XObjects in the page resources. Only the references
    /// are kept; image data is never extracted.
    fn page_image_names(&self, page_id: ObjectId) -> Vec<String> {
        let mut names = Vec::new();

        let Ok(page_dict) = self.doc.get_dictionary(page_id) else {
            return names;
        };
        let Ok(res) = page_dict.get(b"Resources") else {
            return names;
        };
        let res_dict = match res {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        };
        let Some(res_dict) = res_dict else {
            return names;
        };
        let Ok(xobjects) = res_dict.get(b"XObject") else {
            return names;
        };
        let xobj_dict = match xobjects {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        };
        let Some(xobj_dict) = xobj_dict else {
            return names;
        };

        for (name, obj) in xobj_dict.iter() {
            let is_image = obj
                .as_reference()
                .ok()
                .and_then(|r| self.doc.get_object(r).ok())
                .and_then(|o| match o {
                    Object::Stream(s) => s
                        .dict
                        .get(b"Subtype")
                        .ok()
                        .and_then(|st| st.as_name_str().ok())
                        .map(|st| st == "Image"),
                    _ => None,
                })
                .unwrap_or(false);
            if is_image {
                names.push(String::from_utf8_lossy(name).to_string());
            }
        }

        names
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }
}

/// Helper to get a text string from a PDF dictionary.
fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        lopdf::Object::String(bytes, _) => {
            // UTF-16BE with BOM is the PDF convention for Unicode strings
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks(2)
                    .filter_map(|c| {
                        if c.len() == 2 {
                            Some(u16::from_be_bytes([c[0], c[1]]))
                        } else {
                            None
                        }
                    })
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                String::from_utf8(bytes.clone())
                    .ok()
                    .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
            }
        }
        lopdf::Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:")?;

    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_pdf_date() {
        let date = parse_pdf_date("D:20240115103045").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_pdf_date_minimal() {
        let date = parse_pdf_date("D:2024").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn test_parse_pdf_date_invalid() {
        assert!(parse_pdf_date("20240115").is_none());
        assert!(parse_pdf_date("D:20").is_none());
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        let result = PdfParser::from_bytes(b"plain text, definitely not a PDF");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_from_bytes_rejects_truncated_signature() {
        let result = PdfParser::from_bytes(b"%PDF");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
