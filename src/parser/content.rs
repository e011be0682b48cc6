//! Content-stream interpretation: positioned text extraction.
//!
//! Walks a page's decoded content stream, tracking the text matrix, the
//! current font, and the fill color, and emits one `TextElement` per shown
//! string. Only the text-positioning subset of the operator set is
//! interpreted; graphics operators other than fill-color changes are
//! ignored.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::TextElement;

/// Resolved font information for a page resource name.
#[derive(Debug, Clone)]
struct FontInfo {
    name: String,
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; a TL operator would refine this.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Extract positioned text elements from one page.
pub fn extract_page_elements(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextElement>> {
    let lopdf_fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::Parse(e.to_string()))?;

    let mut fonts = HashMap::new();
    for (name, font) in &lopdf_fonts {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        fonts.insert(name.clone(), FontInfo { name: base_font });
    }

    let content = get_page_content(doc, page_id)?;
    walk_content_stream(doc, &content, &fonts, &lopdf_fonts)
}

/// Concatenated, decompressed content stream bytes of a page.
fn get_page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::Parse(e.to_string()))?;

    let contents = page_dict
        .get(b"Contents")
        .map_err(|e| Error::Parse(e.to_string()))?;

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return s
                    .decompressed_content()
                    .map_err(|e| Error::Parse(e.to_string()));
            }
            Err(Error::Parse("invalid content stream".to_string()))
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.decompressed_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::Parse("invalid content stream".to_string())),
    }
}

fn walk_content_stream(
    doc: &LopdfDocument,
    content: &[u8],
    fonts: &HashMap<Vec<u8>, FontInfo>,
    lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
) -> Result<Vec<TextElement>> {
    let content =
        lopdf::content::Content::decode(content).map_err(|e| Error::Parse(e.to_string()))?;

    let mut elements = Vec::new();
    let mut current_font = String::new();
    let mut current_font_name: Vec<u8> = Vec::new();
    let mut current_font_size: f32 = 12.0;
    let mut current_color = "#000000".to_string();
    let mut text_matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                text_matrix = TextMatrix::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(font_name) = &op.operands[0] {
                        current_font_name = font_name.clone();
                        if let Some(info) = fonts.get(font_name.as_slice()) {
                            current_font = info.name.clone();
                        } else {
                            current_font =
                                String::from_utf8_lossy(font_name.as_slice()).to_string();
                        }
                    }
                    current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    text_matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    text_matrix.set(
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                text_matrix.next_line();
            }
            "rg" => {
                if op.operands.len() >= 3 {
                    let r = get_number(&op.operands[0]).unwrap_or(0.0);
                    let g = get_number(&op.operands[1]).unwrap_or(0.0);
                    let b = get_number(&op.operands[2]).unwrap_or(0.0);
                    current_color = rgb_to_hex(r, g, b);
                }
            }
            "g" => {
                if let Some(v) = op.operands.first().and_then(get_number_ref) {
                    current_color = rgb_to_hex(v, v, v);
                }
            }
            "k" => {
                if op.operands.len() >= 4 {
                    let c = get_number(&op.operands[0]).unwrap_or(0.0);
                    let m = get_number(&op.operands[1]).unwrap_or(0.0);
                    let y = get_number(&op.operands[2]).unwrap_or(0.0);
                    let k = get_number(&op.operands[3]).unwrap_or(0.0);
                    current_color = rgb_to_hex(
                        (1.0 - c) * (1.0 - k),
                        (1.0 - m) * (1.0 - k),
                        (1.0 - y) * (1.0 - k),
                    );
                }
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    let encoding = lopdf_fonts
                        .get(&current_font_name)
                        .and_then(|f| f.get_font_encoding(doc).ok());
                    let decode = |bytes: &[u8]| match &encoding {
                        Some(enc) => LopdfDocument::decode_text(enc, bytes)
                            .unwrap_or_else(|_| decode_text_simple(bytes)),
                        None => decode_text_simple(bytes),
                    };

                    let text = if op.operator == "TJ" {
                        // TJ carries strings interleaved with kerning
                        // adjustments in 1/1000 text-space units. Large
                        // negative adjustments stand in for word spaces.
                        if let Some(Object::Array(arr)) = op.operands.first() {
                            let mut combined = String::new();
                            for item in arr {
                                match item {
                                    Object::String(bytes, _) => {
                                        combined.push_str(&decode(bytes));
                                    }
                                    Object::Integer(n) => {
                                        push_kerning_space(
                                            &mut combined,
                                            -(*n as f32),
                                            SPACE_THRESHOLD,
                                        );
                                    }
                                    Object::Real(n) => {
                                        push_kerning_space(&mut combined, -n, SPACE_THRESHOLD);
                                    }
                                    _ => {}
                                }
                            }
                            combined
                        } else {
                            String::new()
                        }
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        decode(bytes)
                    } else {
                        String::new()
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = text_matrix.position();
                        let effective_size = current_font_size * text_matrix.scale();
                        elements.push(make_element(
                            text,
                            x,
                            y,
                            effective_size,
                            current_font.clone(),
                            current_color.clone(),
                        ));
                    }
                }
            }
            "'" | "\"" => {
                text_matrix.next_line();
                if in_text_block {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = lopdf_fonts
                            .get(&current_font_name)
                            .and_then(|f| f.get_font_encoding(doc).ok());
                        let text = match &encoding {
                            Some(enc) => LopdfDocument::decode_text(enc, bytes)
                                .unwrap_or_else(|_| decode_text_simple(bytes)),
                            None => decode_text_simple(bytes),
                        };

                        if !text.trim().is_empty() {
                            let (x, y) = text_matrix.position();
                            let effective_size = current_font_size * text_matrix.scale();
                            elements.push(make_element(
                                text,
                                x,
                                y,
                                effective_size,
                                current_font.clone(),
                                current_color.clone(),
                            ));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(elements)
}

fn make_element(
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
    font_name: String,
    color: String,
) -> TextElement {
    let normalized: String = text.nfc().collect();
    let mut element = TextElement::new(normalized, x, y, font_size, font_name);
    element.color = color;
    element
}

/// 200/1000 em adjustment works as a word-space threshold for most fonts.
const SPACE_THRESHOLD: f32 = 200.0;

fn push_kerning_space(combined: &mut String, adjustment: f32, threshold: f32) {
    if adjustment > threshold
        && !combined.is_empty()
        && !combined.ends_with(' ')
        && !combined.ends_with('\u{00A0}')
    {
        if let Some(c) = combined.chars().last() {
            if !is_spaceless_script_char(c) {
                combined.push(' ');
            }
        }
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn get_number_ref(obj: &Object) -> Option<f32> {
    get_number(obj)
}

fn rgb_to_hex(r: f32, g: f32, b: f32) -> String {
    let clamp = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", clamp(r), clamp(g), clamp(b))
}

/// Check if a character is from a script that does not use word spaces
/// (Chinese/Japanese; Korean uses spaces like English).
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extension A
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        // Hiragana and Katakana
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        // CJK symbols and punctuation
        || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
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
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}
