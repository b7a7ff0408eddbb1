//! Text span extraction from page content streams.
//!
//! Walks the text-showing operators of a page and records every shown string
//! with its font size and an estimated bounding box, in content-stream order.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{estimated_width, BoundingBox, TextSpan};

/// TJ adjustments larger than this (thousandths of an em) become word spaces.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Extracts positioned text spans from the pages of a lopdf document.
pub(crate) struct SpanExtractor<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> SpanExtractor<'a> {
    pub(crate) fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Interpret the decoded operations of a page into spans, in content-stream order.
    pub(crate) fn spans_from_operations(
        &self,
        page_index: usize,
        page_id: ObjectId,
        operations: Vec<Operation>,
    ) -> Result<Vec<TextSpan>> {
        if operations.is_empty() {
            return Ok(Vec::new());
        }

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::CorruptDocument(format!("page {}: {}", page_index + 1, e)))?;

        Ok(self.collect_spans(page_index, operations, &fonts))
    }

    /// Get the decompressed page content, empty when the page has none.
    pub(crate) fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::CorruptDocument(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone())),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::CorruptDocument(
                    "page /Contents is not a stream".to_string(),
                )),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::CorruptDocument(
                "page /Contents is not a stream".to_string(),
            )),
        }
    }

    /// Concatenate the streams of a /Contents array, skipping broken parts.
    fn concat_streams(&self, arr: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in arr {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match s.decompressed_content() {
                        Ok(data) => content.extend_from_slice(&data),
                        Err(_) => content.extend_from_slice(&s.content),
                    }
                    content.push(b' ');
                }
            }
        }
        content
    }

    fn collect_spans(
        &self,
        page_index: usize,
        operations: Vec<Operation>,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    ) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut state = TextState::default();

        for op in operations {
            match op.operator.as_str() {
                "BT" => {
                    state.in_text_block = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => {
                    state.in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_key) = &op.operands[0] {
                            state.font_name = fonts
                                .get(font_key.as_slice())
                                .and_then(|f| f.get(b"BaseFont").ok())
                                .and_then(|o| o.as_name().ok())
                                .map(|n| String::from_utf8_lossy(n).to_string())
                                .unwrap_or_else(|| String::from_utf8_lossy(font_key).to_string());
                            state.font_key = font_key.clone();
                        }
                        state.font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        state.leading = Some(leading);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = Some(-ty);
                        }
                        state.matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        state.matrix.set(
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
                    let leading = state.effective_leading();
                    state.matrix.translate(0.0, -leading);
                }
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        let text = self.decode(fonts, &state.font_key, bytes);
                        self.push_span(&mut spans, &mut state, page_index, text);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(arr)) = op.operands.first() {
                        let text = self.decode_tj_array(fonts, &state.font_key, arr);
                        self.push_span(&mut spans, &mut state, page_index, text);
                    }
                }
                "'" | "\"" => {
                    let leading = state.effective_leading();
                    state.matrix.translate(0.0, -leading);
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = self.decode(fonts, &state.font_key, bytes);
                        self.push_span(&mut spans, &mut state, page_index, text);
                    }
                }
                _ => {}
            }
        }

        spans
    }

    /// Record a shown string and advance the text position past it.
    fn push_span(
        &self,
        spans: &mut Vec<TextSpan>,
        state: &mut TextState,
        page_index: usize,
        text: String,
    ) {
        if !state.in_text_block {
            return;
        }

        let char_count = text.chars().count();
        let effective_size = state.font_size * state.matrix.vertical_scale();

        if !text.trim().is_empty() {
            let (x, y) = state.matrix.position();
            let bbox = BoundingBox::from_baseline(x, y, effective_size, char_count);
            spans.push(
                TextSpan::new(text, effective_size, bbox, page_index)
                    .with_font(state.font_name.clone()),
            );
        }

        state
            .matrix
            .advance(estimated_width(state.font_size, char_count));
    }

    /// Decode a TJ array, turning large kerning gaps into spaces.
    fn decode_tj_array(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font_key: &[u8],
        arr: &[Object],
    ) -> String {
        let mut combined = String::new();

        for item in arr {
            match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode(fonts, font_key, bytes));
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -get_number(item).unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
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
                _ => {}
            }
        }

        combined
    }

    /// Decode string bytes with the font's encoding, falling back to a
    /// byte-level guess when the font or encoding is unavailable.
    fn decode(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font_key: &[u8],
        bytes: &[u8],
    ) -> String {
        let encoding = fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }
}

/// Parse raw content-stream bytes into operations.
///
/// Needs no access to the document, so pages can be decoded on worker threads.
pub(crate) fn decode_operations(page_index: usize, content: &[u8]) -> Result<Vec<Operation>> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Content::decode(content)
        .map(|c| c.operations)
        .map_err(|e| Error::CorruptDocument(format!("page {}: {}", page_index + 1, e)))
}

/// Graphics-independent text state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    matrix: TextMatrix,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: Option<f32>,
    in_text_block: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: None,
            in_text_block: false,
        }
    }
}

impl TextState {
    /// Leading set by TL/TD, else 1.2x the font size.
    fn effective_leading(&self) -> f32 {
        self.leading.unwrap_or(self.font_size * 1.2)
    }
}

/// Text matrix plus the line matrix it was derived from.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    line_e: f32,
    line_f: f32,
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
            line_e: 0.0,
            line_f: 0.0,
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
        self.line_e = e;
        self.line_f = f;
    }

    /// Move to the start of the next line, offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    /// Move along the baseline after showing text.
    fn advance(&mut self, width: f32) {
        self.e += width * self.a;
        self.f += width * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        let scale = (self.c * self.c + self.d * self.d).sqrt();
        if scale > 0.0 {
            scale
        } else {
            1.0
        }
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
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
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
