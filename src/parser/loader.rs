//! PDF loader built on lopdf.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use lopdf::content::Operation;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use rayon::prelude::*;

use crate::detect::{detect_format_from_bytes, PdfFormat};
use crate::error::{Error, Result};
use crate::model::{Bookmark, Document, DocumentInfo, Page};

use super::content::{decode_operations, decode_text_simple, SpanExtractor};
use super::options::{ErrorMode, OutlineOptions};

/// Outline trees nested deeper than this are cut off.
const MAX_OUTLINE_DEPTH: u32 = 64;

/// Name trees nested deeper than this are not searched.
const MAX_NAME_TREE_DEPTH: u32 = 32;

/// Parent hops followed when looking up an inherited page attribute.
const MAX_INHERIT_DEPTH: usize = 32;

const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Loads PDF bytes into a [`Document`].
pub struct PdfLoader {
    doc: LopdfDocument,
    format: PdfFormat,
    options: OutlineOptions,
}

impl PdfLoader {
    /// Parse PDF bytes with default options.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, OutlineOptions::default())
    }

    /// Parse PDF bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: OutlineOptions) -> Result<Self> {
        options.validate()?;

        let format = detect_format_from_bytes(data)?;
        if format.truncated {
            log::warn!("PDF has no %%EOF marker near the end, it may be truncated");
        }

        let doc = LopdfDocument::load_mem(data)?;

        if doc.catalog().is_err() {
            return Err(Error::CorruptDocument(
                "document catalog is missing".to_string(),
            ));
        }

        Ok(Self {
            doc,
            format,
            options,
        })
    }

    /// Build the page-addressable document.
    pub fn load(&self) -> Result<Document> {
        let page_ids: Vec<ObjectId> = self.doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let mut document = Document::new();
        document.pdf_version = self.format.version.clone();
        document.info = self.extract_info();
        document.pages = self.load_pages(&page_ids)?;
        document.bookmarks = self.extract_bookmarks(&page_ids);

        log::debug!(
            "Loaded PDF {}: {} pages, {} spans, {} bookmarks",
            document.pdf_version,
            document.page_count(),
            document.span_count(),
            document.bookmarks.len()
        );

        Ok(document)
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Get the PDF version from the header.
    pub fn version(&self) -> &str {
        &self.format.version
    }

    fn load_pages(&self, page_ids: &[ObjectId]) -> Result<Vec<Page>> {
        let extractor = SpanExtractor::new(&self.doc);

        // Reading streams needs the document; parsing them does not.
        let contents: Vec<Result<Vec<u8>>> = page_ids
            .iter()
            .enumerate()
            .map(|(index, &page_id)| {
                if self.is_selected(index) {
                    extractor.get_page_content(page_id)
                } else {
                    Ok(Vec::new())
                }
            })
            .collect();

        let decode = |(index, content): (usize, Result<Vec<u8>>)| {
            content.and_then(|data| decode_operations(index, &data))
        };
        let operations: Vec<Result<Vec<Operation>>> = if self.options.parallel {
            contents.into_par_iter().enumerate().map(decode).collect()
        } else {
            contents.into_iter().enumerate().map(decode).collect()
        };

        let mut pages = Vec::with_capacity(page_ids.len());
        for (index, (&page_id, ops)) in page_ids.iter().zip(operations).enumerate() {
            let (width, height) = self.page_size(page_id);
            let mut page = Page::new(index, width, height);

            match ops.and_then(|ops| extractor.spans_from_operations(index, page_id, ops)) {
                Ok(spans) => page.text_spans = spans,
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to extract text from page {}: {}", index + 1, e);
                }
            }

            pages.push(page);
        }

        Ok(pages)
    }

    fn is_selected(&self, index: usize) -> bool {
        u32::try_from(index + 1)
            .map(|n| self.options.pages.includes(n))
            .unwrap_or(false)
    }

    /// Page size from the (possibly inherited) MediaBox.
    fn page_size(&self, page_id: ObjectId) -> (f32, f32) {
        let media_box = self
            .inherited_attribute(page_id, b"MediaBox")
            .and_then(|obj| obj.as_array().ok());

        if let Some(array) = media_box {
            if array.len() >= 4 {
                let coords: Vec<f32> = array.iter().filter_map(|o| o.as_float().ok()).collect();
                if coords.len() >= 4 {
                    let width = (coords[2] - coords[0]).abs();
                    let height = (coords[3] - coords[1]).abs();
                    if width > 0.0 && height > 0.0 {
                        return (width, height);
                    }
                }
            }
        }

        DEFAULT_PAGE_SIZE
    }

    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut dict = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_INHERIT_DEPTH {
            if let Ok(value) = dict.get(key) {
                return self.resolve(value);
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    /// Extract the Info dictionary fields.
    fn extract_info(&self) -> DocumentInfo {
        let mut info = DocumentInfo::default();

        let dict = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_dict().ok());

        if let Some(dict) = dict {
            info.title = get_string_from_dict(dict, b"Title").filter(|s| !s.trim().is_empty());
            info.author = get_string_from_dict(dict, b"Author");
            info.subject = get_string_from_dict(dict, b"Subject");
            if let Some(date_str) = get_string_from_dict(dict, b"CreationDate") {
                info.created = parse_pdf_date(&date_str);
            }
        }

        info
    }

    /// Walk the outline tree in pre-order.
    fn extract_bookmarks(&self, page_ids: &[ObjectId]) -> Vec<Bookmark> {
        let mut bookmarks = Vec::new();

        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_dict().ok())
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|obj| obj.as_reference().ok());

        if let Some(first) = first {
            let page_numbers: HashMap<ObjectId, usize> = page_ids
                .iter()
                .enumerate()
                .map(|(index, &id)| (id, index))
                .collect();
            let mut visited = HashSet::new();
            self.walk_outline(first, 0, &page_numbers, &mut visited, &mut bookmarks);
        }

        bookmarks
    }

    fn walk_outline(
        &self,
        item_ref: ObjectId,
        depth: u32,
        page_numbers: &HashMap<ObjectId, usize>,
        visited: &mut HashSet<ObjectId>,
        bookmarks: &mut Vec<Bookmark>,
    ) {
        if depth >= MAX_OUTLINE_DEPTH {
            log::warn!("Outline nested deeper than {} levels, truncating", MAX_OUTLINE_DEPTH);
            return;
        }

        let mut current = Some(item_ref);
        while let Some(id) = current {
            if !visited.insert(id) {
                log::warn!("Outline item {:?} visited twice, stopping traversal", id);
                break;
            }

            let item = match self.doc.get_dictionary(id) {
                Ok(item) => item,
                Err(_) => break,
            };

            let title = item
                .get(b"Title")
                .ok()
                .and_then(|obj| self.resolve(obj))
                .and_then(object_to_string)
                .unwrap_or_default();
            let target = self.outline_destination(item, page_numbers);
            bookmarks.push(Bookmark::new(title, depth, target));

            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                self.walk_outline(child, depth + 1, page_numbers, visited, bookmarks);
            }

            current = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    /// Destination page of an outline item, from /Dest or a GoTo action.
    fn outline_destination(
        &self,
        item: &Dictionary,
        page_numbers: &HashMap<ObjectId, usize>,
    ) -> Option<usize> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest, page_numbers);
        }

        let action = item
            .get(b"A")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_dict().ok())?;

        let is_goto = action
            .get(b"S")
            .and_then(Object::as_name)
            .map(|name| name == b"GoTo")
            .unwrap_or(false);
        if !is_goto {
            return None;
        }

        self.resolve_destination(action.get(b"D").ok()?, page_numbers)
    }

    /// Resolve an explicit or named destination to a 0-based page index.
    fn resolve_destination(
        &self,
        dest: &Object,
        page_numbers: &HashMap<ObjectId, usize>,
    ) -> Option<usize> {
        match self.resolve(dest)? {
            Object::Array(array) => match array.first()? {
                Object::Reference(page_ref) => page_numbers.get(page_ref).copied(),
                // Some producers write a page index instead of a reference.
                Object::Integer(n) => usize::try_from(*n).ok(),
                _ => None,
            },
            Object::Dictionary(_) => self.resolve_explicit(dest, page_numbers),
            Object::String(bytes, _) => {
                let target = self.lookup_named_destination(bytes)?;
                self.resolve_explicit(target, page_numbers)
            }
            Object::Name(name) => {
                let target = self.lookup_named_destination(name)?;
                self.resolve_explicit(target, page_numbers)
            }
            _ => None,
        }
    }

    /// Resolve an array or `<< /D [...] >>` destination; names do not chain.
    fn resolve_explicit(
        &self,
        target: &Object,
        page_numbers: &HashMap<ObjectId, usize>,
    ) -> Option<usize> {
        match self.resolve(target)? {
            Object::Array(_) => self.resolve_destination(target, page_numbers),
            Object::Dictionary(dict) => {
                let explicit = self.resolve(dict.get(b"D").ok()?)?;
                match explicit {
                    Object::Array(_) => self.resolve_destination(explicit, page_numbers),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Look a destination name up in the /Names tree, then the /Dests dictionary.
    fn lookup_named_destination(&self, name: &[u8]) -> Option<&Object> {
        let catalog = self.doc.catalog().ok()?;
        let key = decode_text_simple(name);

        let tree = catalog
            .get(b"Names")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_dict().ok())
            .and_then(|names| names.get(b"Dests").ok())
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_dict().ok());
        if let Some(found) = tree.and_then(|tree| self.lookup_name_tree(tree, &key, 0)) {
            return Some(found);
        }

        catalog
            .get(b"Dests")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_dict().ok())
            .and_then(|dests| dests.get(key.as_bytes()).ok())
    }

    fn lookup_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        key: &str,
        depth: u32,
    ) -> Option<&'a Object> {
        if depth >= MAX_NAME_TREE_DEPTH {
            return None;
        }

        if let Some(names) = node
            .get(b"Names")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_array().ok())
        {
            for pair in names.chunks_exact(2) {
                let matches = self
                    .resolve(&pair[0])
                    .and_then(object_to_string)
                    .map(|name| name == key)
                    .unwrap_or(false);
                if matches {
                    return Some(&pair[1]);
                }
            }
        }

        if let Some(kids) = node
            .get(b"Kids")
            .ok()
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_array().ok())
        {
            for kid in kids {
                let kid = match self.resolve(kid).and_then(|obj| obj.as_dict().ok()) {
                    Some(kid) => kid,
                    None => continue,
                };
                if let Some(found) = self.lookup_name_tree(kid, key, depth + 1) {
                    return Some(found);
                }
            }
        }

        None
    }

    /// Follow an indirect reference.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }
}

/// Load a document from PDF bytes with default options.
pub fn load(data: &[u8]) -> Result<Document> {
    PdfLoader::from_bytes(data)?.load()
}

/// Load a document from PDF bytes.
pub fn load_with_options(data: &[u8], options: &OutlineOptions) -> Result<Document> {
    PdfLoader::from_bytes_with_options(data, options.clone())?.load()
}

/// Read a PDF file and load it with default options.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let data = std::fs::read(path)?;
    load(&data)
}

fn object_to_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(object_to_string)
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    // At minimum we need YYYY
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
