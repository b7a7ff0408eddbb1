//! Builders for small synthetic papers used by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// One line of text placed at an absolute baseline.
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub size: f32,
    pub y: f32,
    pub bold: bool,
}

impl Line {
    pub fn new(text: &str, size: f32, y: f32) -> Self {
        Self {
            text: text.to_string(),
            size,
            y,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Where a bookmark points.
#[derive(Debug, Clone)]
pub enum Target {
    /// Explicit `[page /Fit]` destination
    Page(usize),
    /// GoTo action with an explicit destination
    GoTo(usize),
    /// Named destination looked up in the /Names tree
    Named(String),
    /// Name looked up in the catalog /Dests dictionary
    LegacyNamed(String),
    /// Page index written as an integer
    Index(i64),
}

#[derive(Debug, Clone)]
pub struct Item {
    pub title: String,
    pub target: Target,
    pub children: Vec<Item>,
}

impl Item {
    pub fn new(title: &str, target: Target) -> Self {
        Self {
            title: title.to_string(),
            target,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Item>) -> Self {
        self.children = children;
        self
    }
}

/// Assembles a PDF page by page.
#[derive(Debug, Clone, Default)]
pub struct PdfBuilder {
    pages: Vec<Vec<Line>>,
    outline: Vec<Item>,
    named: Vec<(String, usize)>,
    legacy_named: Vec<(String, usize)>,
    info_title: Option<String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, lines: Vec<Line>) -> Self {
        self.pages.push(lines);
        self
    }

    pub fn outline(mut self, items: Vec<Item>) -> Self {
        self.outline = items;
        self
    }

    pub fn named_destination(mut self, name: &str, page: usize) -> Self {
        self.named.push((name.to_string(), page));
        self
    }

    pub fn legacy_destination(mut self, name: &str, page: usize) -> Self {
        self.legacy_named.push((name.to_string(), page));
        self
    }

    pub fn info_title(mut self, title: &str) -> Self {
        self.info_title = Some(title.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(font("Times-Roman"));
        let bold = doc.add_object(font("Times-Bold"));

        let page_ids: Vec<ObjectId> = self
            .pages
            .iter()
            .map(|lines| {
                let content: Content<Vec<Operation>> = Content {
                    operations: lines.iter().flat_map(line_operations).collect(),
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                    "Resources" => dictionary! {
                        "Font" => dictionary! { "F1" => regular, "F2" => bold },
                    },
                })
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        if !self.outline.is_empty() {
            let outlines_id = doc.new_object_id();
            let (first, last, count) = add_items(&mut doc, &self.outline, outlines_id, &page_ids);
            doc.objects.insert(
                outlines_id,
                Object::Dictionary(dictionary! {
                    "Type" => "Outlines",
                    "First" => first,
                    "Last" => last,
                    "Count" => count,
                }),
            );
            catalog.set("Outlines", outlines_id);
        }

        if !self.named.is_empty() {
            let mut names = Vec::new();
            for (name, page) in &self.named {
                names.push(Object::String(name.as_bytes().to_vec(), StringFormat::Literal));
                names.push(Object::Array(explicit_destination(&page_ids, *page)));
            }
            let tree_id = doc.add_object(dictionary! { "Names" => names });
            catalog.set("Names", dictionary! { "Dests" => tree_id });
        }

        if !self.legacy_named.is_empty() {
            let mut dests = Dictionary::new();
            for (name, page) in &self.legacy_named {
                dests.set(
                    name.as_bytes().to_vec(),
                    dictionary! { "D" => explicit_destination(&page_ids, *page) },
                );
            }
            catalog.set("Dests", dests);
        }

        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = &self.info_title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title.as_str()),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}

fn font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn line_operations(line: &Line) -> Vec<Operation> {
    let font_key = if line.bold { "F2" } else { "F1" };
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font_key.into(), line.size.into()]),
        Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                72.into(),
                line.y.into(),
            ],
        ),
        Operation::new("Tj", vec![Object::string_literal(line.text.as_str())]),
        Operation::new("ET", vec![]),
    ]
}

fn explicit_destination(page_ids: &[ObjectId], page: usize) -> Vec<Object> {
    vec![Object::Reference(page_ids[page]), "Fit".into()]
}

fn destination(target: &Target, page_ids: &[ObjectId]) -> (&'static str, Object) {
    match target {
        Target::Page(page) => ("Dest", Object::Array(explicit_destination(page_ids, *page))),
        Target::GoTo(page) => (
            "A",
            Object::Dictionary(dictionary! {
                "S" => "GoTo",
                "D" => explicit_destination(page_ids, *page),
            }),
        ),
        Target::Named(name) => (
            "Dest",
            Object::String(name.as_bytes().to_vec(), StringFormat::Literal),
        ),
        Target::LegacyNamed(name) => ("Dest", Object::Name(name.as_bytes().to_vec())),
        Target::Index(index) => (
            "Dest",
            Object::Array(vec![Object::Integer(*index), "Fit".into()]),
        ),
    }
}

/// Add sibling items under `parent`, returning (first, last, visible count).
fn add_items(
    doc: &mut Document,
    items: &[Item],
    parent: ObjectId,
    page_ids: &[ObjectId],
) -> (ObjectId, ObjectId, i64) {
    let ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();
    let mut count = items.len() as i64;

    for (i, item) in items.iter().enumerate() {
        let (key, dest) = destination(&item.target, page_ids);
        let mut dict = dictionary! {
            "Title" => Object::string_literal(item.title.as_str()),
            "Parent" => parent,
        };
        dict.set(key, dest);
        if i > 0 {
            dict.set("Prev", ids[i - 1]);
        }
        if i + 1 < ids.len() {
            dict.set("Next", ids[i + 1]);
        }
        if !item.children.is_empty() {
            let (first, last, child_count) = add_items(doc, &item.children, ids[i], page_ids);
            dict.set("First", first);
            dict.set("Last", last);
            dict.set("Count", child_count);
            count += child_count;
        }
        doc.objects.insert(ids[i], Object::Dictionary(dict));
    }

    (ids[0], ids[ids.len() - 1], count)
}

/// Ten body lines at 10pt starting at `top`, 14pt apart.
pub fn body(top: f32) -> Vec<Line> {
    (0..10)
        .map(|i| {
            Line::new(
                "the model is trained on the corpus and evaluated on held out data",
                10.0,
                top - i as f32 * 14.0,
            )
        })
        .collect()
}

/// A four-page paper with a title block, numbered sections and references.
pub fn sample_paper() -> PdfBuilder {
    let mut first = vec![
        Line::new("Sparse Attention for Long Documents", 20.0, 720.0),
        Line::new("Ada Lovelace and Alan Turing", 11.0, 690.0),
        Line::new("Abstract", 12.0, 650.0).bold(),
    ];
    first.extend(body(630.0));

    let mut second = vec![Line::new("1 Introduction", 14.0, 720.0).bold()];
    second.extend(body(700.0));
    second.push(Line::new("2 Related Work", 14.0, 540.0).bold());
    second.extend(body(520.0));

    let mut third = vec![Line::new("3 Method", 14.0, 720.0).bold()];
    third.extend(body(700.0));
    third.push(Line::new("3.1 Sparse Kernels", 12.0, 540.0).bold());
    third.extend(body(520.0));

    let mut fourth = vec![Line::new("4 Conclusion", 14.0, 720.0).bold()];
    fourth.extend(body(700.0));
    fourth.push(Line::new("References", 14.0, 540.0).bold());
    fourth.extend(body(520.0));

    PdfBuilder::new()
        .page(first)
        .page(second)
        .page(third)
        .page(fourth)
}
