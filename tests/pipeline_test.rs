//! End-to-end outline extraction tests.

mod common;

use common::{body, sample_paper, Item, Line, PdfBuilder, Target};
use paper_outline::render::{to_json, to_markdown, to_text};
use paper_outline::{
    extract_outline, extract_outline_with_options, Error, JsonFormat, Outline, OutlineEntry,
    OutlineExtractor, OutlineOptions, PageSelection, RenderOptions,
};

fn summary(outline: &Outline) -> Vec<(&str, u8, usize)> {
    outline
        .entries
        .iter()
        .map(|e| (e.title.as_str(), e.level, e.page))
        .collect()
}

fn assert_well_formed(entries: &[OutlineEntry]) {
    assert_eq!(entries[0].level, 1);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.order_index, i);
    }
    for pair in entries.windows(2) {
        assert!(pair[1].page >= pair[0].page);
        assert!(pair[1].level <= pair[0].level + 1);
    }
}

#[test]
fn test_heuristic_outline_of_sample_paper() {
    let outline = extract_outline(&sample_paper().build(), "", "").unwrap();

    assert_eq!(outline.title, "Sparse Attention for Long Documents");
    assert_eq!(
        summary(&outline),
        vec![
            ("Abstract", 1, 0),
            ("1 Introduction", 1, 1),
            ("2 Related Work", 1, 1),
            ("3 Method", 1, 2),
            ("3.1 Sparse Kernels", 2, 2),
            ("4 Conclusion", 1, 3),
            ("References", 1, 3),
        ]
    );
    assert_well_formed(&outline.entries);
}

#[test]
fn test_embedded_outline_preferred() {
    let bytes = sample_paper()
        .outline(vec![
            Item::new("Introduction", Target::Page(1)),
            Item::new("Approach", Target::GoTo(2))
                .with_children(vec![Item::new("Kernels", Target::Page(2))]),
            Item::new("Summary", Target::Page(3)),
        ])
        .build();

    let outline = extract_outline(&bytes, "Sparse Attention", "We study attention.").unwrap();

    assert_eq!(outline.title, "Sparse Attention");
    assert_eq!(outline.abstract_text, "We study attention.");
    assert_eq!(
        summary(&outline),
        vec![
            ("Introduction", 1, 1),
            ("Approach", 1, 2),
            ("Kernels", 2, 2),
            ("Summary", 1, 3),
        ]
    );
}

#[test]
fn test_out_of_range_bookmarks_fall_back_to_heuristics() {
    let bytes = sample_paper()
        .outline(vec![
            Item::new("Introduction", Target::Page(1)),
            Item::new("Ghost Section", Target::Index(99)),
        ])
        .build();

    let outline = extract_outline(&bytes, "", "").unwrap();
    let titles: Vec<&str> = outline.entries.iter().map(|e| e.title.as_str()).collect();

    assert!(!titles.contains(&"Ghost Section"));
    assert_eq!(titles[1], "1 Introduction");
}

#[test]
fn test_unresolved_bookmarks_are_skipped() {
    let bytes = sample_paper()
        .named_destination("sec:intro", 1)
        .outline(vec![
            Item::new("Introduction", Target::Named("sec:intro".into())),
            Item::new("Broken", Target::Named("sec:missing".into())),
            Item::new("Conclusion", Target::Page(3)),
        ])
        .build();

    let outline = extract_outline(&bytes, "", "").unwrap();
    assert_eq!(
        summary(&outline),
        vec![("Introduction", 1, 1), ("Conclusion", 1, 3)]
    );
}

#[test]
fn test_metadata_is_normalized() {
    let outline = extract_outline(
        &sample_paper().build(),
        "Sparse  Attention\nfor Long\tDocuments",
        "We intro-\nduce a sparse kernel.\n\nIt is fast.",
    )
    .unwrap();

    assert_eq!(outline.title, "Sparse Attention for Long Documents");
    assert_eq!(outline.abstract_text, "We introduce a sparse kernel. It is fast.");
}

#[test]
fn test_info_title_used_when_repository_title_blank() {
    let outline = extract_outline(&sample_paper().info_title("From Info").build(), " ", "").unwrap();
    assert_eq!(outline.title, "From Info");
}

#[test]
fn test_no_headings_found() {
    let bytes = PdfBuilder::new().page(body(700.0)).build();
    let result = extract_outline(&bytes, "Title", "Abstract");
    assert!(matches!(result, Err(Error::NoHeadingsFound)));
}

#[test]
fn test_garbage_input() {
    assert!(matches!(
        extract_outline(b"<html>not a pdf</html>", "", ""),
        Err(Error::CorruptDocument(_))
    ));
}

#[test]
fn test_max_levels_option() {
    let options = OutlineOptions::new().with_max_levels(1);
    let outline = extract_outline_with_options(&sample_paper().build(), "", "", &options).unwrap();
    assert_eq!(outline.depth(), 1);
    assert!(outline
        .entries
        .iter()
        .any(|e| e.title == "3.1 Sparse Kernels"));
}

#[test]
fn test_page_selection_restricts_heuristics() {
    let outline = OutlineExtractor::new()
        .with_pages(PageSelection::first(2))
        .extract(&sample_paper().build(), "", "")
        .unwrap();

    assert!(outline.entries.iter().all(|e| e.page < 2));
    assert_eq!(outline.entries.last().unwrap().title, "2 Related Work");
}

#[test]
fn test_sequential_matches_parallel() {
    let bytes = sample_paper().build();
    let parallel = OutlineExtractor::new().extract(&bytes, "", "").unwrap();
    let sequential = OutlineExtractor::new()
        .sequential()
        .extract(&bytes, "", "")
        .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_roman_numbered_sections() {
    let mut first = vec![Line::new("I. Introduction", 12.0, 720.0).bold()];
    first.extend(body(700.0));
    let mut second = vec![Line::new("II. System Design", 12.0, 720.0).bold()];
    second.extend(body(700.0));

    let bytes = PdfBuilder::new().page(first).page(second).build();
    let outline = extract_outline(&bytes, "A Paper", "").unwrap();

    assert_eq!(
        summary(&outline),
        vec![("I. Introduction", 1, 0), ("II. System Design", 1, 1)]
    );
}

#[test]
fn test_renderers_on_extracted_outline() {
    let outline = extract_outline(&sample_paper().build(), "", "Short abstract.").unwrap();

    let markdown = to_markdown(&outline, &RenderOptions::default()).unwrap();
    assert!(markdown.starts_with("**Sparse Attention for Long Documents**"));
    assert!(markdown.contains("\n## 3.1 Sparse Kernels\n"));

    let numbered = to_markdown(
        &Outline::new("", "", outline.entries[1..].to_vec()),
        &RenderOptions::new().with_numbering(true),
    )
    .unwrap();
    assert!(numbered.contains("# A References"));

    let text = to_text(&outline, &RenderOptions::default()).unwrap();
    assert!(text.contains("Short abstract."));

    let json = to_json(&outline, JsonFormat::Compact).unwrap();
    let parsed: Outline = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, outline);
}
