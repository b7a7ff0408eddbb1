//! Benchmarks for heading detection and outline extraction.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as LopdfDocument, Object, Stream};

use paper_outline::{
    BoundingBox, Document, HeadingDetector, OutlineOptions, Page, Reconciler, TextSpan,
};

const BODY_LINE: &str = "the proposed model is evaluated on several benchmark datasets";

/// A synthetic paper with one numbered section per page.
fn synthetic_document(page_count: usize) -> Document {
    let mut doc = Document::new();
    for index in 0..page_count {
        let mut page = Page::letter(index);
        let heading = format!("{} Section Number {}", index + 1, index + 1);
        page.add_span(TextSpan::new(
            heading.as_str(),
            14.0,
            BoundingBox::from_baseline(72.0, 720.0, 14.0, heading.len()),
            index,
        ));
        for line in 0..40 {
            let y = 700.0 - line as f32 * 14.0;
            page.add_span(TextSpan::new(
                BODY_LINE,
                10.0,
                BoundingBox::from_baseline(72.0, y, 10.0, BODY_LINE.len()),
                index,
            ));
        }
        doc.add_page(page);
    }
    doc
}

/// The same paper serialized as PDF bytes.
fn synthetic_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = LopdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
    });

    let mut kids = Vec::new();
    for index in 0..page_count {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 14.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(format!("{} Section Number {}", index + 1, index + 1))],
            ),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("TL", vec![14.into()]),
        ];
        for _ in 0..40 {
            operations.push(Operation::new("T*", vec![]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(BODY_LINE)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Benchmark heuristic detection at various sizes.
fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("heading_detection");
    let detector = HeadingDetector::new(&OutlineOptions::default());

    for page_count in [1, 10, 50] {
        let doc = synthetic_document(page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| detector.analyze(black_box(&doc)));
        });
    }

    group.finish();
}

/// Benchmark reconciliation of detected candidates.
fn bench_reconcile(c: &mut Criterion) {
    let doc = synthetic_document(50);
    let candidates = HeadingDetector::new(&OutlineOptions::default()).detect(&doc);
    let reconciler = Reconciler::new(doc.page_count());

    c.bench_function("reconcile_50_pages", |b| {
        b.iter(|| reconciler.reconcile(None, black_box(candidates.clone())));
    });
}

/// Benchmark the full pipeline, parallel and sequential.
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_outline");
    let data = synthetic_pdf(20);

    let parallel = OutlineOptions::default();
    group.bench_function("20_pages_parallel", |b| {
        b.iter(|| {
            paper_outline::extract_outline_with_options(black_box(&data), "", "", &parallel)
        });
    });

    let sequential = OutlineOptions::default().sequential();
    group.bench_function("20_pages_sequential", |b| {
        b.iter(|| {
            paper_outline::extract_outline_with_options(black_box(&data), "", "", &sequential)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_detection, bench_reconcile, bench_extraction);
criterion_main!(benches);
