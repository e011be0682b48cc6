//! End-to-end conversion benchmark over a synthetic document.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Build a multi-page PDF with headings, paragraphs, and a bullet list.
fn sample_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id, "F2" => bold_id },
    });

    let body = "A reasonably long body paragraph that exercises block composition, \
        structure analysis, and run span handling in one pass.";

    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..pages {
        let mut operations = Vec::new();
        let mut push_line = |font: &str, size: f32, x: f32, y: f32, text: &str| {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), Object::Real(size)]));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(x), Object::Real(y)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("ET", vec![]));
        };

        push_line("F2", 20.0, 50.0, 720.0, "Section Heading");
        push_line("F1", 12.0, 50.0, 650.0, body);
        push_line("F1", 12.0, 50.0, 580.0, body);
        push_line("F1", 12.0, 50.0, 510.0, "- first bullet item");
        push_line("F1", 12.0, 50.0, 460.0, "- second bullet item");
        push_line("F1", 12.0, 50.0, 410.0, "- third bullet item");

        let content = Content { operations };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn bench_convert(c: &mut Criterion) {
    let small = sample_pdf(2);
    let large = sample_pdf(20);

    c.bench_function("convert_2_pages", |b| {
        b.iter(|| docweave::convert(black_box(&small)).unwrap())
    });

    c.bench_function("convert_20_pages", |b| {
        b.iter(|| docweave::convert(black_box(&large)).unwrap())
    });

    c.bench_function("analyze_20_pages", |b| {
        b.iter(|| {
            docweave::analyze_bytes(black_box(&large), &docweave::ConvertOptions::default())
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
