use blockmark_core::{Block, LinkStrategy, MarkdownRenderer, Options, parse_document};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

fn generate_large_document() -> String {
    let mut blocks = Vec::with_capacity(4_000);
    for i in 0..1_000 {
        blocks.push(format!(
            r#"{{ "type": "header", "data": {{ "text": "Section {i}", "level": 2 }} }}"#
        ));
        blocks.push(format!(
            r#"{{ "type": "paragraph", "data": {{ "text": "Paragraph {i} with a <a href=\"https://example.com/{i}\">link</a> and <b>bold</b> text" }} }}"#
        ));
        blocks.push(
            r#"{ "type": "list", "data": { "style": "ordered", "items": [
                { "content": "Item", "items": ["Nested <a href=\"https://nested.com\">link</a>"] },
                "Plain item"
            ] } }"#
                .to_string(),
        );
        blocks.push(
            r#"{ "type": "embed", "data": { "service": "coub", "source": "https://example.com/doc.pdf" } }"#
                .to_string(),
        );
    }
    format!("[{}]", blocks.join(","))
}

fn benchmark_conversion(c: &mut Criterion) {
    let input = generate_large_document();
    let blocks: Vec<Block> = parse_document(&input).unwrap();
    let mut group = c.benchmark_group("document_conversion");

    group.throughput(Throughput::Bytes(input.len() as u64));

    // 1. Structural link rewriting through lol_html
    group.bench_function("structural_links", |b| {
        let renderer = MarkdownRenderer::default();
        b.iter(|| renderer.render(black_box(&blocks)).unwrap())
    });

    // 2. Regex substitution only
    group.bench_function("pattern_links", |b| {
        let renderer = MarkdownRenderer::new(Options {
            link_strategy: LinkStrategy::Pattern,
        });
        b.iter(|| renderer.render(black_box(&blocks)).unwrap())
    });

    // 3. Parsing included
    group.bench_function("parse_and_render", |b| {
        b.iter(|| blockmark_core::convert_json(black_box(&input), Options::default()).unwrap())
    });

    group.finish();
}

criterion_group!(benches, benchmark_conversion);
criterion_main!(benches);
