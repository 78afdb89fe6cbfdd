use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use markdown_loom_engine::{
    Parser, ParserOptions,
    extensions::{StrikethroughExtension, TaskListExtension, WikiLinkExtension},
};

/// A document of `sections` repetitions of every core construct.
fn generate_markdown_content(sections: usize) -> String {
    let mut content = String::new();
    for i in 0..sections {
        content.push_str(&format!("# Section {i}\n\n"));
        content.push_str("Some *emphasis*, **strong text**, `code` and a [link](/url \"t\").\n");
        content.push_str("A second line with <https://example.org> and ~~gone~~ [[Page|alias]].\n\n");
        content.push_str("> quoted *text*\n> - nested item\n\n");
        content.push_str("- [ ] one\n- [x] two\n  - deeper\n\n");
        content.push_str("```rust\nfn main() {}\n```\n\n");
        content.push_str("    indented code\n\n---\n\n");
    }
    content
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.sample_size(20);

    let core = Parser::new(ParserOptions::default()).unwrap();
    let extended = Parser::builder()
        .extension(StrikethroughExtension)
        .extension(WikiLinkExtension)
        .extension(TaskListExtension)
        .build()
        .unwrap();

    for sections in [10, 100] {
        let content = generate_markdown_content(sections);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(BenchmarkId::new("core", sections), &content, |b, content| {
            b.iter(|| black_box(core.parse(black_box(content)).unwrap()));
        });
        group.bench_with_input(
            BenchmarkId::new("extensions", sections),
            &content,
            |b, content| {
                b.iter(|| black_box(extended.parse(black_box(content)).unwrap()));
            },
        );
        // Baseline: an event parser that builds no tree.
        group.bench_with_input(
            BenchmarkId::new("pulldown_cmark", sections),
            &content,
            |b, content| {
                b.iter(|| black_box(pulldown_cmark::Parser::new(black_box(content)).count()));
            },
        );
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_parser", |b| {
        b.iter(|| {
            black_box(
                Parser::builder()
                    .extension(StrikethroughExtension)
                    .extension(WikiLinkExtension)
                    .extension(TaskListExtension)
                    .build()
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_parse, bench_build);
criterion_main!(benches);
