//! Benchmarks for grapheme width measurement and styled-string parsing.
//!
//! Run with: cargo bench -p termgrid-text

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use termgrid_core::{GraphemeCluster, Wcwidth, WidthMethod};
use termgrid_text::StyledString;

fn ascii_text(len: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn cjk_text(len: usize) -> String {
    "\u{4E2D}\u{6587}\u{6D4B}\u{8BD5}\u{6587}\u{672C}"
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn mixed_text(len: usize) -> String {
    "Hello \u{4E16}\u{754C}! Test \u{6D4B}\u{8BD5}. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn zwj_text(count: usize) -> String {
    "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}".repeat(count)
}

fn styled_text(len: usize) -> String {
    "\x1b[1;31mHello\x1b[0m, \x1b[38;5;200mWorld\x1b[0m! "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn bench_ascii_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("width/ascii");
    for len in [10, 100, 1000, 10000] {
        let text = ascii_text(len);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| black_box(Wcwidth.string_width(text)))
        });
    }
    group.finish();
}

fn bench_cjk_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("width/cjk");
    for len in [10, 100, 1000, 10000] {
        let text = cjk_text(len);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| black_box(Wcwidth.string_width(text)))
        });
    }
    group.finish();
}

fn bench_mixed_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("width/mixed");
    for len in [10, 100, 1000, 10000] {
        let text = mixed_text(len);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| black_box(Wcwidth.string_width(text)))
        });
    }
    group.finish();
}

fn bench_zwj_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("width/zwj");
    for count in [1, 10, 50] {
        let text = zwj_text(count);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| black_box(GraphemeCluster.string_width(text)))
        });
    }
    group.finish();
}

fn bench_wcwidth_vs_grapheme_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("width/method_comparison");
    let text = mixed_text(1000);
    group.bench_function("wcwidth", |b| {
        b.iter(|| black_box(Wcwidth.string_width(&text)))
    });
    group.bench_function("grapheme_cluster", |b| {
        b.iter(|| black_box(GraphemeCluster.string_width(&text)))
    });
    group.finish();
}

fn bench_styled_string_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("styled_string/parse");
    for len in [10, 100, 1000] {
        let text = styled_text(len);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| black_box(StyledString::parse(text)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ascii_width,
    bench_cjk_width,
    bench_mixed_width,
    bench_zwj_width,
    bench_wcwidth_vs_grapheme_cluster,
    bench_styled_string_parse,
);
criterion_main!(benches);
