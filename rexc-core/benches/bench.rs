use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rexc_core::{compile_artifact, compile_pattern, emit, Dialect};

fn bench_literal_pattern(c: &mut Criterion) {
    let source = "the quick brown fox jumps over the lazy dog";

    c.bench_function("compile_literal", |b| {
        b.iter(|| black_box(compile_pattern(black_box(source))))
    });
}

fn bench_named_groups(c: &mut Criterion) {
    let source = r"(?<year>\d{4})-(?<month>\d{2})-(?<day>\d{2})";

    c.bench_function("compile_named_groups", |b| {
        b.iter(|| black_box(compile_pattern(black_box(source))))
    });
}

fn bench_email_pattern(c: &mut Criterion) {
    let source = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

    c.bench_function("compile_email", |b| {
        b.iter(|| black_box(compile_pattern(black_box(source))))
    });
}

fn bench_alternation_heavy(c: &mut Criterion) {
    let source = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

    c.bench_function("compile_alternation", |b| {
        b.iter(|| black_box(compile_pattern(black_box(source))))
    });
}

fn bench_emit_only(c: &mut Criterion) {
    let artifact = compile_artifact(r"(?<word>\w+)\s+(?<num>\d+)([-.]\d+)*").unwrap();

    c.bench_function("emit_only", |b| {
        b.iter(|| black_box(emit(black_box(&artifact), Dialect::Pcre2)))
    });
}

criterion_group!(
    benches,
    bench_literal_pattern,
    bench_named_groups,
    bench_email_pattern,
    bench_alternation_heavy,
    bench_emit_only
);
criterion_main!(benches);
