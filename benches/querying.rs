use chisel_pluck::eval::select;
use chisel_pluck::parser::Parser;
use chisel_pluck::{evaluate_many, JsonValue, Path};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};

fn document(rows: usize) -> JsonValue {
    let rows: Vec<String> = (0..rows)
        .map(|i| format!(r#"{{"id": {}, "names": ["x{}", "y{}", "z{}"]}}"#, i, i, i, i))
        .collect();
    Parser::default()
        .parse_str(&format!(r#"{{"rows": [{}]}}"#, rows.join(",")))
        .unwrap()
}

fn benchmark_compile(c: &mut Criterion) {
    c.bench_function("compile of bracketed path", |b| {
        b.iter(|| Path::compile(black_box("deep[1].peanuts[0]..things.*.names[2].")))
    });
}

fn benchmark_literal_select(c: &mut Criterion) {
    let doc = document(10_000);
    let path = Path::compile("rows[9999].names[2]");
    c.bench_function("select of literal path", |b| {
        b.iter(|| select(&path, &doc))
    });
}

fn benchmark_wildcard_select(c: &mut Criterion) {
    let doc = document(10_000);
    let path = Path::compile("rows.*.names.*");
    c.bench_function("select of fanned out path", |b| {
        b.iter(|| select(&path, &doc))
    });
}

fn benchmark_render(c: &mut Criterion) {
    let doc = document(1_000);
    c.bench_function("render of fanned out rows", |b| {
        b.iter(|| evaluate_many(&doc, &["rows.*", "rows.*.id"], false))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = benchmark_compile, benchmark_literal_select, benchmark_wildcard_select, benchmark_render
}
criterion_main!(benches);
