//! Benchmarks for tree building and rendering.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quill_html::{Document, Element, element};

/// Build a table with `rows` rows of five escaped cells each.
fn build_table(rows: usize) -> Element {
    let mut table = Element::new("table");
    table.attr("class", ["data", "striped"]).unwrap();
    for row in 0..rows {
        let mut tr = Element::new("tr");
        for col in 0..5 {
            let cell = element("td", [("data-col", col.to_string())], format!("<{row}:{col}>"))
                .unwrap();
            tr.add(cell);
        }
        table.add(tr);
    }
    table
}

fn bench_render_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_table");
    for rows in [10, 100, 1000] {
        let mut table = build_table(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| table.render());
        });
    }
    group.finish();
}

fn bench_build_table(c: &mut Criterion) {
    c.bench_function("build_table_100_rows", |b| {
        b.iter(|| build_table(100));
    });
}

fn bench_remove_repeated_node(c: &mut Criterion) {
    c.bench_function("remove_repeated_node_1000", |b| {
        b.iter(|| {
            let mut doc = Document::new();
            let repeated = doc.push("x").unwrap();
            for i in 0..1000 {
                doc.add(i);
                if i % 10 == 0 {
                    doc.add_existing(repeated).unwrap();
                }
            }
            doc.remove(repeated)
        });
    });
}

criterion_group!(
    benches,
    bench_render_table,
    bench_build_table,
    bench_remove_repeated_node
);
criterion_main!(benches);
