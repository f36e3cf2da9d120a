//! Instrumentation Benchmarks
//!
//! Benchmarks for scanning, classifying and rewriting C sources of
//! increasing size.
//!
//! Run with: `cargo bench --bench instrument_ops`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use linecov::{classify, instrument_source, CFrontend, StatementSource};
use std::fmt::Write as _;

fn synthetic_source(functions: usize) -> String {
    let mut src = String::from("#include <stdio.h>\n\nstatic int total;\n\n");
    for i in 0..functions {
        let _ = write!(
            src,
            "int f{i}(int n)\n{{\n  int acc = 0;\n  for (int k = 0; k < n; k++) {{\n    if (k % 3 == 0)\n      acc += k;\n    else\n      acc -= 1;\n  }}\n  do {{\n    n--;\n  }} while (n > 0);\n  total += acc;\n  return acc;\n}}\n\n"
        );
    }
    src.push_str("int main(void)\n{\n  printf(\"%d\\n\", f0(10));\n  return 0;\n}\n");
    src
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for functions in [10, 100, 1000] {
        let src = synthetic_source(functions);
        group.bench_with_input(BenchmarkId::from_parameter(functions), &src, |bench, src| {
            bench.iter(|| {
                let model = CFrontend.scan("/bench/s.c", black_box(src));
                black_box(model)
            });
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for functions in [10, 100, 1000] {
        let src = synthetic_source(functions);
        let Ok(model) = CFrontend.scan("/bench/s.c", &src) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(functions), &src, |bench, src| {
            bench.iter(|| black_box(classify(black_box(src), &model.statements)));
        });
    }

    group.finish();
}

fn bench_instrument(c: &mut Criterion) {
    let mut group = c.benchmark_group("instrument");

    for functions in [10, 100, 1000] {
        let src = synthetic_source(functions);
        group.bench_with_input(BenchmarkId::from_parameter(functions), &src, |bench, src| {
            bench.iter(|| black_box(instrument_source(&CFrontend, "/bench/s.c", black_box(src))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_classify, bench_instrument);
criterion_main!(benches);
