//! Criterion micro-benchmarks for legacy number formatting.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simtrace_bench::sample_reals;
use simtrace_legacy::format_real;

/// Benchmark: Format 1K reals spread over 24 decades.
fn bench_format_real_mixed(c: &mut Criterion) {
    let reals = sample_reals(7, 1_000);

    c.bench_function("format_real_mixed_1k", |b| {
        b.iter(|| {
            for &v in &reals {
                black_box(format_real(v));
            }
        });
    });
}

/// Benchmark: Format simulation-clock times, the common case.
fn bench_format_real_times(c: &mut Criterion) {
    let times: Vec<f64> = (0..1_000).map(|i| i as f64 * 0.125).collect();

    c.bench_function("format_real_times_1k", |b| {
        b.iter(|| {
            for &t in &times {
                black_box(format_real(t));
            }
        });
    });
}

criterion_group!(benches, bench_format_real_mixed, bench_format_real_times);
criterion_main!(benches);
