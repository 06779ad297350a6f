//! Criterion micro-benchmarks for profiler overhead.
//!
//! `noop_probe` and `scoped_probe` isolate the probe itself; the
//! `prefix_sums` group measures a real instrumented path, which reflects
//! whichever probe the `profiling` feature selects.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use skein_alloc::HostAllocator;
use skein_core::Reporter;
use skein_profile::{NoopProfiler, ProfileAggregator, ScopedProfiler, MONOTONIC};

fn bench_probe_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("probe_lifecycle");

    group.bench_function("noop_probe", |b| {
        b.iter(|| {
            let mut p = NoopProfiler::declare("noop", "bench", Reporter::none());
            p.start();
            black_box(&p);
        });
    });

    let agg = ProfileAggregator::default();
    group.bench_function("scoped_probe", |b| {
        b.iter(|| {
            let mut p =
                ScopedProfiler::with_parts(Some("scoped"), Some("bench"), Reporter::none(), &MONOTONIC, &agg);
            p.start();
            black_box(&p);
        });
    });

    group.bench_function("aggregator_record", |b| {
        b.iter(|| agg.record(black_box("skein_profiler: direct|bench"), black_box(1e-6)));
    });

    group.finish();
}

fn bench_instrumented_path(c: &mut Criterion) {
    let input: Vec<f32> = (0..1024).map(|i| i as f32 * 0.5).collect();
    let label = if skein_profile::ENABLED { "enabled" } else { "disabled" };

    c.bench_function(&format!("prefix_sums_1k_{label}"), |b| {
        b.iter(|| {
            let out = skein_bench::prefix_sums(black_box(&input), HostAllocator::default(), Reporter::none())
                .unwrap();
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_probe_lifecycle, bench_instrumented_path);
criterion_main!(benches);
