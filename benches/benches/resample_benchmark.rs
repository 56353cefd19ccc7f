//! Resampling and metrics benchmarks.
//!
//! Run with: `cargo bench --package barscope-bench`

use barscope_bench::{SESSION_MINUTES, session_series};
use barscope_lib::{MetricsConfig, Timeframe, aggregate_timeframe, annotate};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const DAYS: [i64; 3] = [1, 20, 250];

fn aggregate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for days in DAYS {
        let source = session_series(days);
        group.throughput(Throughput::Elements((days * SESSION_MINUTES) as u64));

        for timeframe in [Timeframe::Minute5, Timeframe::Minute30, Timeframe::Day1] {
            group.bench_with_input(
                BenchmarkId::new(timeframe.as_str(), format!("{days}d")),
                &source,
                |b, source| b.iter(|| aggregate_timeframe(black_box(source), timeframe)),
            );
        }
    }

    group.finish();
}

fn annotate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");

    for days in DAYS {
        let Ok(five) = aggregate_timeframe(&session_series(days), Timeframe::Minute5) else {
            continue;
        };
        group.throughput(Throughput::Elements(five.len() as u64));

        for (name, config) in [
            ("intermediate", MetricsConfig::intermediate()),
            ("vwap_only", MetricsConfig::vwap_only()),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, format!("{days}d")),
                &five,
                |b, series| b.iter(|| annotate(black_box(series), &config)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, aggregate_benchmark, annotate_benchmark);
criterion_main!(benches);
