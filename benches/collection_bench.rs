//! Benchmark for Collection pipelines vs standard iterator chains.
//!
//! Measures the cost of the boxed, re-runnable pipeline against the
//! equivalent hand-written `Iterator` chain, plus the set operations whose
//! index is rebuilt on every pass.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lazy_collection::Collection;
use std::hint::black_box;

// =============================================================================
// filter/map Benchmark
// =============================================================================

fn benchmark_filter_map(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("filter_map");

    for size in [100, 1000, 10000] {
        let values: Vec<i64> = (0..size).collect();
        let collection = Collection::list(values.clone())
            .filter(|value| value % 3 == 0)
            .map(|value| value * 2);

        // Collection pipeline
        group.bench_with_input(BenchmarkId::new("Collection", size), &size, |bencher, _| {
            bencher.iter(|| black_box(collection.all().unwrap()));
        });

        // Iterator chain
        group.bench_with_input(BenchmarkId::new("Iterator", size), &size, |bencher, _| {
            bencher.iter(|| {
                let result: Vec<i64> = values
                    .iter()
                    .filter(|value| *value % 3 == 0)
                    .map(|value| value * 2)
                    .collect();
                black_box(result)
            });
        });
    }

    group.finish();
}

// =============================================================================
// take Benchmark (short-circuit)
// =============================================================================

fn benchmark_take(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("take");

    for size in [100, 1000, 10000] {
        let collection = Collection::list(0..size).take(10);

        group.bench_with_input(BenchmarkId::new("Collection", size), &size, |bencher, _| {
            bencher.iter(|| black_box(collection.count().unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// cycle + limit Benchmark
// =============================================================================

fn benchmark_cycle_limit(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("cycle_limit");

    for size in [100, 1000, 10000] {
        let collection = Collection::list([1, 2, 3]).cycle();

        group.bench_with_input(BenchmarkId::new("Collection", size), &size, |bencher, &size| {
            bencher.iter(|| black_box(collection.limit(black_box(size), 0).count().unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// diff/intersect Benchmark
// =============================================================================

fn benchmark_set_operations(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("set_operations");

    for size in [100, 1000, 10000] {
        let upstream = Collection::list(0..size);
        let evens: Vec<i32> = (0..size).step_by(2).collect();
        let thirds: Vec<i32> = (0..size).step_by(3).collect();

        let difference = upstream.diff([evens.clone()]);
        group.bench_with_input(BenchmarkId::new("diff", size), &size, |bencher, _| {
            bencher.iter(|| black_box(difference.count().unwrap()));
        });

        let intersection = upstream.intersect([evens, thirds]);
        group.bench_with_input(BenchmarkId::new("intersect", size), &size, |bencher, _| {
            bencher.iter(|| black_box(intersection.count().unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// all_with_keys Benchmark
// =============================================================================

fn benchmark_all_with_keys(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("all_with_keys");

    for size in [100, 1000, 10000] {
        let words: Vec<(String, usize)> = (0..size).map(|index| (format!("key-{index}"), index)).collect();
        let collection = Collection::wrap(words);

        group.bench_with_input(BenchmarkId::new("Collection", size), &size, |bencher, _| {
            bencher.iter(|| black_box(collection.all_with_keys().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_filter_map,
    benchmark_take,
    benchmark_cycle_limit,
    benchmark_set_operations,
    benchmark_all_with_keys
);
criterion_main!(benches);
