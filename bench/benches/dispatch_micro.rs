//! Notification dispatch microbenchmarks using Criterion.
//!
//! These benchmarks measure individual operations in isolation:
//! - Posting to 1..N inline observers
//! - Posting to a name nobody observes
//! - Typed narrowing (hit vs. miss)
//! - Subscribe/invalidate churn
//! - Metadata construction

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tannoy::{Metadata, NotificationCenter, TokenBag};
use tannoy_bench::payloads::*;

// =============================================================================
// Post Benchmarks
// =============================================================================

fn bench_post(c: &mut Criterion) {
    let mut group = c.benchmark_group("post");

    for count in [1, 8, 64] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("inline_observers", count), &count, |b, &n| {
            let center = NotificationCenter::new();
            let mut bag = TokenBag::new();
            for _ in 0..n {
                center
                    .subscribe("bench.tick", |tick: &Tick| {
                        black_box(tick.frame);
                    })
                    .add_to(&mut bag);
            }

            b.iter(|| center.post("bench.tick", Tick { frame: 1 }));
        });
    }

    group.finish();
}

fn bench_post_unobserved(c: &mut Criterion) {
    let mut group = c.benchmark_group("post_unobserved");

    group.bench_function("no_observers", |b| {
        let center = NotificationCenter::new();

        b.iter(|| center.post("bench.nobody", Tick { frame: 1 }));
    });

    group.finish();
}

// =============================================================================
// Narrowing Benchmarks
// =============================================================================

fn bench_narrowing(c: &mut Criterion) {
    let mut group = c.benchmark_group("narrowing");

    // The observer expects a Tick and the post carries one.
    group.bench_function("hit", |b| {
        let center = NotificationCenter::new();
        let _token = center.subscribe("bench.narrow", |tick: &Tick| {
            black_box(tick.frame);
        });

        b.iter(|| center.post("bench.narrow", Tick { frame: 1 }));
    });

    // Same observer, but the post carries a different type; the handler
    // runs the type check and skips.
    group.bench_function("miss", |b| {
        let center = NotificationCenter::new();
        let _token = center.subscribe("bench.narrow", |tick: &Tick| {
            black_box(tick.frame);
        });

        b.iter(|| center.post("bench.narrow", 1u32));
    });

    group.finish();
}

// =============================================================================
// Churn Benchmarks
// =============================================================================

fn bench_subscribe_invalidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscribe_invalidate");

    group.bench_function("round_trip", |b| {
        let center = NotificationCenter::new();

        b.iter(|| {
            let token = center.subscribe("bench.churn", |tick: &Tick| {
                black_box(tick.frame);
            });
            token.invalidate();
        });
    });

    group.finish();
}

// =============================================================================
// Metadata Benchmarks
// =============================================================================

fn bench_metadata(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata");

    group.bench_function("typed_payload", |b| {
        b.iter(|| black_box(Metadata::with_payload(Tick { frame: 1 })));
    });

    group.bench_function("four_string_entries", |b| {
        b.iter(|| {
            let mut metadata = Metadata::new();
            metadata.insert("a", 1u64);
            metadata.insert("b", 2u64);
            metadata.insert("c", String::from("three"));
            metadata.insert("d", Blob::default());
            black_box(metadata)
        });
    });

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_post,
    bench_post_unobserved,
    bench_narrowing,
    bench_subscribe_invalidate,
    bench_metadata,
);

criterion_main!(benches);
