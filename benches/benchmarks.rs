use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::hint::black_box;

use conduit::Store;

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| Store::with_data(black_box(json!({ "count": 0 }))));
    });
}

fn store_get_benchmark(c: &mut Criterion) {
    let store = Store::with_data(json!({ "user": { "name": "Al", "tags": ["a", "b", "c"] } }));

    c.bench_function("store_get", |b| {
        b.iter(|| {
            black_box(store.get("user"));
        });
    });
}

fn store_change_silent_benchmark(c: &mut Criterion) {
    let store = Store::new();

    c.bench_function("store_change_silent", |b| {
        let mut i = 0;
        b.iter(|| {
            store.change_silent(("user.visits", black_box(i)));
            i += 1;
        });
    });
}

fn store_change_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_change");

    for listener_count in [1, 10, 100].iter() {
        let store = Store::new();

        for _ in 0..*listener_count {
            store.on_change(|_, _| {
                // Empty listener
            });
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(listener_count),
            listener_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.change(("count", black_box(i)));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn store_relay_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_relay");

    for target_count in [1, 10, 100].iter() {
        let source = Store::new();
        let targets: Vec<Store> = (0..*target_count).map(|_| Store::new()).collect();
        for target in &targets {
            source.connect(target);
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(target_count),
            target_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    source.change(("count", black_box(i)));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    store_creation_benchmark,
    store_get_benchmark,
    store_change_silent_benchmark,
    store_change_benchmark,
    store_relay_benchmark,
);
criterion_main!(benches);
