//! Atomic cell operation benchmarks, per memory order.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use memord_core::cell::AtomicCell;
use memord_core::order::MemOrder;

fn bench_load_orders(c: &mut Criterion) {
    let cell = AtomicCell::new(7u64);
    let mut group = c.benchmark_group("load");

    for order in [MemOrder::Relaxed, MemOrder::Acquire, MemOrder::SeqCst] {
        group.bench_with_input(BenchmarkId::new("u64", order.label()), &order, |b, &ord| {
            b.iter(|| black_box(cell.load(ord)));
        });
    }
    group.finish();
}

fn bench_store_orders(c: &mut Criterion) {
    let cell = AtomicCell::new(0u64);
    let mut group = c.benchmark_group("store");

    for order in [MemOrder::Relaxed, MemOrder::Release, MemOrder::SeqCst] {
        group.bench_with_input(BenchmarkId::new("u64", order.label()), &order, |b, &ord| {
            b.iter(|| cell.store(black_box(1), ord));
        });
    }
    group.finish();
}

fn bench_rmw_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("rmw");

    let cell = AtomicCell::new(0u64);
    group.bench_function("swap/seq_cst", |b| {
        b.iter(|| black_box(cell.swap(1, MemOrder::SeqCst)));
    });
    group.bench_function("fetch_add/seq_cst", |b| {
        b.iter(|| black_box(cell.fetch_add(1, MemOrder::SeqCst)));
    });
    group.bench_function("cas_weak_retry/seq_cst", |b| {
        b.iter(|| {
            let current = cell.load(MemOrder::Relaxed);
            while cell
                .compare_exchange_weak(
                    current,
                    current.wrapping_add(1),
                    MemOrder::SeqCst,
                    MemOrder::Relaxed,
                )
                .is_err()
            {}
        });
    });
    group.finish();
}

criterion_group!(benches, bench_load_orders, bench_store_orders, bench_rmw_ops);
criterion_main!(benches);
