//! Benchmarks comparing the bounded priority queue against
//! `std::collections::BinaryHeap`.
//!
//! Run with: cargo bench --bench queue

use std::collections::BinaryHeap;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use nexus_ordered::PriorityQueue;
use nexus_ordered::sort::{heapsort, quicksort};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const CAPACITY: usize = 4_096;

fn random_priorities() -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(7);
    (0..CAPACITY).map(|_| rng.random_range(0..1_000_000)).collect()
}

// ============================================================================
// Push/Pop Benchmarks
// ============================================================================

fn bench_fill_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_drain");
    group.throughput(Throughput::Elements(CAPACITY as u64));
    let priorities = random_priorities();

    // Pre-allocate ONCE, drained by every iteration
    let mut queue: PriorityQueue<u64, u32> = PriorityQueue::with_capacity(CAPACITY).unwrap();
    let mut heap = BinaryHeap::with_capacity(CAPACITY);

    group.bench_function("priority_queue", |b| {
        b.iter(|| {
            for (id, &p) in priorities.iter().enumerate() {
                queue.push(black_box(p), id as u32).unwrap();
            }
            while let Ok(pair) = queue.pop() {
                black_box(pair);
            }
        });
    });

    group.bench_function("binary_heap", |b| {
        b.iter(|| {
            for (id, &p) in priorities.iter().enumerate() {
                heap.push((black_box(p), id as u32));
            }
            while let Some(pair) = heap.pop() {
                black_box(pair);
            }
        });
    });

    group.finish();
}

fn bench_change_priority(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_priority");
    let priorities = random_priorities();

    let mut queue: PriorityQueue<u64, u32> = PriorityQueue::with_capacity(CAPACITY).unwrap();
    for (id, &p) in priorities.iter().enumerate() {
        queue.push(p, id as u32).unwrap();
    }
    let mut rng = SmallRng::seed_from_u64(8);

    group.bench_function("by_index", |b| {
        b.iter(|| {
            let index = rng.random_range(0..CAPACITY);
            let p = rng.random_range(0..1_000_000);
            black_box(queue.change_priority(index, p).unwrap());
        });
    });

    group.finish();
}

// ============================================================================
// Sort Benchmarks
// ============================================================================

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    group.throughput(Throughput::Elements(CAPACITY as u64));
    let input = random_priorities();

    group.bench_function("quicksort", |b| {
        b.iter(|| {
            let mut v = input.clone();
            quicksort(black_box(&mut v));
            v
        });
    });

    group.bench_function("heapsort", |b| {
        b.iter(|| {
            let mut v = input.clone();
            heapsort(black_box(&mut v));
            v
        });
    });

    group.bench_function("std_unstable", |b| {
        b.iter(|| {
            let mut v = input.clone();
            black_box(&mut v).sort_unstable();
            v
        });
    });

    group.finish();
}

criterion_group!(benches, bench_fill_drain, bench_change_priority, bench_sort);
criterion_main!(benches);
