//! Throughput benchmarks for ring queues.
//!
//! Run with: cargo bench
//!
//! Storage is pre-allocated so the numbers measure ring work, not slab growth.

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nexus_ring::{Order, Queue, QueueChain, RingBuilder, RingStorage};

const ELEMENTS: usize = 10_000;

fn payloads() -> Vec<String> {
    (0..ELEMENTS as u64)
        .map(|i| format!("{:016x}", i.wrapping_mul(0x9e37_79b9_7f4a_7c15)))
        .collect()
}

fn filled(payloads: &[String]) -> (RingStorage, Queue<RingStorage>) {
    let mut storage = RingBuilder::default().capacity(ELEMENTS + 2).build();
    let mut queue = Queue::create(&mut storage).unwrap();
    for text in payloads {
        queue.push_back(&mut storage, text).unwrap();
    }
    (storage, queue)
}

// ============================================================================
// Queue API
// ============================================================================

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    let payloads = payloads();
    let mut storage = RingBuilder::default().capacity(ELEMENTS + 2).build();
    let mut queue = Queue::create(&mut storage).unwrap();

    group.bench_function("push_back/pop_front", |b| {
        b.iter(|| {
            for text in &payloads {
                black_box(queue.push_back(&mut storage, text).unwrap());
            }
            while let Some(element) = queue.pop_front(&mut storage) {
                black_box(element);
            }
        });
    });

    group.bench_function("push_front/pop_back", |b| {
        b.iter(|| {
            for text in &payloads {
                black_box(queue.push_front(&mut storage, text).unwrap());
            }
            while let Some(element) = queue.pop_back(&mut storage) {
                black_box(element);
            }
        });
    });

    group.finish();
}

// ============================================================================
// Transforms
// ============================================================================

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    let payloads = payloads();

    group.bench_function("sort", |b| {
        b.iter_batched(
            || filled(&payloads),
            |(mut storage, mut queue)| {
                queue.sort(&mut storage, Order::Ascending);
                black_box(storage)
            },
            BatchSize::LargeInput,
        );
    });

    let (mut storage, mut queue) = filled(&payloads);

    group.bench_function("reverse", |b| {
        b.iter(|| queue.reverse(&mut storage));
    });

    group.bench_function("reverse_k/8", |b| {
        b.iter(|| queue.reverse_k(&mut storage, black_box(8)));
    });

    group.bench_function("swap", |b| {
        b.iter(|| queue.swap(&mut storage));
    });

    group.bench_function("ascend", |b| {
        b.iter_batched(
            || filled(&payloads),
            |(mut storage, mut queue)| black_box(queue.ascend(&mut storage)),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ============================================================================
// Consolidation
// ============================================================================

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    let payloads = payloads();

    for queues in [2usize, 8, 32] {
        group.bench_function(format!("{queues}_queues"), |b| {
            b.iter_batched(
                || {
                    let mut storage = RingBuilder::default()
                        .capacity(ELEMENTS + 2 * queues)
                        .build();
                    let mut chain = QueueChain::new();
                    for part in payloads.chunks(ELEMENTS.div_ceil(queues)) {
                        let mut queue = Queue::create(&mut storage).unwrap();
                        for text in part {
                            queue.push_back(&mut storage, text).unwrap();
                        }
                        chain.push(&storage, queue);
                    }
                    (storage, chain)
                },
                |(mut storage, mut chain)| black_box(chain.merge(&mut storage, Order::Ascending)),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_transforms, bench_merge);
criterion_main!(benches);
