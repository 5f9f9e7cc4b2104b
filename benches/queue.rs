use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fifod::core::{FreeBlockPool, Queue};

fn new_queue(block_size: usize, free_cap: usize) -> Queue {
    Queue::new(
        b"bench".to_vec().into_boxed_slice(),
        block_size,
        1 << 20,
        Arc::new(FreeBlockPool::new(free_cap)),
    )
}

fn benchmark_rpush(c: &mut Criterion) {
    let queue = new_queue(8 << 20, 8);
    let payload = vec![0u8; 128];

    c.bench_function("queue_rpush_small_payload", |bench| {
        bench.iter(|| black_box(queue.rpush(&payload).unwrap()))
    });
}

fn benchmark_rpush_rpop_cycle(c: &mut Criterion) {
    let queue = new_queue(8 << 20, 8);
    let payload = vec![0u8; 128];

    c.bench_function("queue_rpush_rpop_cycle", |bench| {
        bench.iter(|| {
            queue.rpush(&payload).unwrap();
            black_box(queue.rpop());
        })
    });
}

fn benchmark_count(c: &mut Criterion) {
    let queue = new_queue(8 << 20, 8);
    for _ in 0..1000 {
        queue.rpush(b"x").unwrap();
    }

    c.bench_function("queue_count", |bench| bench.iter(|| black_box(queue.count())));
}

fn benchmark_batch_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_batch");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("rpush_then_lpop_1000", |bench| {
        bench.iter(|| {
            let queue = new_queue(8 << 20, 8);
            for i in 0..1000u32 {
                queue.rpush(&i.to_le_bytes()).unwrap();
            }
            for _ in 0..1000 {
                black_box(queue.lpop());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rpush,
    benchmark_rpush_rpop_cycle,
    benchmark_count,
    benchmark_batch_push_pop
);
criterion_main!(benches);
