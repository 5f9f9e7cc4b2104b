use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fifod::core::Pool;

fn benchmark_alloc_growing_pool(c: &mut Criterion) {
    c.bench_function("pool_alloc_growing", |bench| {
        bench.iter(|| {
            let mut pool: Pool<u64> = Pool::new(1024);
            for i in 0..1024u64 {
                black_box(pool.alloc(i).unwrap());
            }
        })
    });
}

fn benchmark_alloc_release_cycle(c: &mut Criterion) {
    let mut pool: Pool<u64> = Pool::new(1024);
    let idx = pool.alloc(0).unwrap();
    pool.release(idx);

    c.bench_function("pool_alloc_release_recycled_slot", |bench| {
        bench.iter(|| {
            let idx = pool.alloc(black_box(1)).unwrap();
            black_box(pool.release(idx));
        })
    });
}

fn benchmark_get(c: &mut Criterion) {
    let mut pool: Pool<u64> = Pool::new(1024);
    let idx = pool.alloc(42).unwrap();

    c.bench_function("pool_get", |bench| {
        bench.iter(|| black_box(pool.get(idx)))
    });
}

fn benchmark_batch_alloc_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_batch");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("alloc_release_1000", |bench| {
        bench.iter(|| {
            let mut pool: Pool<u64> = Pool::new(1000);
            let indices: Vec<_> = (0..1000u64).map(|i| pool.alloc(i).unwrap()).collect();
            for idx in indices {
                black_box(pool.release(idx));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_alloc_growing_pool,
    benchmark_alloc_release_cycle,
    benchmark_get,
    benchmark_batch_alloc_release
);
criterion_main!(benches);
