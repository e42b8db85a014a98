use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use shardstore::{BackendKind, Shard, ShardBackend, ShardOptions};

const KINDS: [BackendKind; 3] = [BackendKind::Map, BackendKind::Lru, BackendKind::Arena];

fn options() -> ShardOptions {
    ShardOptions {
        capacity: 1000,
        value_buffer_len: 5000,
        max_arena_bytes: 0,
    }
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("shard_set");
    group.sample_size(50);
    group.throughput(Throughput::Elements(100));

    // Fresh shard per batch: the arena never reclaims overwritten records
    for kind in KINDS {
        group.bench_function(format!("set_100x1kb_{}", kind), |b| {
            let data = vec![b'x'; 1024];

            b.iter_batched(
                || Shard::new(kind, &options()),
                |shard| {
                    for key in 0..100 {
                        shard.set(key, data.clone()).unwrap();
                    }
                    black_box(shard)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("shard_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for kind in KINDS {
        group.bench_function(format!("get_1kb_{}", kind), |b| {
            let shard = Shard::new(kind, &options());
            let data = vec![b'x'; 1024];

            // Pre-populate with 100 keys
            for key in 0..100 {
                shard.set(key, data.clone()).unwrap();
            }

            let mut counter = 0u32;
            b.iter(|| {
                black_box(shard.get(counter % 100).unwrap());
                counter = counter.wrapping_add(1);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_set, bench_get);
criterion_main!(benches);
