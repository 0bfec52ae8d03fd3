use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pailstore::{DiskStore, RawCodec, Store};
use tempfile::TempDir;

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_1kb_overwrite", |b| {
        let dir = TempDir::new().unwrap();
        let mut store = DiskStore::open(dir.path().join("bench"), RawCodec).unwrap();
        let a = vec![b'a'; 1024];
        let z = vec![b'z'; 1024];

        // Alternate payloads so every put tombstones and appends.
        let mut counter = 0u64;
        b.iter(|| {
            let value = if counter % 2 == 0 { &a } else { &z };
            store.put("hot", value.clone()).unwrap();
            counter += 1;
        });
    });
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_1kb", |b| {
        let dir = TempDir::new().unwrap();
        let mut store = DiskStore::open(dir.path().join("bench"), RawCodec).unwrap();
        let data = vec![b'x'; 1024];

        let keys = ["a", "b", "c", "d"];
        for key in &keys {
            store.put(key, data.clone()).unwrap();
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(store.get(keys[counter % keys.len()]).unwrap());
            counter += 1;
        });
    });
    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let dir = TempDir::new().unwrap();
        let mut store = DiskStore::open(dir.path().join("bench"), RawCodec).unwrap();
        let a = vec![b'a'; 1024];
        let z = vec![b'z'; 1024];

        let keys = ["a", "b", "c", "d"];
        for key in &keys {
            store.put(key, a.clone()).unwrap();
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter % 2 == 0 {
                black_box(store.get(keys[(counter as usize / 2) % keys.len()]).ok());
            } else {
                let value = if counter % 4 == 1 { &z } else { &a };
                store.put("hot", value.clone()).ok();
            }
            counter += 1;
        });
    });
    group.finish();
}

criterion_group!(benches, bench_put, bench_get, bench_mixed_workload);
criterion_main!(benches);
