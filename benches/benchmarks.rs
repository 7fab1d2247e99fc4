use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;
use synced_json::SyncedDict;

fn bench_path(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("synced_json_bench_{}_{}.json", name, size))
}

// Every mutation rewrites the whole document, so per-mutation cost is
// expected to grow with document size. These benchmarks pin that property
// down rather than hide it.
fn bench_insert_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_into_sized_doc");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [10, 100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("dict", size), &size, |b, &size| {
            let path = bench_path("insert", size);
            let _ = std::fs::remove_file(&path);
            let doc = SyncedDict::open(&path, false).unwrap();
            doc.extend((0..size).map(|i| (format!("k{i}"), i as i64)))
                .unwrap();
            b.iter(|| doc.insert("probe", 1).unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_durable_vs_fast(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_concern");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for durable in [false, true] {
        let label = if durable { "atomic" } else { "overwrite" };
        group.bench_with_input(BenchmarkId::new(label, 1000), &durable, |b, &durable| {
            let path = bench_path(label, 1000);
            let _ = std::fs::remove_file(&path);
            let doc = SyncedDict::open(&path, durable).unwrap();
            doc.extend((0..1000).map(|i| (format!("k{i}"), i as i64)))
                .unwrap();
            b.iter(|| doc.insert("probe", 1).unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for size in [100, 10_000] {
        group.bench_with_input(BenchmarkId::new("dict", size), &size, |b, &size| {
            let path = bench_path("get", size);
            let _ = std::fs::remove_file(&path);
            let doc = SyncedDict::open(&path, false).unwrap();
            doc.extend((0..size).map(|i| (format!("k{i}"), i as i64)))
                .unwrap();
            b.iter(|| black_box(doc.get("k0").unwrap()));
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_nested_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_push");
    group.sample_size(50);
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("list_in_dict", size), &size, |b, &size| {
            let path = bench_path("nested", size);
            let _ = std::fs::remove_file(&path);
            let doc = SyncedDict::open(&path, false).unwrap();
            doc.extend((0..size).map(|i| (format!("k{i}"), i as i64)))
                .unwrap();
            doc.insert("items", serde_json::json!([])).unwrap();
            let items = doc.list("items").unwrap();
            b.iter(|| items.push(1).unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("reload");
    group.sample_size(50);
    for size in [100, 10_000] {
        group.bench_with_input(BenchmarkId::new("dict", size), &size, |b, &size| {
            let path = bench_path("reload", size);
            let _ = std::fs::remove_file(&path);
            let doc = SyncedDict::open(&path, false).unwrap();
            doc.extend((0..size).map(|i| (format!("k{i}"), i as i64)))
                .unwrap();
            b.iter(|| doc.reload().unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

criterion_group!(
    benches,
    bench_insert_scaling,
    bench_durable_vs_fast,
    bench_get,
    bench_nested_push,
    bench_reload,
);
criterion_main!(benches);
