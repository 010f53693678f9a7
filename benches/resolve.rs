use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use zonefib::Fib;

/// A synthetic RIB: a `/8` backbone plus `count` `/24`s scattered across it,
/// each pointing at one of a handful of egress zones.
fn synthetic_rib(count: usize) -> Vec<String> {
    let zones = ["e1", "e2", "e3", "e4"];
    let mut rows = vec!["10.0.0.0/8,backbone".to_string()];
    for i in 0..count {
        let b = (i / 256) % 256;
        let c = i % 256;
        let zone = zones[i % zones.len()];
        rows.push(format!("10.{b}.{c}.0/24,{zone}"));
    }
    rows
}

fn build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib-build");
    for size in [100usize, 1_000, 10_000] {
        let rib = synthetic_rib(size);
        group.throughput(Throughput::Elements(rib.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", size), &rib, |b, rib| {
            b.iter(|| Fib::build(rib.iter().map(String::as_str), ',').unwrap());
        });
    }
    group.finish();
}

fn resolve_single_benchmark(c: &mut Criterion) {
    let rib = synthetic_rib(10_000);
    let fib = Fib::build(rib.iter().map(String::as_str), ',').unwrap();

    let mut group = c.benchmark_group("resolve-single");
    for query in ["10.20.30.5", "10.20.30.0/24", "10.255.255.255"] {
        group.bench_with_input(BenchmarkId::new("expr", query), query, |b, query| {
            b.iter(|| fib.resolve_expression(query).unwrap());
        });
    }
    group.finish();
}

fn resolve_batch_benchmark(c: &mut Criterion) {
    let rib = synthetic_rib(10_000);
    let fib = Fib::build(rib.iter().map(String::as_str), ',').unwrap();

    let mut group = c.benchmark_group("resolve-batch");
    for batch_size in [100usize, 1_000, 10_000] {
        let queries: Vec<String> = (0..batch_size)
            .map(|i| {
                let b = (i / 256) % 256;
                let c = i % 256;
                format!("10.{b}.{c}.128")
            })
            .collect();
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(
            BenchmarkId::new("queries", batch_size),
            &queries,
            |b, queries| {
                b.iter(|| fib.resolve_batch(queries.iter().map(String::as_str)));
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    build_benchmark,
    resolve_single_benchmark,
    resolve_batch_benchmark
);
criterion_main!(benches);
