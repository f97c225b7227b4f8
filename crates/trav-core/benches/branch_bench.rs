//! Branch dispatch benchmarks
//!
//! Run with: cargo bench -p trav-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trav_core::{Compilation, MapFn, SwitchBranch, UnionBranch};

fn incr() -> Compilation<u64, i64, i64> {
    Compilation::identity().map(MapFn::new("incr", |x: &i64| x.wrapping_add(1)))
}

fn bench_union_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("union_fan_out");
    let inputs: Vec<i64> = (0..1_000).collect();

    for width in [1usize, 4, 16] {
        let program = Compilation::identity().branch(UnionBranch::new(vec![incr(); width]));
        group.throughput(Throughput::Elements((inputs.len() * width) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| black_box(program.evaluate_objects(inputs.clone()).unwrap()));
        });
    }
    group.finish();
}

fn bench_switch_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("switch_lookup");
    let inputs: Vec<i64> = (0..1_000).collect();

    for cases in [2i64, 16, 128] {
        let selector = Compilation::identity().map(MapFn::new("mod", move |x: &i64| x % cases));
        let switch = (0..cases).fold(SwitchBranch::new(selector), |s, key| s.case(key, incr()));
        let program = Compilation::identity().branch(switch);
        group.bench_with_input(BenchmarkId::from_parameter(cases), &cases, |b, _| {
            b.iter(|| black_box(program.evaluate_objects(inputs.clone()).unwrap()));
        });
    }
    group.finish();
}

fn bench_parallel_union(c: &mut Criterion) {
    let inputs: Vec<i64> = (0..10_000).collect();
    let serial = Compilation::identity().branch(UnionBranch::new(vec![incr(); 4]));
    let parallel = serial.clone().parallel(4).unwrap();

    let mut group = c.benchmark_group("parallel_union");
    group.bench_function("serial", |b| {
        b.iter(|| black_box(serial.evaluate_objects(inputs.clone()).unwrap()));
    });
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(parallel.evaluate_objects(inputs.clone()).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_union_fan_out, bench_switch_lookup, bench_parallel_union);
criterion_main!(benches);
