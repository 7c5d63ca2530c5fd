use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xcall_runtime::{Boundary, BoundaryConfig};
use xcall_sdk::{export, MarshaledValue, Side, ToBoundary};

#[export("ParamRef1")]
fn param_ref1(a: &mut i32) {
    *a = 42;
}

#[export("SumArray")]
fn sum_array(values: &[i64]) -> i64 {
    values.iter().fold(0i64, |acc, v| acc.wrapping_add(*v))
}

#[export("EchoStrings")]
fn echo_strings(values: &mut Vec<String>) {
    values.reverse();
}

fn boundary() -> Boundary {
    let mut builder = Boundary::builder(BoundaryConfig::default());
    builder
        .exports(
            Side::Managed,
            [param_ref1_export(), sum_array_export(), echo_strings_export()],
        )
        .unwrap();
    builder.build()
}

fn bench_scalar_call(c: &mut Criterion) {
    let boundary = boundary();

    c.bench_function("param_ref1", |b| {
        b.iter(|| {
            let mut args = [MarshaledValue::Int32(black_box(0))];
            boundary.call_managed("ParamRef1", &mut args).unwrap();
            args
        });
    });
}

fn bench_array_marshal(c: &mut Criterion) {
    let boundary = boundary();
    let mut group = c.benchmark_group("array_marshal");

    for len in [16usize, 1024, 65536] {
        let values: Vec<i64> = (0..len as i64).collect();
        group.throughput(Throughput::Bytes((len * 8) as u64));
        group.bench_with_input(BenchmarkId::new("int64", len), &values, |b, values| {
            b.iter(|| {
                let mut args = [black_box(values).to_boundary().unwrap()];
                boundary.call_managed("SumArray", &mut args).unwrap()
            });
        });
    }

    let strings: Vec<String> = (0..256).map(|i| format!("element string {}", i)).collect();
    group.bench_with_input(BenchmarkId::new("string", 256), &strings, |b, strings| {
        b.iter(|| {
            let mut args = [black_box(strings).to_boundary().unwrap()];
            boundary.call_managed("EchoStrings", &mut args).unwrap();
            args
        });
    });

    group.finish();
}

criterion_group!(benches, bench_scalar_call, bench_array_marshal);
criterion_main!(benches);
