use criterion::{criterion_group, criterion_main, Criterion};
use homeshare::community::Community;
use homeshare::parameters::{Parameters, Ruleset};
use homeshare::report::MemoryReportSink;

fn run(parameters: &Parameters) -> Community {
    let mut community = Community::from_parameters(parameters.clone(), 42).unwrap();
    let mut sink = MemoryReportSink::new();
    community.run(&mut sink).unwrap();
    community
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let by_shares = Parameters::default();
    c.bench_function("default run", |bencher| {
        bencher.iter_with_large_drop(|| run(&by_shares));
    });

    let normal_rent = Parameters {
        ruleset: Ruleset::NormalRent,
        allow_inheritance: true,
        ..Parameters::default()
    };
    c.bench_function("normal rent with inheritance", |bencher| {
        bencher.iter_with_large_drop(|| run(&normal_rent));
    });
}

criterion_group!(example_benches, criterion_benchmark);
criterion_main!(example_benches);
