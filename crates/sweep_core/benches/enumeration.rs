//! Enumeration throughput benchmarks for sweep_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sweep_core::{
    Dimensions, ParameterEnumerator, RandomSampleCombinator, RepeatPermuteCombinator,
};

fn values(count: u32) -> Vec<u32> {
    (1..=count).map(|v| v * 1000).collect()
}

fn bench_repeat_permute(c: &mut Criterion) {
    let sizes = vec![("small", 2, 5), ("medium", 10, 15), ("large", 40, 30)];

    let mut group = c.benchmark_group("repeat_permute");
    for (name, width, repetitions) in sizes {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(width, repetitions),
            |b, &(width, repetitions)| {
                b.iter(|| {
                    let combinator = RepeatPermuteCombinator::new(
                        values(width),
                        values(width),
                        values(width),
                        repetitions,
                    )
                    .unwrap();
                    black_box(combinator.fold(0u64, |acc, c| acc + u64::from(c.bins())));
                });
            },
        );
    }
    group.finish();
}

fn bench_peek_then_pull(c: &mut Criterion) {
    c.bench_function("peek_then_pull", |b| {
        b.iter(|| {
            let mut combinator =
                RepeatPermuteCombinator::new(values(10), values(10), values(10), 15).unwrap();
            let mut pulled = 0usize;
            while combinator.has_next() {
                black_box(combinator.next());
                pulled += 1;
            }
            black_box(pulled);
        });
    });
}

fn bench_random_sample(c: &mut Criterion) {
    c.bench_function("random_sample_plan", |b| {
        b.iter(|| {
            let dimensions = Dimensions::new(values(40), values(40), values(40)).unwrap();
            let combinator = RandomSampleCombinator::new(dimensions, 2_000, 42, 1).unwrap();
            black_box(combinator.total_combinations());
        });
    });
}

criterion_group!(
    benches,
    bench_repeat_permute,
    bench_peek_then_pull,
    bench_random_sample
);
criterion_main!(benches);
