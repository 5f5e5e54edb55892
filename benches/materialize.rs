//! Benchmarks for timeline materialization.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use stepviz::{
    algorithm::{Algorithm, BubbleSort, MergeSort, SelectionSort, materialize, materialize_many},
    schema::{DatasetShape, DatasetSpec},
};

fn bench_materialize(c: &mut Criterion) {
    let algorithms: [(&str, &dyn Algorithm); 3] = [
        ("bubble", &BubbleSort),
        ("selection", &SelectionSort),
        ("merge", &MergeSort),
    ];

    for (name, algorithm) in algorithms {
        let mut group = c.benchmark_group(format!("materialize_{}", name));

        for n in [16, 64, 256] {
            let input = DatasetSpec::new(n, 42).generate();

            group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
                b.iter(|| materialize(algorithm, black_box(input)));
            });
        }

        group.finish();
    }
}

fn bench_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("bubble_shapes");

    for shape in [
        DatasetShape::Random,
        DatasetShape::Reversed,
        DatasetShape::NearlySorted,
        DatasetShape::FewUnique,
    ] {
        let input = DatasetSpec {
            shape,
            ..DatasetSpec::new(128, 7)
        }
        .generate();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", shape)),
            &input,
            |b, input| {
                b.iter(|| materialize(&BubbleSort, black_box(input)));
            },
        );
    }

    group.finish();
}

fn bench_materialize_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize_many");

    for batch in [8, 32] {
        let inputs: Vec<Vec<f64>> = (0..batch)
            .map(|seed| DatasetSpec::new(48, seed).generate())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(batch), &inputs, |b, inputs| {
            b.iter(|| materialize_many(&SelectionSort, black_box(inputs)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_materialize, bench_shapes, bench_materialize_many);
criterion_main!(benches);
