use std::f64::consts::{FRAC_PI_2, TAU};

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use ndarray::Array1;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use skymap::transform;

fn radecs(n: usize) -> (Array1<f64>, Array1<f64>) {
    let ra = Array1::random(n, Uniform::new(0., TAU));
    let dec = Array1::random(n, Uniform::new(-FRAC_PI_2, FRAC_PI_2));
    (ra, dec)
}

fn horizontal_benchmark(c: &mut Criterion) {
    let mut horizontal = c.benchmark_group("horizontal");
    horizontal.sample_size(20);

    let latitude = 40f64.to_radians();
    let lst = 1.7;

    horizontal.bench_function("horizontal blocking", |b| {
        b.iter_batched(
            || radecs(100_000),
            |(ra, dec)| transform::to_horizontal(ra.view(), dec.view(), latitude, lst),
            BatchSize::SmallInput,
        )
    });

    horizontal.bench_function("horizontal parallel", |b| {
        b.iter_batched(
            || radecs(100_000),
            |(ra, dec)| transform::to_horizontal_par(ra.view(), dec.view(), latitude, lst),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, horizontal_benchmark);
criterion_main!(benches);
