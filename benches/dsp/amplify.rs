//! Benchmarks for the master gain and soft limiter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use wolp::dsp::amplify;

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 4.0 - 2.0)
            .collect();
        let mut buffer = signal.clone();

        // tanh per sample
        group.bench_with_input(BenchmarkId::new("gain_clip", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&signal);
                amplify::apply_gain_clip(black_box(&mut buffer), black_box(0.8), black_box(0.9))
            })
        });
    }

    group.finish();
}
