//! Benchmarks for the oversampled oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use wolp::dsp::oscillator::Oscillator;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // 16 raw samples and 4 filter sections per output sample
        let mut osc = Oscillator::new();
        osc.set_frequency(SAMPLE_RATE, 440.0);
        group.bench_with_input(BenchmarkId::new("saw", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        let mut osc = Oscillator::new();
        osc.set_multipliers(0.5, 0.3, 0.2);
        osc.set_frequency(SAMPLE_RATE, 440.0);
        group.bench_with_input(BenchmarkId::new("blend", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
