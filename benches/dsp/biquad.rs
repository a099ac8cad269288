//! Benchmarks for biquad design and filtering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use wolp::dsp::biquad::{Biquad, BiquadCascade, BiquadCoeffs, BiquadType};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/biquad");

    // Coefficient design runs once per block in the engine
    group.bench_function("design_bandpass", |b| {
        b.iter(|| {
            BiquadCoeffs::design(
                BiquadType::BandPassPeak,
                black_box(1_200.0),
                SAMPLE_RATE,
                black_box(2.5),
                0.0,
                true,
            )
        })
    });

    let lowpass =
        BiquadCoeffs::design(BiquadType::LowPass, 2_000.0, SAMPLE_RATE, 0.707, 0.0, false);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| ((i * 7) % 13) as f32 / 6.5 - 1.0).collect();
        let mut output = vec![0.0f32; size];

        let mut stage = Biquad::new();
        stage.set_coeffs(lowpass);
        group.bench_with_input(BenchmarkId::new("single", size), &size, |b, _| {
            b.iter(|| {
                for (o, &x) in output.iter_mut().zip(input.iter()) {
                    *o = stage.run(black_box(x));
                }
            })
        });

        // Same depth as the tone filter at full section count
        let mut cascade = BiquadCascade::<8>::new();
        cascade.set_coeffs(lowpass);
        group.bench_with_input(BenchmarkId::new("cascade_8", size), &size, |b, _| {
            b.iter(|| {
                for (o, &x) in output.iter_mut().zip(input.iter()) {
                    *o = cascade.run(black_box(x));
                }
            })
        });
    }

    group.finish();
}
