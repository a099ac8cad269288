//! Benchmarks for the polyphonic engine with several held notes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use wolp::synth::{NoMessages, Synth, SynthConfig};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const CHORD: &[u8] = &[36, 48, 55, 60, 64, 67, 71, 74];

pub fn bench_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/polyphony");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for voices in [1, 4, 8] {
            let config = SynthConfig {
                sample_rate: SAMPLE_RATE,
                max_voices: 16,
                ..Default::default()
            };
            let mut synth = Synth::new(config, NoMessages).expect("valid config");
            for &note in &CHORD[..voices] {
                synth.note_on(0, note, 0.8);
            }

            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.fill(0.0);
                        synth.render_next_block(black_box(&mut buffer), 0, size);
                    })
                },
            );
        }
    }

    group.finish();
}
