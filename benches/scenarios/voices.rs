//! Benchmarks for a single voice: oscillator → tone filter → envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use wolp::{
    dsp::tone::ToneSettings,
    synth::{voice::PITCH_WHEEL_CENTRE, NoteTarget, RenderCtx, Voice},
    ParamId, ParamSnapshot, ParamStore,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn snapshot(sections: f32) -> ParamSnapshot {
    let store = ParamStore::new();
    store.set(ParamId::NFilters, sections);
    store.set(ParamId::Rect, 0.5);
    store.snapshot()
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for sections in [1.0, 4.0, 8.0] {
            let params = snapshot(sections);
            let tone = ToneSettings::design(
                SAMPLE_RATE,
                params[ParamId::Cutoff],
                0.5,
                params[ParamId::Resonance],
                params[ParamId::Bandwidth],
                params[ParamId::NFilters],
            );
            let ctx = RenderCtx {
                sample_rate: SAMPLE_RATE,
                params: &params,
                tone: &tone,
                pitch_bend_range: 2.0,
            };

            // A2, typical bass note
            let mut voice = Voice::new(SAMPLE_RATE);
            voice.start_note(45, 0.8, PITCH_WHEEL_CENTRE, &ctx);

            let name = format!("voice_{}_sections", sections as usize);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.fill(0.0);
                    voice.render_next_block(black_box(&mut buffer), 0, size, &ctx);
                })
            });
        }
    }

    group.finish();
}
