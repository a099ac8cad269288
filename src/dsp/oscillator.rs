use std::f32::consts::FRAC_1_SQRT_2;

use crate::dsp::biquad::{BiquadCascade, BiquadCoeffs, BiquadType};

/*
Oversampled Blend Oscillator
============================

The oscillator blends three naive waveforms (saw, rectangle, triangle) and
generates them at 16x the output rate. Naive waveforms have hard corners, and
hard corners contain harmonics all the way up - far beyond Nyquist. Sampled
directly at the output rate, those harmonics fold back ("alias") into the
audible band as inharmonic whine.

Oversample, Filter, Decimate
----------------------------

  1. Step the phase 16 times per output sample, producing 16 raw samples.
  2. Run each raw sample through a 4-section lowpass at 0.4 x output rate.
     Everything the lowpass removes would have aliased after decimation.
  3. Average the 16 filtered samples into one output sample.

This costs 16x the work of a naive oscillator, which is a good deal cheaper
than the ear-ache of naive aliasing on high notes.


Phase and Shapes
----------------

Phase lives in (-1, 1] and wraps by subtracting 2. One wrap is one cycle.

  saw   = phase                       ramps -1 → 1 every cycle
  rect  = phase < 0.5 ? -1 : +1       high for the last quarter of the cycle
  tri   = phase on even cycles,       ramps up, then down on the next cycle,
          -phase on odd cycles        so the triangle spans two cycles

The cycle counter's parity flips the triangle's direction, which places the
triangle component one octave below the saw and rectangle.
*/

/// Number of raw samples generated per output sample.
pub const OVERSAMPLING: usize = 16;

/// Lowpass sections applied before decimation.
pub const ANTI_ALIAS_SECTIONS: usize = 4;

/// Anti-aliasing cutoff as a fraction of the output sample rate.
const ANTI_ALIAS_CUTOFF: f32 = 0.4;

pub struct Oscillator {
    saw_factor: f32,
    rect_factor: f32,
    tri_factor: f32,

    /// Phase increment per oversampled tick.
    sample_step: f64,
    phase: f64,
    cycle_count: u32,

    filter: BiquadCascade<ANTI_ALIAS_SECTIONS>,
    /// Output rate the filter was last designed for.
    design_rate: f32,
}

impl Oscillator {
    pub fn new() -> Self {
        Self {
            saw_factor: 1.0,
            rect_factor: 0.0,
            tri_factor: 0.0,
            sample_step: 0.0,
            phase: 0.0,
            cycle_count: 0,
            filter: BiquadCascade::new(),
            design_rate: 0.0,
        }
    }

    /// Set the pitch and (re)design the anti-aliasing filter for `sample_rate`.
    ///
    /// The frequency is clamped to [0, Nyquist]. Filter history is kept, so
    /// calling this mid-note (pitch bend) stays continuous.
    pub fn set_frequency(&mut self, sample_rate: f32, note_frequency: f32) {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            self.sample_step = 0.0;
            return;
        }

        let nyquist = sample_rate * 0.5;
        let frequency = if note_frequency.is_finite() {
            note_frequency.clamp(0.0, nyquist)
        } else {
            0.0
        };

        // One cycle spans a phase range of 2.
        self.sample_step = 2.0 * frequency as f64 / (sample_rate as f64 * OVERSAMPLING as f64);

        if self.design_rate != sample_rate {
            self.filter.set_coeffs(Self::anti_alias_design(sample_rate));
            self.design_rate = sample_rate;
        }
    }

    /// Anti-aliasing lowpass design for a given output rate.
    pub fn anti_alias_design(sample_rate: f32) -> BiquadCoeffs {
        BiquadCoeffs::design(
            BiquadType::LowPass,
            sample_rate * ANTI_ALIAS_CUTOFF,
            sample_rate * OVERSAMPLING as f32,
            FRAC_1_SQRT_2,
            0.0,
            false,
        )
    }

    /// Set the waveform blend. The weights are normalised to sum to 1.
    /// Negative or non-finite inputs count as 0; if nothing is left the
    /// oscillator falls back to a pure saw.
    pub fn set_multipliers(&mut self, saw: f32, rect: f32, tri: f32) {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let (mut saw, rect, tri) = (sanitize(saw), sanitize(rect), sanitize(tri));

        let mut total = saw + rect + tri;
        if total <= 0.0 {
            saw = 1.0;
            total = 1.0;
        }

        let scale = 1.0 / total;
        self.saw_factor = saw * scale;
        self.rect_factor = rect * scale;
        self.tri_factor = tri * scale;
    }

    /// Current (saw, rect, tri) weights.
    pub fn multipliers(&self) -> (f32, f32, f32) {
        (self.saw_factor, self.rect_factor, self.tri_factor)
    }

    pub fn sample_step(&self) -> f64 {
        self.sample_step
    }

    pub fn anti_alias_coeffs(&self) -> BiquadCoeffs {
        self.filter
            .stage(0)
            .map(|stage| stage.coeffs())
            .unwrap_or_default()
    }

    /// Start a new note from phase zero with a clean filter.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.cycle_count = 0;
        self.filter.reset();
    }

    /// One output sample: 16 raw samples, filtered and averaged.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let mut sum = 0.0;
        for _ in 0..OVERSAMPLING {
            let raw = self.next_raw_sample();
            sum += self.filter.run(raw);
        }
        sum / OVERSAMPLING as f32
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    #[inline]
    fn next_raw_sample(&mut self) -> f32 {
        let phase = self.phase as f32;
        let saw = phase;
        let rect = if phase < 0.5 { -1.0 } else { 1.0 };
        let tri = if self.cycle_count & 1 == 1 { -phase } else { phase };

        let value = saw * self.saw_factor + rect * self.rect_factor + tri * self.tri_factor;

        self.phase += self.sample_step;
        if self.phase > 1.0 {
            self.cycle_count = self.cycle_count.wrapping_add(1);
            self.phase -= 2.0;
        }

        value
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}
