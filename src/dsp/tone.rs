use crate::dsp::biquad::{BiquadCascade, BiquadCoeffs, BiquadType};

/*
Tone Filter
===========

Each voice runs its decimated oscillator output through a bandpass cascade of
up to eight biquad sections. All sections share one design; stacking them
steepens the skirts while the 0 dB-peak bandpass keeps the centre at unity.

Parameters
----------

  cutoff      Centre frequency in Hz before modulation.
  bandwidth   Width of each section in octaves.
  resonance   0..1, narrows the band: bw · (1 - 0.9 · resonance).
  sections    How many of the eight sections are in the signal path.
  modulation  Offset in octaves applied to the cutoff (velocity sweep).

The design is computed once per render block by the engine (`ToneSettings`)
and copied into every voice's cascade. Each voice keeps its own history, so
changing the design never resets the filters.
*/

/// Maximum number of bandpass sections per voice.
pub const TONE_SECTIONS: usize = 8;

/// Highest centre frequency as a fraction of the sample rate.
const MAX_CUTOFF_RATIO: f32 = 0.45;
const MIN_CUTOFF_HZ: f32 = 20.0;
const MIN_BANDWIDTH_OCTAVES: f32 = 0.05;

/// Shared per-block tone design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSettings {
    pub coeffs: BiquadCoeffs,
    pub sections: usize,
    /// Centre frequency actually used, after modulation and clamping.
    pub cutoff_hz: f32,
}

impl ToneSettings {
    /// Design the tone filter for one block.
    ///
    /// `modulation` is in octaves. Out-of-range input is clamped, never
    /// rejected: the cutoff to [20 Hz, 0.45 · sample_rate], sections to
    /// [1, 8] and the bandwidth to at least 0.05 octaves.
    pub fn design(
        sample_rate: f32,
        cutoff: f32,
        modulation: f32,
        resonance: f32,
        bandwidth: f32,
        sections: f32,
    ) -> Self {
        let max_cutoff = (sample_rate * MAX_CUTOFF_RATIO).max(MIN_CUTOFF_HZ);
        let modulated = cutoff * 2.0_f32.powf(modulation);
        let cutoff_hz = if modulated.is_finite() {
            modulated.clamp(MIN_CUTOFF_HZ, max_cutoff)
        } else {
            MIN_CUTOFF_HZ
        };

        let resonance = if resonance.is_finite() {
            resonance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let octaves = (bandwidth * (1.0 - 0.9 * resonance)).max(MIN_BANDWIDTH_OCTAVES);

        let sections = if sections.is_finite() {
            (sections.round() as usize).clamp(1, TONE_SECTIONS)
        } else {
            1
        };

        Self {
            coeffs: BiquadCoeffs::design(
                BiquadType::BandPassPeak,
                cutoff_hz,
                sample_rate,
                octaves,
                0.0,
                true,
            ),
            sections,
            cutoff_hz,
        }
    }
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            coeffs: BiquadCoeffs::IDENTITY,
            sections: 1,
            cutoff_hz: 0.0,
        }
    }
}

/// Per-voice bandpass cascade.
pub struct ToneFilter {
    cascade: BiquadCascade<TONE_SECTIONS>,
    settings: ToneSettings,
}

impl ToneFilter {
    pub fn new() -> Self {
        Self {
            cascade: BiquadCascade::new(),
            settings: ToneSettings::default(),
        }
    }

    /// Adopt a new design. History is untouched.
    pub fn apply(&mut self, settings: &ToneSettings) {
        if self.settings.coeffs != settings.coeffs {
            self.cascade.set_coeffs(settings.coeffs);
        }
        self.settings = *settings;
    }

    pub fn settings(&self) -> &ToneSettings {
        &self.settings
    }

    #[inline]
    pub fn run(&mut self, x: f32) -> f32 {
        self.cascade.run_active(x, self.settings.sections)
    }

    pub fn reset(&mut self) {
        self.cascade.reset();
    }
}

impl Default for ToneFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak_response(settings: &ToneSettings, freq: f32) -> f32 {
        let mut filter = ToneFilter::new();
        filter.apply(settings);
        (0..9_600)
            .map(|n| filter.run((TAU * freq * n as f32 / SAMPLE_RATE).sin()))
            .skip(4_800)
            .fold(0.0f32, |acc, x| acc.max(x.abs()))
    }

    #[test]
    fn centre_passes_and_edges_are_cut() {
        let settings = ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.0, 2.0, 4.0);

        let centre = peak_response(&settings, 1_000.0);
        let far = peak_response(&settings, 10_000.0);

        assert!((centre - 1.0).abs() < 0.05, "centre {centre}");
        assert!(far < 0.1, "far {far}");
    }

    #[test]
    fn modulation_shifts_cutoff_by_octaves() {
        let settings = ToneSettings::design(SAMPLE_RATE, 500.0, 2.0, 0.0, 1.0, 1.0);
        assert!((settings.cutoff_hz - 2_000.0).abs() < 0.01);
    }

    #[test]
    fn cutoff_is_clamped_below_nyquist() {
        let settings = ToneSettings::design(SAMPLE_RATE, 18_000.0, 3.0, 0.0, 1.0, 8.0);
        assert!(settings.cutoff_hz <= SAMPLE_RATE * 0.45);
        assert_ne!(settings.coeffs, BiquadCoeffs::IDENTITY);
    }

    #[test]
    fn section_count_is_clamped() {
        assert_eq!(ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.0, 1.0, 0.0).sections, 1);
        assert_eq!(ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.0, 1.0, 3.4).sections, 3);
        assert_eq!(ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.0, 1.0, 42.0).sections, 8);
    }

    #[test]
    fn more_sections_cut_harder() {
        let one = ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.0, 2.0, 1.0);
        let eight = ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.0, 2.0, 8.0);

        assert!(peak_response(&eight, 5_000.0) < peak_response(&one, 5_000.0) * 0.1);
    }

    #[test]
    fn resonance_narrows_the_band() {
        let open = ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.0, 2.0, 2.0);
        let resonant = ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.9, 2.0, 2.0);

        assert!(peak_response(&resonant, 2_000.0) < peak_response(&open, 2_000.0));
    }

    #[test]
    fn apply_keeps_history() {
        let settings = ToneSettings::design(SAMPLE_RATE, 1_000.0, 0.0, 0.0, 2.0, 2.0);
        let mut filter = ToneFilter::new();
        filter.apply(&settings);
        for _ in 0..16 {
            filter.run(1.0);
        }

        let mut copy = ToneFilter::new();
        copy.apply(&settings);
        let fresh = copy.run(1.0);

        filter.apply(&ToneSettings::design(SAMPLE_RATE, 1_100.0, 0.0, 0.0, 2.0, 2.0));
        let continued = filter.run(1.0);
        assert_ne!(continued, fresh);
        assert!(continued.is_finite());
    }
}
