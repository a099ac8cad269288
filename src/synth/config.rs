#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{WolpError, WolpResult};

/// Construction-time settings for a [`Synth`](super::poly::Synth).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f32,
    /// Size of the voice pool.
    pub max_voices: usize,
    /// Capacity of the note queue created by `Synth::with_queue`.
    pub message_capacity: usize,
    /// Pitch wheel range in semitones, each direction.
    pub pitch_bend_range: f32,
}

impl SynthConfig {
    pub fn validate(&self) -> WolpResult<()> {
        validate_sample_rate(self.sample_rate)?;
        if !(self.pitch_bend_range.is_finite() && self.pitch_bend_range >= 0.0) {
            return Err(WolpError::InvalidPitchBendRange {
                range: self.pitch_bend_range,
            });
        }
        if self.max_voices == 0 {
            return Err(WolpError::NoVoices);
        }
        if self.message_capacity == 0 {
            return Err(WolpError::NoMessageCapacity);
        }
        Ok(())
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_voices: 16,
            message_capacity: 256,
            pitch_bend_range: 2.0,
        }
    }
}

pub(crate) fn validate_sample_rate(rate: f32) -> WolpResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(WolpError::InvalidSampleRate { rate })
    }
}
