//! The engine's parameter table.
//!
//! Every knob the engine reads is a [`ParamId`] with static metadata in
//! [`PARAM_INFOS`]. Values live in a lock-free [`ParamStore`] shared between
//! the control thread (writes) and the render thread (reads one
//! [`ParamSnapshot`] per block).

mod state;
mod store;

pub use store::{ParamSnapshot, ParamStore};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Static description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamInfo {
    /// Stable identifier used in presets.
    pub internal_name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamInfo {
    /// Clamp `value` into [min, max].
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Map a plain value to 0..1.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Map 0..1 back to a plain value.
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// Parameter index. The discriminants are persisted; append only.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ParamId {
    /// Master gain (linear).
    Gain = 0,
    /// Soft-limit ceiling.
    Clip,
    /// Saw weight in the oscillator blend.
    Saw,
    /// Rectangle weight.
    Rect,
    /// Triangle weight.
    Tri,
    /// Tuning ratio against A4 = 440 Hz.
    Tune,
    /// Tone filter centre frequency (Hz).
    Cutoff,
    /// Tone filter resonance (narrows the band).
    Resonance,
    /// Tone filter bandwidth (octaves).
    Bandwidth,
    /// How far velocity sweeps the cutoff.
    Velocity,
    /// Velocity smoothing time constant (seconds).
    Inertia,
    /// Active tone filter sections.
    NFilters,
    /// Read-only monitor: cutoff used on the last block (Hz).
    CurCutoff,
    /// Attack time (seconds).
    Attack,
    /// Decay time (seconds).
    Decay,
    /// Sustain level.
    Sustain,
    /// Release time (seconds).
    Release,
}

pub const PARAM_COUNT: usize = 17;

#[rustfmt::skip]
pub static PARAM_INFOS: [ParamInfo; PARAM_COUNT] = [
    ParamInfo { internal_name: "gain", label: "Gain", min: 0.0, max: 2.0, default: 0.5 },
    ParamInfo { internal_name: "clip", label: "Clip", min: 0.01, max: 1.0, default: 0.9 },
    ParamInfo { internal_name: "gsaw", label: "Saw", min: 0.0, max: 1.0, default: 1.0 },
    ParamInfo { internal_name: "grect", label: "Rect", min: 0.0, max: 1.0, default: 0.0 },
    ParamInfo { internal_name: "gtri", label: "Triangle", min: 0.0, max: 1.0, default: 0.0 },
    ParamInfo { internal_name: "tune", label: "Tune", min: 0.5, max: 2.0, default: 1.0 },
    ParamInfo { internal_name: "cutoff", label: "Cutoff", min: 20.0, max: 20_000.0, default: 1_000.0 },
    ParamInfo { internal_name: "resonance", label: "Resonance", min: 0.0, max: 1.0, default: 0.2 },
    ParamInfo { internal_name: "bandwidth", label: "Bandwidth", min: 0.1, max: 8.0, default: 3.0 },
    ParamInfo { internal_name: "velocity", label: "Velocity", min: 0.0, max: 1.0, default: 0.5 },
    ParamInfo { internal_name: "inertia", label: "Inertia", min: 0.0, max: 5.0, default: 0.25 },
    ParamInfo { internal_name: "nfilters", label: "Filters", min: 1.0, max: 8.0, default: 4.0 },
    ParamInfo { internal_name: "curcutoff", label: "Cur. Cutoff", min: 0.0, max: 24_000.0, default: 0.0 },
    ParamInfo { internal_name: "attack", label: "Attack", min: 0.0, max: 10.0, default: 0.01 },
    ParamInfo { internal_name: "decay", label: "Decay", min: 0.0, max: 10.0, default: 0.2 },
    ParamInfo { internal_name: "sustain", label: "Sustain", min: 0.0, max: 1.0, default: 0.7 },
    ParamInfo { internal_name: "release", label: "Release", min: 0.0, max: 10.0, default: 0.3 },
];

impl ParamId {
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::Gain,
        ParamId::Clip,
        ParamId::Saw,
        ParamId::Rect,
        ParamId::Tri,
        ParamId::Tune,
        ParamId::Cutoff,
        ParamId::Resonance,
        ParamId::Bandwidth,
        ParamId::Velocity,
        ParamId::Inertia,
        ParamId::NFilters,
        ParamId::CurCutoff,
        ParamId::Attack,
        ParamId::Decay,
        ParamId::Sustain,
        ParamId::Release,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.info().internal_name == name)
    }

    pub fn info(self) -> &'static ParamInfo {
        &PARAM_INFOS[self.index()]
    }

    /// Parameters the engine writes itself. Host writes are ignored.
    pub fn is_read_only(self) -> bool {
        matches!(self, ParamId::CurCutoff)
    }
}

/// Frequency of a MIDI note: 440 Hz · tune at note 69.
#[inline]
pub fn note_frequency(note: u8, tune: f32) -> f32 {
    440.0 * tune * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
