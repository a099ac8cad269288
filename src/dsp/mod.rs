//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math; parameter handling and note lifecycle live in
//! `synth`.

/// Master gain and soft limiter.
pub mod amplify;
/// Second-order filter sections and cascades.
pub mod biquad;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Oversampled saw/rectangle/triangle oscillator.
pub mod oscillator;
/// Block-rate smoothing of the velocity cutoff modulation.
pub mod smoothing;
/// Per-voice bandpass tone filter.
pub mod tone;

pub use envelope::EnvelopeState;
