//! Error types for the control-side API.
//!
//! Nothing on the render path returns an error: bad values there are clamped
//! or replaced with a silent fallback. Errors only come from decoding saved
//! state, applying patches, and validating configuration.

use thiserror::Error;

/// Result type for control-side operations.
pub type WolpResult<T> = Result<T, WolpError>;

#[derive(Debug, Error, PartialEq)]
pub enum WolpError {
    /// Saved state is shorter than its header.
    #[error("state block too short: {len} bytes")]
    StateTooShort {
        /// Length of the rejected block.
        len: usize,
    },

    /// Saved state does not start with the expected magic.
    #[error("state block has an unknown header")]
    BadMagic,

    /// Saved state was written by an unknown format version.
    #[error("unsupported state version {version}")]
    UnsupportedVersion {
        /// Version found in the header.
        version: u16,
    },

    /// Header promises more values than the block contains.
    #[error("state block truncated: expected {expected} bytes, found {found}")]
    Truncated {
        /// Length implied by the header.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// A patch refers to a parameter that does not exist.
    #[error("unknown parameter: {name}")]
    UnknownParameter {
        /// The unrecognised internal name.
        name: String,
    },

    /// Sample rate must be positive and finite.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The rejected rate.
        rate: f32,
    },

    /// Pitch wheel range must be finite and not negative.
    #[error("invalid pitch bend range: {range} semitones")]
    InvalidPitchBendRange {
        /// The rejected range.
        range: f32,
    },

    /// A synth needs at least one voice.
    #[error("voice count must be at least 1")]
    NoVoices,

    /// The note queue needs room for at least one message.
    #[error("message queue capacity must be at least 1")]
    NoMessageCapacity,
}
