pub mod dsp; // Oscillator, filters, envelope and output stage
pub mod error;
pub mod params; // Parameter table, lock-free store and saved state
pub mod patch;
pub mod synth; // Voice management and polyphony

pub use error::{WolpError, WolpResult};
pub use params::{ParamId, ParamSnapshot, ParamStore};
pub use patch::Patch;
pub use synth::{Synth, SynthConfig, SynthMessage};

/// Largest chunk the engine renders in one pass.
pub const MAX_BLOCK_SIZE: usize = 2048;
