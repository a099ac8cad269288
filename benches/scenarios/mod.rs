//! Engine-level benchmarks.
//!
//! These run complete voices and the polyphonic engine the way a host
//! drives them: one render call per audio block.

mod polyphony;
mod voices;

pub use polyphony::bench_polyphony;
pub use voices::bench_voices;
