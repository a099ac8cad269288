//! Benchmarks for low-level DSP primitives.

mod amplify;
mod biquad;
mod envelope;
mod oscillator;

pub use amplify::bench_amplify;
pub use biquad::bench_biquad;
pub use envelope::bench_envelope;
pub use oscillator::bench_oscillator;
