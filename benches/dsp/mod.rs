//! Benchmarks for per-sample DSP primitives.

mod delay;
mod envelope;
mod filter;
mod oscillator;
mod reverb;
mod spectral;

pub use delay::bench_delay;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use reverb::bench_reverb;
pub use spectral::bench_spectral;
