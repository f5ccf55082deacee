//! Per-sample DSP primitives.
//!
//! Every buffer these components need is allocated at construction; after
//! that, processing one sample never allocates, locks or blocks, so they can
//! live directly inside voice and effect state on the audio thread.

/// Feedback delay over a circular buffer.
pub mod delay;
/// Linear ramps and the attack/release envelope built from them.
pub mod envelope;
/// Second-order Butterworth low-pass.
pub mod filter;
/// Interpolation, crossfade, curve and pitch helpers.
pub mod math;
/// Sine and phasor phase accumulators.
pub mod oscillator;
/// Chunked Schroeder reverb.
pub mod reverb;
/// Overlap-add STFT with a persistent, editable spectrum.
pub mod spectral;

pub use delay::DelayLine;
pub use envelope::{Adsr, AdsrStage, Line};
pub use filter::ButterworthLowpass;
pub use oscillator::{OscillatorKind, Phasor, Sine};
pub use reverb::{ReverbBlock, ReverbParams};
pub use spectral::{FftStage, SpectralProcessor};
