pub mod dsp; // Per-sample DSP primitives
pub mod engine; // Context, shared generators, track mixing
pub mod error;
pub mod io; // Boundary to the hardware sink
pub mod synth; // Voice management and polyphony

pub use engine::{EngineConfig, EngineContext};
pub use error::{Error, Pool};

/// Samples accumulated by the reverb before its block algorithm runs.
pub const REVERB_CHUNK_SIZE: usize = 32;
/// Hop size used by `SpectralProcessor::default()`.
pub const DEFAULT_SPECTRAL_FRAME: usize = 512;
/// Scale applied when quantizing float samples to 16-bit output.
pub const FULL_SCALE: f32 = 32768.0;
/// Output frames are always interleaved stereo.
pub const OUTPUT_CHANNELS: usize = 2;

pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
