//! Full-period benchmarks.
//!
//! These follow the host loop: advance generators, render voices, run the
//! effects, write tracks and mix.

mod mix;
mod voices;

pub use mix::bench_mix;
pub use voices::bench_voices;
