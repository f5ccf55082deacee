use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase Accumulators
==================

Both oscillators here are plain phase accumulators: a running value that is
bumped by a fixed increment once per sample and wrapped back into range.

  Sine      phase t in [0, 2π), output sin(t), increment 2π·f / sr
  Phasor    value   in [0, 1),  output value,  increment   f / sr

The phase is kept in f64. At audio rates an f32 phase loses enough precision
over a long note to audibly detune, and the cost of the wider type is one
conversion per sample.

Both wrap with a single subtraction/modulo per sample, so the increment must
stay below one full cycle: f < sample_rate. Higher frequencies alias and are
not defended against.
*/

const LARGEST_BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Oscillator kinds that can live in the shared generator table.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorKind {
    Sine,
    Phasor,
}

#[derive(Debug, Clone, Copy)]
pub struct Sine {
    phase: f64,
    frequency: f32,
    sample_rate: f32,
}

impl Sine {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            frequency: 0.0,
            sample_rate,
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Output `sin(t)` for the current phase, then advance.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.phase.sin() as f32;
        self.phase += TAU * self.frequency as f64 / self.sample_rate as f64;
        self.phase %= TAU;
        sample
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Phasor {
    value: f64,
    frequency: f32,
    sample_rate: f32,
}

impl Phasor {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            value: 0.0,
            frequency: 0.0,
            sample_rate,
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Advance the ramp and return the new value, always in `[0, 1)`.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.value += self.frequency as f64 / self.sample_rate as f64;
        if self.value >= 1.0 {
            self.value -= 1.0;
        }
        // values just below 1.0 in f64 can round up when narrowed
        (self.value as f32).min(LARGEST_BELOW_ONE)
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn value(&self) -> f32 {
        self.value as f32
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
