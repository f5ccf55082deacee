//! Reverb - Room Simulation via Delay Networks
//!
//! The block algorithm is a Schroeder reverb: parallel damped comb filters
//! feed a chain of allpass diffusers, after an optional pre-delay.
//!
//! # Architecture
//!
//! ```text
//!                      ┌──→ [Comb 1] ──┐
//!                      ├──→ [Comb 2] ──┤
//! Input ──→ [Pre-delay]┼──→ [Comb 3] ──┼──→ (+) ──→ [Allpass 1] ──→ [Allpass 2] ──→ Wet
//!                      └──→ [Comb 4] ──┘
//! ```
//!
//! ## Comb Filters
//!
//! ```text
//! y[n] = x[n] + g * lowpass(y[n - delay])
//! ```
//!
//! The feedback gain of each comb is derived from the decay time (RT60), the
//! time for the tail to fall by 60 dB:
//!
//! ```text
//! g = 10^(-3 * delay_seconds / decay_time)
//! ```
//!
//! Delay lengths keep the classic mutually-prime ratios and are scaled so
//! the longest comb equals the configured room size. The one-pole low-pass
//! inside the feedback loop absorbs content above the cutoff frequency.
//!
//! ## Block Processing
//!
//! [`ReverbBlock`] presents a per-sample interface over the block algorithm.
//! Input is collected into a chunk of [`REVERB_CHUNK_SIZE`] samples; when the
//! chunk fills, the algorithm runs once and the processed chunk is drained
//! one sample per call while the next one fills. This adds exactly one chunk
//! of latency to both the wet and the dry signal.

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::delay::DelayLine, REVERB_CHUNK_SIZE};

/// Longest supported room size (longest comb delay), in seconds.
pub const MAX_ROOM_SIZE: f32 = 0.1;
/// Longest supported pre-delay, in seconds.
pub const MAX_PRE_DELAY: f32 = 0.25;

const MIN_ROOM_SIZE: f32 = 0.005;
/// Comb delays relative to the longest one (29.7, 37.1, 41.1, 43.7 ms).
const COMB_RATIOS: [f32; 4] = [29.7 / 43.7, 37.1 / 43.7, 41.1 / 43.7, 1.0];
const ALLPASS_DELAYS_SECS: [f32; 2] = [0.005, 0.0017];
const ALLPASS_FEEDBACK: f32 = 0.5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Wet share of the output, 0 to 100.
    pub wet_percent: f32,
    /// RT60 decay time in seconds.
    pub decay_time: f32,
    /// Longest comb delay in seconds, up to [`MAX_ROOM_SIZE`].
    pub room_size: f32,
    /// Damping cutoff inside the comb feedback loops.
    pub cutoff_hz: f32,
    /// Delay before the reverb input, up to [`MAX_PRE_DELAY`].
    pub pre_delay: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            wet_percent: 30.0,
            decay_time: 1.5,
            room_size: 0.0437,
            cutoff_hz: 6_000.0,
            pre_delay: 0.01,
        }
    }
}

/// A damped comb filter (pre-allocated, RT-safe)
pub struct CombFilter {
    buffer: Vec<f32>,
    delay_samples: usize,
    write_pos: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(max_delay_samples: usize, delay_samples: usize) -> Self {
        let max_delay_samples = max_delay_samples.max(1);
        Self {
            buffer: vec![0.0; max_delay_samples],
            delay_samples: delay_samples.clamp(1, max_delay_samples),
            write_pos: 0,
            feedback: 0.5,
            damp: 0.0,
            filter_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Set delay length (RT-safe, no allocation)
    pub fn set_delay(&mut self, delay_samples: usize) {
        self.delay_samples = delay_samples.clamp(1, self.buffer.len());
        self.write_pos %= self.delay_samples;
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.write_pos];

        // One-pole lowpass filter for damping (absorbs high frequencies)
        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;

        self.buffer[self.write_pos] = input + self.filter_state * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.delay_samples;

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.write_pos = 0;
    }
}

/// An allpass filter for reverb diffusion (pre-allocated, RT-safe)
pub struct AllpassFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            feedback: ALLPASS_FEEDBACK,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.9);
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];

        // Allpass: output = -g*input + delayed + g*delayed_output
        let output = -self.feedback * input + delayed;
        self.buffer[self.write_pos] = input + self.feedback * output;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Block reverberation algorithm behind [`ReverbBlock`].
pub struct SchroederReverb {
    pre_delay: DelayLine,
    pre_delay_samples: u64,
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
    wet: f32,
    sample_rate: f32,
}

impl SchroederReverb {
    pub fn new(sample_rate: f32, params: ReverbParams) -> Self {
        let max_comb = (MAX_ROOM_SIZE * sample_rate).ceil() as usize;
        let allpass_len = |secs: f32| (secs * sample_rate) as usize;

        let mut reverb = Self {
            pre_delay: DelayLine::new(sample_rate, MAX_PRE_DELAY),
            pre_delay_samples: 0,
            combs: COMB_RATIOS.map(|_| CombFilter::new(max_comb, max_comb)),
            allpasses: [
                AllpassFilter::new(allpass_len(ALLPASS_DELAYS_SECS[0])),
                AllpassFilter::new(allpass_len(ALLPASS_DELAYS_SECS[1])),
            ],
            wet: 0.0,
            sample_rate,
        };
        reverb.configure(params);
        reverb
    }

    /// Apply new parameters (RT-safe, no allocation).
    pub fn configure(&mut self, params: ReverbParams) {
        let sr = self.sample_rate;
        let room_size = params.room_size.clamp(MIN_ROOM_SIZE, MAX_ROOM_SIZE);
        let decay_time = params.decay_time.max(crate::MIN_TIME);
        let damp = (-TAU * params.cutoff_hz.max(1.0) / sr).exp();

        for (comb, &ratio) in self.combs.iter_mut().zip(COMB_RATIOS.iter()) {
            let delay_secs = room_size * ratio;
            comb.set_delay((delay_secs * sr) as usize);
            comb.set_feedback(10.0_f32.powf(-3.0 * delay_secs / decay_time));
            comb.set_damp(damp);
        }

        let max_pre_delay = self.pre_delay.capacity() as u64;
        self.pre_delay_samples =
            ((params.pre_delay.clamp(0.0, MAX_PRE_DELAY) * sr) as u64).min(max_pre_delay);
        self.wet = params.wet_percent.clamp(0.0, 100.0) / 100.0;
    }

    pub fn process_sample(&mut self, input: f32) -> f32 {
        // a zero offset would read a full ring back, keep writing but bypass
        let delayed = match self.pre_delay.next_sample(input, self.pre_delay_samples, 0.0) {
            _ if self.pre_delay_samples == 0 => input,
            delayed => delayed,
        };

        let mut wet = 0.0;
        for comb in &mut self.combs {
            wet += comb.process(delayed);
        }
        wet *= 0.25; // Normalize for 4 combs

        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }

        input * (1.0 - self.wet) + wet * self.wet
    }

    /// Run the algorithm once over a whole chunk.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        for (out, &sample) in output.iter_mut().zip(input.iter()) {
            *out = self.process_sample(sample);
        }
    }

    pub fn reset(&mut self) {
        self.pre_delay.reset();
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
    }
}

/// Per-sample front end over [`SchroederReverb`] with chunk-granular
/// processing.
pub struct ReverbBlock {
    reverb: SchroederReverb,
    chunk: [f32; REVERB_CHUNK_SIZE],
    processed: [f32; REVERB_CHUNK_SIZE],
    chunk_idx: usize,
    pending: Option<ReverbParams>,
    params: ReverbParams,
}

impl ReverbBlock {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_params(sample_rate, ReverbParams::default())
    }

    pub fn with_params(sample_rate: f32, params: ReverbParams) -> Self {
        Self {
            reverb: SchroederReverb::new(sample_rate, params),
            chunk: [0.0; REVERB_CHUNK_SIZE],
            processed: [0.0; REVERB_CHUNK_SIZE],
            chunk_idx: 0,
            pending: None,
            params,
        }
    }

    /// Queue new parameters. They apply when the current chunk fills.
    pub fn set(&mut self, params: ReverbParams) {
        self.pending = Some(params);
    }

    /// Positional form of [`set`](Self::set).
    pub fn set_reverb(
        &mut self,
        wet_percent: f32,
        time_s: f32,
        room_size_s: f32,
        cutoff_hz: f32,
        pre_delay_s: f32,
    ) {
        self.set(ReverbParams {
            wet_percent,
            decay_time: time_s,
            room_size: room_size_s,
            cutoff_hz,
            pre_delay: pre_delay_s,
        });
    }

    /// Parameters in effect, including any queued change.
    pub fn params(&self) -> ReverbParams {
        self.pending.unwrap_or(self.params)
    }

    /// Feed one sample and drain one processed sample, one chunk late.
    #[inline]
    pub fn apply(&mut self, input: f32) -> f32 {
        let output = self.processed[self.chunk_idx];
        self.chunk[self.chunk_idx] = input;
        self.chunk_idx += 1;

        if self.chunk_idx == REVERB_CHUNK_SIZE {
            if let Some(params) = self.pending.take() {
                self.reverb.configure(params);
                self.params = params;
            }
            self.reverb.process_block(&self.chunk, &mut self.processed);
            self.chunk_idx = 0;
        }

        output
    }

    /// Samples between input and the matching output.
    pub const fn latency(&self) -> usize {
        REVERB_CHUNK_SIZE
    }

    pub fn reset(&mut self) {
        self.reverb.reset();
        self.chunk.fill(0.0);
        self.processed.fill(0.0);
        self.chunk_idx = 0;
    }
}
