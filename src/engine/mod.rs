//! Engine context: sample rate, track buffers and the shared generator table.
//!
//! There is no global state. The host builds one [`EngineContext`] at startup
//! and passes it explicitly to everything that renders audio. Effects and
//! oscillators are created through the context so they pick up its sample
//! rate; changing the rate afterwards is not supported.

pub mod generators;
pub mod tracks;

use log::info;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{ButterworthLowpass, DelayLine, Phasor, ReverbBlock, Sine, SpectralProcessor},
    Error,
};

pub use self::{
    generators::{Generator, GeneratorHandle, GeneratorSlot, GeneratorTable},
    tracks::TrackBuffers,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    /// Number of independent tracks summed by the mixer.
    pub tracks: usize,
    /// Frames per track, the longest period the mixer can produce.
    pub frames_per_period: usize,
    /// Output channels. Only interleaved stereo is supported.
    pub channels: usize,
    pub generator_slots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            tracks: 4,
            frames_per_period: 256,
            channels: crate::OUTPUT_CHANNELS,
            generator_slots: 64,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_tracks(mut self, tracks: usize) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn with_frames_per_period(mut self, frames: usize) -> Self {
        self.frames_per_period = frames;
        self
    }

    pub fn with_generator_slots(mut self, slots: usize) -> Self {
        self.generator_slots = slots;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        let fail = |msg: &str| Err(Error::Configuration(msg.to_string()));
        if self.sample_rate == 0 {
            return fail("sample rate must be non-zero");
        }
        if self.tracks == 0 {
            return fail("at least one track is required");
        }
        if self.frames_per_period == 0 {
            return fail("frames per period must be non-zero");
        }
        if self.channels != crate::OUTPUT_CHANNELS {
            return Err(Error::Configuration(format!(
                "only {} output channels are supported, got {}",
                crate::OUTPUT_CHANNELS,
                self.channels
            )));
        }
        Ok(())
    }
}

/// Everything the render loop shares: sample rate, tracks and generators.
pub struct EngineContext {
    sample_rate: u32,
    tracks: TrackBuffers,
    generators: GeneratorTable,
}

impl EngineContext {
    pub fn new(config: &EngineConfig) -> Result<Self, Error> {
        config.validate()?;
        info!(
            "engine context: {} Hz, {} tracks x {} frames, {} generator slots",
            config.sample_rate, config.tracks, config.frames_per_period, config.generator_slots
        );

        Ok(Self {
            sample_rate: config.sample_rate,
            tracks: TrackBuffers::new(config.tracks, config.frames_per_period),
            generators: GeneratorTable::new(config.sample_rate as f32, config.generator_slots),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate as f32
    }

    pub fn generators(&self) -> &GeneratorTable {
        &self.generators
    }

    pub fn generators_mut(&mut self) -> &mut GeneratorTable {
        &mut self.generators
    }

    pub fn tracks(&self) -> &TrackBuffers {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut TrackBuffers {
        &mut self.tracks
    }

    /// Frames in one mixer period.
    pub fn frames(&self) -> usize {
        self.tracks.frames()
    }

    #[inline]
    pub fn write_to_track(&mut self, track: usize, frame: usize, sample: f32) {
        self.tracks.write(track, frame, sample);
    }

    #[inline]
    pub fn write_stereo(&mut self, track: usize, frame: usize, left: f32, right: f32) {
        self.tracks.write_stereo(track, frame, left, right);
    }

    /// Sum the tracks into interleaved 16-bit `out` and clear them.
    pub fn mix_tracks(&mut self, out: &mut [i16]) {
        self.tracks.mix_tracks(out);
    }

    pub fn new_sine(&self) -> Sine {
        Sine::new(self.sample_rate_hz())
    }

    pub fn new_phasor(&self) -> Phasor {
        Phasor::new(self.sample_rate_hz())
    }

    /// A delay line holding up to `max_seconds` of audio.
    pub fn new_delay(&self, max_seconds: f32) -> DelayLine {
        DelayLine::new(self.sample_rate_hz(), max_seconds)
    }

    pub fn new_reverb(&self) -> ReverbBlock {
        ReverbBlock::new(self.sample_rate_hz())
    }

    pub fn new_spectral(&self, frame_size: usize) -> Result<SpectralProcessor, Error> {
        SpectralProcessor::new(frame_size)
    }

    pub fn new_lowpass(&self, cutoff_hz: f32) -> ButterworthLowpass {
        ButterworthLowpass::new(self.sample_rate_hz(), cutoff_hz)
    }
}
