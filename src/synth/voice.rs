use crate::{
    dsp::{envelope::Line, OscillatorKind, Phasor, Sine},
    engine::{EngineContext, GeneratorHandle},
    synth::note::Note,
    Error,
};

/// Renders one voice of a [`Synth`](crate::synth::Synth) per call.
///
/// The synth calls `render` once per sample for every non-free note. The
/// renderer owns the note's lifecycle from there: it consumes the reset
/// request, watches for release, and frees the slot once the voice is
/// silent. A renderer that never frees notes leaks polyphony slots.
pub trait VoiceRenderer {
    /// Called once when the synth is built. Allocate per-voice state and
    /// register shared generators here, never in `render`.
    fn prepare(&mut self, _ctx: &mut EngineContext, _polyphony: usize) -> Result<(), Error> {
        Ok(())
    }

    fn render(&mut self, ctx: &EngineContext, voice_index: usize, note: &mut Note) -> f32;
}

impl<F> VoiceRenderer for F
where
    F: FnMut(&EngineContext, usize, &mut Note) -> f32,
{
    fn render(&mut self, ctx: &EngineContext, voice_index: usize, note: &mut Note) -> f32 {
        self(ctx, voice_index, note)
    }
}

const DECAY_RATE_HZ: f32 = 1.0;
const VIBRATO_RATE_HZ: f32 = 0.8;

/// Per-voice state of [`DecayVoice`].
#[derive(Debug, Clone, Copy)]
struct VoiceState {
    sine: Sine,
    decay: Phasor,
    /// Decay level, held while the release ramp runs.
    level: f32,
    release: Option<Line>,
}

/// Sine voice whose amplitude decays linearly over one second, then
/// retriggers. An optional vibrato is read from a sine shared through the
/// generator table, so every voice wobbles in phase.
///
/// On release the decay stops where it is and the voice fades out from that
/// level over `release_secs`, then frees its slot.
pub struct DecayVoice {
    voices: Vec<VoiceState>,
    vibrato: Option<GeneratorHandle>,
    vibrato_depth: f32,
    release_secs: f32,
    sample_rate: f32,
}

impl DecayVoice {
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            vibrato: None,
            vibrato_depth: 0.0,
            release_secs: 0.1,
            sample_rate: 0.0,
        }
    }

    /// Vibrato depth in Hz.
    pub fn with_vibrato(mut self, depth_hz: f32) -> Self {
        self.vibrato_depth = depth_hz;
        self
    }

    pub fn with_release(mut self, release_secs: f32) -> Self {
        self.release_secs = release_secs;
        self
    }

    pub fn vibrato_handle(&self) -> Option<GeneratorHandle> {
        self.vibrato
    }
}

impl Default for DecayVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceRenderer for DecayVoice {
    fn prepare(&mut self, ctx: &mut EngineContext, polyphony: usize) -> Result<(), Error> {
        self.sample_rate = ctx.sample_rate_hz();

        let state = VoiceState {
            sine: ctx.new_sine(),
            decay: ctx.new_phasor().with_frequency(DECAY_RATE_HZ),
            level: 1.0,
            release: None,
        };
        self.voices = vec![state; polyphony];

        if self.vibrato_depth != 0.0 {
            let generators = ctx.generators_mut();
            let handle = generators.register(OscillatorKind::Sine)?;
            generators.set_frequency(handle, VIBRATO_RATE_HZ)?;
            self.vibrato = Some(handle);
        }
        Ok(())
    }

    fn render(&mut self, ctx: &EngineContext, voice_index: usize, note: &mut Note) -> f32 {
        let Some(voice) = self.voices.get_mut(voice_index) else {
            return 0.0;
        };

        if note.take_reset() {
            voice.sine.reset();
            voice.decay.reset();
            voice.level = 1.0;
            voice.release = None;
        }

        let mut gain = 1.0;
        if note.is_released() {
            let (sample_rate, release_secs) = (self.sample_rate, self.release_secs);
            let release = voice
                .release
                .get_or_insert_with(|| Line::new(sample_rate, release_secs, 1.0, 0.0));
            let (value, done) = release.advance();
            if done {
                note.free_slot();
                return 0.0;
            }
            gain = value;
        } else {
            voice.level = 1.0 - voice.decay.next_sample();
        }

        let amp = note.amp * voice.level * gain;

        let vibrato = self
            .vibrato
            .map_or(0.0, |handle| ctx.generators().read(handle));
        voice
            .sine
            .set_frequency(note.freq + self.vibrato_depth * vibrato);

        amp * voice.sine.next_sample()
    }
}
