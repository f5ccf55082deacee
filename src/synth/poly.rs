use log::warn;

use crate::{
    engine::EngineContext,
    synth::{
        message::{EventReceiver, NoteEvent},
        note::Note,
        voice::VoiceRenderer,
    },
    Error, Pool,
};

/// Fixed-size polyphonic note pool driving a [`VoiceRenderer`].
///
/// There is no voice stealing: a note-on with every slot taken is dropped.
pub struct Synth<V: VoiceRenderer> {
    notes: Vec<Note>,
    voice: V,
}

impl<V: VoiceRenderer> Synth<V> {
    /// Build a synth with `polyphony` note slots, all free. The renderer's
    /// `prepare` hook runs here, against `ctx`.
    pub fn new(ctx: &mut EngineContext, polyphony: usize, mut voice: V) -> Result<Self, Error> {
        voice.prepare(ctx, polyphony)?;
        Ok(Self {
            notes: vec![Note::free(); polyphony],
            voice,
        })
    }

    /// Start a note in the first free slot and return the slot index.
    pub fn note_on(&mut self, freq: f32, amp: f32, key: i32) -> Result<usize, Error> {
        let Some(index) = self.notes.iter().position(Note::is_free) else {
            warn!("all {} voices busy, dropping note-on for key {key}", self.notes.len());
            return Err(Error::ResourceExhausted(Pool::Notes));
        };
        self.notes[index].start(freq, amp, key);
        Ok(index)
    }

    /// Release the first sounding, not yet released note with `key`.
    pub fn note_off(&mut self, key: i32) -> Result<usize, Error> {
        let found = self
            .notes
            .iter()
            .position(|n| !n.is_free() && !n.is_released() && n.key == key);

        let Some(index) = found else {
            warn!("note-off for key {key} with no active note");
            return Err(Error::InvalidKey(key));
        };
        self.notes[index].release();
        Ok(index)
    }

    pub fn all_notes_off(&mut self) {
        for note in self.notes.iter_mut().filter(|n| !n.is_free()) {
            note.release();
        }
    }

    /// Apply one event. Failures are already logged and only reported back.
    pub fn handle_event(&mut self, event: NoteEvent) -> Result<(), Error> {
        match event {
            NoteEvent::On { freq, amp, key } => self.note_on(freq, amp, key).map(|_| ()),
            NoteEvent::Off { key } => self.note_off(key).map(|_| ()),
            NoteEvent::AllOff => {
                self.all_notes_off();
                Ok(())
            }
        }
    }

    /// Apply every queued event. Call between samples, typically once per
    /// period.
    pub fn drain_events(&mut self, rx: &mut impl EventReceiver) {
        while let Some(event) = rx.pop() {
            // already logged
            let _ = self.handle_event(event);
        }
    }

    /// Sum the renderer's output over every non-free note.
    #[inline]
    pub fn render_sample(&mut self, ctx: &EngineContext) -> f32 {
        let mut sample = 0.0;
        for (index, note) in self.notes.iter_mut().enumerate() {
            if !note.is_free() {
                sample += self.voice.render(ctx, index, note);
            }
        }
        sample
    }

    pub fn render(&mut self, ctx: &EngineContext, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.render_sample(ctx);
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn polyphony(&self) -> usize {
        self.notes.len()
    }

    pub fn active_notes(&self) -> usize {
        self.notes.iter().filter(|n| !n.is_free()).count()
    }

    pub fn voice(&self) -> &V {
        &self.voice
    }

    pub fn voice_mut(&mut self) -> &mut V {
        &mut self.voice
    }
}
