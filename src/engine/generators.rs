use log::warn;

use crate::{
    dsp::oscillator::{OscillatorKind, Phasor, Sine},
    Error, Pool,
};

/// Index into the [`GeneratorTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorHandle(usize);

impl GeneratorHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Generator {
    Free,
    Sine(Sine),
    Phasor(Phasor),
}

/// One arena slot: the oscillator and its output for the current sample.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorSlot {
    value: f32,
    generator: Generator,
}

impl GeneratorSlot {
    const FREE: Self = Self {
        value: 0.0,
        generator: Generator::Free,
    };

    pub fn is_free(&self) -> bool {
        matches!(self.generator, Generator::Free)
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Fixed-capacity pool of oscillators shared by every voice and effect.
///
/// `advance_all` must run once per output sample before anything reads from
/// the table, so modulation sources update before their consumers.
pub struct GeneratorTable {
    slots: Vec<GeneratorSlot>,
    sample_rate: f32,
}

impl GeneratorTable {
    pub fn new(sample_rate: f32, capacity: usize) -> Self {
        Self {
            slots: vec![GeneratorSlot::FREE; capacity],
            sample_rate,
        }
    }

    /// Claim the first free slot for a new oscillator at 0 Hz.
    pub fn register(&mut self, kind: OscillatorKind) -> Result<GeneratorHandle, Error> {
        let Some(index) = self.slots.iter().position(GeneratorSlot::is_free) else {
            warn!("generator table full ({} slots), dropping {kind:?}", self.slots.len());
            return Err(Error::ResourceExhausted(Pool::Generators));
        };

        let generator = match kind {
            OscillatorKind::Sine => Generator::Sine(Sine::new(self.sample_rate)),
            OscillatorKind::Phasor => Generator::Phasor(Phasor::new(self.sample_rate)),
        };
        self.slots[index] = GeneratorSlot {
            value: 0.0,
            generator,
        };
        Ok(GeneratorHandle(index))
    }

    pub fn release(&mut self, handle: GeneratorHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            *slot = GeneratorSlot::FREE;
        }
    }

    pub fn set_frequency(&mut self, handle: GeneratorHandle, frequency: f32) -> Result<(), Error> {
        match self.slots.get_mut(handle.0).map(|slot| &mut slot.generator) {
            Some(Generator::Sine(sine)) => sine.set_frequency(frequency),
            Some(Generator::Phasor(phasor)) => phasor.set_frequency(frequency),
            _ => return Err(Error::InvalidHandle(handle.0)),
        }
        Ok(())
    }

    /// Advance every occupied slot exactly once.
    #[inline]
    pub fn advance_all(&mut self) {
        for slot in &mut self.slots {
            slot.value = match &mut slot.generator {
                Generator::Free => continue,
                Generator::Sine(sine) => sine.next_sample(),
                Generator::Phasor(phasor) => phasor.next_sample(),
            };
        }
    }

    /// Output of the last `advance_all`. Free or unknown handles read 0.0.
    #[inline]
    pub fn read(&self, handle: GeneratorHandle) -> f32 {
        match self.slots.get(handle.0) {
            Some(slot) if !slot.is_free() => slot.value,
            _ => 0.0,
        }
    }

    pub fn slot(&self, handle: GeneratorHandle) -> Option<&GeneratorSlot> {
        self.slots.get(handle.0)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_free()).count()
    }
}
