use crate::dsp::math::lerp;

/*
Line and ADSR Envelopes
=======================

Vocabulary
----------

  line        A linear ramp from `start` to `end` over a fixed number of
              samples. The sample count is derived from a length in seconds
              and the sample rate when the line is set.

  remaining   Samples left before the line reaches `end`. Each advance
              consumes one. The advance that brings it to zero returns `end`
              exactly and reports `done`.

  trigger     The caller's release request. While it is low the ADSR attacks
              and then sustains; the first advance with it high starts the
              release ramp.


The Shape
---------

  Level
    end ┐      ______________
        │     ╱              ╲
        │    ╱                ╲
  start └───╱──────────────────╲───→ Time
           Attack   Sustain    Release
                         trigger ↑

Release always ramps from the CURRENT level, so releasing halfway through the
attack does not jump up to the sustain value first.


State Machine
-------------

    ┌────────┐  line done  ┌─────────┐
    │ Attack │ ──────────→ │ Sustain │
    └────────┘             └─────────┘
        │ trigger               │ trigger
        ↓                       ↓
    ┌─────────────────────────────────┐  line done  ┌──────┐
    │             Release             │ ──────────→ │ Done │
    └─────────────────────────────────┘             └──────┘
*/

#[derive(Debug, Clone, Copy)]
pub struct Line {
    len_samples: u32,
    rem_samples: u32,
    start: f32,
    end: f32,
}

impl Line {
    pub fn new(sample_rate: f32, len_secs: f32, start: f32, end: f32) -> Self {
        let len_samples = (len_secs.max(0.0) * sample_rate).round() as u32;
        Self {
            len_samples,
            rem_samples: len_samples,
            start,
            end,
        }
    }

    /// Re-target the line, keeping its length, and rewind it.
    pub fn retarget(&mut self, start: f32, end: f32) {
        self.start = start;
        self.end = end;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.rem_samples = self.len_samples;
    }

    /// Advance one sample, returning `(value, done)`.
    #[inline]
    pub fn advance(&mut self) -> (f32, bool) {
        if self.rem_samples == 0 {
            return (self.end, true);
        }
        self.rem_samples -= 1;
        let elapsed = (self.len_samples - self.rem_samples) as f32;
        let value = lerp(self.start, self.end, elapsed / self.len_samples as f32);
        (value, self.rem_samples == 0)
    }

    pub fn is_done(&self) -> bool {
        self.rem_samples == 0
    }

    pub fn len_samples(&self) -> u32 {
        self.len_samples
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrStage {
    Attack,
    Sustain,
    Release,
    Done,
}

#[derive(Debug, Clone, Copy)]
pub struct Adsr {
    attack: Line,
    release: Line,
    stage: AdsrStage,
    level: f32,
}

impl Adsr {
    /// Attack from 0 to `peak` over `attack_secs`, release back to 0 over
    /// `release_secs`.
    pub fn new(sample_rate: f32, attack_secs: f32, release_secs: f32, peak: f32) -> Self {
        Self {
            attack: Line::new(sample_rate, attack_secs, 0.0, peak),
            release: Line::new(sample_rate, release_secs, peak, 0.0),
            stage: AdsrStage::Attack,
            level: 0.0,
        }
    }

    /// Advance one sample. `done` is true once the release has finished.
    pub fn advance(&mut self, trigger_release: bool) -> (f32, bool) {
        if trigger_release && matches!(self.stage, AdsrStage::Attack | AdsrStage::Sustain) {
            self.release.retarget(self.level, 0.0);
            self.stage = AdsrStage::Release;
        }

        match self.stage {
            AdsrStage::Attack => {
                let (value, done) = self.attack.advance();
                self.level = value;
                if done {
                    self.stage = AdsrStage::Sustain;
                }
                (value, false)
            }
            AdsrStage::Sustain => (self.level, false),
            AdsrStage::Release => {
                let (value, done) = self.release.advance();
                self.level = value;
                if done {
                    self.stage = AdsrStage::Done;
                }
                (value, done)
            }
            AdsrStage::Done => (0.0, true),
        }
    }

    pub fn reset(&mut self) {
        self.attack.reset();
        self.release.reset();
        self.stage = AdsrStage::Attack;
        self.level = 0.0;
    }

    pub fn stage(&self) -> AdsrStage {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}
