//! Benchmarks for the full period loop.
//!
//! One iteration is one output period: generators, voices, the effect rack
//! and the mixer, exactly as the host runs it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cadence::{
    dsp::{DelayLine, ReverbBlock, SpectralProcessor},
    synth::{DecayVoice, Synth},
    EngineConfig, EngineContext,
};

use crate::BLOCK_SIZES;

struct Session {
    ctx: EngineContext,
    synth: Synth<DecayVoice>,
    delay: DelayLine,
    reverb: Option<ReverbBlock>,
    spectral: Option<SpectralProcessor>,
    out: Vec<i16>,
}

impl Session {
    fn new(frames: usize, reverb: bool, spectral: bool) -> Option<Self> {
        let config = EngineConfig::default().with_frames_per_period(frames);
        let mut ctx = EngineContext::new(&config).ok()?;
        let mut synth = Synth::new(&mut ctx, 8, DecayVoice::new().with_vibrato(15.0)).ok()?;
        for (key, freq) in [440.0, 660.0, 880.0].into_iter().enumerate() {
            synth.note_on(freq, 0.1, key as i32).ok()?;
        }

        Some(Self {
            delay: ctx.new_delay(10.0),
            reverb: reverb.then(|| ctx.new_reverb()),
            spectral: if spectral {
                Some(ctx.new_spectral(512).ok()?)
            } else {
                None
            },
            out: vec![0; frames * 2],
            synth,
            ctx,
        })
    }

    fn render_period(&mut self) {
        for frame in 0..self.ctx.frames() {
            self.ctx.generators_mut().advance_all();

            let sample = self.synth.render_sample(&self.ctx);
            let delayed = self.delay.apply(sample, 0.3, 0.6);
            self.ctx.write_to_track(0, frame, sample + delayed);

            if let Some(reverb) = &mut self.reverb {
                let wet = reverb.apply(sample);
                self.ctx.write_to_track(1, frame, 0.3 * wet);
            }
            if let Some(fft) = &mut self.spectral {
                fft.apply_fft(sample);
                if fft.samples_ready() {
                    fft.spectral_shift(1.5);
                }
                self.ctx.write_to_track(2, frame, 0.2 * fft.apply_ifft());
            }
        }
        self.ctx.mix_tracks(&mut self.out);
    }
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");

    for &size in BLOCK_SIZES {
        // === SYNTH + DELAY: the minimal demo chain ===
        if let Some(mut session) = Session::new(size, false, false) {
            group.bench_with_input(BenchmarkId::new("synth_delay", size), &size, |b, _| {
                b.iter(|| {
                    session.render_period();
                    black_box(&session.out);
                })
            });
        }

        // === FULL RACK: delay, reverb and spectral shift on three tracks ===
        if let Some(mut session) = Session::new(size, true, true) {
            group.bench_with_input(BenchmarkId::new("full_rack", size), &size, |b, _| {
                b.iter(|| {
                    session.render_period();
                    black_box(&session.out);
                })
            });
        }
    }

    group.finish();
}
