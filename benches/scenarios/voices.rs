//! Benchmarks for polyphonic voice rendering.
//!
//! Notes never release here; the decay phasor retriggers every second, so
//! every slot stays busy for the whole run.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cadence::{
    synth::{DecayVoice, Note, Synth},
    EngineConfig, EngineContext,
};

use crate::BLOCK_SIZES;

fn full_synth(ctx: &mut EngineContext, polyphony: usize, vibrato: f32) -> Option<Synth<DecayVoice>> {
    let mut synth = Synth::new(ctx, polyphony, DecayVoice::new().with_vibrato(vibrato)).ok()?;
    for key in 0..polyphony as i32 {
        synth.note_on(110.0 * (key + 1) as f32, 0.1, key).ok()?;
    }
    Some(synth)
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for &polyphony in &[1usize, 4, 8] {
            let Ok(mut ctx) = EngineContext::new(&EngineConfig::default()) else {
                continue;
            };
            let Some(mut synth) = full_synth(&mut ctx, polyphony, 15.0) else {
                continue;
            };

            group.bench_with_input(
                BenchmarkId::new(format!("decay_voice_x{polyphony}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for sample in buffer.iter_mut() {
                            ctx.generators_mut().advance_all();
                            *sample = synth.render_sample(&ctx);
                        }
                        black_box(&buffer);
                    })
                },
            );
        }

        // Baseline: closure renderer with no oscillator at all
        let Ok(mut ctx) = EngineContext::new(&EngineConfig::default()) else {
            continue;
        };
        let constant = |_: &EngineContext, _: usize, note: &mut Note| note.amp;
        let Ok(mut synth) = Synth::new(&mut ctx, 8, constant) else {
            continue;
        };
        for key in 0..8 {
            let _ = synth.note_on(440.0, 0.1, key);
        }
        group.bench_with_input(BenchmarkId::new("closure_x8", size), &size, |b, _| {
            b.iter(|| {
                synth.render(&ctx, black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
