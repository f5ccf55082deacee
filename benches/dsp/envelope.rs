//! Benchmarks for line and ADSR envelopes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cadence::dsp::{Adsr, Line};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Plain ramp, rewound whenever it finishes
        let mut line = Line::new(SAMPLE_RATE, 0.5, 0.0, 1.0);
        group.bench_with_input(BenchmarkId::new("line", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    let (value, done) = line.advance();
                    if done {
                        line.reset();
                    }
                    sum += value;
                }
                black_box(sum)
            })
        });

        // Attack phase (ramping up)
        let mut env = Adsr::new(SAMPLE_RATE, 10.0, 0.3, 1.0);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += env.advance(black_box(false)).0;
                }
                sum
            })
        });

        // Sustain phase (holding steady)
        let mut env = Adsr::new(SAMPLE_RATE, 0.001, 0.3, 1.0);
        for _ in 0..200 {
            env.advance(false);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += env.advance(black_box(false)).0;
                }
                sum
            })
        });

        // Release phase (ramping down), retriggered when done
        let mut env = Adsr::new(SAMPLE_RATE, 0.001, 10.0, 1.0);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    let (value, done) = env.advance(black_box(true));
                    if done {
                        env.reset();
                    }
                    sum += value;
                }
                sum
            })
        });
    }

    group.finish();
}
