//! Benchmarks for the chunked reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cadence::dsp::{reverb::MAX_ROOM_SIZE, ReverbBlock, ReverbParams};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        // Impulse followed by a quiet tone
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0)
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();

        // Small room
        let mut reverb = ReverbBlock::with_params(
            SAMPLE_RATE,
            ReverbParams {
                room_size: 0.02,
                decay_time: 0.5,
                ..ReverbParams::default()
            },
        );
        group.bench_with_input(BenchmarkId::new("small_room", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += reverb.apply(black_box(sample));
                }
                sum
            })
        });

        // Large room, long tail
        let mut reverb = ReverbBlock::with_params(
            SAMPLE_RATE,
            ReverbParams {
                room_size: MAX_ROOM_SIZE,
                decay_time: 4.0,
                pre_delay: 0.05,
                ..ReverbParams::default()
            },
        );
        group.bench_with_input(BenchmarkId::new("large_room", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += reverb.apply(black_box(sample));
                }
                sum
            })
        });
    }

    group.finish();
}
