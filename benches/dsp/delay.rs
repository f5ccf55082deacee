//! Benchmarks for the feedback delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cadence::dsp::DelayLine;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Delay times in seconds
    let delay_times: &[f32] = &[0.01, 0.3, 2.0];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &delay_time in delay_times {
            let mut delay = DelayLine::new(SAMPLE_RATE, 10.0);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("render_{}ms", (delay_time * 1000.0) as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.render(black_box(&mut buffer), black_box(delay_time), 0.6);
                    })
                },
            );
        }

        // Delay time modulated every sample
        let mut delay = DelayLine::new(SAMPLE_RATE, 1.0);
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &sample) in input.iter().enumerate() {
                    let delay_time = 0.01 + (i as f32 * 0.1).sin() * 0.001;
                    sum += delay.apply(black_box(sample), delay_time, 0.3);
                }
                sum
            })
        });
    }

    group.finish();
}
