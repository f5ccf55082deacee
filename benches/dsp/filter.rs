//! Benchmarks for the Butterworth low-pass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cadence::dsp::ButterworthLowpass;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Fixed cutoff, coefficients computed once
        let mut filter = ButterworthLowpass::new(SAMPLE_RATE, 1_000.0);
        group.bench_with_input(BenchmarkId::new("fixed_cutoff", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += filter.apply(black_box(sample), 1_000.0);
                }
                sum
            })
        });

        // Cutoff swept every sample, one tan() per sample
        let mut filter = ButterworthLowpass::new(SAMPLE_RATE, 1_000.0);
        group.bench_with_input(BenchmarkId::new("swept_cutoff", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &sample) in input.iter().enumerate() {
                    let cutoff = 500.0 + (i as f32 * 0.01).sin() * 400.0;
                    sum += filter.apply(black_box(sample), cutoff);
                }
                sum
            })
        });
    }

    group.finish();
}
