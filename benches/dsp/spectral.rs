//! Benchmarks for the overlap-add spectral processor.
//!
//! Cost is bursty: nothing happens for `frame - 1` samples, then a forward
//! and an inverse transform run back to back. Blocks are long enough to
//! always include at least one frame boundary.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cadence::dsp::SpectralProcessor;

use crate::SAMPLE_RATE;

pub fn bench_spectral(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/spectral");

    for &frame in &[128usize, 512, 2048] {
        let input: Vec<f32> = (0..frame)
            .map(|i| (i as f32 * 440.0 * std::f32::consts::TAU / SAMPLE_RATE).sin())
            .collect();

        let Ok(mut fft) = SpectralProcessor::new(frame) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("round_trip", frame), &frame, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += fft.process(black_box(sample));
                }
                sum
            })
        });

        let Ok(mut fft) = SpectralProcessor::new(frame) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("shifted", frame), &frame, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    fft.apply_fft(black_box(sample));
                    if fft.samples_ready() {
                        fft.spectral_shift(1.5);
                    }
                    sum += fft.apply_ifft();
                }
                sum
            })
        });
    }

    group.finish();
}
