//! Benchmarks for phase accumulators and the shared generator table.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cadence::{
    dsp::{OscillatorKind, Phasor, Sine},
    engine::GeneratorTable,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        // Sine - f64 phase, one sin() per sample
        let mut sine = Sine::new(SAMPLE_RATE).with_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += sine.next_sample();
                }
                black_box(sum)
            })
        });

        // Phasor - add and compare only
        let mut phasor = Phasor::new(SAMPLE_RATE).with_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("phasor", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += phasor.next_sample();
                }
                black_box(sum)
            })
        });

        // Full generator table, every slot occupied
        let mut table = GeneratorTable::new(SAMPLE_RATE, 64);
        for i in 0..64 {
            let kind = if i % 2 == 0 {
                OscillatorKind::Sine
            } else {
                OscillatorKind::Phasor
            };
            if let Ok(handle) = table.register(kind) {
                let _ = table.set_frequency(handle, 0.5 + i as f32);
            }
        }
        group.bench_with_input(
            BenchmarkId::new("generator_table_64", size),
            &size,
            |b, &size| {
                b.iter(|| {
                    for _ in 0..size {
                        table.advance_all();
                    }
                })
            },
        );
    }

    group.finish();
}
