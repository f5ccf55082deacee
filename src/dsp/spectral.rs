//! Spectral Processing - Short-Time Fourier Transform with Overlap-Add
//!
//! Samples go in one at a time and come out one at a time, but the work
//! happens a frame at a time in the frequency domain.
//!
//! # Framing
//!
//! With a frame size (hop) of `N`, every `N` input samples complete a frame.
//! The transform covers the last `2N` samples, the previous frame and the
//! current one, so consecutive transforms overlap by half:
//!
//! ```text
//! input    |  frame 0  |  frame 1  |  frame 2  |  frame 3  |
//!
//! fft 1    [  frame 0     frame 1  ]
//! fft 2                [  frame 1     frame 2  ]
//! fft 3                            [  frame 2     frame 3  ]
//! ```
//!
//! # Windowing
//!
//! Both analysis and synthesis use a periodic square-root Hann window of
//! length `2N`, `w[n] = sin(π n / 2N)`. The two windows multiply to a plain
//! Hann window, and Hann windows at 50% overlap sum to exactly one:
//!
//! ```text
//! w²[n] + w²[n + N] = sin²(π n / 2N) + cos²(π n / 2N) = 1
//! ```
//!
//! so summing the second half of the previous inverse transform with the
//! first half of the current one rebuilds the input with no block-edge
//! discontinuities.
//!
//! # Persistent Spectrum
//!
//! Each forward transform is copied into a persistent spectrum. The inverse
//! transform always reads the persistent copy, so edits such as
//! [`SpectralProcessor::spectral_shift`] shape the output and stay in place
//! until the next forward transform overwrites them. Edit between the frame
//! completing and the next `apply_ifft`:
//!
//! ```text
//! fft.apply_fft(sample);
//! if fft.samples_ready() {
//!     fft.spectral_shift(1.5);
//! }
//! let out = fft.apply_ifft();
//! ```
//!
//! # Latency
//!
//! A sample entering on call `t` leaves on call `t + 2N - 1`.

use std::{f32::consts::PI, sync::Arc};

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::{Error, DEFAULT_SPECTRAL_FRAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftStage {
    /// No frame has been transformed yet.
    FirstIteration,
    FirstIterationDone,
}

pub struct SpectralProcessor {
    frame_size: usize,
    stage: FftStage,
    samples_ready: bool,
    sample_index: usize,

    /// Previous frame followed by the frame being filled.
    input: Vec<f32>,
    window: Vec<f32>,

    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,

    /// Working buffer for both transforms.
    spectrum: Vec<Complex<f32>>,
    persistent: Vec<Complex<f32>>,
    /// Target for bin remapping, sized like `persistent`.
    remap: Vec<Complex<f32>>,

    /// Second half of the last inverse transform, waiting for its overlap.
    tail: Vec<f32>,
    output: Vec<f32>,
    out_index: usize,
}

impl SpectralProcessor {
    /// Create a processor with the given hop size, which must be a non-zero
    /// power of two.
    pub fn new(frame_size: usize) -> Result<Self, Error> {
        if frame_size == 0 || !frame_size.is_power_of_two() {
            return Err(Error::Configuration(format!(
                "spectral frame size must be a non-zero power of two, got {frame_size}"
            )));
        }
        Ok(Self::build(frame_size))
    }

    fn build(frame_size: usize) -> Self {
        let fft_len = frame_size * 2;

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        // Periodic sqrt-Hann, analysis and synthesis share it
        let window = (0..fft_len)
            .map(|n| (PI * n as f32 / fft_len as f32).sin())
            .collect();

        let zero = Complex::new(0.0, 0.0);
        Self {
            frame_size,
            stage: FftStage::FirstIteration,
            samples_ready: false,
            sample_index: 0,
            input: vec![0.0; fft_len],
            window,
            forward,
            inverse,
            scratch: vec![zero; scratch_len],
            spectrum: vec![zero; fft_len],
            persistent: vec![zero; fft_len],
            remap: vec![zero; fft_len],
            tail: vec![0.0; frame_size],
            output: vec![0.0; frame_size],
            out_index: frame_size,
        }
    }

    /// Push one sample. Every `frame_size` samples this runs the forward
    /// transform, refreshes the persistent spectrum and raises
    /// [`samples_ready`](Self::samples_ready).
    pub fn apply_fft(&mut self, sample: f32) {
        let n = self.frame_size;
        self.input[n + self.sample_index] = sample;
        self.sample_index += 1;

        if self.sample_index < n {
            return;
        }

        for ((bin, &x), &w) in self
            .spectrum
            .iter_mut()
            .zip(self.input.iter())
            .zip(self.window.iter())
        {
            *bin = Complex::new(x * w, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);
        self.persistent.copy_from_slice(&self.spectrum);

        // current frame becomes the previous one
        self.input.copy_within(n.., 0);

        self.stage = FftStage::FirstIterationDone;
        self.sample_index = 0;
        self.samples_ready = true;
    }

    /// Pull one output sample.
    ///
    /// When a new frame is ready, the persistent spectrum is transformed
    /// back, windowed and overlap-added with the previous frame's tail.
    /// Returns 0.0 before the first frame.
    pub fn apply_ifft(&mut self) -> f32 {
        if self.samples_ready {
            self.synthesize();
        }

        match self.output.get(self.out_index) {
            Some(&sample) => {
                self.out_index += 1;
                sample
            }
            None => 0.0,
        }
    }

    fn synthesize(&mut self) {
        let n = self.frame_size;
        let scale = 1.0 / (2 * n) as f32;

        self.spectrum.copy_from_slice(&self.persistent);
        self.inverse
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        for i in 0..n {
            let head = self.spectrum[i].re * scale * self.window[i];
            self.output[i] = self.tail[i] + head;
            self.tail[i] = self.spectrum[n + i].re * scale * self.window[n + i];
        }

        self.out_index = 0;
        self.samples_ready = false;
    }

    /// `apply_fft` followed by `apply_ifft`, with no spectral edit.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.apply_fft(sample);
        self.apply_ifft()
    }

    /// Move every bin `i` of the persistent spectrum to bin
    /// `round(i * factor)`. Bins pushed past Nyquist are dropped and the
    /// negative frequencies are rebuilt as conjugates, so the output stays
    /// real.
    pub fn spectral_shift(&mut self, factor: f32) {
        let n = self.frame_size;
        let fft_len = 2 * n;
        let zero = Complex::new(0.0, 0.0);

        self.remap.fill(zero);
        for i in 0..=n {
            let target = (i as f32 * factor.max(0.0)).round() as usize;
            if target <= n {
                self.remap[target] += self.persistent[i];
            }
        }

        self.persistent[..=n].copy_from_slice(&self.remap[..=n]);
        for k in 1..n {
            self.persistent[fft_len - k] = self.persistent[k].conj();
        }
    }

    /// The persistent spectrum, `2 * frame_size` bins.
    pub fn spectrum(&self) -> &[Complex<f32>] {
        &self.persistent
    }

    /// Mutable access for custom edits. Keep bin `2N - k` the conjugate of
    /// bin `k`, or the imaginary part of the result is discarded.
    pub fn spectrum_mut(&mut self) -> &mut [Complex<f32>] {
        &mut self.persistent
    }

    pub fn samples_ready(&self) -> bool {
        self.samples_ready
    }

    pub fn stage(&self) -> FftStage {
        self.stage
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Calls between a sample entering and leaving.
    pub fn latency(&self) -> usize {
        2 * self.frame_size - 1
    }

    pub fn reset(&mut self) {
        let zero = Complex::new(0.0, 0.0);
        self.stage = FftStage::FirstIteration;
        self.samples_ready = false;
        self.sample_index = 0;
        self.input.fill(0.0);
        self.spectrum.fill(zero);
        self.persistent.fill(zero);
        self.tail.fill(0.0);
        self.output.fill(0.0);
        self.out_index = self.frame_size;
    }
}

impl Default for SpectralProcessor {
    fn default() -> Self {
        Self::build(DEFAULT_SPECTRAL_FRAME)
    }
}
