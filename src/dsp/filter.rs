use std::f32::consts::{PI, SQRT_2};

/*
Second-order Butterworth low-pass, bilinear transform:

    K    = tan(π · fc / fs)
    norm = 1 / (1 + √2·K + K²)

    b0 = K² · norm      a1 = 2 · (K² - 1) · norm
    b1 = 2 · b0         a2 = (1 - √2·K + K²) · norm
    b2 = b0

    y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]

Maximally flat passband, -12 dB/octave above the cutoff, unity gain at DC.
*/

pub struct ButterworthLowpass {
    cutoff_hz: f32,
    sample_rate: f32,

    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32, // past inputs
    x2: f32,
    y1: f32, // past outputs
    y2: f32,
}

impl ButterworthLowpass {
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            cutoff_hz,
            sample_rate,
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.compute_coefficients();
        filter
    }

    fn compute_coefficients(&mut self) {
        // keep the cutoff strictly below Nyquist, tan() blows up at π/2
        let fc = self.cutoff_hz.clamp(1.0, self.sample_rate * 0.499);
        let k = (PI * fc / self.sample_rate).tan();
        let k2 = k * k;
        let norm = 1.0 / (1.0 + SQRT_2 * k + k2);

        self.b0 = k2 * norm;
        self.b1 = 2.0 * self.b0;
        self.b2 = self.b0;
        self.a1 = 2.0 * (k2 - 1.0) * norm;
        self.a2 = (1.0 - SQRT_2 * k + k2) * norm;
    }

    /// Filter one sample. Coefficients are only recomputed when `cutoff_hz`
    /// differs from the previous call.
    #[inline]
    pub fn apply(&mut self, input: f32, cutoff_hz: f32) -> f32 {
        if cutoff_hz != self.cutoff_hz {
            self.cutoff_hz = cutoff_hz;
            self.compute_coefficients();
        }

        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
