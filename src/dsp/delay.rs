/// Feedback delay over a circular buffer.
///
/// The read offset is recomputed from the delay time on every call, so the
/// delay can be modulated at audio rate. The caller must keep
/// `delay_time * sample_rate <= capacity()`; longer delays wrap around the
/// buffer and read the wrong slot. `feedback >= 1.0` grows without bound.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_head: u64,
    sample_rate: f32,
}

impl DelayLine {
    /// Allocate a line holding `max_seconds` of audio.
    pub fn new(sample_rate: f32, max_seconds: f32) -> Self {
        let capacity = ((max_seconds * sample_rate).ceil() as usize).max(1);
        Self {
            buffer: vec![0.0; capacity],
            write_head: 0,
            sample_rate,
        }
    }

    /// Push `sample` and return the sample `delay_time` seconds old.
    ///
    /// The delay is rounded to the nearest whole sample. The returned value
    /// is the raw delayed signal; `feedback` only affects what is written
    /// back into the line.
    #[inline]
    pub fn apply(&mut self, sample: f32, delay_time: f32, feedback: f32) -> f32 {
        let read_offset = (delay_time * self.sample_rate).round() as u64;
        self.next_sample(sample, read_offset, feedback)
    }

    /// Same as `apply`, with the delay given in whole samples.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, read_offset: u64, feedback: f32) -> f32 {
        let capacity = self.buffer.len() as u64;
        debug_assert!(read_offset <= capacity, "delay longer than buffer");

        let read_pos = (self.write_head + capacity - read_offset % capacity) % capacity;
        let delayed = self.buffer[read_pos as usize];

        self.buffer[(self.write_head % capacity) as usize] = sample + delayed * feedback;
        self.write_head += 1;

        delayed
    }

    pub fn render(&mut self, buffer: &mut [f32], delay_time: f32, feedback: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.apply(*sample, delay_time, feedback);
        }
    }

    /// Number of samples the line can hold.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    #[test]
    fn onset_is_sample_accurate() {
        let mut delay = DelayLine::new(SAMPLE_RATE, 1.0);
        let delay_time = 0.01; // 441 samples
        let x = 0.25;

        for i in 0..441 {
            assert_eq!(delay.apply(x, delay_time, 0.0), 0.0, "early output at {i}");
        }
        for i in 441..2_000 {
            assert_eq!(delay.apply(x, delay_time, 0.0), x, "missing output at {i}");
        }
    }

    #[test]
    fn delay_time_rounds_to_nearest_sample() {
        // 0.01 s at 44.1 kHz is 441 samples but not exact in f32; truncation
        // could land on 440
        let onset = |delay_time: f32| {
            let mut delay = DelayLine::new(SAMPLE_RATE, 0.1);
            (0..1_000)
                .position(|i| {
                    let input = if i == 0 { 1.0 } else { 0.0 };
                    delay.apply(input, delay_time, 0.0) != 0.0
                })
                .unwrap()
        };

        assert_eq!(onset(0.01), 441);
        assert_eq!(onset(2.4 / SAMPLE_RATE), 2);
        assert_eq!(onset(2.6 / SAMPLE_RATE), 3);
    }

    #[test]
    fn feedback_produces_decaying_echoes() {
        let mut delay = DelayLine::new(SAMPLE_RATE, 0.1);
        let mut echoes = Vec::new();

        for i in 0..400 {
            let input = if i == 0 { 1.0 } else { 0.0 };
            let out = delay.next_sample(input, 100, 0.5);
            if out != 0.0 {
                echoes.push((i, out));
            }
        }

        assert_eq!(echoes, vec![(100, 1.0), (200, 0.5), (300, 0.25)]);
    }

    #[test]
    fn wraps_around_the_buffer() {
        // 64-sample buffer, 10-sample delay: many trips around the ring
        let mut delay = DelayLine::new(64.0, 1.0);
        assert_eq!(delay.capacity(), 64);

        let mut history = Vec::new();
        for i in 0..1_000 {
            let input = i as f32;
            let out = delay.next_sample(input, 10, 0.0);
            if i >= 10 {
                assert_eq!(out, history[i - 10]);
            }
            history.push(input);
        }
    }

    #[test]
    fn full_capacity_delay_reads_oldest_sample() {
        let mut delay = DelayLine::new(16.0, 1.0);
        for i in 0..16 {
            delay.next_sample(i as f32 + 1.0, 16, 0.0);
        }
        assert_eq!(delay.next_sample(0.0, 16, 0.0), 1.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut delay = DelayLine::new(SAMPLE_RATE, 0.1);
        for _ in 0..100 {
            delay.next_sample(1.0, 50, 0.0);
        }
        delay.reset();
        assert_eq!(delay.next_sample(0.0, 50, 0.0), 0.0);
    }
}
