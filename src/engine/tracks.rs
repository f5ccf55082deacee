use crate::{FULL_SCALE, OUTPUT_CHANNELS};

/*
Track Layout
============

Each track is one period of interleaved stereo float audio:

    track n:  L0 R0 L1 R1 L2 R2 ...  (frames × 2 samples)

All tracks live in one flat allocation, track after track. Voices and effects
write into tracks during the sample loop; once per period `mix_tracks` sums
every track frame by frame, scales to 16-bit and zeroes the tracks for the
next period.

Quantization
------------

    out = (Σ tracks) × 32768  as i16

The cast saturates: anything past ±1.0 pins to i16::MIN / i16::MAX rather
than wrapping. Keep the summed signal inside [-1, 1]; a full-scale +1.0
already lands on 32767 instead of 32768.
*/

pub struct TrackBuffers {
    data: Vec<f32>,
    tracks: usize,
    frames: usize,
}

impl TrackBuffers {
    pub fn new(tracks: usize, frames: usize) -> Self {
        Self {
            data: vec![0.0; tracks * frames * OUTPUT_CHANNELS],
            tracks,
            frames,
        }
    }

    #[inline]
    fn offset(&self, track: usize, frame: usize) -> usize {
        debug_assert!(track < self.tracks, "track {track} out of range");
        debug_assert!(frame < self.frames, "frame {frame} out of range");
        (track * self.frames + frame) * OUTPUT_CHANNELS
    }

    /// Write a mono sample to both channels of `track` at `frame`.
    #[inline]
    pub fn write(&mut self, track: usize, frame: usize, sample: f32) {
        self.write_stereo(track, frame, sample, sample);
    }

    #[inline]
    pub fn write_stereo(&mut self, track: usize, frame: usize, left: f32, right: f32) {
        let i = self.offset(track, frame);
        self.data[i] = left;
        self.data[i + 1] = right;
    }

    /// Interleaved samples of one track.
    pub fn track(&self, track: usize) -> &[f32] {
        let len = self.frames * OUTPUT_CHANNELS;
        &self.data[track * len..(track + 1) * len]
    }

    /// Sum all tracks into interleaved 16-bit `out`, then zero the tracks.
    ///
    /// Mixes `min(frames, out.len() / 2)` frames; the rest of `out` is left
    /// untouched.
    pub fn mix_tracks(&mut self, out: &mut [i16]) {
        let frames = self.frames.min(out.len() / OUTPUT_CHANNELS);
        let track_len = self.frames * OUTPUT_CHANNELS;

        for (frame, pair) in out.chunks_exact_mut(OUTPUT_CHANNELS).take(frames).enumerate() {
            let mut left = 0.0;
            let mut right = 0.0;
            for track in self.data.chunks_exact(track_len) {
                left += track[frame * OUTPUT_CHANNELS];
                right += track[frame * OUTPUT_CHANNELS + 1];
            }
            pair[0] = (FULL_SCALE * left) as i16;
            pair[1] = (FULL_SCALE * right) as i16;
        }

        self.clear();
    }

    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    pub fn tracks(&self) -> usize {
        self.tracks
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}
