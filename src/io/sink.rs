//! Audio output boundary.
//!
//! The engine never talks to hardware itself. A host hands each mixed period
//! to an [`AudioSink`] through [`play_period`], which applies the recovery
//! policy: underruns re-prime the device, anything else is logged and
//! playback carries on.

use log::{debug, error, warn};

use crate::{Error, OUTPUT_CHANNELS};

/// Blocking, period-oriented PCM output.
///
/// Buffers are interleaved signed 16-bit samples, `frames * channels` long.
pub trait AudioSink {
    fn open(&mut self, device: &str) -> Result<(), Error>;

    /// Request a format. Returns the period size the device settled on,
    /// which may differ from `period_frames`.
    fn configure(
        &mut self,
        sample_rate: u32,
        channels: usize,
        period_frames: usize,
    ) -> Result<usize, Error>;

    /// Write `frames` frames from `buffer`, blocking for at most about one
    /// period. Returns the number of frames accepted, or `Error::Underrun`
    /// when the device starved.
    fn write(&mut self, buffer: &[i16], frames: usize) -> Result<usize, Error>;

    /// Re-prime the device after an underrun.
    fn prepare(&mut self) -> Result<(), Error>;

    /// Drain pending audio and release the device.
    fn close(&mut self) -> Result<(), Error>;
}

/// What happened to one period handed to [`play_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodOutcome {
    Written,
    Short(usize),
    Underrun,
    Failed,
}

/// Write one period, recovering from whatever the sink reports.
pub fn play_period<S: AudioSink + ?Sized>(
    sink: &mut S,
    buffer: &[i16],
    frames: usize,
) -> PeriodOutcome {
    match sink.write(buffer, frames) {
        Ok(written) if written == frames => PeriodOutcome::Written,
        Ok(written) => {
            warn!("short write, wrote {written} of {frames} frames");
            PeriodOutcome::Short(written)
        }
        Err(Error::Underrun) => {
            warn!("underrun occurred");
            if let Err(err) = sink.prepare() {
                error!("failed to re-prime sink after underrun: {err}");
            }
            PeriodOutcome::Underrun
        }
        Err(err) => {
            error!("error from sink write: {err}");
            PeriodOutcome::Failed
        }
    }
}

/// Sink that keeps everything in memory. Used by tests and offline checks;
/// faults can be injected to exercise the recovery policy.
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Vec<i16>,
    device: Option<String>,
    channels: usize,
    period_frames: usize,
    max_period: Option<usize>,
    pending_fault: Option<Error>,
    short_by: usize,
    prepares: usize,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the negotiated period, like a device with a small buffer.
    pub fn with_max_period(mut self, frames: usize) -> Self {
        self.max_period = Some(frames);
        self
    }

    /// Make the next write fail with `err`.
    pub fn fail_next(&mut self, err: Error) {
        self.pending_fault = Some(err);
    }

    /// Make the next write accept `frames` fewer frames than asked.
    pub fn short_next(&mut self, frames: usize) {
        self.short_by = frames;
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn prepares(&self) -> usize {
        self.prepares
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some() && !self.closed
    }
}

impl AudioSink for MemorySink {
    fn open(&mut self, device: &str) -> Result<(), Error> {
        if self.is_open() {
            return Err(Error::Device(format!("{device} is already open")));
        }
        self.device = Some(device.to_string());
        self.closed = false;
        Ok(())
    }

    fn configure(
        &mut self,
        sample_rate: u32,
        channels: usize,
        period_frames: usize,
    ) -> Result<usize, Error> {
        if sample_rate == 0 || period_frames == 0 {
            return Err(Error::Configuration(
                "sample rate and period must be non-zero".to_string(),
            ));
        }
        if channels != OUTPUT_CHANNELS {
            return Err(Error::Configuration(format!(
                "unsupported channel count {channels}"
            )));
        }
        self.channels = channels;
        self.period_frames = self
            .max_period
            .map_or(period_frames, |max| period_frames.min(max));
        debug!("memory sink negotiated {} frames", self.period_frames);
        Ok(self.period_frames)
    }

    fn write(&mut self, buffer: &[i16], frames: usize) -> Result<usize, Error> {
        if !self.is_open() {
            return Err(Error::Device("sink is not open".to_string()));
        }
        if let Some(err) = self.pending_fault.take() {
            return Err(err);
        }

        let frames = frames
            .saturating_sub(std::mem::take(&mut self.short_by))
            .min(buffer.len() / self.channels.max(1));
        self.samples
            .extend_from_slice(&buffer[..frames * self.channels]);
        Ok(frames)
    }

    fn prepare(&mut self) -> Result<(), Error> {
        self.prepares += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.closed = true;
        Ok(())
    }
}
