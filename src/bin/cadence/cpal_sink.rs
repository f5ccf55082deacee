//! `AudioSink` over a cpal output stream.
//!
//! `write` pushes interleaved i16 samples into a lock-free ring buffer and
//! blocks while it is full; the stream callback drains it. When the callback
//! finds the ring empty after playback has started it raises an underrun
//! flag, which the next `write` reports so the host can re-prime.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use cadence::{io::AudioSink, Error};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};
use rtrb::{Consumer, Producer, RingBuffer};

/// Periods of audio buffered between the engine and the device.
const RING_PERIODS: usize = 4;
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

pub struct CpalSink {
    device: Option<cpal::Device>,
    stream: Option<cpal::Stream>,
    producer: Option<Producer<i16>>,
    channels: usize,
    period_frames: usize,
    sample_rate: u32,
    started: Arc<AtomicBool>,
    underrun: Arc<AtomicBool>,
}

impl CpalSink {
    pub fn new() -> Self {
        Self {
            device: None,
            stream: None,
            producer: None,
            channels: 0,
            period_frames: 0,
            sample_rate: 0,
            started: Arc::new(AtomicBool::new(false)),
            underrun: Arc::new(AtomicBool::new(false)),
        }
    }

    fn build_stream(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        mut consumer: Consumer<i16>,
    ) -> Result<cpal::Stream, Error> {
        let started = self.started.clone();
        let underrun = self.underrun.clone();

        device
            .build_output_stream(
                config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for sample in data.iter_mut() {
                        *sample = match consumer.pop() {
                            Ok(value) => value as f32 / cadence::FULL_SCALE,
                            Err(_) => {
                                if started.load(Ordering::Relaxed) {
                                    underrun.store(true, Ordering::Relaxed);
                                }
                                0.0
                            }
                        };
                    }
                },
                |err| warn!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| Error::Configuration(e.to_string()))
    }
}

impl AudioSink for CpalSink {
    fn open(&mut self, device: &str) -> Result<(), Error> {
        let host = cpal::default_host();
        let found = if device == "default" {
            host.default_output_device()
        } else {
            host.output_devices()
                .map_err(|e| Error::Device(e.to_string()))?
                .find(|d| d.name().map(|name| name == device).unwrap_or(false))
        };

        let found = found.ok_or_else(|| Error::Device(format!("no output device '{device}'")))?;
        info!(
            "opened output device {}",
            found.name().unwrap_or_else(|_| device.to_string())
        );
        self.device = Some(found);
        Ok(())
    }

    fn configure(
        &mut self,
        sample_rate: u32,
        channels: usize,
        period_frames: usize,
    ) -> Result<usize, Error> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| Error::Device("configure before open".to_string()))?;

        let config = cpal::StreamConfig {
            channels: channels as cpal::ChannelCount,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (producer, consumer) = RingBuffer::new(period_frames * channels * RING_PERIODS);
        let stream = self.build_stream(device, &config, consumer)?;
        stream
            .play()
            .map_err(|e| Error::Device(e.to_string()))?;

        self.stream = Some(stream);
        self.producer = Some(producer);
        self.channels = channels;
        self.period_frames = period_frames;
        self.sample_rate = sample_rate;
        info!("stream running: {sample_rate} Hz, {channels} channels, {period_frames} frame periods");
        Ok(period_frames)
    }

    fn write(&mut self, buffer: &[i16], frames: usize) -> Result<usize, Error> {
        let producer = self
            .producer
            .as_mut()
            .ok_or_else(|| Error::Device("write before configure".to_string()))?;

        if self.underrun.load(Ordering::Relaxed) {
            return Err(Error::Underrun);
        }

        let samples = (frames * self.channels).min(buffer.len());
        // poll at an eighth of a period while the ring is full
        let nap = Duration::from_secs_f64(
            self.period_frames as f64 / self.sample_rate.max(1) as f64 / 8.0,
        );
        for &sample in &buffer[..samples] {
            while producer.push(sample).is_err() {
                if producer.is_abandoned() {
                    return Err(Error::Device("stream callback dropped".to_string()));
                }
                thread::sleep(nap);
            }
        }

        self.started.store(true, Ordering::Relaxed);
        Ok(samples / self.channels.max(1))
    }

    fn prepare(&mut self) -> Result<(), Error> {
        self.underrun.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        if let Some(producer) = &self.producer {
            let capacity = producer.buffer().capacity();
            let deadline = Instant::now() + DRAIN_TIMEOUT;
            while producer.slots() < capacity && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(5));
            }
        }

        self.started.store(false, Ordering::Relaxed);
        if let Some(stream) = self.stream.take() {
            stream.pause().map_err(|e| Error::Device(e.to_string()))?;
        }
        self.producer = None;
        self.device = None;
        Ok(())
    }
}
