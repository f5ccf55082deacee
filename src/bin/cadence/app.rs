//! Demo session: three staggered notes through a small effect rack.
//!
//! Track 0 carries the synth plus a feedback delay, track 1 a reverb send and
//! track 2 a pitch-shifted copy from the spectral processor.

use color_eyre::eyre::{Result, WrapErr};
use log::info;

use cadence::{
    io::{play_period, AudioSink, PeriodOutcome},
    synth::{DecayVoice, NoteEvent, Synth},
    EngineConfig, EngineContext, DEFAULT_SPECTRAL_FRAME, OUTPUT_CHANNELS,
};

const PERIODS: usize = 2048;
const POLYPHONY: usize = 8;
const VIBRATO_DEPTH_HZ: f32 = 15.0;

const DELAY_TIME: f32 = 0.3;
const DELAY_FEEDBACK: f32 = 0.6;
const DELAY_MAX_SECONDS: f32 = 10.0;
const SHIFT_FACTOR: f32 = 1.5;

const REVERB_SEND: f32 = 0.3;
const SPECTRAL_SEND: f32 = 0.2;

/// Events applied at the start of the given period.
const SCHEDULE: [(usize, NoteEvent); 6] = [
    (0, NoteEvent::On { freq: 440.0, amp: 0.1, key: 1 }),
    (50, NoteEvent::On { freq: 660.0, amp: 0.1, key: 2 }),
    (100, NoteEvent::On { freq: 880.0, amp: 0.1, key: 3 }),
    (300, NoteEvent::Off { key: 1 }),
    (350, NoteEvent::Off { key: 2 }),
    (400, NoteEvent::Off { key: 3 }),
];

pub fn run(sink: &mut impl AudioSink, config: &EngineConfig) -> Result<()> {
    let mut ctx = EngineContext::new(config).wrap_err("failed to build engine context")?;

    sink.open("default").wrap_err("failed to open output device")?;
    let negotiated = sink
        .configure(ctx.sample_rate(), OUTPUT_CHANNELS, ctx.frames())
        .wrap_err("failed to configure output device")?;
    // a period can never be longer than the track buffers
    let frames = negotiated.min(ctx.frames());
    info!("rendering {PERIODS} periods of {frames} frames");

    let mut synth = Synth::new(
        &mut ctx,
        POLYPHONY,
        DecayVoice::new().with_vibrato(VIBRATO_DEPTH_HZ),
    )
    .wrap_err("failed to build synth")?;

    let mut delay = ctx.new_delay(DELAY_MAX_SECONDS);
    let mut reverb = ctx.new_reverb();
    reverb.set_reverb(40.0, 2.5, 0.05, 5_000.0, 0.02);
    let mut spectral = ctx
        .new_spectral(DEFAULT_SPECTRAL_FRAME)
        .wrap_err("failed to build spectral processor")?;

    let mut out = vec![0i16; frames * OUTPUT_CHANNELS];
    let mut underruns = 0;

    for period in 0..PERIODS {
        for &(_, event) in SCHEDULE.iter().filter(|(at, _)| *at == period) {
            // rejected events are logged by the synth
            let _ = synth.handle_event(event);
        }

        for frame in 0..frames {
            ctx.generators_mut().advance_all();

            let sample = synth.render_sample(&ctx);
            let delayed = delay.apply(sample, DELAY_TIME, DELAY_FEEDBACK);
            ctx.write_to_track(0, frame, sample + delayed);

            let wet = reverb.apply(sample);
            ctx.write_to_track(1, frame, REVERB_SEND * wet);

            spectral.apply_fft(sample);
            if spectral.samples_ready() {
                spectral.spectral_shift(SHIFT_FACTOR);
            }
            ctx.write_to_track(2, frame, SPECTRAL_SEND * spectral.apply_ifft());
        }

        ctx.mix_tracks(&mut out);
        if play_period(sink, &out, frames) == PeriodOutcome::Underrun {
            underruns += 1;
        }
    }

    info!("done, {underruns} underruns");
    sink.close().wrap_err("failed to close output device")?;
    Ok(())
}
