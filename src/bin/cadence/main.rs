//! cadence - plays the demo session on the default output device
//!
//! Run with: cargo run
//! Set RUST_LOG=debug for sink negotiation details.

mod app;
mod cpal_sink;

use cadence::EngineConfig;
use cpal_sink::CpalSink;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let config = EngineConfig::default();
    let mut sink = CpalSink::new();
    app::run(&mut sink, &config)
}
