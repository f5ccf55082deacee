// Purpose - boundary to the hardware output

pub mod sink;

pub use sink::{play_period, AudioSink, MemorySink, PeriodOutcome};
