use std::{error, fmt};

/// Fixed-capacity pools that can run out of slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Generators,
    Notes,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generators => write!(f, "generator table"),
            Self::Notes => write!(f, "note pool"),
        }
    }
}

/// All errors reported by cadence.
///
/// Nothing in the per-sample path unwinds: these values are returned (and
/// usually logged) so the render loop keeps its deadline. Only
/// `Configuration` and `Device` are meant to be fatal, and only at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A fixed pool is full; the request was dropped.
    ResourceExhausted(Pool),
    /// Note-off for a key with no active note.
    InvalidKey(i32),
    /// Handle does not refer to an occupied slot.
    InvalidHandle(usize),
    /// The hardware buffer starved and must be re-primed.
    Underrun,
    /// Invalid engine or device parameters.
    Configuration(String),
    /// The output device failed outside of an underrun.
    Device(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceExhausted(pool) => write!(f, "No free slot left in the {pool}"),
            Self::InvalidKey(key) => write!(f, "No active note with key {key}"),
            Self::InvalidHandle(handle) => write!(f, "Handle {handle} is not registered"),
            Self::Underrun => write!(f, "Audio buffer underrun"),
            Self::Configuration(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::Device(msg) => write!(f, "Audio device error: {msg}"),
        }
    }
}
