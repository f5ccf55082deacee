// Purpose: polyphonic note management on top of an injected voice renderer.
// The synth only tracks slots and flags; what a voice sounds like, and when
// it goes silent, is decided by the renderer.

pub mod message;
pub mod note;
pub mod poly;
pub mod voice;

pub use message::{EventReceiver, NoteEvent};
pub use note::{Note, NoteFlags};
pub use poly::Synth;
pub use voice::{DecayVoice, VoiceRenderer};
