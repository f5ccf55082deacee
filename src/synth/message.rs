#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Note events, either applied directly or queued from a control thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum NoteEvent {
    On { freq: f32, amp: f32, key: i32 },
    Off { key: i32 },
    AllOff,
}

/// Source of queued events, drained on the audio thread without blocking.
pub trait EventReceiver {
    fn pop(&mut self) -> Option<NoteEvent>;
}

#[cfg(feature = "rtrb")]
impl EventReceiver for Consumer<NoteEvent> {
    fn pop(&mut self) -> Option<NoteEvent> {
        Consumer::pop(self).ok()
    }
}
