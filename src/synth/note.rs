/// Note slot flags, stored as a small bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteFlags(u8);

impl NoteFlags {
    /// Slot is available for a new note.
    pub const FREE: Self = Self(1 << 0);
    /// The note has been released; the renderer decides when it goes silent.
    pub const RELEASE: Self = Self(1 << 1);
    /// Per-voice state must be reset before the next render.
    pub const RESET: Self = Self(1 << 2);

    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    #[inline]
    pub fn set(&mut self, flag: Self) {
        self.0 |= flag.0;
    }

    #[inline]
    pub fn unset(&mut self, flag: Self) {
        self.0 &= !flag.0;
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

/// One polyphony slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    pub amp: f32,
    /// Caller-chosen identity pairing note-on with note-off.
    pub key: i32,
    pub flags: NoteFlags,
}

impl Note {
    pub const fn free() -> Self {
        Self {
            freq: 0.0,
            amp: 0.0,
            key: 0,
            flags: NoteFlags::FREE,
        }
    }

    pub fn is_free(&self) -> bool {
        self.flags.contains(NoteFlags::FREE)
    }

    pub fn is_released(&self) -> bool {
        self.flags.contains(NoteFlags::RELEASE)
    }

    pub fn reset_pending(&self) -> bool {
        self.flags.contains(NoteFlags::RESET)
    }

    /// Take the reset request, clearing it.
    pub fn take_reset(&mut self) -> bool {
        let pending = self.reset_pending();
        self.flags.unset(NoteFlags::RESET);
        pending
    }

    /// Return the slot to the pool.
    pub fn free_slot(&mut self) {
        self.flags = NoteFlags::FREE;
    }

    pub(crate) fn start(&mut self, freq: f32, amp: f32, key: i32) {
        self.flags.set(NoteFlags::RESET);
        self.flags.unset(NoteFlags::FREE);
        self.flags.unset(NoteFlags::RELEASE);
        self.freq = freq;
        self.amp = amp;
        self.key = key;
    }

    pub(crate) fn release(&mut self) {
        self.flags.set(NoteFlags::RELEASE);
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::free()
    }
}
