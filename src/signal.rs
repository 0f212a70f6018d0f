//! Single-slot frame completion notification.
//!
//! Written from the interrupt side when a frame ends, taken by the pacing
//! task. A newer notification replaces an unread one.

use core::cell::Cell;

use critical_section::Mutex;

use crate::driver::FrameEnd;

/// One-shot notification slot, safe to touch from interrupt context.
pub struct FrameSignal {
    slot: Mutex<Cell<Option<FrameEnd>>>,
}

impl FrameSignal {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Post the end of a frame
    pub fn notify(&self, end: FrameEnd) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Some(end)));
    }

    /// Take the pending notification, leaving the slot empty
    pub fn take(&self) -> Option<FrameEnd> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }

    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_some())
    }

    pub fn clear(&self) {
        critical_section::with(|cs| self.slot.borrow(cs).set(None));
    }
}

impl Default for FrameSignal {
    fn default() -> Self {
        Self::new()
    }
}
