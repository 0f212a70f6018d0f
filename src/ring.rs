//! Fixed-capacity ring of pulse codes staged for transmission.

use crate::error::OverrunError;
use crate::pulse::{Level, PulseCode};

/// Circular send buffer
///
/// `N` must be a power of 2 for cheap wraparound. Indices run freely and are
/// masked on access, so `used == write_index - read_index` (wrapping).
///
/// There is no locking: the fill phase only advances the write index and
/// the drain phase only advances the read index, and the transmission driver
/// never runs the two phases at the same time.
pub struct SendBuffer<const N: usize> {
    slots: [PulseCode; N],
    write_idx: usize,
    read_idx: usize,
}

impl<const N: usize> SendBuffer<N> {
    /// Create new empty buffer
    pub const fn new() -> Self {
        const { assert!(N.is_power_of_two(), "Buffer size must be power of 2") };

        Self {
            slots: [PulseCode::new(Level::Low, 0, Level::Low, 0); N],
            write_idx: 0,
            read_idx: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Append one code.
    ///
    /// Callers check [`available_to_fill`](Self::available_to_fill) first; a
    /// write on a full buffer is a contract violation.
    #[inline]
    pub fn write(&mut self, code: PulseCode) -> Result<(), OverrunError> {
        if self.used() >= N {
            return Err(OverrunError);
        }
        self.slots[self.write_idx & (N - 1)] = code;
        self.write_idx = self.write_idx.wrapping_add(1);
        Ok(())
    }

    /// Remove and return the oldest code
    #[inline]
    pub fn pop(&mut self) -> Option<PulseCode> {
        if self.is_empty() {
            return None;
        }
        let code = self.slots[self.read_idx & (N - 1)];
        self.read_idx = self.read_idx.wrapping_add(1);
        Some(code)
    }

    /// Longest run of pending codes that is contiguous in memory, at most
    /// `max` long. Stops at the wrap point.
    pub fn contiguous(&self, max: usize) -> &[PulseCode] {
        let start = self.read_idx & (N - 1);
        let len = self.used().min(N - start).min(max);
        &self.slots[start..start + len]
    }

    /// Copy pending codes into `out` without consuming them.
    ///
    /// Returns the number of codes copied.
    pub fn copy_out(&self, out: &mut [PulseCode]) -> usize {
        let count = self.used().min(out.len());
        for (offset, slot) in out.iter_mut().take(count).enumerate() {
            *slot = self.slots[self.read_idx.wrapping_add(offset) & (N - 1)];
        }
        count
    }

    /// Mark `count` pending codes as sent.
    ///
    /// Clamped to the number of pending codes.
    pub fn consume(&mut self, count: usize) {
        let count = count.min(self.used());
        self.read_idx = self.read_idx.wrapping_add(count);
    }

    /// Drop every pending code and rewind both indices.
    ///
    /// Only legal between frames.
    pub fn reset(&mut self) {
        self.write_idx = 0;
        self.read_idx = 0;
    }

    #[inline]
    pub const fn used(&self) -> usize {
        self.write_idx.wrapping_sub(self.read_idx)
    }

    #[inline]
    pub const fn available_to_fill(&self) -> usize {
        N - self.used()
    }

    #[inline]
    pub const fn available_to_drain(&self) -> usize {
        self.used()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.used() == 0
    }

    pub const fn write_index(&self) -> usize {
        self.write_idx
    }

    pub const fn read_index(&self) -> usize {
        self.read_idx
    }
}

impl<const N: usize> Default for SendBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
