//! Streaming health counters.

use crate::error::StreamError;

/// Cumulative per-channel counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub frames_started: u32,
    pub frames_completed: u32,
    pub frames_aborted: u32,
    /// Pulse codes handed to the transmitter
    pub entries_transferred: u64,
    /// Encoder passes that wrote at least one code
    pub buffer_fills: u32,
    pub overruns: u32,
    pub timeouts: u32,
    pub transmit_errors: u32,
    pub underruns: u32,
    /// Translation self-check mismatches
    pub validation_failures: u32,
}

impl StreamStats {
    pub(crate) fn record_transfer(&mut self, codes: usize) {
        self.entries_transferred = self.entries_transferred.saturating_add(codes as u64);
    }

    pub(crate) fn record_abort(&mut self, error: StreamError) {
        self.frames_aborted = self.frames_aborted.saturating_add(1);
        let counter = match error {
            StreamError::Timeout => &mut self.timeouts,
            StreamError::Transmit => &mut self.transmit_errors,
            StreamError::Overrun => &mut self.overruns,
            StreamError::Underrun => &mut self.underruns,
            StreamError::Paused | StreamError::Busy => return,
        };
        *counter = counter.saturating_add(1);
    }
}
