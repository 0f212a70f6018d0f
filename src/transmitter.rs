//! Pulse transmitter capability.
//!
//! Everything peripheral-specific (register layout, vendor driver API, pin
//! routing) lives behind [`PulseTransmitter`]. Implementations pack codes
//! with [`pack_words`] when the hardware wants the 32-bit item layout.

use embassy_time::Duration;

use crate::config::ChannelConfig;
use crate::error::{ConfigurationError, TransmitterError};
use crate::pulse::{Level, PulseCode, RmtWord};

/// Parameters handed to the transmitter when the channel comes up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitterConfig {
    pub channel_id: u8,
    pub data_pin: u8,
    /// Tick rate the pulse durations are expressed in
    pub resolution_hz: u32,
    /// Hardware memory depth in pulse codes
    pub mem_block_symbols: usize,
    /// Queued transactions the hardware can hold
    pub queue_depth: usize,
    pub idle_level: Level,
    /// Bound on a single chunk's transmit and completion wait
    pub chunk_timeout: Duration,
}

impl From<&ChannelConfig> for TransmitterConfig {
    fn from(config: &ChannelConfig) -> Self {
        Self {
            channel_id: config.channel_id,
            data_pin: config.data_pin,
            resolution_hz: config.resolution_hz,
            mem_block_symbols: config.mem_block_symbols,
            queue_depth: config.queue_depth,
            idle_level: config.idle_level,
            chunk_timeout: config.chunk_timeout,
        }
    }
}

/// Peripheral pulse generator
///
/// Implement this trait to support different hardware platforms.
pub trait PulseTransmitter {
    /// Bring the peripheral up. Called once, before any other method.
    fn configure(&mut self, config: &TransmitterConfig) -> Result<(), ConfigurationError>;

    /// Longest contiguous run of codes a single `transmit` call accepts
    fn max_chunk_len(&self) -> usize;

    /// Hand `codes` to the hardware.
    ///
    /// A zero `timeout` means the call must not block (interrupt context).
    fn transmit(&mut self, codes: &[PulseCode], timeout: Duration) -> Result<(), TransmitterError>;

    /// Block until every handed-over code has left the pin
    fn await_completion(&mut self, timeout: Duration) -> Result<(), TransmitterError>;

    /// Re-arm after [`disable`](Self::disable)
    fn enable(&mut self) {}

    /// Stop activating the output; queued state is kept
    fn disable(&mut self);

    /// Release the peripheral
    fn teardown(&mut self);
}

impl<T: PulseTransmitter + ?Sized> PulseTransmitter for &mut T {
    fn configure(&mut self, config: &TransmitterConfig) -> Result<(), ConfigurationError> {
        (**self).configure(config)
    }

    fn max_chunk_len(&self) -> usize {
        (**self).max_chunk_len()
    }

    fn transmit(&mut self, codes: &[PulseCode], timeout: Duration) -> Result<(), TransmitterError> {
        (**self).transmit(codes, timeout)
    }

    fn await_completion(&mut self, timeout: Duration) -> Result<(), TransmitterError> {
        (**self).await_completion(timeout)
    }

    fn enable(&mut self) {
        (**self).enable();
    }

    fn disable(&mut self) {
        (**self).disable();
    }

    fn teardown(&mut self) {
        (**self).teardown();
    }
}

/// Serialize `codes` into hardware items.
///
/// Returns the number of items written, bounded by both slice lengths.
pub fn pack_words(codes: &[PulseCode], out: &mut [RmtWord]) -> usize {
    let count = codes.len().min(out.len());
    for (word, code) in out.iter_mut().zip(codes) {
        *word = code.to_rmt_word();
    }
    count
}
