//! Channel configuration.
//!
//! Set once when the channel is created. Changing it means tearing the
//! channel down, which the owning process does by restarting.

use embassy_time::Duration;

use crate::error::ConfigurationError;
use crate::pulse::Level;
use crate::translation::{BitSymbol, TranslationTable};

/// Default transmitter tick rate (40 MHz)
pub const DEFAULT_RESOLUTION_HZ: u32 = 40_000_000;

/// Default hardware memory depth in pulse codes
pub const DEFAULT_MEM_BLOCK_SYMBOLS: usize = 64;

/// Default number of queued transactions in the transmitter
pub const DEFAULT_QUEUE_DEPTH: usize = 4;

/// Default bound on a single chunk's completion wait
pub const DEFAULT_CHUNK_TIMEOUT: Duration = Duration::from_millis(250);

/// Default bound on a whole frame's completion signal
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_millis(500);

/// Default pacing tick (25 frames per second)
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(40);

/// Widest supported intensity value
pub const MAX_BIT_WIDTH: u8 = 32;

/// Which edge of an intensity value goes on the wire first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BitOrder {
    #[default]
    MsbFirst,
    LsbFirst,
}

/// Per-channel parameters
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub channel_id: u8,
    pub data_pin: u8,
    /// Bits per intensity value
    pub bit_width: u8,
    pub bit_order: BitOrder,
    /// Send a stop code after each intensity value
    pub send_inter_intensity_bits: bool,
    /// Send an end-of-frame code after the last intensity value
    pub send_end_of_frame_bits: bool,
    /// Interframe gap codes before each frame
    pub idle_bits: u8,
    /// Frame start codes after the gap
    pub start_bits: u8,
    /// Line level while the transmitter is idle
    pub idle_level: Level,
    pub resolution_hz: u32,
    pub mem_block_symbols: usize,
    pub queue_depth: usize,
    pub chunk_timeout: Duration,
    pub frame_timeout: Duration,
    pub frame_duration: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_id: 0,
            data_pin: 0,
            bit_width: 8,
            bit_order: BitOrder::MsbFirst,
            send_inter_intensity_bits: false,
            send_end_of_frame_bits: false,
            idle_bits: 1,
            start_bits: 0,
            idle_level: Level::Low,
            resolution_hz: DEFAULT_RESOLUTION_HZ,
            mem_block_symbols: DEFAULT_MEM_BLOCK_SYMBOLS,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            chunk_timeout: DEFAULT_CHUNK_TIMEOUT,
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
            frame_duration: DEFAULT_FRAME_DURATION,
        }
    }
}

impl ChannelConfig {
    /// Pulse codes one intensity value occupies, trailer included
    pub const fn slots_per_value(&self) -> usize {
        let trailer = if self.send_inter_intensity_bits || self.send_end_of_frame_bits {
            1
        } else {
            0
        };
        self.bit_width as usize + trailer
    }

    /// Framing codes written at the start of every frame
    pub const fn framing_slots(&self) -> usize {
        self.idle_bits as usize + self.start_bits as usize
    }

    /// Check the configuration against a send buffer of `capacity` slots
    /// and the installed translations.
    pub fn validate(
        &self,
        capacity: usize,
        table: &TranslationTable,
    ) -> Result<(), ConfigurationError> {
        if self.bit_width == 0 || self.bit_width > MAX_BIT_WIDTH {
            return Err(ConfigurationError::UnsupportedBitWidth(self.bit_width));
        }

        // The encoder only fills while strictly more than one value fits
        let required = self.framing_slots() + self.slots_per_value() + 1;
        if required > capacity {
            return Err(ConfigurationError::BufferTooSmall { required, capacity });
        }

        for symbol in self.used_symbols() {
            table.require(symbol)?;
        }
        Ok(())
    }

    /// Symbols this configuration will ask the table for
    pub fn used_symbols(&self) -> impl Iterator<Item = BitSymbol> {
        [
            (BitSymbol::Zero, true),
            (BitSymbol::One, true),
            (BitSymbol::InterframeGap, self.idle_bits > 0),
            (BitSymbol::FrameStart, self.start_bits > 0),
            (BitSymbol::Stop, self.send_inter_intensity_bits),
            (BitSymbol::EndOfFrame, self.send_end_of_frame_bits),
        ]
        .into_iter()
        .filter_map(|(symbol, used)| used.then_some(symbol))
    }
}
