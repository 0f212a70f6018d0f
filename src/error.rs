//! Error taxonomy.
//!
//! Configuration errors are fatal for the channel and mean the owning process
//! has to restart. Stream errors only abort the current frame.

use core::fmt;

use crate::translation::BitSymbol;

/// Channel cannot be brought up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No translation list was supplied
    MissingTable,
    /// A symbol used by the channel configuration has no pulse code
    MissingTranslation(BitSymbol),
    /// No data source was supplied
    MissingDataSource,
    /// Intensity width outside `1..=32`
    UnsupportedBitWidth(u8),
    /// Framing plus one full intensity value does not fit the send buffer
    BufferTooSmall { required: usize, capacity: usize },
    /// The pulse transmitter rejected its configuration
    Unsupported(&'static str),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTable => f.write_str("translation table is missing"),
            Self::MissingTranslation(symbol) => {
                write!(f, "no pulse code for symbol {}", symbol.as_str())
            }
            Self::MissingDataSource => f.write_str("data source is missing"),
            Self::UnsupportedBitWidth(width) => write!(f, "unsupported bit width {width}"),
            Self::BufferTooSmall { required, capacity } => write!(
                f,
                "send buffer too small: {required} slots required, capacity {capacity}"
            ),
            Self::Unsupported(feature) => write!(f, "unsupported hardware feature: {feature}"),
        }
    }
}

impl core::error::Error for ConfigurationError {}

/// Write attempted on a full send buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrunError;

impl fmt::Display for OverrunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("send buffer overrun")
    }
}

impl core::error::Error for OverrunError {}

/// Failure reported by a [`PulseTransmitter`](crate::PulseTransmitter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitterError {
    /// Chunk rejected by the hardware
    Rejected,
    /// Completion not observed within the wait bound
    Timeout,
}

/// Reason a frame did not start or did not finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// Output is paused
    Paused,
    /// A previous frame is still in flight
    Busy,
    /// Hardware rejected a chunk
    Transmit,
    /// Completion was not observed in time
    Timeout,
    /// Encoder wrote past the send buffer capacity
    Overrun,
    /// Hardware drained before the frame was complete
    Underrun,
}

impl From<OverrunError> for StreamError {
    fn from(_: OverrunError) -> Self {
        Self::Overrun
    }
}

impl From<TransmitterError> for StreamError {
    fn from(error: TransmitterError) -> Self {
        match error {
            TransmitterError::Rejected => Self::Transmit,
            TransmitterError::Timeout => Self::Timeout,
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Paused => "output paused",
            Self::Busy => "frame already in flight",
            Self::Transmit => "transmitter rejected chunk",
            Self::Timeout => "transmit timed out",
            Self::Overrun => "send buffer overrun",
            Self::Underrun => "transmitter drained before end of frame",
        })
    }
}

impl core::error::Error for StreamError {}
