//! Buffered LED pulse-train streaming.
//!
//! Intensity values are pulled from a [`DataSource`], expanded bit by bit
//! into [`PulseCode`]s through a per-channel [`TranslationTable`], staged in a
//! [`SendBuffer`] and drained into a [`PulseTransmitter`] in bounded chunks by
//! one of two [`TransmissionDriver`] strategies:
//!
//! - [`InterruptDriver`] refills from the hardware threshold event
//! - [`CompletionDriver`] blocks the caller on each chunk's completion
//!
//! A [`Channel`] sequences frames on top of that, and a [`FramePacer`] drives
//! it from a background task.

#![no_std]

pub mod channel;
pub mod color;
pub mod config;
pub mod driver;
pub mod encoder;
pub mod error;
pub mod pacer;
pub mod pulse;
pub mod registry;
pub mod ring;
pub mod signal;
pub mod source;
pub mod stats;
pub mod translation;
pub mod transmitter;

pub use channel::{Channel, ChannelState, ChannelStatus, FrameOutcome, SharedChannel};
pub use color::{ColorOrder, Rgb};
pub use config::{BitOrder, ChannelConfig};
pub use driver::{
    CompletionDriver, FrameEnd, FrameProgress, InterruptDriver, Pipeline, TransmissionDriver,
};
pub use encoder::{FillReport, IntensityEncoder};
pub use error::{ConfigurationError, OverrunError, StreamError, TransmitterError};
pub use pacer::{FramePacer, PacerEvent, PacerTick};
pub use pulse::{Level, PulseCode, RmtWord};
pub use registry::{ChannelRegistry, InterruptTarget, RegistryError};
pub use ring::SendBuffer;
pub use signal::FrameSignal;
pub use source::{DataSource, RgbSource, SliceSource};
pub use stats::StreamStats;
pub use translation::{BitSymbol, TranslationEntry, TranslationTable};
pub use transmitter::{PulseTransmitter, TransmitterConfig, pack_words};

pub use embassy_time::{Duration, Instant};

/// Install the esp-println backend for the `log` facade
#[cfg(feature = "esp32-log")]
pub fn init_logger(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}
