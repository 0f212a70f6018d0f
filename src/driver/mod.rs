//! Transmission strategies.
//!
//! Both strategies move codes out of the send buffer in bounded chunks and
//! refill it through the encoder as space frees. The frame orchestrator only
//! sees [`TransmissionDriver`].

mod completion;
mod interrupt;

pub use completion::CompletionDriver;
pub use interrupt::InterruptDriver;

use crate::encoder::{FillReport, IntensityEncoder};
use crate::error::{ConfigurationError, StreamError};
use crate::ring::SendBuffer;
use crate::source::DataSource;
use crate::stats::StreamStats;
use crate::transmitter::TransmitterConfig;
use crate::translation::TranslationTable;

/// How a frame ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEnd {
    Completed,
    Aborted(StreamError),
}

impl FrameEnd {
    pub const fn into_result(self) -> Result<(), StreamError> {
        match self {
            Self::Completed => Ok(()),
            Self::Aborted(error) => Err(error),
        }
    }
}

/// State of a frame after the driver has been kicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameProgress {
    /// Hardware events will carry the frame to its end
    InFlight,
    Finished(FrameEnd),
}

/// Data side of a channel: everything the encoder and the drivers share.
pub struct Pipeline<S, const N: usize> {
    pub(crate) table: TranslationTable,
    pub(crate) encoder: IntensityEncoder,
    pub(crate) ring: SendBuffer<N>,
    pub(crate) source: S,
    pub(crate) stats: StreamStats,
    has_data_remaining: bool,
}

impl<S: DataSource, const N: usize> Pipeline<S, N> {
    pub(crate) fn new(table: TranslationTable, encoder: IntensityEncoder, source: S) -> Self {
        Self {
            table,
            encoder,
            ring: SendBuffer::new(),
            source,
            stats: StreamStats::default(),
            has_data_remaining: false,
        }
    }

    /// Rewind for a new frame
    pub(crate) fn reset(&mut self) {
        self.ring.reset();
        self.source.on_frame_start();
        self.has_data_remaining = self.source.more_data_available();
    }

    /// Run the encoder over the free space of the send buffer
    pub fn refill(&mut self) -> Result<FillReport, StreamError> {
        let report = self
            .encoder
            .fill_buffer(&self.table, &mut self.source, &mut self.ring)?;
        if report.codes > 0 {
            self.stats.buffer_fills = self.stats.buffer_fills.saturating_add(1);
        }
        self.has_data_remaining = self.source.more_data_available();
        Ok(report)
    }

    /// Source exhausted and nothing left to send
    pub fn is_drained(&self) -> bool {
        self.ring.is_empty() && !self.has_data_remaining
    }

    pub const fn has_data_remaining(&self) -> bool {
        self.has_data_remaining
    }

    pub const fn send_buffer(&self) -> &SendBuffer<N> {
        &self.ring
    }

    pub const fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub const fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

/// Variant-specific engine that drains the send buffer into hardware
pub trait TransmissionDriver {
    /// Driver identity reported in the channel status
    const NAME: &'static str;

    /// `begin_frame` waits on the hardware until the frame is sent.
    ///
    /// Such a driver must not run inside a critical section: the completion
    /// it waits for is usually raised from an interrupt.
    const BLOCKING: bool = false;

    /// Configure the underlying transmitter
    fn configure(&mut self, config: &TransmitterConfig) -> Result<(), ConfigurationError>;

    /// Start moving the already-filled send buffer out
    fn begin_frame<S: DataSource, const N: usize>(
        &mut self,
        pipeline: &mut Pipeline<S, N>,
    ) -> FrameProgress;

    /// Hardware memory drained below its watermark
    fn on_threshold<S: DataSource, const N: usize>(
        &mut self,
        _pipeline: &mut Pipeline<S, N>,
    ) -> Option<FrameEnd> {
        None
    }

    /// Hardware reported the end of transmission
    fn on_transmit_done<S: DataSource, const N: usize>(
        &mut self,
        _pipeline: &mut Pipeline<S, N>,
    ) -> Option<FrameEnd> {
        None
    }

    /// Drop the frame in flight and return to idle
    fn abort(&mut self);

    /// No frame in flight
    fn is_idle(&self) -> bool;

    /// Allow or suspend hardware activation
    fn set_enabled(&mut self, enabled: bool);

    /// Release the transmitter
    fn teardown(&mut self);
}
