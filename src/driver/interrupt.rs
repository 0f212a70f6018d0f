//! Interrupt-driven strategy.
//!
//! The frame is primed from the calling context by filling both halves of
//! the transmitter memory; after that each threshold event loads the next
//! half and refills the send buffer. Handlers never block.

use embassy_time::Duration;

use super::{FrameEnd, FrameProgress, Pipeline, TransmissionDriver};
use crate::error::{ConfigurationError, StreamError};
use crate::source::DataSource;
use crate::transmitter::{PulseTransmitter, TransmitterConfig};

const NO_WAIT: Duration = Duration::from_ticks(0);

/// Hardware memory is refilled one half at a time
const MEMORY_HALVES: usize = 2;

/// Threshold-event driver for transmitters with a small ping-pong memory
pub struct InterruptDriver<T> {
    transmitter: T,
    max_chunk: usize,
    active: bool,
    enabled: bool,
}

impl<T: PulseTransmitter> InterruptDriver<T> {
    pub const fn new(transmitter: T) -> Self {
        Self {
            transmitter,
            max_chunk: 0,
            active: false,
            enabled: true,
        }
    }

    pub const fn transmitter(&self) -> &T {
        &self.transmitter
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.transmitter
    }

    pub const fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    /// Move up to one chunk into the hardware, then refill.
    ///
    /// A chunk that wraps around the send buffer goes out as two transmit
    /// calls. Returns the number of codes handed over.
    fn load_chunk<S: DataSource, const N: usize>(
        &mut self,
        pipeline: &mut Pipeline<S, N>,
    ) -> Result<usize, StreamError> {
        if pipeline.ring.is_empty() {
            pipeline.refill()?;
        }

        let mut loaded = 0;
        while loaded < self.max_chunk {
            let piece = pipeline.ring.contiguous(self.max_chunk - loaded);
            if piece.is_empty() {
                break;
            }
            let count = piece.len();
            self.transmitter.transmit(piece, NO_WAIT)?;
            pipeline.ring.consume(count);
            pipeline.stats.record_transfer(count);
            loaded += count;
        }

        pipeline.refill()?;
        Ok(loaded)
    }

    fn finish(&mut self, end: FrameEnd) -> FrameEnd {
        self.active = false;
        if let FrameEnd::Aborted(error) = end {
            log::warn!("[{}] frame aborted: {}", Self::NAME, error);
        }
        end
    }
}

impl<T: PulseTransmitter> TransmissionDriver for InterruptDriver<T> {
    const NAME: &'static str = "RMT-ISR";

    fn configure(&mut self, config: &TransmitterConfig) -> Result<(), ConfigurationError> {
        self.transmitter.configure(config)?;
        // Refill happens when half of the hardware memory has gone out
        let half_memory = config.mem_block_symbols / MEMORY_HALVES;
        self.max_chunk = self.transmitter.max_chunk_len().min(half_memory);
        if self.max_chunk == 0 {
            return Err(ConfigurationError::Unsupported("zero-length transmit chunks"));
        }
        Ok(())
    }

    fn begin_frame<S: DataSource, const N: usize>(
        &mut self,
        pipeline: &mut Pipeline<S, N>,
    ) -> FrameProgress {
        self.active = true;

        // Prime both halves so the first threshold finds one half still
        // queued while it refills the other
        let mut loaded = 0;
        for _ in 0..MEMORY_HALVES {
            match self.load_chunk(pipeline) {
                Ok(0) => break,
                Ok(count) => loaded += count,
                Err(error) => {
                    return FrameProgress::Finished(self.finish(FrameEnd::Aborted(error)));
                }
            }
        }

        if loaded == 0 && pipeline.is_drained() {
            FrameProgress::Finished(self.finish(FrameEnd::Completed))
        } else {
            FrameProgress::InFlight
        }
    }

    fn on_threshold<S: DataSource, const N: usize>(
        &mut self,
        pipeline: &mut Pipeline<S, N>,
    ) -> Option<FrameEnd> {
        if !self.active {
            return None;
        }
        if pipeline.is_drained() {
            return Some(self.finish(FrameEnd::Completed));
        }
        match self.load_chunk(pipeline) {
            Ok(_) => None,
            Err(error) => Some(self.finish(FrameEnd::Aborted(error))),
        }
    }

    fn on_transmit_done<S: DataSource, const N: usize>(
        &mut self,
        pipeline: &mut Pipeline<S, N>,
    ) -> Option<FrameEnd> {
        if !self.active {
            return None;
        }
        let end = if pipeline.is_drained() {
            FrameEnd::Completed
        } else {
            FrameEnd::Aborted(StreamError::Underrun)
        };
        Some(self.finish(end))
    }

    fn abort(&mut self) {
        self.active = false;
        self.transmitter.disable();
        if self.enabled {
            self.transmitter.enable();
        }
    }

    fn is_idle(&self) -> bool {
        !self.active
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.transmitter.enable();
        } else {
            self.transmitter.disable();
        }
    }

    fn teardown(&mut self) {
        self.active = false;
        self.transmitter.teardown();
    }
}
