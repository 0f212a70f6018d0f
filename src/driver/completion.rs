//! Completion-queue strategy.
//!
//! The calling context copies a chunk out of the send buffer into contiguous
//! scratch memory, hands it to the transmitter and blocks until the hardware
//! confirms it. Then it advances the read index, refills and loops.

use embassy_time::Duration;

use super::{FrameEnd, FrameProgress, Pipeline, TransmissionDriver};
use crate::config::DEFAULT_CHUNK_TIMEOUT;
use crate::error::{ConfigurationError, StreamError};
use crate::pulse::{Level, PulseCode};
use crate::source::DataSource;
use crate::transmitter::{PulseTransmitter, TransmitterConfig};

/// Blocking chunked driver for queue-based transmitters
///
/// `CHUNK` sizes the scratch buffer; the effective chunk is also bounded by
/// [`PulseTransmitter::max_chunk_len`].
pub struct CompletionDriver<T, const CHUNK: usize> {
    transmitter: T,
    scratch: [PulseCode; CHUNK],
    max_chunk: usize,
    timeout: Duration,
    busy: bool,
}

impl<T: PulseTransmitter, const CHUNK: usize> CompletionDriver<T, CHUNK> {
    pub const fn new(transmitter: T) -> Self {
        const { assert!(CHUNK > 0, "Chunk size must be non-zero") };

        Self {
            transmitter,
            scratch: [PulseCode::new(Level::Low, 0, Level::Low, 0); CHUNK],
            max_chunk: CHUNK,
            timeout: DEFAULT_CHUNK_TIMEOUT,
            busy: false,
        }
    }

    pub const fn transmitter(&self) -> &T {
        &self.transmitter
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.transmitter
    }

    /// Effective chunk length
    pub const fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    fn send_loop<S: DataSource, const N: usize>(
        &mut self,
        pipeline: &mut Pipeline<S, N>,
    ) -> Result<(), StreamError> {
        loop {
            let count = pipeline.ring.copy_out(&mut self.scratch[..self.max_chunk]);
            if count == 0 {
                if !pipeline.has_data_remaining() {
                    return Ok(());
                }
                // The source claims more data; give it one more pass
                pipeline.refill()?;
                if pipeline.ring.is_empty() {
                    return Ok(());
                }
                continue;
            }

            self.transmitter
                .transmit(&self.scratch[..count], self.timeout)?;
            self.transmitter.await_completion(self.timeout)?;

            pipeline.ring.consume(count);
            pipeline.stats.record_transfer(count);
            pipeline.refill()?;
        }
    }
}

impl<T: PulseTransmitter, const CHUNK: usize> TransmissionDriver for CompletionDriver<T, CHUNK> {
    const NAME: &'static str = "RMT-QUEUE";
    const BLOCKING: bool = true;

    fn configure(&mut self, config: &TransmitterConfig) -> Result<(), ConfigurationError> {
        self.transmitter.configure(config)?;
        let hardware_max = self.transmitter.max_chunk_len();
        if hardware_max == 0 {
            return Err(ConfigurationError::Unsupported("zero-length transmit chunks"));
        }
        self.max_chunk = CHUNK.min(hardware_max);
        self.timeout = config.chunk_timeout;
        Ok(())
    }

    fn begin_frame<S: DataSource, const N: usize>(
        &mut self,
        pipeline: &mut Pipeline<S, N>,
    ) -> FrameProgress {
        self.busy = true;
        let result = self.send_loop(pipeline);
        self.busy = false;

        match result {
            Ok(()) => FrameProgress::Finished(FrameEnd::Completed),
            Err(error) => {
                log::warn!("[{}] frame aborted: {}", Self::NAME, error);
                FrameProgress::Finished(FrameEnd::Aborted(error))
            }
        }
    }

    fn abort(&mut self) {
        self.busy = false;
    }

    fn is_idle(&self) -> bool {
        !self.busy
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.transmitter.enable();
        } else {
            self.transmitter.disable();
        }
    }

    fn teardown(&mut self) {
        self.transmitter.teardown();
    }
}
