//! Frame orchestrator.
//!
//! A [`Channel`] owns one physical output: its configuration, translation
//! table, send buffer, data source and transmission driver. It sequences a
//! frame as `Idle -> FramingEmit -> Streaming -> Idle`, with `Paused`
//! reachable from every state.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::ChannelConfig;
use crate::driver::{FrameEnd, FrameProgress, Pipeline, TransmissionDriver};
use crate::encoder::IntensityEncoder;
use crate::error::{ConfigurationError, StreamError};
use crate::ring::SendBuffer;
use crate::signal::FrameSignal;
use crate::source::DataSource;
use crate::stats::StreamStats;
use crate::transmitter::TransmitterConfig;
use crate::translation::{TranslationEntry, TranslationTable};

/// Where the orchestrator is in the frame cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    /// Writing interframe gap and frame start codes
    FramingEmit,
    /// Encoder and driver moving data
    Streaming,
    Paused,
}

/// Result of a successful [`Channel::start_new_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame handed to the hardware; its end arrives through the
    /// [`FrameSignal`]
    InFlight,
    /// Frame fully sent before returning
    Completed,
}

/// Read-only snapshot for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStatus {
    pub driver: &'static str,
    pub channel_id: u8,
    pub state: ChannelState,
    pub paused: bool,
    pub stats: StreamStats,
}

/// One output channel
///
/// `N` is the send buffer capacity in pulse codes (power of 2).
pub struct Channel<S, D, const N: usize> {
    config: ChannelConfig,
    pipeline: Pipeline<S, N>,
    driver: D,
    phase: ChannelState,
    paused: bool,
    signal: FrameSignal,
}

impl<S: DataSource, D: TransmissionDriver, const N: usize> Channel<S, D, N> {
    /// Bring a channel up.
    ///
    /// Every error here is fatal: the transmitter cannot be reconfigured
    /// live, so the owning process is expected to restart.
    pub fn new(
        config: ChannelConfig,
        table: TranslationTable,
        source: Option<S>,
        mut driver: D,
    ) -> Result<Self, ConfigurationError> {
        let Some(source) = source else {
            log::error!("[channel {}] no data source", config.channel_id);
            return Err(ConfigurationError::MissingDataSource);
        };

        if let Err(error) = config.validate(N, &table) {
            log::error!("[channel {}] {}", config.channel_id, error);
            return Err(error);
        }
        driver.configure(&TransmitterConfig::from(&config))?;

        log::info!(
            "[channel {}] {} on pin {}: {} bit {:?}, {} idle + {} start codes",
            config.channel_id,
            D::NAME,
            config.data_pin,
            config.bit_width,
            config.bit_order,
            config.idle_bits,
            config.start_bits
        );

        let encoder = IntensityEncoder::new(&config);
        Ok(Self {
            config,
            pipeline: Pipeline::new(table, encoder, source),
            driver,
            phase: ChannelState::Idle,
            paused: false,
            signal: FrameSignal::new(),
        })
    }

    /// Bring a channel up from a raw translation list.
    ///
    /// The list is installed, then re-applied as a self-check; mismatches are
    /// logged and counted in the status but do not fail the channel.
    pub fn from_entries(
        config: ChannelConfig,
        entries: Option<&[TranslationEntry]>,
        source: Option<S>,
        driver: D,
    ) -> Result<Self, ConfigurationError> {
        let mut table = TranslationTable::configure(entries)?;
        let mismatches = entries.map_or(0, |entries| table.validate(entries));

        let mut channel = Self::new(config, table, source, driver)?;
        channel.pipeline.stats.validation_failures = u32::try_from(mismatches).unwrap_or(u32::MAX);
        Ok(channel)
    }

    /// Send one frame.
    ///
    /// Fails without side effects when the output is paused or a previous
    /// frame is still in flight. A transmit failure or timeout aborts only
    /// this frame; the channel accepts the next call.
    pub fn start_new_frame(&mut self) -> Result<FrameOutcome, StreamError> {
        if self.paused {
            return Err(StreamError::Paused);
        }
        if self.phase != ChannelState::Idle || !self.driver.is_idle() {
            log::debug!("[channel {}] frame still in flight", self.config.channel_id);
            return Err(StreamError::Busy);
        }

        self.signal.clear();
        self.pipeline.stats.frames_started = self.pipeline.stats.frames_started.saturating_add(1);
        self.pipeline.reset();
        log::debug!(
            "[channel {}] frame {} started",
            self.config.channel_id,
            self.pipeline.stats.frames_started
        );

        self.phase = ChannelState::FramingEmit;
        let end = match self.emit_framing() {
            Ok(()) => {
                self.phase = ChannelState::Streaming;
                match self.driver.begin_frame(&mut self.pipeline) {
                    FrameProgress::InFlight => return Ok(FrameOutcome::InFlight),
                    FrameProgress::Finished(end) => end,
                }
            }
            Err(error) => FrameEnd::Aborted(error),
        };

        self.finish_frame(end);
        end.into_result().map(|()| FrameOutcome::Completed)
    }

    /// Suspend or resume output.
    ///
    /// Pausing takes effect at the frame boundary: a frame in flight runs to
    /// its end, then the transmitter is disabled. Buffer contents are kept.
    /// Resuming lets the next [`start_new_frame`](Self::start_new_frame)
    /// proceed.
    pub fn pause_output(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        log::info!(
            "[channel {}] output {}",
            self.config.channel_id,
            if paused { "paused" } else { "resumed" }
        );

        if !paused {
            self.driver.set_enabled(true);
        } else if self.phase == ChannelState::Idle {
            self.driver.set_enabled(false);
        }
    }

    /// Hardware threshold event
    pub fn on_threshold(&mut self) {
        if let Some(end) = self.driver.on_threshold(&mut self.pipeline) {
            self.finish_async(end);
        }
    }

    /// Hardware end-of-transmission event
    pub fn on_transmit_done(&mut self) {
        if let Some(end) = self.driver.on_transmit_done(&mut self.pipeline) {
            self.finish_async(end);
        }
    }

    /// Abort the frame in flight because its completion never arrived.
    ///
    /// Returns `false` if no frame was in flight.
    pub fn expire_frame(&mut self) -> bool {
        if self.phase != ChannelState::Streaming {
            return false;
        }
        log::warn!("[channel {}] frame completion timed out", self.config.channel_id);
        self.driver.abort();
        self.finish_frame(FrameEnd::Aborted(StreamError::Timeout));
        true
    }

    /// Take the completion notification of the last in-flight frame
    pub fn take_frame_end(&self) -> Option<FrameEnd> {
        self.signal.take()
    }

    pub fn state(&self) -> ChannelState {
        if self.paused {
            ChannelState::Paused
        } else {
            self.phase
        }
    }

    pub fn status(&self) -> ChannelStatus {
        ChannelStatus {
            driver: D::NAME,
            channel_id: self.config.channel_id,
            state: self.state(),
            paused: self.paused,
            stats: self.pipeline.stats,
        }
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub const fn stats(&self) -> &StreamStats {
        &self.pipeline.stats
    }

    pub const fn send_buffer(&self) -> &SendBuffer<N> {
        &self.pipeline.ring
    }

    pub const fn table(&self) -> &TranslationTable {
        &self.pipeline.table
    }

    pub const fn source(&self) -> &S {
        &self.pipeline.source
    }

    /// Source access between frames, e.g. to swap in new pixel data
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.pipeline.source
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub const fn signal(&self) -> &FrameSignal {
        &self.signal
    }

    /// Release the transmitter and hand back the data source.
    ///
    /// Deregister the channel from its registry first.
    pub fn teardown(mut self) -> S {
        log::info!("[channel {}] teardown", self.config.channel_id);
        self.driver.teardown();
        self.pipeline.source
    }

    fn emit_framing(&mut self) -> Result<(), StreamError> {
        let pipeline = &mut self.pipeline;
        pipeline.encoder.emit_framing(
            &pipeline.table,
            &mut pipeline.ring,
            self.config.idle_bits,
            self.config.start_bits,
        )?;
        pipeline.refill()?;
        Ok(())
    }

    /// Back to idle with the frame's outcome counted
    fn finish_frame(&mut self, end: FrameEnd) {
        self.phase = ChannelState::Idle;
        let stats = &mut self.pipeline.stats;
        match end {
            FrameEnd::Completed => {
                stats.frames_completed = stats.frames_completed.saturating_add(1);
                log::debug!(
                    "[channel {}] frame completed, {} codes sent so far",
                    self.config.channel_id,
                    stats.entries_transferred
                );
            }
            FrameEnd::Aborted(StreamError::Overrun) => {
                log::error!(
                    "[channel {}] encoder overran the send buffer",
                    self.config.channel_id
                );
                stats.record_abort(StreamError::Overrun);
            }
            FrameEnd::Aborted(error) => stats.record_abort(error),
        }

        if self.paused {
            self.driver.set_enabled(false);
        }
    }

    fn finish_async(&mut self, end: FrameEnd) {
        self.finish_frame(end);
        self.signal.notify(end);
    }
}

/// Channel wrapped for access from both the pacing task and interrupt
/// handlers. Every access runs inside a critical section, so at most one
/// context touches the channel at a time.
///
/// Interrupts stay masked for the duration of [`with`](Self::with); never
/// start a frame on a blocking driver through it.
pub struct SharedChannel<C> {
    inner: Mutex<RefCell<C>>,
}

impl<C> SharedChannel<C> {
    pub const fn new(channel: C) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(channel)),
        }
    }

    /// Run `f` with exclusive access to the channel
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    pub fn into_inner(self) -> C {
        self.inner.into_inner().into_inner()
    }
}
