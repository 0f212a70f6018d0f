//! Frame pacing for the per-channel background task.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between ticks.

use embassy_time::{Duration, Instant};

use crate::channel::{Channel, FrameOutcome, SharedChannel};
use crate::config::ChannelConfig;
use crate::driver::{FrameEnd, TransmissionDriver};
use crate::error::StreamError;
use crate::source::DataSource;

/// What happened during one pacer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacerEvent {
    /// Previous frame still in flight and within its completion bound
    Waiting,
    /// New frame handed to the hardware
    Started,
    /// New frame sent completely within the tick
    Completed,
    /// New frame could not start or was aborted
    Failed(StreamError),
}

/// Result of a pacer tick.
#[derive(Debug, Clone, Copy)]
pub struct PacerTick {
    /// End of the previous in-flight frame, if it was observed this tick
    pub previous: Option<FrameEnd>,
    /// Previous frame exceeded its completion bound and was aborted
    pub timed_out: bool,
    pub event: PacerEvent,
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Drives [`Channel::start_new_frame`] at a fixed rate.
///
/// Each tick first settles the previous frame: its completion signal is
/// taken if it arrived, and once `frame_timeout` has passed without one the
/// frame is expired and counted as a timeout. Then the next frame starts.
///
/// # Usage
///
/// ```ignore
/// let mut pacer = FramePacer::new(channel.config());
///
/// loop {
///     let tick = pacer.tick_shared(&CHANNEL, Instant::now());
///     Timer::after(tick.sleep_duration).await;
/// }
/// ```
pub struct FramePacer {
    frame_duration: Duration,
    frame_timeout: Duration,
    next_frame: Instant,
    in_flight_since: Option<Instant>,
}

impl FramePacer {
    pub const fn new(config: &ChannelConfig) -> Self {
        Self::with_timing(config.frame_duration, config.frame_timeout)
    }

    pub const fn with_timing(frame_duration: Duration, frame_timeout: Duration) -> Self {
        Self {
            frame_duration,
            frame_timeout,
            next_frame: Instant::from_millis(0),
            in_flight_since: None,
        }
    }

    /// Run one pacing step against `channel`.
    pub fn tick<S, D, const N: usize>(
        &mut self,
        channel: &mut Channel<S, D, N>,
        now: Instant,
    ) -> PacerTick
    where
        S: DataSource,
        D: TransmissionDriver,
    {
        // Drift correction: if we've fallen too far behind, reset to now
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let mut previous = None;
        let mut timed_out = false;
        if let Some(since) = self.in_flight_since {
            if let Some(end) = channel.take_frame_end() {
                previous = Some(end);
                self.in_flight_since = None;
            } else if now.saturating_duration_since(since) >= self.frame_timeout {
                timed_out = channel.expire_frame();
                self.in_flight_since = None;
            } else {
                return self.schedule(now, previous, timed_out, PacerEvent::Waiting);
            }
        }

        let event = match channel.start_new_frame() {
            Ok(FrameOutcome::InFlight) => {
                self.in_flight_since = Some(now);
                PacerEvent::Started
            }
            Ok(FrameOutcome::Completed) => PacerEvent::Completed,
            Err(error) => PacerEvent::Failed(error),
        };

        self.schedule(now, previous, timed_out, event)
    }

    /// Same as [`tick`](Self::tick) for a channel shared with interrupt
    /// handlers.
    ///
    /// The whole tick runs inside one critical section, so only
    /// non-blocking drivers are accepted here. A channel on a blocking
    /// driver such as [`CompletionDriver`](crate::CompletionDriver) is owned
    /// by its pacing task and driven through [`tick`](Self::tick).
    pub fn tick_shared<S, D, const N: usize>(
        &mut self,
        channel: &SharedChannel<Channel<S, D, N>>,
        now: Instant,
    ) -> PacerTick
    where
        S: DataSource,
        D: TransmissionDriver,
    {
        const {
            assert!(
                !D::BLOCKING,
                "blocking drivers cannot be paced inside a critical section"
            );
        };
        channel.with(|channel| self.tick(channel, now))
    }

    /// Frame currently awaiting its completion signal
    pub const fn is_waiting(&self) -> bool {
        self.in_flight_since.is_some()
    }

    fn schedule(
        &mut self,
        now: Instant,
        previous: Option<FrameEnd>,
        timed_out: bool,
        event: PacerEvent,
    ) -> PacerTick {
        self.next_frame += self.frame_duration;

        // May be zero if we're behind
        let sleep_duration = self.next_frame.saturating_duration_since(now);

        PacerTick {
            previous,
            timed_out,
            event,
            next_deadline: self.next_frame,
            sleep_duration,
        }
    }
}
