//! Pulse timing units.
//!
//! A [`PulseCode`] is the plain value object the rest of the crate works with.
//! The packed [`RmtWord`] layout only exists at the transmitter boundary.

use bitfield::bitfield;

/// Longest duration a single half of a pulse code can hold (15 bits).
pub const MAX_DURATION: u16 = 0x7FFF;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Output line level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value { Self::High } else { Self::Low }
    }
}

/// Two consecutive (level, duration) pairs, durations in transmitter ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseCode {
    pub level0: Level,
    pub duration0: u16,
    pub level1: Level,
    pub duration1: u16,
}

impl PulseCode {
    /// Create a pulse code, clamping both durations to [`MAX_DURATION`].
    pub const fn new(level0: Level, duration0: u16, level1: Level, duration1: u16) -> Self {
        Self {
            level0,
            duration0: clamp_duration(duration0 as u64),
            level1,
            duration1: clamp_duration(duration1 as u64),
        }
    }

    /// High for `high` ticks, then low for `low` ticks
    pub const fn high_low(high: u16, low: u16) -> Self {
        Self::new(Level::High, high, Level::Low, low)
    }

    /// Line held at `level` for the whole code
    pub const fn hold(level: Level, first: u16, second: u16) -> Self {
        Self::new(level, first, level, second)
    }

    /// Build a high-then-low code from nanosecond timings.
    ///
    /// Durations are rounded to the nearest tick at `resolution_hz` and
    /// saturate at [`MAX_DURATION`].
    pub const fn from_nanos(high_ns: u32, low_ns: u32, resolution_hz: u32) -> Self {
        Self {
            level0: Level::High,
            duration0: nanos_to_ticks(high_ns, resolution_hz),
            level1: Level::Low,
            duration1: nanos_to_ticks(low_ns, resolution_hz),
        }
    }

    /// Total length of the code in ticks
    pub const fn total_ticks(self) -> u32 {
        self.duration0 as u32 + self.duration1 as u32
    }

    /// Pack into the 32-bit hardware item layout.
    pub fn to_rmt_word(self) -> RmtWord {
        let mut word = RmtWord(0);
        word.set_duration0(self.duration0);
        word.set_level0(self.level0.is_high());
        word.set_duration1(self.duration1);
        word.set_level1(self.level1.is_high());
        word
    }

    pub fn from_rmt_word(word: RmtWord) -> Self {
        Self {
            level0: word.level0().into(),
            duration0: word.duration0(),
            level1: word.level1().into(),
            duration1: word.duration1(),
        }
    }
}

bitfield! {
    /// Hardware item: `duration0[14:0] level0[15] duration1[30:16] level1[31]`
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct RmtWord(u32);
    impl Debug;
    pub u16, duration0, set_duration0: 14, 0;
    pub level0, set_level0: 15;
    pub u16, duration1, set_duration1: 30, 16;
    pub level1, set_level1: 31;
}

impl RmtWord {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

const fn clamp_duration(ticks: u64) -> u16 {
    if ticks > MAX_DURATION as u64 {
        MAX_DURATION
    } else {
        ticks as u16
    }
}

pub(crate) const fn nanos_to_ticks(nanos: u32, resolution_hz: u32) -> u16 {
    let ticks = (nanos as u64 * resolution_hz as u64 + NANOS_PER_SECOND / 2) / NANOS_PER_SECOND;
    clamp_duration(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos_round_to_nearest_tick() {
        // 40 MHz: 25 ns per tick
        assert_eq!(nanos_to_ticks(400, 40_000_000), 16);
        assert_eq!(nanos_to_ticks(412, 40_000_000), 16);
        assert_eq!(nanos_to_ticks(413, 40_000_000), 17);
    }

    #[test]
    fn long_durations_saturate() {
        let code = PulseCode::from_nanos(1_000_000, 10, 40_000_000);
        assert_eq!(code.duration0, MAX_DURATION);
        assert_eq!(code.duration1, 0);
    }

    #[test]
    fn rmt_word_layout() {
        let word = PulseCode::high_low(16, 34).to_rmt_word();
        assert_eq!(word.raw(), (34 << 16) | (1 << 15) | 16);
        assert_eq!(PulseCode::from_rmt_word(word), PulseCode::high_low(16, 34));
    }
}
