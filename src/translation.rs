//! Bit symbol to pulse code translation.

use crate::error::ConfigurationError;
use crate::pulse::{Level, PulseCode, nanos_to_ticks};

/// WS2811/WS2812 timings in nanoseconds
pub const WS2811_T0H_NS: u32 = 400;
pub const WS2811_T0L_NS: u32 = 850;
pub const WS2811_T1H_NS: u32 = 800;
pub const WS2811_T1L_NS: u32 = 450;
/// Latch time between frames
pub const WS2811_RESET_NS: u32 = 300_000;

/// Logical meaning of one pulse slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BitSymbol {
    Zero = 0,
    One = 1,
    /// Idle time sent before a frame
    InterframeGap = 2,
    /// Start bit sent once per configured frame-start slot
    FrameStart = 3,
    /// Separator between intensity values
    Stop = 4,
    /// Trailer after the last intensity value of a frame
    EndOfFrame = 5,
}

impl BitSymbol {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Zero,
        Self::One,
        Self::InterframeGap,
        Self::FrameStart,
        Self::Stop,
        Self::EndOfFrame,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::InterframeGap => "interframe_gap",
            Self::FrameStart => "frame_start",
            Self::Stop => "stop",
            Self::EndOfFrame => "end_of_frame",
        }
    }
}

/// One row of a translation list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationEntry {
    pub symbol: BitSymbol,
    pub code: PulseCode,
}

impl TranslationEntry {
    pub const fn new(symbol: BitSymbol, code: PulseCode) -> Self {
        Self { symbol, code }
    }
}

/// Per-channel mapping from [`BitSymbol`] to [`PulseCode`].
///
/// Populated once by [`TranslationTable::configure`] and read-only while
/// streaming. Data bits are mandatory, framing symbols are checked against
/// the channel configuration by [`TranslationTable::require`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    codes: [PulseCode; BitSymbol::COUNT],
    installed: u8,
}

impl TranslationTable {
    /// Install every entry of `entries`.
    ///
    /// Later entries for the same symbol replace earlier ones.
    pub fn configure(entries: Option<&[TranslationEntry]>) -> Result<Self, ConfigurationError> {
        let Some(entries) = entries else {
            log::error!("[translation] no translation table supplied");
            return Err(ConfigurationError::MissingTable);
        };

        let mut table = Self::empty();
        for entry in entries {
            table.install(*entry);
        }

        table.require(BitSymbol::Zero)?;
        table.require(BitSymbol::One)?;
        Ok(table)
    }

    /// Preset for WS2811/WS2812 strips at the given tick rate.
    pub fn ws2811(resolution_hz: u32) -> Self {
        let gap = nanos_to_ticks(WS2811_RESET_NS / 2, resolution_hz);
        let entries = [
            TranslationEntry::new(
                BitSymbol::Zero,
                PulseCode::from_nanos(WS2811_T0H_NS, WS2811_T0L_NS, resolution_hz),
            ),
            TranslationEntry::new(
                BitSymbol::One,
                PulseCode::from_nanos(WS2811_T1H_NS, WS2811_T1L_NS, resolution_hz),
            ),
            TranslationEntry::new(
                BitSymbol::InterframeGap,
                PulseCode::hold(Level::Low, gap, gap),
            ),
        ];
        let mut table = Self::empty();
        for entry in entries {
            table.install(entry);
        }
        table
    }

    /// Check `entries` against the installed codes, then re-apply them.
    ///
    /// Every entry is compared with the table as it stood before the check,
    /// so an entry superseded by a later one for the same symbol counts as a
    /// mismatch exactly once. Mismatches are logged and counted; they never
    /// block streaming.
    pub fn validate(&mut self, entries: &[TranslationEntry]) -> usize {
        let mismatches = entries
            .iter()
            .filter(|entry| {
                let installed = self.get(entry.symbol);
                let matches = installed == Some(entry.code);
                if !matches {
                    log::warn!(
                        "[translation] {} mismatch: installed {:?}, expected {:?}",
                        entry.symbol.as_str(),
                        installed,
                        entry.code
                    );
                }
                !matches
            })
            .count();

        for entry in entries {
            self.install(*entry);
        }
        mismatches
    }

    /// Fail with [`ConfigurationError::MissingTranslation`] unless `symbol`
    /// has a code.
    pub fn require(&self, symbol: BitSymbol) -> Result<(), ConfigurationError> {
        if self.is_installed(symbol) {
            Ok(())
        } else {
            log::error!("[translation] no code for symbol {}", symbol.as_str());
            Err(ConfigurationError::MissingTranslation(symbol))
        }
    }

    pub const fn is_installed(&self, symbol: BitSymbol) -> bool {
        self.installed & (1 << symbol.index()) != 0
    }

    /// Code for `symbol`.
    ///
    /// Symbols that were never installed read as an all-zero code; channels
    /// verify every symbol they use before the first frame.
    #[inline]
    pub const fn lookup(&self, symbol: BitSymbol) -> PulseCode {
        self.codes[symbol.index()]
    }

    pub const fn get(&self, symbol: BitSymbol) -> Option<PulseCode> {
        if self.is_installed(symbol) {
            Some(self.codes[symbol.index()])
        } else {
            None
        }
    }

    const fn empty() -> Self {
        Self {
            codes: [PulseCode::new(Level::Low, 0, Level::Low, 0); BitSymbol::COUNT],
            installed: 0,
        }
    }

    fn install(&mut self, entry: TranslationEntry) {
        self.codes[entry.symbol.index()] = entry.code;
        self.installed |= 1 << entry.symbol.index();
    }
}
