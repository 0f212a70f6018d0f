#![allow(dead_code)]

use myrtio_pulse_stream::{
    BitOrder, BitSymbol, ConfigurationError, DataSource, Duration, Level, PulseCode,
    PulseTransmitter, RmtWord, TransmitterConfig, TransmitterError, TranslationEntry,
    pack_words,
};

pub const ZERO: PulseCode = PulseCode::high_low(10, 30);
pub const ONE: PulseCode = PulseCode::high_low(30, 10);
pub const GAP: PulseCode = PulseCode::hold(Level::Low, 1000, 1000);
pub const START: PulseCode = PulseCode::high_low(50, 50);
pub const STOP: PulseCode = PulseCode::high_low(5, 5);
pub const END: PulseCode = PulseCode::hold(Level::High, 7, 7);

pub fn entries() -> [TranslationEntry; 6] {
    [
        TranslationEntry::new(BitSymbol::Zero, ZERO),
        TranslationEntry::new(BitSymbol::One, ONE),
        TranslationEntry::new(BitSymbol::InterframeGap, GAP),
        TranslationEntry::new(BitSymbol::FrameStart, START),
        TranslationEntry::new(BitSymbol::Stop, STOP),
        TranslationEntry::new(BitSymbol::EndOfFrame, END),
    ]
}

/// Rebuild an intensity value from its data-bit codes
pub fn decode(codes: &[PulseCode], order: BitOrder) -> u32 {
    codes.iter().enumerate().fold(0, |value, (index, code)| {
        let bit = u32::from(*code == ONE);
        match order {
            BitOrder::MsbFirst => (value << 1) | bit,
            BitOrder::LsbFirst => value | (bit << index),
        }
    })
}

/// Source over arbitrary-width values
pub struct VecSource {
    pub values: Vec<u32>,
    pub position: usize,
    pub frame_starts: usize,
}

impl VecSource {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            position: 0,
            frame_starts: 0,
        }
    }
}

impl DataSource for VecSource {
    fn more_data_available(&self) -> bool {
        self.position < self.values.len()
    }

    fn next_intensity_value(&mut self) -> Option<u32> {
        let value = *self.values.get(self.position)?;
        self.position += 1;
        Some(value)
    }

    fn on_frame_start(&mut self) {
        self.position = 0;
        self.frame_starts += 1;
    }
}

/// Transmitter that records every chunk and fails on demand
pub struct MockTransmitter {
    pub max_chunk: usize,
    pub config: Option<TransmitterConfig>,
    pub chunks: Vec<Vec<PulseCode>>,
    pub words: Vec<RmtWord>,
    pub timeouts: Vec<Duration>,
    /// Reject the n-th transmit call (0-based)
    pub reject_at: Option<usize>,
    /// Time out the n-th completion wait (0-based)
    pub timeout_at: Option<usize>,
    pub transmit_calls: usize,
    pub completion_calls: usize,
    pub enabled: bool,
    pub enable_calls: usize,
    pub disable_calls: usize,
    pub torn_down: bool,
}

impl MockTransmitter {
    pub fn new(max_chunk: usize) -> Self {
        Self {
            max_chunk,
            config: None,
            chunks: Vec::new(),
            words: Vec::new(),
            timeouts: Vec::new(),
            reject_at: None,
            timeout_at: None,
            transmit_calls: 0,
            completion_calls: 0,
            enabled: true,
            enable_calls: 0,
            disable_calls: 0,
            torn_down: false,
        }
    }

    /// Every code accepted so far, in order
    pub fn sent(&self) -> Vec<PulseCode> {
        self.chunks.iter().flatten().copied().collect()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.words.clear();
    }
}

impl PulseTransmitter for MockTransmitter {
    fn configure(&mut self, config: &TransmitterConfig) -> Result<(), ConfigurationError> {
        self.config = Some(*config);
        Ok(())
    }

    fn max_chunk_len(&self) -> usize {
        self.max_chunk
    }

    fn transmit(&mut self, codes: &[PulseCode], timeout: Duration) -> Result<(), TransmitterError> {
        assert!(codes.len() <= self.max_chunk, "chunk over hardware limit");
        assert!(self.enabled, "transmit while disabled");
        let call = self.transmit_calls;
        self.transmit_calls += 1;
        if self.reject_at == Some(call) {
            return Err(TransmitterError::Rejected);
        }

        let mut words = vec![RmtWord::default(); codes.len()];
        pack_words(codes, &mut words);
        self.words.extend(words);
        self.chunks.push(codes.to_vec());
        self.timeouts.push(timeout);
        Ok(())
    }

    fn await_completion(&mut self, _timeout: Duration) -> Result<(), TransmitterError> {
        let call = self.completion_calls;
        self.completion_calls += 1;
        if self.timeout_at == Some(call) {
            return Err(TransmitterError::Timeout);
        }
        Ok(())
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.enable_calls += 1;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.disable_calls += 1;
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }
}
