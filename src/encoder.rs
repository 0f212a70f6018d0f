//! Intensity to pulse code expansion.

use crate::config::{BitOrder, ChannelConfig};
use crate::error::OverrunError;
use crate::ring::SendBuffer;
use crate::source::DataSource;
use crate::translation::{BitSymbol, TranslationTable};

/// What one [`IntensityEncoder::fill_buffer`] pass produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Intensity values pulled from the source
    pub values: usize,
    /// Pulse codes written to the send buffer
    pub codes: usize,
}

/// Expands intensity values into per-bit pulse codes plus framing.
#[derive(Debug, Clone, Copy)]
pub struct IntensityEncoder {
    bit_width: u8,
    bit_order: BitOrder,
    stop_bits: bool,
    end_of_frame_bits: bool,
}

impl IntensityEncoder {
    pub const fn new(config: &ChannelConfig) -> Self {
        Self {
            bit_width: config.bit_width,
            bit_order: config.bit_order,
            stop_bits: config.send_inter_intensity_bits,
            end_of_frame_bits: config.send_end_of_frame_bits,
        }
    }

    /// Worst-case codes written per intensity value
    pub const fn slots_per_value(&self) -> usize {
        let trailer = if self.stop_bits || self.end_of_frame_bits {
            1
        } else {
            0
        };
        self.bit_width as usize + trailer
    }

    /// Write the interframe gap and frame start codes.
    pub fn emit_framing<const N: usize>(
        &self,
        table: &TranslationTable,
        ring: &mut SendBuffer<N>,
        idle_bits: u8,
        start_bits: u8,
    ) -> Result<usize, OverrunError> {
        for _ in 0..idle_bits {
            ring.write(table.lookup(BitSymbol::InterframeGap))?;
        }
        for _ in 0..start_bits {
            ring.write(table.lookup(BitSymbol::FrameStart))?;
        }
        Ok(usize::from(idle_bits) + usize::from(start_bits))
    }

    /// Pull values from `source` into `ring` until another full value no
    /// longer fits or the source runs dry.
    pub fn fill_buffer<S, const N: usize>(
        &self,
        table: &TranslationTable,
        source: &mut S,
        ring: &mut SendBuffer<N>,
    ) -> Result<FillReport, OverrunError>
    where
        S: DataSource + ?Sized,
    {
        let mut report = FillReport::default();
        let slots = self.slots_per_value();

        while ring.available_to_fill() > slots && source.more_data_available() {
            let Some(value) = source.next_intensity_value() else {
                break;
            };
            report.values += 1;
            report.codes += self.encode_value(table, value, ring)?;

            let last = !source.more_data_available();
            if last && self.end_of_frame_bits {
                ring.write(table.lookup(BitSymbol::EndOfFrame))?;
                report.codes += 1;
            } else if self.stop_bits {
                ring.write(table.lookup(BitSymbol::Stop))?;
                report.codes += 1;
            }
        }

        Ok(report)
    }

    /// Data bits of one value, starting from the configured edge
    fn encode_value<const N: usize>(
        &self,
        table: &TranslationTable,
        value: u32,
        ring: &mut SendBuffer<N>,
    ) -> Result<usize, OverrunError> {
        let mut mask = match self.bit_order {
            BitOrder::MsbFirst => 1u32 << (self.bit_width - 1),
            BitOrder::LsbFirst => 1,
        };

        for _ in 0..self.bit_width {
            let symbol = if value & mask == 0 {
                BitSymbol::Zero
            } else {
                BitSymbol::One
            };
            ring.write(table.lookup(symbol))?;
            mask = match self.bit_order {
                BitOrder::MsbFirst => mask >> 1,
                BitOrder::LsbFirst => mask << 1,
            };
        }

        Ok(usize::from(self.bit_width))
    }
}
