use log::trace;

use crate::block::WordSize;
use crate::cabac::binarization::Binarization;
use crate::cabac::context_model::ContextModel;
use crate::cabac::context_selector::ContextSelector;
use crate::cabac::encoder::BinaryArithmeticEncoder;
use crate::config::StreamConfig;
use crate::transform::merge::zigzag;

/// Entropy-codes the symbols of one transformed substream.
///
/// A `Writer` owns the arithmetic encoder and a fresh context-model array
/// sized to the configured context count; both live for exactly one coding
/// unit. The binarization scheme, its parameters and the coding order must
/// match the [`Reader`](crate::cabac::reader::Reader) exactly, as the stream
/// carries no self-description.
#[derive(Debug)]
pub struct Writer {
    encoder: BinaryArithmeticEncoder,
    contexts: Vec<ContextModel>,
    selector: ContextSelector,
    binarization: Binarization,
    bypass: bool,
    set_size: usize,
    word_size: WordSize,
}

impl Writer {
    /// Starts a new coding unit for one substream.
    #[must_use]
    pub fn new(config: &StreamConfig, word_size: WordSize) -> Self {
        let set_size = config.binarization.context_set_size();
        let num_contexts = if config.bypass {
            0
        } else {
            set_size * config.coding_order.context_multiplier()
        };

        Self {
            encoder: BinaryArithmeticEncoder::new(),
            contexts: vec![ContextModel::new(); num_contexts],
            selector: ContextSelector::new(config.coding_order),
            binarization: config.binarization,
            bypass: config.bypass,
            set_size,
            word_size,
        }
    }

    /// Writes one symbol, conditioning future contexts on it.
    pub fn write(&mut self, symbol: u64) {
        self.write_symbol(symbol);
        self.selector.push(symbol);
    }

    /// Writes one symbol conditioned on an external dependency symbol
    /// instead of the decode history.
    pub fn write_with_dependency(&mut self, symbol: u64, dependency: u64) {
        self.selector.push(dependency);
        self.write_symbol(symbol);
    }

    /// Clears context-model adaptation between independent coding units.
    pub fn reset(&mut self) {
        self.contexts.fill(ContextModel::new());
        self.selector.reset();
    }

    /// Flushes the arithmetic coder and returns the coded bytes.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.encoder.flush();
        trace!(
            "Writer produced {} bytes ({})",
            self.encoder.byte_len(),
            self.binarization.name()
        );
        self.encoder.into_bytes()
    }

    fn write_symbol(&mut self, symbol: u64) {
        let base = self.selector.context_base(self.set_size);
        let mut pos = 0_u32;
        match self.binarization {
            Binarization::Binary { bits } => {
                self.put_bits(symbol, bits as u32, &mut pos, base);
            }
            Binarization::TruncatedUnary { cmax } => {
                self.put_tu(symbol, cmax, &mut pos, base);
            }
            Binarization::ExponentialGolomb => {
                self.put_eg(symbol, &mut pos, base);
            }
            Binarization::SignedExponentialGolomb => {
                self.put_eg(self.signed_code(symbol), &mut pos, base);
            }
            Binarization::TruncatedExponentialGolomb { cmax } => {
                self.put_teg(symbol, cmax, &mut pos, base);
            }
            Binarization::SignedTruncatedExponentialGolomb { cmax } => {
                self.put_teg(self.signed_code(symbol), cmax, &mut pos, base);
            }
            Binarization::SplitUnitTruncatedUnary {
                split_size,
                output_bits,
            } => {
                self.put_sutu(symbol, split_size, output_bits, &mut pos, base);
            }
            Binarization::SignedSplitUnitTruncatedUnary {
                split_size,
                output_bits,
            } => {
                self.put_sutu(self.signed_code(symbol), split_size, output_bits, &mut pos, base);
            }
            Binarization::DoubleTruncatedUnary {
                cmax,
                split_size,
                output_bits,
            } => {
                self.put_dtu(symbol, cmax, split_size, output_bits, &mut pos, base);
            }
            Binarization::SignedDoubleTruncatedUnary {
                cmax,
                split_size,
                output_bits,
            } => {
                self.put_dtu(self.signed_code(symbol), cmax, split_size, output_bits, &mut pos, base);
            }
        }
    }

    fn signed_code(&self, symbol: u64) -> u64 {
        zigzag(self.word_size.sign_extend(symbol))
    }

    fn put_bit(&mut self, bit: u8, pos: &mut u32, base: usize) {
        if self.bypass {
            self.encoder.encode_bin_ep(bit);
        } else {
            let index = base + (*pos as usize).min(self.set_size - 1);
            self.encoder.encode_bin(bit, &mut self.contexts[index]);
        }
        *pos += 1;
    }

    fn put_bits(&mut self, value: u64, count: u32, pos: &mut u32, base: usize) {
        if self.bypass {
            self.encoder.encode_bins_ep(value, count);
            *pos += count;
        } else {
            for i in (0..count).rev() {
                self.put_bit(((value >> i) & 1) as u8, pos, base);
            }
        }
    }

    fn put_tu(&mut self, value: u64, cmax: u64, pos: &mut u32, base: usize) {
        debug_assert!(value <= cmax, "TU symbol {} above cmax {}", value, cmax);
        for _ in 0..value {
            self.put_bit(1, pos, base);
        }
        if value < cmax {
            self.put_bit(0, pos, base);
        }
    }

    fn put_eg(&mut self, value: u64, pos: &mut u32, base: usize) {
        debug_assert!(value < u64::MAX, "EG symbol out of domain");
        let value_plus1 = value + 1;
        let prefix_len = 63 - value_plus1.leading_zeros();
        self.put_bits(value_plus1, 2 * prefix_len + 1, pos, base);
    }

    fn put_teg(&mut self, value: u64, cmax: u64, pos: &mut u32, base: usize) {
        self.put_tu(value.min(cmax), cmax, pos, base);
        if value >= cmax {
            self.put_eg(value - cmax, pos, base);
        }
    }

    fn put_sutu(&mut self, value: u64, split_size: u8, output_bits: u8, pos: &mut u32, base: usize) {
        let split = split_size as u32;
        let mut shift = output_bits as u32;
        while shift > 0 {
            let unit = if shift % split == 0 { split } else { shift % split };
            shift -= unit;
            let unit_max = unit_mask(unit);
            self.put_tu((value >> shift) & unit_max, unit_max, pos, base);
        }
    }

    fn put_dtu(
        &mut self,
        value: u64,
        cmax: u64,
        split_size: u8,
        output_bits: u8,
        pos: &mut u32,
        base: usize,
    ) {
        self.put_tu(value.min(cmax), cmax, pos, base);
        if value >= cmax {
            self.put_sutu(value - cmax, split_size, output_bits, pos, base);
        }
    }
}

#[inline]
pub(super) fn unit_mask(unit: u32) -> u64 {
    (1_u64 << unit) - 1
}

#[cfg(test)]
mod tests {
    use crate::block::WordSize;
    use crate::cabac::binarization::Binarization;
    use crate::cabac::writer::Writer;
    use crate::config::{CodingOrder, StreamConfig};

    fn bypass_config(binarization: Binarization) -> StreamConfig {
        StreamConfig {
            binarization,
            coding_order: CodingOrder::Order0,
            bypass: true,
        }
    }

    #[test]
    fn test_writer_produces_nonempty_output() {
        let config = bypass_config(Binarization::Binary { bits: 8 });
        let mut writer = Writer::new(&config, WordSize::W1);
        for symbol in 0..16 {
            writer.write(symbol);
        }

        let bytes = writer.finish();
        assert!(bytes.len() >= 16);
    }

    #[test]
    fn test_tu_bin_counts() {
        // 3 one-bits without terminator at cmax, 2 bits for symbol 1
        let config = bypass_config(Binarization::TruncatedUnary { cmax: 3 });
        let mut writer = Writer::new(&config, WordSize::W1);
        writer.write(3);
        writer.write(1);
        let with_symbols = writer.finish().len();

        let config = bypass_config(Binarization::TruncatedUnary { cmax: 3 });
        let empty = Writer::new(&config, WordSize::W1).finish().len();
        assert!(with_symbols >= empty);
    }

    #[test]
    fn test_cabac_adapts_to_skewed_symbols() {
        let config = StreamConfig {
            binarization: Binarization::TruncatedUnary { cmax: 1 },
            coding_order: CodingOrder::Order1,
            bypass: false,
        };
        let mut writer = Writer::new(&config, WordSize::W1);
        for _ in 0..4096 {
            writer.write(0);
        }
        let adaptive_len = writer.finish().len();

        let config = bypass_config(Binarization::TruncatedUnary { cmax: 1 });
        let mut writer = Writer::new(&config, WordSize::W1);
        for _ in 0..4096 {
            writer.write(0);
        }
        let bypass_len = writer.finish().len();

        assert!(adaptive_len < bypass_len);
    }
}
