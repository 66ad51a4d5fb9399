use crate::block::WordSize;
use crate::cabac::binarization::Binarization;
use crate::cabac::context_model::ContextModel;
use crate::cabac::context_selector::ContextSelector;
use crate::cabac::decoder::BinaryArithmeticDecoder;
use crate::config::StreamConfig;
use crate::transform::merge::unzigzag;
use crate::cabac::writer::unit_mask;

/// Entropy-decodes the symbols of one transformed substream; the exact
/// mirror of [`Writer`](crate::cabac::writer::Writer). The caller drives the
/// symbol count, which is carried in the stream framing.
#[derive(Debug)]
pub struct Reader<'a> {
    decoder: BinaryArithmeticDecoder<'a>,
    contexts: Vec<ContextModel>,
    selector: ContextSelector,
    binarization: Binarization,
    bypass: bool,
    set_size: usize,
    word_size: WordSize,
}

impl<'a> Reader<'a> {
    /// Starts decoding one coding unit from its coded bytes.
    #[must_use]
    pub fn new(data: &'a [u8], config: &StreamConfig, word_size: WordSize) -> Self {
        let set_size = config.binarization.context_set_size();
        let num_contexts = if config.bypass {
            0
        } else {
            set_size * config.coding_order.context_multiplier()
        };

        Self {
            decoder: BinaryArithmeticDecoder::new(data),
            contexts: vec![ContextModel::new(); num_contexts],
            selector: ContextSelector::new(config.coding_order),
            binarization: config.binarization,
            bypass: config.bypass,
            set_size,
            word_size,
        }
    }

    /// Reads one symbol, conditioning future contexts on it.
    #[must_use]
    pub fn read(&mut self) -> u64 {
        let symbol = self.read_symbol();
        self.selector.push(symbol);
        symbol
    }

    /// Reads one symbol conditioned on an external dependency symbol instead
    /// of the decode history.
    #[must_use]
    pub fn read_with_dependency(&mut self, dependency: u64) -> u64 {
        self.selector.push(dependency);
        self.read_symbol()
    }

    /// Clears context-model adaptation between independent coding units.
    pub fn reset(&mut self) {
        self.contexts.fill(ContextModel::new());
        self.selector.reset();
    }

    fn read_symbol(&mut self) -> u64 {
        let base = self.selector.context_base(self.set_size);
        let mut pos = 0_u32;
        match self.binarization {
            Binarization::Binary { bits } => self.get_bits(bits as u32, &mut pos, base),
            Binarization::TruncatedUnary { cmax } => self.get_tu(cmax, &mut pos, base),
            Binarization::ExponentialGolomb => self.get_eg(&mut pos, base),
            Binarization::SignedExponentialGolomb => {
                let code = self.get_eg(&mut pos, base);
                self.signed_symbol(code)
            }
            Binarization::TruncatedExponentialGolomb { cmax } => {
                self.get_teg(cmax, &mut pos, base)
            }
            Binarization::SignedTruncatedExponentialGolomb { cmax } => {
                let code = self.get_teg(cmax, &mut pos, base);
                self.signed_symbol(code)
            }
            Binarization::SplitUnitTruncatedUnary {
                split_size,
                output_bits,
            } => self.get_sutu(split_size, output_bits, &mut pos, base),
            Binarization::SignedSplitUnitTruncatedUnary {
                split_size,
                output_bits,
            } => {
                let code = self.get_sutu(split_size, output_bits, &mut pos, base);
                self.signed_symbol(code)
            }
            Binarization::DoubleTruncatedUnary {
                cmax,
                split_size,
                output_bits,
            } => self.get_dtu(cmax, split_size, output_bits, &mut pos, base),
            Binarization::SignedDoubleTruncatedUnary {
                cmax,
                split_size,
                output_bits,
            } => {
                let code = self.get_dtu(cmax, split_size, output_bits, &mut pos, base);
                self.signed_symbol(code)
            }
        }
    }

    fn signed_symbol(&self, code: u64) -> u64 {
        (unzigzag(code) as u64) & self.word_size.mask()
    }

    fn get_bit(&mut self, pos: &mut u32, base: usize) -> u8 {
        let bit = if self.bypass {
            self.decoder.decode_bin_ep()
        } else {
            let index = base + (*pos as usize).min(self.set_size - 1);
            self.decoder.decode_bin(&mut self.contexts[index])
        };
        *pos += 1;
        bit
    }

    fn get_bits(&mut self, count: u32, pos: &mut u32, base: usize) -> u64 {
        if self.bypass {
            *pos += count;
            self.decoder.decode_bins_ep(count)
        } else {
            let mut value = 0_u64;
            for _ in 0..count {
                value = (value << 1) | self.get_bit(pos, base) as u64;
            }
            value
        }
    }

    fn get_tu(&mut self, cmax: u64, pos: &mut u32, base: usize) -> u64 {
        let mut value = 0;
        while value < cmax && self.get_bit(pos, base) == 1 {
            value += 1;
        }
        value
    }

    fn get_eg(&mut self, pos: &mut u32, base: usize) -> u64 {
        let mut prefix_len = 0_u32;
        while prefix_len < 64 && self.get_bit(pos, base) == 0 {
            prefix_len += 1;
        }
        if prefix_len >= 64 {
            return u64::MAX;
        }
        let suffix = self.get_bits(prefix_len, pos, base);
        ((1_u64 << prefix_len) | suffix) - 1
    }

    fn get_teg(&mut self, cmax: u64, pos: &mut u32, base: usize) -> u64 {
        let prefix = self.get_tu(cmax, pos, base);
        if prefix == cmax {
            cmax + self.get_eg(pos, base)
        } else {
            prefix
        }
    }

    fn get_sutu(&mut self, split_size: u8, output_bits: u8, pos: &mut u32, base: usize) -> u64 {
        let split = split_size as u32;
        let mut value = 0_u64;
        let mut shift = output_bits as u32;
        while shift > 0 {
            let unit = if shift % split == 0 { split } else { shift % split };
            shift -= unit;
            value |= self.get_tu(unit_mask(unit), pos, base) << shift;
        }
        value
    }

    fn get_dtu(
        &mut self,
        cmax: u64,
        split_size: u8,
        output_bits: u8,
        pos: &mut u32,
        base: usize,
    ) -> u64 {
        let prefix = self.get_tu(cmax, pos, base);
        if prefix == cmax {
            cmax + self.get_sutu(split_size, output_bits, pos, base)
        } else {
            prefix
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    use crate::block::WordSize;
    use crate::cabac::binarization::Binarization;
    use crate::cabac::reader::Reader;
    use crate::cabac::writer::Writer;
    use crate::config::{CodingOrder, StreamConfig};

    fn round_trip(config: &StreamConfig, word_size: WordSize, symbols: &[u64]) {
        let mut writer = Writer::new(config, word_size);
        for &symbol in symbols {
            writer.write(symbol);
        }
        let bytes = writer.finish();

        let mut reader = Reader::new(&bytes, config, word_size);
        for (i, &symbol) in symbols.iter().enumerate() {
            assert_eq!(
                reader.read(),
                symbol,
                "symbol {} under {:?}",
                i,
                config.binarization
            );
        }
    }

    fn sample_symbols(limit: u64, len: usize, seed: u64) -> Vec<u64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        (0..len).map(|_| rng.gen_range(0..=limit)).collect()
    }

    #[test]
    fn test_round_trip_every_scheme_order_and_mode() {
        let schemes = [
            (Binarization::Binary { bits: 8 }, 255),
            (Binarization::TruncatedUnary { cmax: 15 }, 15),
            (Binarization::ExponentialGolomb, 200),
            (Binarization::SignedExponentialGolomb, 255),
            (Binarization::TruncatedExponentialGolomb { cmax: 4 }, 200),
            (
                Binarization::SignedTruncatedExponentialGolomb { cmax: 4 },
                255,
            ),
            (
                Binarization::SplitUnitTruncatedUnary {
                    split_size: 4,
                    output_bits: 8,
                },
                255,
            ),
            (
                Binarization::SignedSplitUnitTruncatedUnary {
                    split_size: 4,
                    output_bits: 9,
                },
                255,
            ),
            (
                Binarization::DoubleTruncatedUnary {
                    cmax: 3,
                    split_size: 4,
                    output_bits: 8,
                },
                200,
            ),
            (
                Binarization::SignedDoubleTruncatedUnary {
                    cmax: 3,
                    split_size: 4,
                    output_bits: 9,
                },
                255,
            ),
        ];
        let orders = [
            CodingOrder::Order0,
            CodingOrder::Order1,
            CodingOrder::Order2,
        ];

        for (seed, &(binarization, limit)) in schemes.iter().enumerate() {
            for order in orders {
                for bypass in [false, true] {
                    let config = StreamConfig {
                        binarization,
                        coding_order: order,
                        bypass,
                    };
                    let symbols = sample_symbols(limit, 300, seed as u64);
                    round_trip(&config, WordSize::W1, &symbols);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_wide_symbols() {
        let config = StreamConfig {
            binarization: Binarization::Binary { bits: 64 },
            coding_order: CodingOrder::Order0,
            bypass: false,
        };
        let symbols = [0, 1, u64::MAX, 0xDEAD_BEEF_0123_4567, u64::MAX - 1];
        round_trip(&config, WordSize::W8, &symbols);
    }

    #[test]
    fn test_round_trip_signed_extremes() {
        let config = StreamConfig {
            binarization: Binarization::SignedExponentialGolomb,
            coding_order: CodingOrder::Order1,
            bypass: false,
        };
        // two's-complement extremes at word size 2
        let symbols = [0x8000, 0x7FFF, 0xFFFF, 0, 1];
        round_trip(&config, WordSize::W2, &symbols);
    }

    #[test]
    fn test_reset_between_coding_units() {
        let config = StreamConfig {
            binarization: Binarization::TruncatedUnary { cmax: 7 },
            coding_order: CodingOrder::Order1,
            bypass: false,
        };
        let unit_a = [1, 1, 2, 3, 1, 0, 7];
        let unit_b = [7, 0, 0, 1, 5];

        let mut writer = Writer::new(&config, WordSize::W1);
        for &symbol in &unit_a {
            writer.write(symbol);
        }
        writer.reset();
        for &symbol in &unit_b {
            writer.write(symbol);
        }
        let bytes = writer.finish();

        let mut reader = Reader::new(&bytes, &config, WordSize::W1);
        for &symbol in &unit_a {
            assert_eq!(reader.read(), symbol);
        }
        reader.reset();
        for &symbol in &unit_b {
            assert_eq!(reader.read(), symbol);
        }
    }

    #[test]
    fn test_dependency_conditioning_round_trip() {
        let config = StreamConfig {
            binarization: Binarization::TruncatedUnary { cmax: 7 },
            coding_order: CodingOrder::Order2,
            bypass: false,
        };
        let symbols = sample_symbols(7, 200, 99);
        let dependency = sample_symbols(7, 200, 100);

        let mut writer = Writer::new(&config, WordSize::W1);
        for (&symbol, &dep) in symbols.iter().zip(dependency.iter()) {
            writer.write_with_dependency(symbol, dep);
        }
        let bytes = writer.finish();

        let mut reader = Reader::new(&bytes, &config, WordSize::W1);
        for (&symbol, &dep) in symbols.iter().zip(dependency.iter()) {
            assert_eq!(reader.read_with_dependency(dep), symbol);
        }
    }
}
