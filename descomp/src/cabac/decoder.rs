use crate::bit_stream::BitReader;
use crate::cabac::context_model::ContextModel;
use crate::cabac::tables::{LPS_TABLE, RENORM_TABLE};

/// Binary arithmetic decoder mirroring
/// [`BinaryArithmeticEncoder`](super::encoder::BinaryArithmeticEncoder).
///
/// `value` tracks a 16-bit window of the coded stream scaled by 2^7 against
/// `range`; `bits_needed` counts up to the next byte refill.
#[derive(Debug)]
pub(crate) struct BinaryArithmeticDecoder<'a> {
    bit_reader: BitReader<'a>,
    range: u32,
    value: u32,
    bits_needed: i32,
}

impl<'a> BinaryArithmeticDecoder<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        let mut bit_reader = BitReader::new(data);
        let value = ((bit_reader.read_byte() as u32) << 8) | bit_reader.read_byte() as u32;

        Self {
            bit_reader,
            range: 510,
            value,
            bits_needed: -8,
        }
    }

    /// Decodes one bin through an adaptive context model.
    pub fn decode_bin(&mut self, context: &mut ContextModel) -> u8 {
        let lps =
            LPS_TABLE[context.state() as usize][((self.range >> 6) & 3) as usize] as u32;
        self.range -= lps;
        let scaled_range = self.range << 7;

        if self.value < scaled_range {
            let bin = context.mps();
            context.update_mps();
            if scaled_range >= (256 << 7) {
                return bin;
            }
            self.range = scaled_range >> 6;
            self.value <<= 1;
            self.bits_needed += 1;
            if self.bits_needed == 0 {
                self.bits_needed = -8;
                self.value += self.bit_reader.read_byte() as u32;
            }
            bin
        } else {
            let num_bits = RENORM_TABLE[(lps >> 3) as usize] as i32;
            self.value = (self.value - scaled_range) << num_bits;
            self.range = lps << num_bits;
            let bin = 1 - context.mps();
            context.update_lps();
            self.bits_needed += num_bits;
            if self.bits_needed >= 0 {
                self.value += (self.bit_reader.read_byte() as u32) << self.bits_needed;
                self.bits_needed -= 8;
            }
            bin
        }
    }

    /// Decodes one bypass bin.
    pub fn decode_bin_ep(&mut self) -> u8 {
        self.value <<= 1;
        self.bits_needed += 1;
        if self.bits_needed >= 0 {
            self.bits_needed = -8;
            self.value += self.bit_reader.read_byte() as u32;
        }

        let scaled_range = self.range << 7;
        if self.value >= scaled_range {
            self.value -= scaled_range;
            1
        } else {
            0
        }
    }

    /// Decodes `count` bypass bins into the low bits of the result, MSB
    /// first.
    #[must_use]
    pub fn decode_bins_ep(&mut self, count: u32) -> u64 {
        debug_assert!(count <= 64);
        let mut bins = 0_u64;
        for _ in 0..count {
            bins = (bins << 1) | self.decode_bin_ep() as u64;
        }
        bins
    }
}
