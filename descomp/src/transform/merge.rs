//! Merge coding: splits each signed symbol into bit-plane chunks, one output
//! stream per chunk, MSB chunk first. The sign is carried by the first
//! non-zero chunk seen going MSB-ward, which is stored through the signed
//! zigzag mapping; all other chunks are stored raw. Used when no single word
//! size holds the full symbol cheaply or when bit planes compress better
//! independently.

use crate::block::{SymbolBlock, WordSize};
use crate::transform::TransformError;

/// Maps a signed value to its unsigned code: `2|v| - (v < 0)`.
#[inline]
#[must_use]
pub(crate) fn zigzag(value: i64) -> u64 {
    if value < 0 {
        2 * value.unsigned_abs() - 1
    } else {
        2 * value as u64
    }
}

/// Inverse of [`zigzag`].
#[inline]
#[must_use]
pub(crate) fn unzigzag(code: u64) -> i64 {
    if code & 1 == 1 {
        -(((code + 1) / 2) as i64)
    } else {
        (code / 2) as i64
    }
}

/// The narrowest word size holding a chunk of `width` bits plus the one-bit
/// zigzag headroom of the sign-bearing chunk.
#[must_use]
pub fn stream_word_size(width: u8) -> WordSize {
    match width + 1 {
        0..=8 => WordSize::W1,
        9..=16 => WordSize::W2,
        17..=32 => WordSize::W4,
        _ => WordSize::W8,
    }
}

/// Splits `input` into one stream per chunk width, MSB chunk first.
#[must_use]
pub fn encode(input: &SymbolBlock, widths: &[u8]) -> Vec<SymbolBlock> {
    let mut outputs: Vec<SymbolBlock> = widths
        .iter()
        .map(|&width| SymbolBlock::with_capacity(stream_word_size(width), input.len()))
        .collect();
    let total_bits: u32 = widths.iter().map(|&width| width as u32).sum();

    for index in 0..input.len() {
        let value = input.get_signed(index);
        let magnitude = value.unsigned_abs();

        let mut shift = total_bits;
        let mut sign_carried = false;
        for (stream, &width) in widths.iter().enumerate() {
            shift -= width as u32;
            let chunk = (magnitude >> shift) & width_mask(width);
            if !sign_carried && chunk != 0 {
                sign_carried = true;
                let signed_chunk = if value < 0 {
                    -(chunk as i64)
                } else {
                    chunk as i64
                };
                outputs[stream].push(zigzag(signed_chunk));
            } else {
                outputs[stream].push(chunk);
            }
        }
    }

    outputs
}

/// Reassembles the original symbols from the chunk streams.
pub fn decode(
    blocks: &[SymbolBlock],
    widths: &[u8],
    word_size: WordSize,
) -> Result<SymbolBlock, TransformError> {
    let count = blocks.first().map_or(0, SymbolBlock::len);
    for block in blocks {
        if block.len() != count {
            return Err(TransformError::StreamLengthMismatch(count, block.len()));
        }
    }
    let total_bits: u32 = widths.iter().map(|&width| width as u32).sum();

    let mut output = SymbolBlock::with_capacity(word_size, count);
    for index in 0..count {
        let mut magnitude = 0_u64;
        let mut negative = false;
        let mut sign_carried = false;

        let mut shift = total_bits;
        for (stream, &width) in widths.iter().enumerate() {
            shift -= width as u32;
            let stored = blocks[stream].get(index);
            if !sign_carried && stored != 0 {
                sign_carried = true;
                let signed_chunk = unzigzag(stored);
                negative = signed_chunk < 0;
                magnitude |= signed_chunk.unsigned_abs() << shift;
            } else {
                magnitude |= stored << shift;
            }
        }

        let value = if negative {
            (magnitude as i64).wrapping_neg()
        } else {
            magnitude as i64
        };
        output.push(value as u64);
    }

    Ok(output)
}

#[inline]
fn width_mask(width: u8) -> u64 {
    u64::MAX >> (64 - width as u32)
}

#[cfg(test)]
mod tests {
    use crate::block::{SymbolBlock, WordSize};
    use crate::transform::merge;
    use crate::transform::merge::{unzigzag, zigzag};

    fn round_trip(symbols: &[u64], word_size: WordSize, widths: &[u8]) {
        let input = SymbolBlock::from_symbols(word_size, symbols);
        let streams = merge::encode(&input, widths);
        let output = merge::decode(&streams, widths, word_size).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_zigzag_mapping() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(3), 6);
        assert_eq!(zigzag(-3), 5);
        assert_eq!(zigzag(-1), 1);

        for value in [-128_i64, -5, -1, 0, 1, 5, 127] {
            assert_eq!(unzigzag(zigzag(value)), value);
        }
    }

    #[test]
    fn test_chunk_split() {
        let input = SymbolBlock::from_symbols(WordSize::W2, &[0x0A0B]);
        let streams = merge::encode(&input, &[8, 8]);

        assert_eq!(streams.len(), 2);
        // the MSB chunk 0x0A carries the (positive) sign: zigzag(10) = 20
        assert_eq!(streams[0].get(0), 20);
        assert_eq!(streams[1].get(0), 0x0B);
    }

    #[test]
    fn test_sign_carried_by_first_nonzero_chunk() {
        // -3 at word size 2: magnitude 3 lives entirely in the low chunk
        let input = SymbolBlock::from_symbols(WordSize::W2, &[0xFFFD]);
        let streams = merge::encode(&input, &[8, 8]);

        assert_eq!(streams[0].get(0), 0);
        assert_eq!(streams[1].get(0), zigzag(-3));

        let output = merge::decode(&streams, &[8, 8], WordSize::W2).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_round_trip_signed_values() {
        let symbols: Vec<u64> = [-300_i64, -2, -1, 0, 1, 2, 300, 0x7FFF, -0x8000]
            .iter()
            .map(|&v| v as u64)
            .collect();
        round_trip(&symbols, WordSize::W2, &[8, 8]);
        round_trip(&symbols, WordSize::W2, &[4, 4, 8]);
    }

    #[test]
    fn test_round_trip_wide_word_size() {
        let symbols = [u64::MAX, 0, 1, u64::MAX - 7, 0x8000_0000_0000_0000];
        round_trip(&symbols, WordSize::W8, &[32, 32]);
    }

    #[test]
    fn test_empty_input() {
        let input = SymbolBlock::new(WordSize::W4);
        let streams = merge::encode(&input, &[16, 16]);

        assert!(streams.iter().all(SymbolBlock::is_empty));
        let output = merge::decode(&streams, &[16, 16], WordSize::W4).unwrap();
        assert!(output.is_empty());
    }
}
