//! Match coding: an LZ77-style transform that replaces repeated runs with
//! (pointer, length) pairs found by a naive scan over a sliding window.
//! Ties are broken towards the most recent window position, since a later
//! candidate of equal length replaces the current best. Matches shorter than
//! two symbols are emitted as literals with a zero length code.

use crate::block::{SymbolBlock, WordSize};

/// Splits `values` into literals, match pointers and length codes.
/// `window_size` of zero degenerates to emitting every symbol as a literal.
pub fn encode(
    values: &mut SymbolBlock,
    pointers: &mut SymbolBlock,
    lengths: &mut SymbolBlock,
    window_size: u32,
) {
    debug_assert_eq!(pointers.word_size(), WordSize::W4);
    debug_assert_eq!(lengths.word_size(), WordSize::W4);

    let mut raw = SymbolBlock::new(values.word_size());
    let len = values.len();
    let mut i = 0;
    while i < len {
        let window_start = i.saturating_sub(window_size as usize);
        let mut pointer = 0;
        let mut length = 0;
        for w in window_start..i {
            let mut match_length = 0;
            while i + match_length < len
                && values.get(w + match_length) == values.get(i + match_length)
            {
                match_length += 1;
            }
            if match_length >= length {
                pointer = i - w;
                length = match_length;
            }
        }

        if length < 2 {
            lengths.push(0);
            raw.push(values.get(i));
            i += 1;
        } else {
            pointers.push(pointer as u64);
            lengths.push(length as u64);
            i += length;
        }
    }

    values.swap(&mut raw);
}

/// Reconstructs the original stream from literals, pointers and lengths.
/// Overlapping self-copies (`pointer < length`) are resolved symbol by
/// symbol, never as a bulk copy.
pub fn decode(values: &mut SymbolBlock, pointers: &SymbolBlock, lengths: &SymbolBlock) {
    let mut output = SymbolBlock::new(values.word_size());
    let mut raw = values.cursor();
    let mut pointer_idx = 0;
    for length in lengths.cursor() {
        if length == 0 {
            output.push(raw.next().expect("Literal stream exhausted"));
        } else {
            let pointer = pointers.get(pointer_idx) as usize;
            pointer_idx += 1;
            let start = output.len() - pointer;
            for j in 0..length as usize {
                let value = output.get(start + j);
                output.push(value);
            }
        }
    }

    values.swap(&mut output);
}

#[cfg(test)]
mod tests {
    use crate::block::{SymbolBlock, WordSize};
    use crate::transform::match_coding;

    fn encode(
        symbols: &[u64],
        window_size: u32,
    ) -> (SymbolBlock, SymbolBlock, SymbolBlock) {
        let mut values = SymbolBlock::from_symbols(WordSize::W2, symbols);
        let mut pointers = SymbolBlock::new(WordSize::W4);
        let mut lengths = SymbolBlock::new(WordSize::W4);
        match_coding::encode(&mut values, &mut pointers, &mut lengths, window_size);
        (pointers, lengths, values)
    }

    fn round_trip(symbols: &[u64], window_size: u32) {
        let (pointers, lengths, mut values) = encode(symbols, window_size);
        match_coding::decode(&mut values, &pointers, &lengths);
        assert_eq!(values, SymbolBlock::from_symbols(WordSize::W2, symbols));
    }

    #[test]
    fn test_repeating_pattern_produces_matches() {
        let symbols = [1, 2, 3, 1, 2, 3, 1, 2, 3];
        let (pointers, lengths, values) = encode(&symbols, 4);

        let length_values: Vec<u64> = lengths.cursor().collect();
        assert!(length_values.iter().any(|&l| l >= 2));
        assert_eq!(lengths.len(), pointers.len() + values.len());
    }

    #[test]
    fn test_round_trip_repeating_pattern() {
        round_trip(&[1, 2, 3, 1, 2, 3, 1, 2, 3], 4);
    }

    #[test]
    fn test_overlapping_self_copy() {
        // a run of equal symbols matches at distance 1 with length > 1,
        // forcing pointer < length on decode
        let symbols = [7, 7, 7, 7, 7, 7, 7, 7];
        let (pointers, lengths, mut values) = encode(&symbols, 4);

        assert_eq!(pointers.len(), 1);
        assert_eq!(pointers.get(0), 1);
        let length_values: Vec<u64> = lengths.cursor().collect();
        assert_eq!(length_values, vec![0, 7]);

        match_coding::decode(&mut values, &pointers, &lengths);
        assert_eq!(values, SymbolBlock::from_symbols(WordSize::W2, &symbols));
    }

    #[test]
    fn test_zero_window_emits_only_literals() {
        let symbols = [4, 4, 4, 4];
        let (pointers, lengths, values) = encode(&symbols, 0);

        assert!(pointers.is_empty());
        assert_eq!(values.len(), 4);
        let length_values: Vec<u64> = lengths.cursor().collect();
        assert_eq!(length_values, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_tie_breaks_towards_most_recent_position() {
        // both occurrences of [5, 6] match; the closer one must win
        let symbols = [5, 6, 0, 5, 6, 1, 5, 6];
        let (pointers, lengths, _values) = encode(&symbols, 8);

        let length_values: Vec<u64> = lengths.cursor().collect();
        let pointer_values: Vec<u64> = pointers.cursor().collect();
        assert_eq!(length_values, vec![0, 0, 0, 2, 0, 2]);
        assert_eq!(pointer_values, vec![3, 3]);
    }

    #[test]
    fn test_round_trip_mixed_content() {
        round_trip(&[9, 9, 1, 2, 3, 9, 9, 1, 2, 3, 4, 4, 4, 4, 4, 0], 8);
    }

    #[test]
    fn test_empty_input() {
        let (pointers, lengths, mut values) = encode(&[], 4);
        assert!(pointers.is_empty());
        assert!(lengths.is_empty());
        assert!(values.is_empty());

        match_coding::decode(&mut values, &pointers, &lengths);
        assert!(values.is_empty());
    }

    #[test]
    fn test_single_symbol() {
        round_trip(&[42], 4);
    }
}
