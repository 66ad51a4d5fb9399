//! Equality coding: splits a stream into a per-symbol flag stream ("equal to
//! the previous symbol") and a raw-value stream holding only the unequal
//! symbols. An unequal value greater than its predecessor is stored
//! decremented by one, since the predecessor itself never appears among the
//! unequal values.

use crate::block::{SymbolBlock, WordSize};

/// Splits `values` into flags and raw values. On return `values` holds the
/// raw-value stream and `flags` one flag per input symbol (1 = equal).
pub fn encode(values: &mut SymbolBlock, flags: &mut SymbolBlock) {
    debug_assert!(flags.is_empty());
    debug_assert_eq!(flags.word_size(), WordSize::W1);

    let mut raw = SymbolBlock::new(values.word_size());
    let mut previous = 0_u64;
    for value in values.cursor() {
        if value == previous {
            flags.push(1);
        } else {
            flags.push(0);
            raw.push(if value > previous { value - 1 } else { value });
            previous = value;
        }
    }

    values.swap(&mut raw);
}

/// Reconstructs the original stream from raw values and flags into `values`.
pub fn decode(values: &mut SymbolBlock, flags: &SymbolBlock) {
    let mut output = SymbolBlock::with_capacity(values.word_size(), flags.len());
    let mut raw = values.cursor();
    let mut previous = 0_u64;
    for flag in flags.cursor() {
        if flag == 1 {
            output.push(previous);
        } else {
            let stored = raw.next().expect("Raw value stream exhausted");
            let value = if stored >= previous { stored + 1 } else { stored };
            output.push(value);
            previous = value;
        }
    }

    values.swap(&mut output);
}
