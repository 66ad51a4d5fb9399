//! Run-length coding: consecutive equal-value runs become one raw value plus
//! one or more length tokens. A run of length `L` stores `L - 1` decomposed
//! greedily into `guard`-valued tokens followed by a final token below the
//! guard; an exact multiple emits a trailing zero token, so the decoder can
//! always terminate a run on the first token below the guard.

use crate::block::{SymbolBlock, WordSize};

/// Replaces `values` with one symbol per run and appends the run-length
/// tokens to `lengths`. `guard` must be greater than zero.
pub fn encode(values: &mut SymbolBlock, lengths: &mut SymbolBlock, guard: u64) {
    debug_assert!(guard > 0);
    debug_assert_eq!(lengths.word_size(), WordSize::W4);

    let mut raw = SymbolBlock::new(values.word_size());
    let len = values.len();
    let mut i = 0;
    while i < len {
        let value = values.get(i);
        let mut run = 1_u64;
        while i + (run as usize) < len && values.get(i + run as usize) == value {
            run += 1;
        }
        i += run as usize;

        raw.push(value);
        let mut remaining = run - 1;
        while remaining >= guard {
            lengths.push(guard);
            remaining -= guard;
        }
        lengths.push(remaining);
    }

    values.swap(&mut raw);
}

/// Reconstructs the original stream from run values and length tokens.
pub fn decode(values: &mut SymbolBlock, lengths: &SymbolBlock, guard: u64) {
    debug_assert!(guard > 0);

    let mut output = SymbolBlock::new(values.word_size());
    let mut raw = values.cursor();
    let mut tokens = lengths.cursor();
    loop {
        let mut total = match tokens.next() {
            Some(token) => token,
            None => break,
        };
        let mut token = total;
        while token == guard {
            token = tokens.next().expect("Length token stream exhausted");
            total += token;
        }

        let value = raw.next().expect("Raw value stream exhausted");
        for _ in 0..=total {
            output.push(value);
        }
    }

    values.swap(&mut output);
}
