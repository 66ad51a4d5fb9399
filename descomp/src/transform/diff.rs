//! Difference coding: each symbol is replaced by its wrapping difference to
//! the previous symbol, reconstructed by a cumulative sum. Arithmetic wraps
//! at the block's word size.

use crate::block::SymbolBlock;

/// Replaces every symbol with `symbol - previous`, starting from zero.
pub fn encode(block: &mut SymbolBlock) {
    let mut previous = 0_u64;
    for i in 0..block.len() {
        let value = block.get(i);
        block.set(i, value.wrapping_sub(previous));
        previous = value;
    }
}

/// Restores the original symbols by running a cumulative sum.
pub fn decode(block: &mut SymbolBlock) {
    let mask = block.word_size().mask();
    let mut previous = 0_u64;
    for i in 0..block.len() {
        let value = previous.wrapping_add(block.get(i)) & mask;
        block.set(i, value);
        previous = value;
    }
}
