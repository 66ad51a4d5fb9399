use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::block::{SymbolBlock, WordSize};
use crate::config::{CodingOrder, SubsequenceConfig};

pub const SHORT_SYMBOLS: [u64; 6] = [3, 3, 3, 7, 7, 2];

lazy_static! {
    pub static ref SHORT_BLOCK: SymbolBlock =
        SymbolBlock::from_symbols(WordSize::W1, &SHORT_SYMBOLS);
    pub static ref REPEATING_BLOCK: SymbolBlock = {
        let mut block = SymbolBlock::with_capacity(WordSize::W1, 300);
        for _ in 0..100 {
            for symbol in [1, 2, 3] {
                block.push(symbol);
            }
        }
        block
    };
    pub static ref RANDOM_1K_W2: SymbolBlock = random_block(WordSize::W2, 1024, 1337);
    pub static ref QUALITY_LIKE_64K: SymbolBlock = quality_like_block(64 * 1024, 42);
    pub static ref ALL_CONFIGS_W1: Vec<SubsequenceConfig> = vec![
        SubsequenceConfig::bypass(WordSize::W1),
        SubsequenceConfig::adaptive(WordSize::W1, CodingOrder::Order0),
        SubsequenceConfig::adaptive(WordSize::W1, CodingOrder::Order1),
        SubsequenceConfig::adaptive(WordSize::W1, CodingOrder::Order2),
        SubsequenceConfig::diff(WordSize::W1, CodingOrder::Order1),
        SubsequenceConfig::equality(WordSize::W1),
        SubsequenceConfig::run_length(WordSize::W1, 3),
        SubsequenceConfig::match_coding(WordSize::W1, 16),
        SubsequenceConfig::merge(WordSize::W1),
    ];
}

/// Uniform random symbols over the word size's low range.
#[must_use]
pub fn random_block(word_size: WordSize, len: usize, seed: u64) -> SymbolBlock {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut block = SymbolBlock::with_capacity(word_size, len);
    for _ in 0..len {
        block.push(rng.gen_range(0..=word_size.mask().min(255)));
    }
    block
}

/// Symbols with the run-and-drift shape of quality-score subsequences:
/// long runs of a slowly moving value with occasional outliers.
#[must_use]
pub fn quality_like_block(len: usize, seed: u64) -> SymbolBlock {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut block = SymbolBlock::with_capacity(WordSize::W1, len);
    let mut current: i64 = 30;
    for _ in 0..len {
        if rng.gen_bool(0.1) {
            current += rng.gen_range(-4..=4);
            current = current.clamp(0, 63);
        }
        let symbol = if rng.gen_bool(0.02) {
            rng.gen_range(0..64)
        } else {
            current as u64
        };
        block.push(symbol);
    }
    block
}
