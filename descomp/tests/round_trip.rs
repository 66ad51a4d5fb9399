use std::io::Cursor;

use anyhow::Result;
use descomp::_internal_test_data::{
    quality_like_block, random_block, ALL_CONFIGS_W1, QUALITY_LIKE_64K, RANDOM_1K_W2,
    REPEATING_BLOCK, SHORT_BLOCK,
};
use descomp::block::{SymbolBlock, WordSize};
use descomp::codec::{decode_subsequence, encode_subsequence};
use descomp::config::{CodingOrder, SubsequenceConfig};

fn round_trip(config: &SubsequenceConfig, block: &SymbolBlock) -> Result<usize> {
    let mut data = Vec::new();
    let written = encode_subsequence(block.clone(), None, config, &mut data)?;
    assert_eq!(written, data.len());

    let decoded = decode_subsequence(&mut Cursor::new(&data), None, config)?;
    assert_eq!(&decoded, block, "config {:?}", config);
    Ok(written)
}

#[test_log::test]
fn test_all_configs_short_block() -> Result<()> {
    for config in ALL_CONFIGS_W1.iter() {
        round_trip(config, &SHORT_BLOCK)?;
    }
    Ok(())
}

#[test]
fn test_all_configs_empty_block() -> Result<()> {
    for config in ALL_CONFIGS_W1.iter() {
        round_trip(config, &SymbolBlock::new(WordSize::W1))?;
    }
    Ok(())
}

#[test]
fn test_all_configs_single_symbol() -> Result<()> {
    for config in ALL_CONFIGS_W1.iter() {
        round_trip(config, &SymbolBlock::from_symbols(WordSize::W1, &[200]))?;
    }
    Ok(())
}

#[test]
fn test_all_configs_random_data() -> Result<()> {
    for (seed, config) in ALL_CONFIGS_W1.iter().enumerate() {
        let block = random_block(WordSize::W1, 2000, seed as u64);
        round_trip(config, &block)?;
    }
    Ok(())
}

#[test]
fn test_repeating_pattern_favors_match_coding() -> Result<()> {
    let bypass = round_trip(
        &SubsequenceConfig::bypass(WordSize::W1),
        &REPEATING_BLOCK,
    )?;
    let matched = round_trip(
        &SubsequenceConfig::match_coding(WordSize::W1, 16),
        &REPEATING_BLOCK,
    )?;

    assert!(
        matched < bypass,
        "match coding {} bytes vs bypass {} bytes",
        matched,
        bypass
    );
    Ok(())
}

#[test]
fn test_quality_like_data_favors_run_length() -> Result<()> {
    let block = quality_like_block(8 * 1024, 7);

    let bypass = round_trip(&SubsequenceConfig::bypass(WordSize::W1), &block)?;
    let rle = round_trip(&SubsequenceConfig::run_length(WordSize::W1, 8), &block)?;

    assert!(
        rle < bypass,
        "run-length coding {} bytes vs bypass {} bytes",
        rle,
        bypass
    );
    Ok(())
}

#[test]
fn test_wide_word_sizes() -> Result<()> {
    for word_size in [WordSize::W2, WordSize::W4, WordSize::W8] {
        let configs = [
            SubsequenceConfig::bypass(word_size),
            SubsequenceConfig::adaptive(word_size, CodingOrder::Order2),
            SubsequenceConfig::diff(word_size, CodingOrder::Order1),
            SubsequenceConfig::equality(word_size),
            SubsequenceConfig::run_length(word_size, 5),
            SubsequenceConfig::match_coding(word_size, 8),
            SubsequenceConfig::merge(word_size),
        ];
        for (seed, config) in configs.iter().enumerate() {
            let block = random_block(word_size, 500, seed as u64 + 100);
            round_trip(config, &block)?;
        }
    }
    Ok(())
}

#[test]
fn test_large_block() -> Result<()> {
    round_trip(
        &SubsequenceConfig::run_length(WordSize::W1, 8),
        &QUALITY_LIKE_64K,
    )?;
    round_trip(&SubsequenceConfig::equality(WordSize::W1), &QUALITY_LIKE_64K)?;
    Ok(())
}

#[test]
fn test_1k_w2_block_all_transforms() -> Result<()> {
    let configs = [
        SubsequenceConfig::adaptive(WordSize::W2, CodingOrder::Order1),
        SubsequenceConfig::diff(WordSize::W2, CodingOrder::Order0),
        SubsequenceConfig::equality(WordSize::W2),
        SubsequenceConfig::run_length(WordSize::W2, 4),
        SubsequenceConfig::match_coding(WordSize::W2, 32),
        SubsequenceConfig::merge(WordSize::W2),
    ];
    for config in &configs {
        round_trip(config, &RANDOM_1K_W2)?;
    }
    Ok(())
}

#[test]
fn test_token_type_round_trip() -> Result<()> {
    let mut config = SubsequenceConfig::equality(WordSize::W1);
    config.token_type = true;

    let block = random_block(WordSize::W1, 300, 5);
    round_trip(&config, &block)?;
    round_trip(&config, &SymbolBlock::new(WordSize::W1))?;
    Ok(())
}

#[test]
fn test_dependency_stream_round_trip() -> Result<()> {
    let config = SubsequenceConfig::diff(WordSize::W2, CodingOrder::Order2);
    let block = random_block(WordSize::W2, 400, 11);
    let dependency = random_block(WordSize::W2, 400, 12);

    let mut data = Vec::new();
    encode_subsequence(block.clone(), Some(&dependency), &config, &mut data)?;
    let decoded = decode_subsequence(&mut Cursor::new(&data), Some(&dependency), &config)?;

    assert_eq!(decoded, block);
    Ok(())
}
