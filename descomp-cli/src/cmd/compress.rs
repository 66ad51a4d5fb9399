use std::io::{Read, Write};
use std::time::Instant;

use anyhow::{bail, Context};
use binrw::BinWrite;
use descomp::block::SymbolBlock;
use descomp::codec::encode_subsequence;
use descomp::config::SubsequenceConfig;
use descomp::container::{ContainerConfig, ContainerHeader, CONTAINER_VERSION};
use log::info;

use crate::cmd::format_stats;
use crate::opts::{InputFile, OutputFile};

pub fn compress(
    input: &InputFile,
    output: &OutputFile,
    config: &SubsequenceConfig,
) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let mut reader = input.as_reader()?;
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .with_context(|| format!("Could not read {}", input))?;
    let input_len = data.len();

    let block = match SymbolBlock::from_bytes(config.word_size, data) {
        Some(block) => block,
        None => bail!(
            "Input length {} is not a multiple of word size {}",
            input_len,
            config.word_size
        ),
    };

    let mut writer = output.as_writer()?;
    let header = ContainerHeader {
        version: CONTAINER_VERSION,
    };
    header.write_to(&mut writer)?;
    let config_json = serde_json::to_vec(config).context("Could not serialize the config")?;
    ContainerConfig::new(config_json).write_to(&mut writer)?;

    let written = encode_subsequence(block, None, config, &mut writer)
        .context("Could not encode the subsequence")?;
    writer.flush()?;

    info!("Compressed {} -> {}", input, output);
    info!(
        "{}; compressed payload {} bytes ({:.1}% of input)",
        format_stats(start_time, input_len),
        written,
        100.0 * written as f32 / input_len.max(1) as f32,
    );

    Ok(())
}
