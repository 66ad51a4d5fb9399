use std::io::Write;
use std::time::Instant;

use anyhow::{bail, Context};
use binrw::BinRead;
use descomp::codec::decode_subsequence;
use descomp::config::SubsequenceConfig;
use descomp::container::{ContainerConfig, ContainerHeader, CONTAINER_VERSION};
use log::{debug, info};

use crate::cmd::format_stats;
use crate::opts::{InputFile, OutputFile};

pub fn decompress(input: &InputFile, output: &OutputFile) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let mut reader = input.as_reader()?;
    let header = ContainerHeader::read(&mut reader)
        .with_context(|| format!("{} is not a descomp container", input))?;
    if header.version != CONTAINER_VERSION {
        bail!("Unsupported container version: {}", header.version);
    }

    let container_config = ContainerConfig::read(&mut reader)?;
    let config: SubsequenceConfig = serde_json::from_slice(&container_config.config_json)
        .context("Could not parse the embedded codec configuration")?;
    debug!("Container config: {:?}", config);

    let block = decode_subsequence(&mut reader, None, &config)
        .context("Could not decode the subsequence")?;

    let mut writer = output.as_writer()?;
    let bytes = block.into_bytes();
    writer.write_all(&bytes)?;
    writer.flush()?;

    info!("Decompressed {} -> {}", input, output);
    info!("{}", format_stats(start_time, bytes.len()));

    Ok(())
}
