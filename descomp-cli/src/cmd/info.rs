use std::fs;

use anyhow::Context;
use binrw::BinRead;
use descomp::config::SubsequenceConfig;
use descomp::container::{ContainerConfig, ContainerHeader};

use crate::cmd::format_bytes;
use crate::opts::InputFile;

pub fn info(input: &InputFile) -> anyhow::Result<()> {
    let file_len = fs::metadata(input.path())
        .with_context(|| format!("Could not stat {}", input))?
        .len();

    let mut reader = input.as_reader()?;
    let header = ContainerHeader::read(&mut reader)
        .with_context(|| format!("{} is not a descomp container", input))?;
    let container_config = ContainerConfig::read(&mut reader)?;
    let config: SubsequenceConfig = serde_json::from_slice(&container_config.config_json)
        .context("Could not parse the embedded codec configuration")?;

    println!("Container version: {}", header.version);
    println!("File size:         {}", format_bytes(file_len as usize));
    println!("Word size:         {} bytes", config.word_size);
    println!("Token type:        {}", config.token_type);
    println!("Transform:         {}", config.transform.descriptor().name);
    for (index, stream) in config.streams.iter().enumerate() {
        println!(
            "Stream {}:          {} (order {}, {})",
            index,
            stream.binarization.name(),
            stream.coding_order,
            if stream.bypass { "bypass" } else { "adaptive" },
        );
    }

    Ok(())
}
