use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use descomp::block::WordSize;
use descomp::config::{CodingOrder, SubsequenceConfig};

use crate::opts::{input_file, output_file, InputFile, OutputFile};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Preset {
    Bypass,
    Adaptive,
    Diff,
    Equality,
    RunLength,
    Match,
    Merge,
}

impl Preset {
    fn to_config(self, word_size: WordSize) -> SubsequenceConfig {
        match self {
            Preset::Bypass => SubsequenceConfig::bypass(word_size),
            Preset::Adaptive => SubsequenceConfig::adaptive(word_size, CodingOrder::Order1),
            Preset::Diff => SubsequenceConfig::diff(word_size, CodingOrder::Order1),
            Preset::Equality => SubsequenceConfig::equality(word_size),
            Preset::RunLength => SubsequenceConfig::run_length(word_size, 8),
            Preset::Match => SubsequenceConfig::match_coding(word_size, 64),
            Preset::Merge => SubsequenceConfig::merge(word_size),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a raw little-endian symbol file into a .dsz container
    Compress {
        /// Input symbol file path
        #[clap(value_parser = input_file)]
        input: InputFile,

        /// Output .dsz file path
        #[clap(value_parser = output_file)]
        output: OutputFile,

        /// Codec configuration as a JSON file
        #[clap(short, long, value_parser)]
        config: Option<PathBuf>,

        /// Built-in configuration preset (ignored if --config is given)
        #[clap(short, long, arg_enum, value_parser)]
        preset: Option<Preset>,

        /// Word size of the input symbols in bytes (1, 2, 4 or 8)
        #[clap(short, long, value_parser, default_value_t = 1)]
        word_size: u8,

        /// Encode the symbol count as a 7-bit continuation varint
        #[clap(long, value_parser)]
        token_type: bool,
    },
    /// Decompress a .dsz container back into a raw symbol file
    Decompress {
        /// Input .dsz file path
        #[clap(value_parser = input_file)]
        input: InputFile,

        /// Output symbol file path
        #[clap(value_parser = output_file)]
        output: OutputFile,
    },
    /// Print the header and configuration of a .dsz container
    Info {
        /// Input .dsz file path
        #[clap(value_parser = input_file)]
        input: InputFile,
    },
}

pub fn resolve_config(
    config_path: &Option<PathBuf>,
    preset: Option<Preset>,
    word_size: u8,
    token_type: bool,
) -> anyhow::Result<SubsequenceConfig> {
    let word_size = match WordSize::from_bytes(word_size as usize) {
        Some(word_size) => word_size,
        None => bail!("Invalid word size: {} (expected 1, 2, 4 or 8)", word_size),
    };

    let mut config = if let Some(path) = config_path {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        serde_json::from_str(&json).context("Could not parse the codec configuration")?
    } else {
        preset
            .unwrap_or(Preset::Adaptive)
            .to_config(word_size)
    };

    config.token_type = token_type || config.token_type;
    config
        .validate()
        .context("Invalid codec configuration")?;
    Ok(config)
}
