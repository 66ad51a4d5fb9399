#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use human_panic::setup_panic;

use crate::logging::init_logging;

mod cli;
mod cmd;
mod logging;
mod opts;

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();
    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    match &cli.command {
        Commands::Compress {
            input,
            output,
            config,
            preset,
            word_size,
            token_type,
        } => {
            let config = cli::resolve_config(config, *preset, *word_size, *token_type)?;
            cmd::compress::compress(input, output, &config)
                .context("Failed to compress the symbol file")?;
        }
        Commands::Decompress { input, output } => {
            cmd::decompress::decompress(input, output)
                .context("Failed to decompress the container file")?;
        }
        Commands::Info { input } => {
            cmd::info::info(input).context("Failed to read the container file")?;
        }
    }

    Ok(())
}
