use clap::Parser;
use log::debug;
use rehash_core::RehashError;

mod cli;
mod commands;

use cli::{CliArgs, Commands};

pub type CliResult<T> = Result<T, RehashError>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    debug!("{args:?}");

    match args.command {
        Commands::Modify(m) => m.run(),
        Commands::Digest(d) => d.run(),
        Commands::Metadata(m) => m.run(),
        Commands::Inspect(i) => i.run(),
    }
}
