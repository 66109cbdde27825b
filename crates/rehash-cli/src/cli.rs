use clap::{Parser, Subcommand};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Modify(modify::ModifyArgs),
    Digest(digest::DigestArgs),
    Metadata(metadata::MetadataArgs),
    Inspect(inspect::InspectArgs),
}
