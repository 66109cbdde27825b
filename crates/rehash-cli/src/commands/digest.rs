use std::path::PathBuf;

use clap::Args;

use crate::CliResult;

/// Prints the SHA-1 digest of PNG and JPEG images
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// PNG or JPEG images
    #[arg(value_name = "image files", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

impl DigestArgs {
    pub fn run(self) -> CliResult<()> {
        for file in &self.files {
            let digest = rehash_core::commands::digest_file(file)?;
            println!("{digest}  {}", file.display());
        }

        Ok(())
    }
}
