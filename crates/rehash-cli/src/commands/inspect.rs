use std::path::PathBuf;

use clap::Args;

use super::metadata::print_metadata;
use crate::CliResult;

/// Decodes a PNG or JPEG image and prints what it contains
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PNG or JPEG image, used readonly
    #[arg(value_name = "image file")]
    pub image: PathBuf,
}

impl InspectArgs {
    pub fn run(self) -> CliResult<()> {
        let report = rehash_core::api::inspect::prepare()
            .with_image(&self.image)
            .execute()?;
        let [r, g, b, a] = report.top_left;

        println!("Format:     {}", report.format);
        println!("Dimensions: {}x{}", report.width, report.height);
        println!("Color type: {:?}", report.color_type);
        println!("Size:       {} bytes", report.size);
        println!("Digest:     {}", report.digest);
        println!("Pixel 0,0:  R={r} G={g} B={b} A={a}");
        print_metadata(&report.metadata);

        Ok(())
    }
}
