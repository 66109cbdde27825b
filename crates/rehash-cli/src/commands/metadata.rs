use std::path::PathBuf;

use clap::Args;
use rehash_core::ImageMetadata;

use crate::CliResult;

/// Prints the metadata record stored in a PNG or JPEG image
#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// PNG or JPEG image, used readonly
    #[arg(value_name = "image file")]
    pub image: PathBuf,
}

impl MetadataArgs {
    pub fn run(self) -> CliResult<()> {
        let metadata = rehash_core::commands::read_metadata(&self.image)?;
        print_metadata(&metadata);

        Ok(())
    }
}

pub(crate) fn print_metadata(m: &ImageMetadata) {
    if m.is_empty() {
        println!("No metadata");
        return;
    }

    let fields = [
        ("Artist", m.artist.clone()),
        ("Copyright", m.copyright.clone()),
        ("Description", m.description.clone()),
        ("Date/Time", m.date_time.map(|t| t.to_rfc3339())),
        ("Location", m.location.clone()),
        ("Camera Make", m.camera_make.clone()),
        ("Camera Model", m.camera_model.clone()),
        ("Software", m.software.clone()),
        ("Image Width", m.image_width.map(|w| w.to_string())),
        ("Image Height", m.image_height.map(|h| h.to_string())),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{label:<13} {value}");
        }
    }
}
