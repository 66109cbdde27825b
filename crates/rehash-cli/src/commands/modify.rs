use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use log::warn;
use rehash_core::media::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DELTA, MAX_DELTA};
use rehash_core::metadata::parse_timestamp;
use rehash_core::{ImageMetadata, Mode, PerturbOptions};

use crate::CliResult;

/// Changes the digest of a PNG or JPEG image
#[derive(Args, Debug)]
pub struct ModifyArgs {
    /// PNG or JPEG image, replaced in place unless --out is given
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub image: PathBuf,

    /// Store the modified image here instead
    #[arg(short = 'o', long = "out", value_name = "output image file")]
    pub output: Option<PathBuf>,

    /// How the digest is changed: random, pixel or metadata
    #[arg(short, long, value_name = "mode", default_value = "random")]
    pub mode: Mode,

    /// Pixel mode: upper bound of the color channel delta (1-2)
    #[arg(
        long,
        value_name = "delta",
        default_value_t = DEFAULT_MAX_DELTA,
        value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_DELTA))
    )]
    pub max_delta: u8,

    /// Pixel mode: quality when re-encoding a JPEG
    #[arg(
        long,
        value_name = "quality",
        default_value_t = DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub jpeg_quality: u8,

    #[command(flatten)]
    pub metadata: MetadataFields,
}

/// Metadata mode: the fields to write, unset fields are not written
#[derive(Args, Debug, Clone, Default)]
pub struct MetadataFields {
    #[arg(long, value_name = "name")]
    pub artist: Option<String>,

    #[arg(long, value_name = "notice")]
    pub copyright: Option<String>,

    #[arg(long, value_name = "text")]
    pub description: Option<String>,

    /// Capture time, e.g. 2024-05-17T08:09:10Z or 2024:05:17 08:09:10
    #[arg(long, value_name = "timestamp", value_parser = parse_date_time)]
    pub date_time: Option<DateTime<Utc>>,

    #[arg(long, value_name = "place")]
    pub location: Option<String>,

    #[arg(long, value_name = "make")]
    pub camera_make: Option<String>,

    #[arg(long, value_name = "model")]
    pub camera_model: Option<String>,

    #[arg(long, value_name = "name")]
    pub software: Option<String>,

    /// Recorded image width
    #[arg(long, value_name = "pixels")]
    pub width: Option<u32>,

    /// Recorded image height
    #[arg(long, value_name = "pixels")]
    pub height: Option<u32>,
}

fn parse_date_time(s: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(s).ok_or_else(|| format!("{s:?} is neither RFC 3339 nor YYYY:MM:DD HH:MM:SS"))
}

impl MetadataFields {
    /// `None` if no field was given
    pub fn into_metadata(self) -> Option<ImageMetadata> {
        let metadata = ImageMetadata {
            artist: self.artist,
            copyright: self.copyright,
            description: self.description,
            date_time: self.date_time,
            location: self.location,
            camera_make: self.camera_make,
            camera_model: self.camera_model,
            software: self.software,
            image_width: self.width,
            image_height: self.height,
        };

        (!metadata.is_empty()).then_some(metadata)
    }

    /// The metadata to hand to `mode`, fields given outside metadata mode are dropped with a warning
    pub fn for_mode(self, mode: Mode) -> Option<ImageMetadata> {
        let metadata = self.into_metadata();
        if metadata.is_some() && mode != Mode::Metadata {
            warn!("metadata fields are ignored in {mode} mode, use --mode metadata to write them");
            return None;
        }
        metadata
    }
}

impl ModifyArgs {
    pub fn run(self) -> CliResult<()> {
        let options = PerturbOptions::default()
            .with_max_delta(self.max_delta)
            .with_jpeg_quality(self.jpeg_quality);
        let target = self.output.clone().unwrap_or_else(|| self.image.clone());

        let modification = rehash_core::api::modify::prepare()
            .with_image(&self.image)
            .use_output(self.output)
            .with_mode(self.mode)
            .use_metadata(self.metadata.for_mode(self.mode))
            .with_options(options)
            .execute()?;

        println!("Mode:            {}", self.mode);
        println!("Original digest: {}", modification.original);
        println!("Modified digest: {}", modification.modified);
        println!("Written to:      {}", target.display());

        Ok(())
    }
}
