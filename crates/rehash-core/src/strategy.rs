//! The three ways of changing a digest.
//!
//! Each strategy is a [`Transform`] from input bytes to output bytes; the
//! [`Strategy`] enum dispatches to exactly one of them.

use std::fmt;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use log::debug;
use rand::{CryptoRng, RngCore};

use crate::container::{jpeg, png};
use crate::error::RehashError;
use crate::media::image::perturb;
use crate::media::{ContainerFormat, PerturbOptions};
use crate::metadata::{self, ImageMetadata};
use crate::result::Result;

/// random bytes in the JPEG auxiliary comment
pub const JPEG_RANDOM_LEN: usize = 16;
/// random bytes, hex encoded, in the PNG auxiliary text chunk
pub const PNG_RANDOM_LEN: usize = 32;
/// keyword of the PNG auxiliary text chunk
pub const PNG_RANDOM_KEYWORD: &str = "Random";

/// a cryptographically strong random source, usable as a trait object
pub trait SecureRng: RngCore + CryptoRng {}

impl<T: RngCore + CryptoRng + ?Sized> SecureRng for T {}

#[enum_dispatch]
pub trait Transform {
    /// produces the transformed buffer, `bytes` stays untouched
    fn apply(
        &self,
        bytes: &[u8],
        format: ContainerFormat,
        rng: &mut dyn SecureRng,
    ) -> Result<Vec<u8>>;
}

/// Inserts a region of fresh random bytes: a comment right after SOI for
/// JPEG, a `Random` text chunk in front of `IEND` for PNG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuxiliaryChunk;

impl Transform for AuxiliaryChunk {
    fn apply(
        &self,
        bytes: &[u8],
        format: ContainerFormat,
        rng: &mut dyn SecureRng,
    ) -> Result<Vec<u8>> {
        match format {
            ContainerFormat::Jpeg => {
                let mut random = [0; JPEG_RANDOM_LEN];
                rng.fill_bytes(&mut random);
                jpeg::insert_comment(bytes, &random)
            }
            ContainerFormat::Png => {
                let mut random = [0; PNG_RANDOM_LEN];
                rng.fill_bytes(&mut random);
                let chunk = png::encode_text_chunk(PNG_RANDOM_KEYWORD, &hex::encode(random))?;
                png::insert_chunks(bytes, &[chunk])
            }
        }
    }
}

/// nudges one border pixel and re-encodes the raster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelPerturbation {
    pub options: PerturbOptions,
}

impl Transform for PixelPerturbation {
    fn apply(
        &self,
        bytes: &[u8],
        format: ContainerFormat,
        rng: &mut dyn SecureRng,
    ) -> Result<Vec<u8>> {
        perturb(bytes, format, &self.options, rng).map(|p| p.bytes)
    }
}

/// replaces the textual regions with the given record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRewrite {
    pub metadata: ImageMetadata,
}

impl Transform for MetadataRewrite {
    fn apply(
        &self,
        bytes: &[u8],
        format: ContainerFormat,
        _rng: &mut dyn SecureRng,
    ) -> Result<Vec<u8>> {
        metadata::write(bytes, format, &self.metadata)
    }
}

#[enum_dispatch(Transform)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    AuxiliaryChunk,
    PixelPerturbation,
    MetadataRewrite,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::AuxiliaryChunk(AuxiliaryChunk)
    }
}

impl Strategy {
    /// Builds the strategy for `mode`. Metadata mode needs a record with at
    /// least one field set.
    pub fn from_mode(
        mode: Mode,
        metadata: Option<ImageMetadata>,
        options: PerturbOptions,
    ) -> Result<Self> {
        let strategy: Strategy = match mode {
            Mode::Random => AuxiliaryChunk.into(),
            Mode::Pixel => PixelPerturbation { options }.into(),
            Mode::Metadata => match metadata.map(ImageMetadata::normalized) {
                Some(metadata) if !metadata.is_empty() => MetadataRewrite { metadata }.into(),
                _ => return Err(RehashError::MissingMetadata),
            },
        };
        debug!("selected {mode} strategy");

        Ok(strategy)
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::AuxiliaryChunk(_) => Mode::Random,
            Self::PixelPerturbation(_) => Mode::Pixel,
            Self::MetadataRewrite(_) => Mode::Metadata,
        }
    }
}

/// the caller facing name of a strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Random,
    Pixel,
    Metadata,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Random, Mode::Pixel, Mode::Metadata];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Random => "random",
            Mode::Pixel => "pixel",
            Mode::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown mode {s:?}, expected one of random, pixel, metadata"))
    }
}
