//! The hash guard: run exactly one strategy and insist that the digest changed.

use log::{debug, info};
use rand::thread_rng;

use crate::digest::Digest;
use crate::error::RehashError;
use crate::media::{ContainerFormat, PerturbOptions};
use crate::metadata::ImageMetadata;
use crate::result::Result;
use crate::strategy::{
    AuxiliaryChunk, MetadataRewrite, PixelPerturbation, SecureRng, Strategy, Transform,
};

/// A transformed buffer together with the digests before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub bytes: Vec<u8>,
    pub original: Digest,
    pub modified: Digest,
}

/// Applies `strategy` to `bytes` and rejects a result whose digest equals the
/// digest of the input with [`RehashError::NoOpFailure`].
pub fn modify(
    bytes: &[u8],
    format: ContainerFormat,
    strategy: &Strategy,
    rng: &mut dyn SecureRng,
) -> Result<Modification> {
    let original = Digest::of(bytes);
    debug!("{format} input of {} bytes, digest {original}", bytes.len());

    let out = strategy.apply(bytes, format, rng)?;
    let modified = Digest::of(&out);
    if modified == original {
        return Err(RehashError::NoOpFailure {
            digest: original.to_hex(),
        });
    }
    info!(
        "{} mode changed digest {original} -> {modified}",
        strategy.mode()
    );

    Ok(Modification {
        bytes: out,
        original,
        modified,
    })
}

pub fn modify_by_auxiliary_chunk(bytes: &[u8], format: ContainerFormat) -> Result<Modification> {
    modify(bytes, format, &AuxiliaryChunk.into(), &mut thread_rng())
}

pub fn modify_by_pixel_perturbation(
    bytes: &[u8],
    format: ContainerFormat,
    options: &PerturbOptions,
) -> Result<Modification> {
    let strategy = PixelPerturbation {
        options: options.clone(),
    };
    modify(bytes, format, &strategy.into(), &mut thread_rng())
}

pub fn modify_by_metadata(
    bytes: &[u8],
    format: ContainerFormat,
    metadata: &ImageMetadata,
) -> Result<Modification> {
    let strategy = MetadataRewrite {
        metadata: metadata.clone(),
    };
    modify(bytes, format, &strategy.into(), &mut thread_rng())
}
