//! Splicing regions into and out of a container.
//!
//! Both operations build a new buffer; untouched regions are copied verbatim
//! and in their original order. The container header, the PNG `IEND` chunk
//! and opaque tails are never removed.

use log::debug;

use super::{header_len, png::ChunkType, regions, Region};
use crate::media::ContainerFormat;
use crate::result::Result;

/// offset at which new regions go: after SOI for JPEG, before IEND for PNG
/// (or at the very end of a PNG that lacks IEND)
pub fn anchor(bytes: &[u8], format: ContainerFormat) -> Result<usize> {
    let mut walk = regions(bytes, format)?;

    Ok(match format {
        ContainerFormat::Jpeg => header_len(format),
        ContainerFormat::Png => walk
            .find(|r| r.is_chunk(ChunkType::IEND))
            .map(|iend| iend.offset)
            .unwrap_or(bytes.len()),
    })
}

/// inserts the already encoded `encoded` regions at the format's anchor
pub fn insert_regions(
    bytes: &[u8],
    format: ContainerFormat,
    encoded: &[Vec<u8>],
) -> Result<Vec<u8>> {
    let at = anchor(bytes, format)?;
    let inserted: usize = encoded.iter().map(Vec::len).sum();
    debug!(
        "inserting {} {format} region(s), {inserted} bytes at offset {at}",
        encoded.len()
    );

    let mut out = Vec::with_capacity(bytes.len() + inserted);
    out.extend_from_slice(&bytes[..at]);
    for region in encoded {
        out.extend_from_slice(region);
    }
    out.extend_from_slice(&bytes[at..]);

    Ok(out)
}

/// drops every region matching `predicate`
pub fn remove_regions<P>(bytes: &[u8], format: ContainerFormat, predicate: P) -> Result<Vec<u8>>
where
    P: Fn(&Region) -> bool,
{
    let walk = regions(bytes, format)?;
    let mut out = Vec::with_capacity(bytes.len());
    out.extend_from_slice(&bytes[..header_len(format)]);

    let mut removed = 0;
    for region in walk {
        if is_protected(&region) || !predicate(&region) {
            out.extend_from_slice(region.raw);
        } else {
            removed += 1;
        }
    }
    debug!("removed {removed} {format} region(s)");

    Ok(out)
}

fn is_protected(region: &Region) -> bool {
    region.is_opaque() || region.is_chunk(ChunkType::IEND)
}
