//! Byte level view on the two supported containers.
//!
//! A container is walked as a fixed header (the JPEG SOI marker, the PNG signature)
//! followed by typed, length-delimited regions:
//! - JPEG marker segments, up to the start of the entropy coded scan data
//! - PNG chunks, up to and including `IEND`
//!
//! Whatever cannot be decomposed (scan data, trailing garbage, a region whose
//! declared length runs past the end of the buffer) is yielded as one
//! [`RegionTag::Opaque`] region so that rewriting a container never drops bytes.

pub mod edit;
pub mod jpeg;
pub mod marker;
pub mod png;

pub use edit::{insert_regions, remove_regions};
pub use jpeg::JpegSegments;
pub use marker::Marker;
pub use png::{ChunkType, PngChunks};

use crate::media::ContainerFormat;
use crate::result::Result;

/// what kind of region a [`Region`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionTag {
    /// JPEG marker segment with a length field
    Segment(Marker),
    /// PNG chunk
    Chunk(ChunkType),
    /// bytes that are copied through verbatim without interpretation
    Opaque,
}

/// One region of a container, borrowed from the buffer it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    pub tag: RegionTag,
    /// byte offset of the region start in the whole buffer
    pub offset: usize,
    /// the region as encoded, including marker/length/type/crc
    pub raw: &'a [u8],
    pub payload: &'a [u8],
    /// the stored CRC of a PNG chunk
    pub checksum: Option<u32>,
}

impl<'a> Region<'a> {
    pub(crate) fn opaque(offset: usize, raw: &'a [u8]) -> Self {
        Self {
            tag: RegionTag::Opaque,
            offset,
            raw,
            payload: raw,
            checksum: None,
        }
    }

    /// offset of the first byte after this region
    pub fn end(&self) -> usize {
        self.offset + self.raw.len()
    }

    /// the value stored in the length field, JPEG lengths count the length field itself.
    /// `None` for opaque regions, they carry no length field.
    pub fn declared_length(&self) -> Option<usize> {
        match self.tag {
            RegionTag::Segment(_) => Some(self.payload.len() + 2),
            RegionTag::Chunk(_) => Some(self.payload.len()),
            RegionTag::Opaque => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.tag == RegionTag::Opaque
    }

    pub fn is_marker(&self, marker: Marker) -> bool {
        self.tag == RegionTag::Segment(marker)
    }

    pub fn is_chunk(&self, chunk_type: ChunkType) -> bool {
        self.tag == RegionTag::Chunk(chunk_type)
    }

    /// true unless this is a PNG chunk whose stored CRC does not match its type and payload
    pub fn checksum_valid(&self) -> bool {
        match (self.tag, self.checksum) {
            (RegionTag::Chunk(chunk_type), Some(stored)) => {
                png::chunk_crc(chunk_type, self.payload) == stored
            }
            _ => true,
        }
    }
}

/// lazy, forward only walk over the regions of either format
#[derive(Debug, Clone)]
pub enum Regions<'a> {
    Jpeg(JpegSegments<'a>),
    Png(PngChunks<'a>),
}

impl<'a> Iterator for Regions<'a> {
    type Item = Region<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Regions::Jpeg(segments) => segments.next(),
            Regions::Png(chunks) => chunks.next(),
        }
    }
}

/// starts walking `bytes`, after verifying the signature of `format`
pub fn regions(bytes: &[u8], format: ContainerFormat) -> Result<Regions<'_>> {
    format.ensure_signature(bytes)?;

    Ok(match format {
        ContainerFormat::Jpeg => Regions::Jpeg(JpegSegments::new(bytes)),
        ContainerFormat::Png => Regions::Png(PngChunks::new(bytes)),
    })
}

/// length of the fixed header that precedes the first region
pub fn header_len(format: ContainerFormat) -> usize {
    match format {
        ContainerFormat::Jpeg => jpeg::SOI.len(),
        ContainerFormat::Png => png::SIGNATURE.len(),
    }
}

/// A fully walked container, header plus every region in order.
#[derive(Debug, Clone)]
pub struct RegionSequence<'a> {
    pub format: ContainerFormat,
    pub header: &'a [u8],
    pub regions: Vec<Region<'a>>,
}

impl<'a> RegionSequence<'a> {
    pub fn parse(bytes: &'a [u8], format: ContainerFormat) -> Result<Self> {
        let regions = regions(bytes, format)?.collect();

        Ok(Self {
            format,
            header: &bytes[..header_len(format)],
            regions,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region<'a>> {
        self.regions.iter()
    }

    /// the trailing region that could not be decomposed, if any
    pub fn opaque_tail(&self) -> Option<&Region<'a>> {
        self.regions.last().filter(|r| r.is_opaque())
    }

    /// reassembles the buffer, which is byte identical to the parsed one
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.header.len() + self.regions.iter().map(|r| r.raw.len()).sum::<usize>();
        let mut out = Vec::with_capacity(len);
        out.extend_from_slice(self.header);
        for region in &self.regions {
            out.extend_from_slice(region.raw);
        }
        out
    }
}
