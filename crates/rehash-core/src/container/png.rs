use std::fmt::{self, Debug, Display, Write};

use byteorder::{BigEndian, ByteOrder};
use log::warn;

use super::{Region, RegionTag};
use crate::error::RehashError;
use crate::media::ContainerFormat;
use crate::result::Result;

/// The fixed 8-byte PNG signature.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// length + type in front of the payload, crc behind it
const CHUNK_OVERHEAD: usize = 12;

/// 4 ASCII bytes naming a chunk
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);

#[allow(non_upper_case_globals)]
impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    pub const tEXt: Self = Self(*b"tEXt");
    pub const zTXt: Self = Self(*b"zTXt");
    pub const iTXt: Self = Self(*b"iTXt");

    /// one of the three standard textual chunk kinds
    pub fn is_textual(self) -> bool {
        matches!(self, Self::tEXt | Self::zTXt | Self::iTXt)
    }
}

impl Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            f.write_char(b as char)?;
        }
        Ok(())
    }
}

/// Walks the chunks of a PNG that follow the signature.
///
/// Walking ends after `IEND` or at the end of the buffer. A chunk whose
/// declared length runs past the end of the buffer, as well as anything
/// behind `IEND`, is yielded as one opaque region.
#[derive(Debug, Clone)]
pub struct PngChunks<'a> {
    bytes: &'a [u8],
    pos: usize,
    seen_iend: bool,
}

impl<'a> PngChunks<'a> {
    /// expects `bytes` to start with [`SIGNATURE`]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: SIGNATURE.len().min(bytes.len()),
            seen_iend: false,
        }
    }

    fn opaque_tail(&mut self) -> Region<'a> {
        let bytes = self.bytes;
        let start = self.pos;
        self.pos = bytes.len();
        Region::opaque(start, &bytes[start..])
    }
}

impl<'a> Iterator for PngChunks<'a> {
    type Item = Region<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.bytes;
        let rest = &bytes[self.pos..];
        if rest.is_empty() {
            return None;
        }
        if self.seen_iend {
            warn!("{} bytes trailing behind IEND", rest.len());
            return Some(self.opaque_tail());
        }
        if rest.len() < CHUNK_OVERHEAD {
            warn!("PNG chunk at {} is cut off", self.pos);
            return Some(self.opaque_tail());
        }

        let declared = BigEndian::read_u32(&rest[..4]) as usize;
        let chunk_type = ChunkType([rest[4], rest[5], rest[6], rest[7]]);
        let total = match declared.checked_add(CHUNK_OVERHEAD) {
            Some(total) if total <= rest.len() => total,
            _ => {
                warn!(
                    "PNG chunk {chunk_type} at {} declares {declared} bytes, only {} left",
                    self.pos,
                    rest.len() - CHUNK_OVERHEAD
                );
                return Some(self.opaque_tail());
            }
        };

        let raw = &rest[..total];
        let region = Region {
            tag: RegionTag::Chunk(chunk_type),
            offset: self.pos,
            raw,
            payload: &raw[8..total - 4],
            checksum: Some(BigEndian::read_u32(&raw[total - 4..])),
        };
        self.pos += total;
        self.seen_iend = chunk_type == ChunkType::IEND;

        Some(region)
    }
}

/// CRC32 (IEEE) over chunk type and payload
pub fn chunk_crc(chunk_type: ChunkType, payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&chunk_type.0);
    hasher.update(payload);
    hasher.finalize()
}

/// encodes a complete chunk: length, type, payload, crc
pub fn encode_chunk(chunk_type: ChunkType, payload: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(payload.len()).map_err(|_| RehashError::PayloadTooLarge {
        len: payload.len(),
        max: u32::MAX as usize,
    })?;

    let mut chunk = vec![0; CHUNK_OVERHEAD + payload.len()];
    BigEndian::write_u32(&mut chunk[..4], len);
    chunk[4..8].copy_from_slice(&chunk_type.0);
    chunk[8..8 + payload.len()].copy_from_slice(payload);
    BigEndian::write_u32(&mut chunk[8 + payload.len()..], chunk_crc(chunk_type, payload));

    Ok(chunk)
}

/// encodes a tEXt chunk, `keyword NUL text`
pub fn encode_text_chunk(keyword: &str, text: &str) -> Result<Vec<u8>> {
    if keyword.is_empty() || keyword.len() > 79 || keyword.contains('\0') {
        return Err(RehashError::InvalidKeyword(keyword.to_owned()));
    }

    let mut payload = Vec::with_capacity(keyword.len() + 1 + text.len());
    payload.extend_from_slice(keyword.as_bytes());
    payload.push(0);
    payload.extend_from_slice(text.as_bytes());

    encode_chunk(ChunkType::tEXt, &payload)
}

/// splits a tEXt payload at the first NUL into keyword and text
pub fn split_text_payload(payload: &[u8]) -> Option<(&[u8], &[u8])> {
    let nul = payload.iter().position(|&b| b == 0)?;
    Some((&payload[..nul], &payload[nul + 1..]))
}

/// keyword and text of every tEXt chunk up to IEND
pub fn text_entries(bytes: &[u8]) -> Result<impl Iterator<Item = (&[u8], &[u8])>> {
    Ok(super::regions(bytes, ContainerFormat::Png)?
        .filter(|r| r.is_chunk(ChunkType::tEXt))
        .filter_map(|r| split_text_payload(r.payload)))
}

/// inserts already encoded chunks right before IEND
pub fn insert_chunks(bytes: &[u8], chunks: &[Vec<u8>]) -> Result<Vec<u8>> {
    super::insert_regions(bytes, ContainerFormat::Png, chunks)
}

/// drops every tEXt, zTXt and iTXt chunk, whatever its keyword
pub fn remove_text_chunks(bytes: &[u8]) -> Result<Vec<u8>> {
    super::remove_regions(bytes, ContainerFormat::Png, |r| match r.tag {
        RegionTag::Chunk(chunk_type) => chunk_type.is_textual(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{encode_png, prepare_checkerboard_rgba};

    fn prepare_png() -> Vec<u8> {
        encode_png(&prepare_checkerboard_rgba(10, 10))
    }

    #[test]
    fn should_compute_the_well_known_iend_chunk() {
        assert_eq!(
            encode_chunk(ChunkType::IEND, &[]).unwrap(),
            vec![0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn should_encode_a_text_chunk() {
        let chunk = encode_text_chunk("Author", "Jane").unwrap();

        assert_eq!(&chunk[..4], &[0, 0, 0, 11]);
        assert_eq!(&chunk[4..8], b"tEXt");
        assert_eq!(&chunk[8..19], b"Author\0Jane");
        let crc = BigEndian::read_u32(&chunk[19..]);
        assert_eq!(crc, chunk_crc(ChunkType::tEXt, b"Author\0Jane"));
    }

    #[test]
    fn should_reject_invalid_keywords() {
        let long = "k".repeat(80);
        for keyword in ["", "a\0b", long.as_str()] {
            match encode_text_chunk(keyword, "text") {
                Err(RehashError::InvalidKeyword(_)) => (),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(encode_text_chunk(&"k".repeat(79), "text").is_ok());
    }

    #[test]
    fn should_stop_after_iend_and_keep_trailing_bytes_opaque() {
        let mut png = prepare_png();
        let iend_offset = png.len() - 12;
        png.extend_from_slice(b"trailing");
        let regions: Vec<_> = PngChunks::new(&png).collect();

        let last = regions.last().unwrap();
        assert!(last.is_opaque());
        assert_eq!(last.raw, b"trailing");
        let iend = &regions[regions.len() - 2];
        assert!(iend.is_chunk(ChunkType::IEND));
        assert_eq!(iend.offset, iend_offset);
    }

    #[test]
    fn should_turn_a_truncated_chunk_into_an_opaque_tail() {
        let png = prepare_png();
        let truncated = &png[..png.len() - 20];
        let regions: Vec<_> = PngChunks::new(truncated).collect();

        let last = regions.last().unwrap();
        assert!(last.is_opaque());
        assert_eq!(last.end(), truncated.len());
        assert!(regions.iter().all(|r| !r.is_chunk(ChunkType::IEND)));
    }

    #[test]
    fn should_insert_chunks_right_before_iend() {
        let png = prepare_png();
        let chunk = encode_text_chunk("Random", "abc").unwrap();
        let out = insert_chunks(&png, &[chunk.clone()]).unwrap();

        let iend_offset = png.len() - 12;
        assert_eq!(out.len(), png.len() + chunk.len());
        assert_eq!(&out[..iend_offset], &png[..iend_offset]);
        assert_eq!(&out[iend_offset..iend_offset + chunk.len()], &chunk[..]);
        assert_eq!(&out[iend_offset + chunk.len()..], &png[iend_offset..]);
    }

    #[test]
    fn should_append_at_the_end_when_iend_is_missing() {
        let png = prepare_png();
        let without_iend = &png[..png.len() - 12];
        let chunk = encode_text_chunk("Random", "abc").unwrap();
        let out = insert_chunks(without_iend, &[chunk.clone()]).unwrap();

        assert_eq!(&out[..without_iend.len()], without_iend);
        assert_eq!(&out[without_iend.len()..], &chunk[..]);
    }

    #[test]
    fn should_remove_every_textual_chunk() {
        let png = prepare_png();
        let ztxt = encode_chunk(ChunkType::zTXt, b"Comment\0\0x").unwrap();
        let itxt = encode_chunk(ChunkType::iTXt, b"Title\0\0\0\0\0y").unwrap();
        let text = encode_text_chunk("Description", "kept elsewhere").unwrap();
        let decorated = insert_chunks(&png, &[ztxt, itxt, text]).unwrap();

        assert_eq!(remove_text_chunks(&decorated).unwrap(), png);
        assert_eq!(text_entries(&decorated).unwrap().count(), 1);
    }

    #[test]
    fn should_list_text_entries() {
        let png = prepare_png();
        let chunks = [
            encode_text_chunk("Author", "A").unwrap(),
            encode_text_chunk("Software", "B").unwrap(),
        ];
        let out = insert_chunks(&png, &chunks).unwrap();
        let entries: Vec<_> = text_entries(&out).unwrap().collect();

        assert_eq!(
            entries,
            vec![(&b"Author"[..], &b"A"[..]), (&b"Software"[..], &b"B"[..])]
        );
    }

    #[test]
    fn should_display_chunk_types() {
        assert_eq!(ChunkType::tEXt.to_string(), "tEXt");
        assert_eq!(format!("{:?}", ChunkType::IEND), "IEND");
    }
}
