use byteorder::{BigEndian, ByteOrder};
use log::{debug, warn};

use super::marker::Marker;
use super::{Region, RegionTag};
use crate::error::RehashError;
use crate::media::ContainerFormat;
use crate::result::Result;

/// Start of Image, the 2-byte JPEG header.
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// the length field is 16 bit and counts itself
pub const MAX_SEGMENT_PAYLOAD: usize = u16::MAX as usize - 2;

/// Walks the marker segments of a JPEG that follow the SOI marker.
///
/// `0xFF` fill bytes in front of a marker are skipped and stay part of the
/// raw bytes of the segment they precede. Walking ends at the first marker
/// without a length field, at the start of scan (SOS), at anything that is
/// not a marker, or at a segment whose declared length does not fit into the
/// buffer. The rest of the buffer is then yielded as one opaque region.
#[derive(Debug, Clone)]
pub struct JpegSegments<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> JpegSegments<'a> {
    /// expects `bytes` to start with [`SOI`]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: SOI.len().min(bytes.len()),
        }
    }

    fn opaque_tail(&mut self) -> Region<'a> {
        let bytes = self.bytes;
        let start = self.pos;
        self.pos = bytes.len();
        Region::opaque(start, &bytes[start..])
    }
}

impl<'a> Iterator for JpegSegments<'a> {
    type Item = Region<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.bytes;
        let rest = &bytes[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let fill = rest.iter().skip(1).take_while(|&&b| b == 0xFF).count();
        let marker = match rest {
            [0xFF, ..] => rest.get(1 + fill).and_then(|code| Marker::from_u8(*code)),
            _ => None,
        };
        let marker = match marker {
            Some(m) if m.has_length() && m != Marker::SOS => m,
            _ => return Some(self.opaque_tail()),
        };
        if fill > 0 {
            debug!("skipped {fill} fill bytes before {marker:?} at {}", self.pos);
        }

        // fill bytes plus the marker itself
        let header = 2 + fill;
        if rest.len() < header + 2 {
            warn!("JPEG marker {marker:?} at {} is cut off", self.pos);
            return Some(self.opaque_tail());
        }

        let declared = BigEndian::read_u16(&rest[header..header + 2]) as usize;
        if declared < 2 || header + declared > rest.len() {
            warn!(
                "JPEG segment {marker:?} at {} declares {declared} bytes, only {} left",
                self.pos,
                rest.len() - header
            );
            return Some(self.opaque_tail());
        }

        let raw = &rest[..header + declared];
        let region = Region {
            tag: RegionTag::Segment(marker),
            offset: self.pos,
            raw,
            payload: &raw[header + 2..],
            checksum: None,
        };
        self.pos += raw.len();

        Some(region)
    }
}

/// encodes a comment segment: `FF FE`, length including itself, payload
pub fn encode_comment(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_SEGMENT_PAYLOAD {
        return Err(RehashError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_SEGMENT_PAYLOAD,
        });
    }

    let mut segment = Vec::with_capacity(payload.len() + 4);
    segment.extend_from_slice(&[0xFF, Marker::COM.to_u8()]);
    let mut len = [0; 2];
    BigEndian::write_u16(&mut len, (payload.len() + 2) as u16);
    segment.extend_from_slice(&len);
    segment.extend_from_slice(payload);

    Ok(segment)
}

/// inserts a comment segment right after SOI
pub fn insert_comment(bytes: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    let segment = encode_comment(payload)?;
    super::insert_regions(bytes, ContainerFormat::Jpeg, &[segment])
}

/// drops every comment segment
pub fn remove_comments(bytes: &[u8]) -> Result<Vec<u8>> {
    super::remove_regions(bytes, ContainerFormat::Jpeg, |r| r.is_marker(Marker::COM))
}

/// the payload of the first comment segment, if there is one
pub fn first_comment(bytes: &[u8]) -> Result<Option<&[u8]>> {
    let comment = super::regions(bytes, ContainerFormat::Jpeg)?
        .find(|r| r.is_marker(Marker::COM))
        .map(|r| r.payload);
    debug!(
        "first JPEG comment: {:?} bytes",
        comment.map(<[u8]>::len)
    );

    Ok(comment)
}
