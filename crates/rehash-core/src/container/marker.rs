//! JPEG marker codes (ITU T.81 Table B.1) as far as segment walking needs them.

/// JPEG marker types, the byte that follows a `0xFF`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Marker {
    /// Start of Frame, parameter is the SOF type (0-15).
    SOF(u8),
    /// Define Huffman Table.
    DHT,
    /// Reserved for JPEG extensions.
    JPG,
    /// Define Arithmetic Coding conditioning.
    DAC,
    /// Restart marker (0-7).
    RST(u8),
    /// Start of Image.
    SOI,
    /// End of Image.
    EOI,
    /// Start of Scan, entropy coded data follows its header.
    SOS,
    /// Define Quantization Table.
    DQT,
    /// Define Number of Lines.
    DNL,
    /// Define Restart Interval.
    DRI,
    /// Define Hierarchical Progression.
    DHP,
    /// Expand Reference Component.
    EXP,
    /// Application segment (0-15).
    APP(u8),
    /// JPEG extension (0-13).
    JPGn(u8),
    /// Comment.
    COM,
    /// Temporary marker for arithmetic coding.
    TEM,
    /// Reserved range 0x02-0xBF, the raw byte is kept.
    RES(u8),
}

impl Marker {
    /// Markers that stand alone, without a 2-byte length field after them.
    pub fn has_length(self) -> bool {
        !matches!(self, Marker::RST(..) | Marker::SOI | Marker::EOI | Marker::TEM)
    }

    /// `None` for `0x00` (stuffed byte) and `0xFF` (fill byte), neither starts a segment.
    pub fn from_u8(n: u8) -> Option<Marker> {
        use Marker::*;
        let marker = match n {
            0x00 | 0xFF => return None,
            0x01 => TEM,
            0x02..=0xBF => RES(n),
            0xC4 => DHT,
            0xC8 => JPG,
            0xCC => DAC,
            0xC0..=0xCF => SOF(n - 0xC0),
            0xD0..=0xD7 => RST(n - 0xD0),
            0xD8 => SOI,
            0xD9 => EOI,
            0xDA => SOS,
            0xDB => DQT,
            0xDC => DNL,
            0xDD => DRI,
            0xDE => DHP,
            0xDF => EXP,
            0xE0..=0xEF => APP(n - 0xE0),
            0xF0..=0xFD => JPGn(n - 0xF0),
            0xFE => COM,
        };
        Some(marker)
    }

    pub fn to_u8(self) -> u8 {
        use Marker::*;
        match self {
            TEM => 0x01,
            RES(n) => n,
            SOF(n) => 0xC0 + n,
            DHT => 0xC4,
            JPG => 0xC8,
            DAC => 0xCC,
            RST(n) => 0xD0 + n,
            SOI => 0xD8,
            EOI => 0xD9,
            SOS => 0xDA,
            DQT => 0xDB,
            DNL => 0xDC,
            DRI => 0xDD,
            DHP => 0xDE,
            EXP => 0xDF,
            APP(n) => 0xE0 + n,
            JPGn(n) => 0xF0 + n,
            COM => 0xFE,
        }
    }
}
