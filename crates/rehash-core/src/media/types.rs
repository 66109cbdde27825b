use std::fmt;
use std::path::Path;

use image::ImageFormat;

use crate::container::{jpeg, png};
use crate::error::RehashError;
use crate::result::Result;

/// the two container formats whose digest can be changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Jpeg,
    Png,
}

impl ContainerFormat {
    /// maps a file extension (without the dot, any case) to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// dispatches by file extension, which is what the file-level commands rely on
    pub fn from_path(f: &Path) -> Result<Self> {
        f.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or(RehashError::UnsupportedFormat)
    }

    /// detects the format from the leading bytes of a buffer
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        [Self::Png, Self::Jpeg]
            .into_iter()
            .find(|format| format.has_signature(bytes))
    }

    pub fn has_signature(self, bytes: &[u8]) -> bool {
        match self {
            Self::Jpeg => bytes.starts_with(&jpeg::SOI),
            Self::Png => bytes.starts_with(&png::SIGNATURE),
        }
    }

    /// fails with `InvalidContainer` when the buffer does not start with this format's signature
    pub fn ensure_signature(self, bytes: &[u8]) -> Result<()> {
        if self.has_signature(bytes) {
            Ok(())
        } else {
            Err(RehashError::invalid_container(self, "signature mismatch"))
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => f.write_str("JPEG"),
            Self::Png => f.write_str("PNG"),
        }
    }
}
