use thiserror::Error;

use crate::media::ContainerFormat;

#[derive(Error, Debug)]
pub enum RehashError {
    /// Represents a file whose extension or signature is neither PNG nor JPEG, for example a `.txt` file
    #[error("Image format is not supported")]
    UnsupportedFormat,

    /// Represents a buffer that does not carry the expected signature, or is too broken to find the required anchors
    #[error("Invalid {format} container: {reason}")]
    InvalidContainer {
        format: ContainerFormat,
        reason: String,
    },

    /// Represents a raster the image codec could not decode
    #[error("Image decoding error")]
    DecodeFailure(#[source] image::ImageError),

    /// Represents a raster the image codec could not encode
    #[error("Image encoding error")]
    EncodeFailure(#[source] image::ImageError),

    /// Represents a transform whose output has the same digest as its input
    #[error("Digest did not change, {digest} before and after")]
    NoOpFailure { digest: String },

    /// Represents a region payload that exceeds what the length field can express
    #[error("Region payload of {len} bytes exceeds the maximum of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    /// Represents a PNG text keyword that is empty, longer than 79 bytes or contains a NUL
    #[error("Invalid text chunk keyword: {0:?}")]
    InvalidKeyword(String),

    /// Represents a failure when serializing the metadata record of a JPEG comment
    #[error("Metadata serialization error")]
    Serialization(#[from] serde_json::Error),

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    #[error("API Error: Missing image")]
    MissingImage,

    #[error("API Error: Metadata mode requires at least one metadata field")]
    MissingMetadata,
}

impl RehashError {
    pub(crate) fn invalid_container(format: ContainerFormat, reason: impl Into<String>) -> Self {
        Self::InvalidContainer {
            format,
            reason: reason.into(),
        }
    }
}
