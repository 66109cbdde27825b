use log::debug;

use super::ImageMetadata;
use crate::container::jpeg;
use crate::result::Result;

/// Drops every comment segment and stores the record as JSON in a single
/// new comment right after SOI.
pub fn encode(bytes: &[u8], metadata: &ImageMetadata) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(&metadata.clone().normalized())?;
    let stripped = jpeg::remove_comments(bytes)?;
    debug!("writing {} bytes of JPEG metadata", json.len());

    jpeg::insert_comment(&stripped, &json)
}

/// reads the record from the first comment segment, anything that is not a
/// JSON record reads as an unset record
pub fn decode(bytes: &[u8]) -> Result<ImageMetadata> {
    let Some(comment) = jpeg::first_comment(bytes)? else {
        return Ok(ImageMetadata::default());
    };

    Ok(serde_json::from_slice::<ImageMetadata>(comment)
        .map(ImageMetadata::normalized)
        .unwrap_or_else(|e| {
            debug!("JPEG comment is no metadata record: {e}");
            ImageMetadata::default()
        }))
}
