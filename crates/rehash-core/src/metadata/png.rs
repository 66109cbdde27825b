use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::{debug, warn};

use super::ImageMetadata;
use crate::container::png;
use crate::result::Result;

pub const AUTHOR: &str = "Author";
pub const COPYRIGHT: &str = "Copyright";
pub const DESCRIPTION: &str = "Description";
pub const CREATION_TIME: &str = "Creation Time";
pub const LOCATION: &str = "Location";
pub const CAMERA_MAKE: &str = "Camera Make";
pub const CAMERA_MODEL: &str = "Camera Model";
pub const SOFTWARE: &str = "Software";
pub const IMAGE_WIDTH: &str = "Image Width";
pub const IMAGE_HEIGHT: &str = "Image Height";

/// how the capture time is written
const CREATION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// EXIF style timestamps, accepted when reading
const LEGACY_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// keyword and text of every set field, in keyword table order
fn text_fields(metadata: &ImageMetadata) -> Vec<(&'static str, String)> {
    let m = metadata.clone().normalized();
    let mut fields = Vec::with_capacity(10);

    let mut push = |keyword, value: Option<String>| {
        if let Some(value) = value {
            fields.push((keyword, value));
        }
    };
    push(AUTHOR, m.artist);
    push(COPYRIGHT, m.copyright);
    push(DESCRIPTION, m.description);
    push(
        CREATION_TIME,
        m.date_time
            .map(|t| t.format(CREATION_TIME_FORMAT).to_string()),
    );
    push(LOCATION, m.location);
    push(CAMERA_MAKE, m.camera_make);
    push(CAMERA_MODEL, m.camera_model);
    push(SOFTWARE, m.software);
    push(IMAGE_WIDTH, m.image_width.map(|w| w.to_string()));
    push(IMAGE_HEIGHT, m.image_height.map(|h| h.to_string()));

    fields
}

/// Drops every textual chunk and inserts one `tEXt` chunk per set field in
/// front of `IEND`.
pub fn encode(bytes: &[u8], metadata: &ImageMetadata) -> Result<Vec<u8>> {
    let stripped = png::remove_text_chunks(bytes)?;
    let chunks = text_fields(metadata)
        .iter()
        .map(|(keyword, text)| png::encode_text_chunk(keyword, text))
        .collect::<Result<Vec<_>>>()?;
    debug!("writing {} PNG text chunk(s)", chunks.len());

    png::insert_chunks(&stripped, &chunks)
}

/// text is nominally Latin-1, but UTF-8 is what gets written in practice
fn decode_text(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_owned(),
        Err(_) => raw.iter().map(|&b| char::from(b)).collect(),
    }
}

/// ISO-8601 / RFC 3339 first, then the EXIF style `YYYY:MM:DD HH:MM:SS` read as UTC
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, LEGACY_TIME_FORMAT)
                .map(|t| Utc.from_utc_datetime(&t))
        })
        .ok()
}

fn parse_dimension(keyword: &str, text: &str) -> Option<Option<u32>> {
    match text.trim().parse::<u32>() {
        Ok(n) => Some(Some(n).filter(|n| *n != 0)),
        Err(_) if text.is_empty() => Some(None),
        Err(e) => {
            warn!("ignoring PNG text {keyword:?} = {text:?}: {e}");
            None
        }
    }
}

/// Collects the record from every `tEXt` chunk up to `IEND`. Keywords match
/// case-insensitively, later chunks overwrite earlier ones.
pub fn decode(bytes: &[u8]) -> Result<ImageMetadata> {
    let mut m = ImageMetadata::default();

    for (keyword, text) in png::text_entries(bytes)? {
        let keyword = decode_text(keyword).to_lowercase();
        let text = decode_text(text);
        let value = || Some(text.clone()).filter(|t| !t.is_empty());

        match keyword.as_str() {
            "author" | "artist" => m.artist = value(),
            "copyright" => m.copyright = value(),
            "description" => m.description = value(),
            "creation time" | "datetime" => match parse_timestamp(&text) {
                Some(t) => m.date_time = Some(t),
                None => warn!("ignoring unparsable PNG timestamp {text:?}"),
            },
            "location" => m.location = value(),
            "camera make" | "make" => m.camera_make = value(),
            "camera model" | "model" => m.camera_model = value(),
            "software" => m.software = value(),
            "image width" | "width" => {
                if let Some(w) = parse_dimension(&keyword, &text) {
                    m.image_width = w;
                }
            }
            "image height" | "height" => {
                if let Some(h) = parse_dimension(&keyword, &text) {
                    m.image_height = h;
                }
            }
            _ => debug!("skipping PNG text {keyword:?}"),
        }
    }

    Ok(m.normalized())
}
