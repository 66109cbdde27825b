//! The metadata record and its two container encodings.
//!
//! PNG stores one `tEXt` chunk per field, JPEG stores the whole record as JSON
//! in a single comment segment. Both encoders first drop the existing textual
//! regions, so writing a record replaces the whole textual surface.

pub mod jpeg;
pub mod png;

pub use png::parse_timestamp;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::media::ContainerFormat;
use crate::result::Result;

/// Descriptive fields of an image, `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ImageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// capture time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
    /// recorded width, not necessarily the raster width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn non_zero(n: Option<u32>) -> Option<u32> {
    n.filter(|n| *n != 0)
}

impl ImageMetadata {
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date_time(mut self, date_time: DateTime<Utc>) -> Self {
        self.date_time = Some(date_time);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_camera_make(mut self, make: impl Into<String>) -> Self {
        self.camera_make = Some(make.into());
        self
    }

    pub fn with_camera_model(mut self, model: impl Into<String>) -> Self {
        self.camera_model = Some(model.into());
        self
    }

    pub fn with_software(mut self, software: impl Into<String>) -> Self {
        self.software = Some(software.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.image_width = Some(width);
        self.image_height = Some(height);
        self
    }

    /// Empty strings and zero dimensions become unset, the capture time is cut
    /// to whole seconds.
    pub fn normalized(self) -> Self {
        Self {
            artist: non_empty(self.artist),
            copyright: non_empty(self.copyright),
            description: non_empty(self.description),
            date_time: self
                .date_time
                .map(|t| t.with_nanosecond(0).unwrap_or(t)),
            location: non_empty(self.location),
            camera_make: non_empty(self.camera_make),
            camera_model: non_empty(self.camera_model),
            software: non_empty(self.software),
            image_width: non_zero(self.image_width),
            image_height: non_zero(self.image_height),
        }
    }

    /// true if no field is set, after normalization
    pub fn is_empty(&self) -> bool {
        self.clone().normalized() == Self::default()
    }
}

/// reads the metadata record stored in `bytes`
pub fn read(bytes: &[u8], format: ContainerFormat) -> Result<ImageMetadata> {
    match format {
        ContainerFormat::Jpeg => jpeg::decode(bytes),
        ContainerFormat::Png => png::decode(bytes),
    }
}

/// replaces the textual regions of `bytes` with `metadata`
pub fn write(bytes: &[u8], format: ContainerFormat, metadata: &ImageMetadata) -> Result<Vec<u8>> {
    match format {
        ContainerFormat::Jpeg => jpeg::encode(bytes, metadata),
        ContainerFormat::Png => png::encode(bytes, metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_treat_empty_strings_and_zeros_as_unset() {
        let metadata = ImageMetadata {
            artist: Some(String::new()),
            image_width: Some(0),
            ..Default::default()
        };

        assert!(metadata.is_empty());
        assert_eq!(metadata.normalized(), ImageMetadata::default());
    }

    #[test]
    fn should_cut_the_capture_time_to_seconds() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        let metadata = ImageMetadata::default()
            .with_date_time(t.with_nanosecond(123_456_789).unwrap())
            .normalized();

        assert_eq!(metadata.date_time, Some(t));
    }

    #[test]
    fn should_serialize_with_pascal_case_names() {
        let t = Utc.with_ymd_and_hms(2023, 12, 24, 18, 0, 0).unwrap();
        let metadata = ImageMetadata::default()
            .with_camera_make("Canon")
            .with_date_time(t)
            .with_dimensions(640, 480);
        let json = serde_json::to_string(&metadata).unwrap();

        assert_eq!(
            json,
            r#"{"DateTime":"2023-12-24T18:00:00Z","CameraMake":"Canon","ImageWidth":640,"ImageHeight":480}"#
        );
    }

    #[test]
    fn should_deserialize_records_with_every_field_present() {
        let json = r#"{"Artist":"Ann","Copyright":"","Description":"","DateTime":null,
            "Location":"","CameraMake":"","CameraModel":"X100","Software":"",
            "ImageWidth":0,"ImageHeight":0}"#;
        let metadata: ImageMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(
            metadata.normalized(),
            ImageMetadata::default()
                .with_artist("Ann")
                .with_camera_model("X100")
        );
    }
}
