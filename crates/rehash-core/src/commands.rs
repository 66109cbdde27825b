use std::fs;
use std::io::Write;
use std::path::Path;

use image::{ColorType, GenericImageView};
use log::debug;
use rand::thread_rng;
use tempfile::NamedTempFile;

use crate::digest::Digest;
use crate::error::RehashError;
use crate::guard::{self, Modification};
use crate::media::image::perturb;
use crate::media::ContainerFormat;
use crate::metadata::{self, ImageMetadata};
use crate::result::Result;
use crate::strategy::Strategy;

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| RehashError::ReadError { source })
}

/// Writes `bytes` to a temporary file next to `target` and renames it over
/// `target`, so a failure never leaves a half written image behind. An
/// existing target keeps its permissions.
pub fn write_atomically(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| RehashError::WriteError { source })?;
    tmp.write_all(bytes)
        .map_err(|source| RehashError::WriteError { source })?;
    if let Ok(existing) = fs::metadata(target) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|source| RehashError::WriteError { source })?;
    }
    tmp.persist(target)
        .map_err(|e| RehashError::WriteError { source: e.error })?;
    debug!("wrote {} bytes to {}", bytes.len(), target.display());

    Ok(())
}

/// digest of a JPEG or PNG file
pub fn digest_file(path: &Path) -> Result<Digest> {
    ContainerFormat::from_path(path)?;
    Ok(Digest::of(&read_file(path)?))
}

/// Modifies the image at `path` in place.
pub fn modify_file(path: &Path, strategy: &Strategy) -> Result<Modification> {
    modify_file_to(path, path, strategy)
}

/// Modifies the image at `input` and writes the result to `output`. The
/// format is picked by the extension of `input`.
pub fn modify_file_to(input: &Path, output: &Path, strategy: &Strategy) -> Result<Modification> {
    let format = ContainerFormat::from_path(input)?;
    let bytes = read_file(input)?;
    let modification = guard::modify(&bytes, format, strategy, &mut thread_rng())?;
    write_atomically(output, &modification.bytes)?;

    Ok(modification)
}

pub fn read_metadata(path: &Path) -> Result<ImageMetadata> {
    let format = ContainerFormat::from_path(path)?;
    metadata::read(&read_file(path)?, format)
}

/// What [`inspect`] found out about an image file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReport {
    pub format: ContainerFormat,
    pub width: u32,
    pub height: u32,
    pub color_type: ColorType,
    /// file size in bytes
    pub size: u64,
    pub digest: Digest,
    pub metadata: ImageMetadata,
    /// RGBA value of the top left pixel
    pub top_left: [u8; 4],
}

/// Decodes the image at `path` and reports its dimensions, digest and metadata.
pub fn inspect(path: &Path) -> Result<ImageReport> {
    let format = ContainerFormat::from_path(path)?;
    let bytes = read_file(path)?;
    let img = perturb::decode(&bytes, format)?;
    let top_left = if img.width() > 0 && img.height() > 0 {
        img.get_pixel(0, 0).0
    } else {
        [0; 4]
    };

    Ok(ImageReport {
        format,
        width: img.width(),
        height: img.height(),
        color_type: img.color(),
        size: bytes.len() as u64,
        digest: Digest::of(&bytes),
        metadata: metadata::read(&bytes, format)?,
        top_left,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{AuxiliaryChunk, Mode};
    use crate::test_utils::{encode_png, prepare_checkerboard_rgba, prepare_jpeg};
    use crate::PerturbOptions;
    use tempfile::TempDir;

    #[test]
    fn should_modify_a_png_file_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.png");
        fs::write(&path, encode_png(&prepare_checkerboard_rgba(10, 10))).unwrap();
        let before = digest_file(&path).unwrap();

        let modification = modify_file(&path, &AuxiliaryChunk.into()).unwrap();

        assert_eq!(modification.original, before);
        assert_eq!(digest_file(&path).unwrap(), modification.modified);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1, "no temp file left");
    }

    #[test]
    fn should_write_to_a_separate_output_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("photo.JPEG");
        let output = dir.path().join("photo-rehashed.jpg");
        let jpeg = prepare_jpeg(16, 8);
        fs::write(&input, &jpeg).unwrap();

        let strategy =
            Strategy::from_mode(Mode::Pixel, None, PerturbOptions::default()).unwrap();
        let modification = modify_file_to(&input, &output, &strategy).unwrap();

        assert_eq!(fs::read(&input).unwrap(), jpeg);
        assert_eq!(fs::read(&output).unwrap(), modification.bytes);
    }

    #[test]
    fn should_reject_text_files_everywhere() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        let results = [
            digest_file(&path).map(|_| ()),
            modify_file(&path, &Strategy::default()).map(|_| ()),
            read_metadata(&path).map(|_| ()),
            inspect(&path).map(|_| ()),
        ];
        for result in results {
            assert!(matches!(result, Err(RehashError::UnsupportedFormat)));
        }
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn should_fail_with_read_error_for_missing_files() {
        match read_metadata(Path::new("/does/not/exist.png")) {
            Err(RehashError::ReadError { .. }) => (),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn should_inspect_an_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.png");
        let png = encode_png(&prepare_checkerboard_rgba(7, 3));
        fs::write(&path, &png).unwrap();

        let report = inspect(&path).unwrap();
        assert_eq!(report.format, ContainerFormat::Png);
        assert_eq!((report.width, report.height), (7, 3));
        assert_eq!(report.color_type, ColorType::Rgba8);
        assert_eq!(report.size, png.len() as u64);
        assert_eq!(report.digest, Digest::of(&png));
        assert_eq!(report.metadata, ImageMetadata::default());
        assert_eq!(
            report.top_left,
            prepare_checkerboard_rgba(7, 3).get_pixel(0, 0).0
        );
    }

    #[test]
    fn should_report_the_top_left_pixel_of_a_grey_png_as_rgba() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grey.png");
        let mut grey = image::GrayImage::from_pixel(5, 5, image::Luma([200]));
        grey.put_pixel(0, 0, image::Luma([77]));
        image::DynamicImage::ImageLuma8(grey).save(&path).unwrap();

        let report = inspect(&path).unwrap();
        assert_eq!(report.color_type, ColorType::L8);
        assert_eq!(report.top_left, [77, 77, 77, 255]);
    }
}
