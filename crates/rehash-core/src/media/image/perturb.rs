use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Pixel};
use log::{debug, error};
use rand::Rng;

use super::border::{BorderPixels, PixelCoordinate};
use crate::error::RehashError;
use crate::media::{ContainerFormat, PerturbOptions};
use crate::result::Result;
use crate::SecureRng;

/// the outcome of [`perturb`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Perturbed {
    /// the re-encoded image
    pub bytes: Vec<u8>,
    pub coordinate: PixelCoordinate,
    /// the delta that was added to each color channel, before clamping
    pub delta: i32,
}

/// a color channel that can be nudged and clamped to its range
trait Channel: Copy + PartialEq {
    fn nudged(self, delta: i32) -> Self;
}

impl Channel for u8 {
    fn nudged(self, delta: i32) -> Self {
        (i32::from(self) + delta).clamp(0, i32::from(u8::MAX)) as u8
    }
}

impl Channel for u16 {
    fn nudged(self, delta: i32) -> Self {
        (i32::from(self) + delta).clamp(0, i32::from(u16::MAX)) as u16
    }
}

/// Adds `delta` to the first `color_channels` channels, alpha stays as is.
///
/// Should clamping swallow the change on every color channel (white pixel,
/// positive delta) the delta is applied with the opposite sign instead.
/// Returns the delta that was applied.
fn nudge<T: Channel>(channels: &mut [T], color_channels: usize, delta: i32) -> i32 {
    let colors = &mut channels[..color_channels];
    let changes = |d: i32| colors.iter().any(|c| c.nudged(d) != *c);
    let delta = if changes(delta) { delta } else { -delta };

    for c in colors.iter_mut() {
        *c = c.nudged(delta);
    }
    delta
}

fn nudge_pixel<P>(
    buffer: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    at: PixelCoordinate,
    color_channels: usize,
    delta: i32,
) -> i32
where
    P: Pixel,
    P::Subpixel: Channel,
{
    nudge(
        buffer.get_pixel_mut(at.x, at.y).channels_mut(),
        color_channels,
        delta,
    )
}

fn apply(img: &mut DynamicImage, at: PixelCoordinate, delta: i32) -> i32 {
    match img {
        DynamicImage::ImageLuma8(b) => nudge_pixel(b, at, 1, delta),
        DynamicImage::ImageLumaA8(b) => nudge_pixel(b, at, 1, delta),
        DynamicImage::ImageRgb8(b) => nudge_pixel(b, at, 3, delta),
        DynamicImage::ImageRgba8(b) => nudge_pixel(b, at, 3, delta),
        DynamicImage::ImageLuma16(b) => nudge_pixel(b, at, 1, delta),
        DynamicImage::ImageLumaA16(b) => nudge_pixel(b, at, 1, delta),
        DynamicImage::ImageRgb16(b) => nudge_pixel(b, at, 3, delta),
        DynamicImage::ImageRgba16(b) => nudge_pixel(b, at, 3, delta),
        other => {
            // float rasters do not come out of the PNG or JPEG decoders
            let mut rgba = other.to_rgba8();
            let applied = nudge_pixel(&mut rgba, at, 3, delta);
            *other = DynamicImage::ImageRgba8(rgba);
            applied
        }
    }
}

pub fn decode(bytes: &[u8], format: ContainerFormat) -> Result<DynamicImage> {
    format.ensure_signature(bytes)?;
    image::load_from_memory_with_format(bytes, format.image_format()).map_err(|e| {
        error!("Error decoding {format} image: {e}");
        RehashError::DecodeFailure(e)
    })
}

pub fn encode(
    img: &DynamicImage,
    format: ContainerFormat,
    options: &PerturbOptions,
    size_hint: usize,
) -> Result<Vec<u8>> {
    let output_format = match format {
        ContainerFormat::Jpeg => ImageOutputFormat::Jpeg(options.effective_jpeg_quality()),
        ContainerFormat::Png => ImageOutputFormat::Png,
    };
    let mut out = Cursor::new(Vec::with_capacity(size_hint));
    img.write_to(&mut out, output_format).map_err(|e| {
        error!("Error encoding {format} image: {e}");
        RehashError::EncodeFailure(e)
    })?;

    Ok(out.into_inner())
}

/// Decodes the raster, shifts the color channels of one random border pixel by
/// a small non-zero delta and re-encodes it in the same format.
pub fn perturb(
    bytes: &[u8],
    format: ContainerFormat,
    options: &PerturbOptions,
    rng: &mut dyn SecureRng,
) -> Result<Perturbed> {
    let mut img = decode(bytes, format)?;
    let border = BorderPixels::new(img.width(), img.height());
    if border.is_empty() {
        return Err(RehashError::invalid_container(
            format,
            format!("{}x{} raster has no border pixels", img.width(), img.height()),
        ));
    }

    let index = rng.gen_range(0..border.len());
    let coordinate = border
        .get(index)
        .ok_or_else(|| RehashError::invalid_container(format, "border index out of range"))?;
    let magnitude = rng.gen_range(1..=options.effective_max_delta());
    let delta = if rng.gen::<bool>() { magnitude } else { -magnitude };

    let delta = apply(&mut img, coordinate, delta);
    debug!(
        "perturbed {format} pixel ({}, {}) of {}x{} by {delta}",
        coordinate.x,
        coordinate.y,
        img.width(),
        img.height()
    );

    Ok(Perturbed {
        bytes: encode(&img, format, options, bytes.len())?,
        coordinate,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{encode_png, prepare_checkerboard_rgba, seeded_rng};
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn should_flip_the_sign_when_clamping_would_swallow_the_change() {
        let mut white = [255u8, 255, 255, 128];
        assert_eq!(nudge(&mut white, 3, 2), -2);
        assert_eq!(white, [253, 253, 253, 128]);

        let mut black = [0u8, 0, 0];
        assert_eq!(nudge(&mut black, 3, -1), 1);
        assert_eq!(black, [1, 1, 1]);
    }

    #[test]
    fn should_clamp_single_channels() {
        let mut pixel = [254u8, 10, 255, 7];
        assert_eq!(nudge(&mut pixel, 3, 2), 2);
        assert_eq!(pixel, [255, 12, 255, 7]);
    }

    #[test]
    fn should_nudge_16_bit_channels() {
        let mut pixel = [65535u16, 65535, 65534];
        assert_eq!(nudge(&mut pixel, 3, 2), 2);
        assert_eq!(pixel, [65535, 65535, 65535]);
    }

    #[test]
    fn should_change_exactly_one_border_pixel_of_a_png() {
        let original = prepare_checkerboard_rgba(20, 12);
        let png = encode_png(&original);
        let perturbed = perturb(
            &png,
            ContainerFormat::Png,
            &PerturbOptions::default(),
            &mut seeded_rng(7),
        )
        .unwrap();

        let result = image::load_from_memory(&perturbed.bytes).unwrap().to_rgba8();
        let at = perturbed.coordinate;
        assert!(at.x == 0 || at.y == 0 || at.x == 19 || at.y == 11);
        assert!((1..=2).contains(&perturbed.delta.abs()));

        for (x, y, before) in original.enumerate_pixels() {
            let after = result.get_pixel(x, y);
            if (x, y) == (at.x, at.y) {
                for c in 0..3 {
                    let diff = (i32::from(after[c]) - i32::from(before[c])).abs();
                    assert!(diff >= 1 && diff <= 2, "channel {c} changed by {diff}");
                }
                assert_eq!(after[3], before[3], "alpha must not change");
            } else {
                assert_eq!(after, before, "pixel ({x}, {y}) must not change");
            }
        }
    }

    #[test]
    fn should_keep_the_color_type_of_a_grey_png() {
        let grey = GrayImage::from_pixel(6, 6, Luma([128]));
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(grey)
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .unwrap();

        let perturbed = perturb(
            &png,
            ContainerFormat::Png,
            &PerturbOptions::default(),
            &mut seeded_rng(1),
        )
        .unwrap();
        let result = image::load_from_memory(&perturbed.bytes).unwrap();

        assert!(matches!(result, DynamicImage::ImageLuma8(_)));
        let luma = result.to_luma8();
        let at = perturbed.coordinate;
        assert_eq!(
            i32::from(luma.get_pixel(at.x, at.y)[0]) - 128,
            perturbed.delta
        );
    }

    #[test]
    fn should_honor_a_max_delta_of_one() {
        let png = encode_png(&RgbaImage::from_pixel(4, 4, Rgba([100, 100, 100, 255])));
        let options = PerturbOptions::default().with_max_delta(1);
        for seed in 0..8 {
            let perturbed =
                perturb(&png, ContainerFormat::Png, &options, &mut seeded_rng(seed)).unwrap();
            assert_eq!(perturbed.delta.abs(), 1);
        }
    }

    #[test]
    fn should_never_exceed_a_delta_of_two_whatever_is_requested() {
        let flat = RgbaImage::from_pixel(10, 10, Rgba([100, 100, 100, 255]));
        let png = encode_png(&flat);
        let options = PerturbOptions::default().with_max_delta(200);

        for seed in 0..16 {
            let perturbed =
                perturb(&png, ContainerFormat::Png, &options, &mut seeded_rng(seed)).unwrap();
            let result = image::load_from_memory(&perturbed.bytes).unwrap().to_rgba8();
            let max_diff = result
                .pixels()
                .flat_map(|p| p.0[..3].iter().map(|c| (i32::from(*c) - 100).abs()))
                .max()
                .unwrap();

            assert!((1..=2).contains(&perturbed.delta.abs()));
            assert!(max_diff <= 2, "channel changed by {max_diff}");
        }
    }

    #[test]
    fn should_fail_with_decode_failure_on_a_broken_raster() {
        let mut png = encode_png(&prepare_checkerboard_rgba(8, 8));
        png.truncate(40);
        match perturb(
            &png,
            ContainerFormat::Png,
            &PerturbOptions::default(),
            &mut seeded_rng(0),
        ) {
            Err(RehashError::DecodeFailure(_)) => (),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn should_fail_with_invalid_container_without_signature() {
        match perturb(
            b"plain text",
            ContainerFormat::Png,
            &PerturbOptions::default(),
            &mut seeded_rng(0),
        ) {
            Err(RehashError::InvalidContainer { .. }) => (),
            other => panic!("unexpected {other:?}"),
        }
    }
}
