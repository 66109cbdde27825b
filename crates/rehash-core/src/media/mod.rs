pub mod codec_options;
pub mod image;
mod types;

pub use codec_options::{PerturbOptions, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DELTA, MAX_DELTA};
pub use self::image::{BorderPixels, PixelCoordinate};
pub use types::*;
