/// Default JPEG quality when re-encoding a perturbed raster (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Largest channel delta that still counts as visually lossless
pub const MAX_DELTA: u8 = 2;

/// Default upper bound of the channel delta applied to the selected border pixel
pub const DEFAULT_MAX_DELTA: u8 = MAX_DELTA;

/// Options for the pixel perturbation strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerturbOptions {
    /// The absolute delta applied to the color channels is drawn from `1..=max_delta`.
    /// It is clamped to `1..=MAX_DELTA`, a pixel always has to change and never by more than 2.
    pub max_delta: u8,

    /// JPEG quality (1-100, default 95). Has no effect on PNG, which is re-encoded losslessly.
    pub jpeg_quality: u8,
}

impl Default for PerturbOptions {
    fn default() -> Self {
        Self {
            max_delta: DEFAULT_MAX_DELTA,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl PerturbOptions {
    pub fn with_max_delta(mut self, max_delta: u8) -> Self {
        self.max_delta = max_delta;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub(crate) fn effective_max_delta(&self) -> i32 {
        i32::from(self.max_delta.clamp(1, MAX_DELTA))
    }

    pub(crate) fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}
