mod border;
pub mod perturb;

pub use border::{BorderPixels, PixelCoordinate};
pub use perturb::{perturb, Perturbed};
