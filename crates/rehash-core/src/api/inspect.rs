use std::path::{Path, PathBuf};

use crate::commands::{self, ImageReport};
use crate::RehashError;

pub fn prepare() -> InspectApi {
    InspectApi::default()
}

#[derive(Default, Debug)]
pub struct InspectApi {
    image: Option<PathBuf>,
}

impl InspectApi {
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<ImageReport, RehashError> {
        let Some(image) = self.image else {
            return Err(RehashError::MissingImage);
        };

        commands::inspect(&image)
    }
}
