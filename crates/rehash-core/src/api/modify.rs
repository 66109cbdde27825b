use std::path::{Path, PathBuf};

use crate::commands;
use crate::guard::Modification;
use crate::metadata::ImageMetadata;
use crate::strategy::{Mode, Strategy};
use crate::{PerturbOptions, RehashError};

pub fn prepare() -> ModifyApi {
    ModifyApi::default()
}

#[derive(Default, Debug)]
pub struct ModifyApi {
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    mode: Mode,
    metadata: Option<ImageMetadata>,
    options: PerturbOptions,
}

impl ModifyApi {
    /// The image whose digest is changed
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Write the result here instead of replacing the image
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn use_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Defaults to [`Mode::Random`]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// The record written in [`Mode::Metadata`]
    pub fn with_metadata(mut self, metadata: ImageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn use_metadata(mut self, metadata: Option<ImageMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Options of [`Mode::Pixel`]
    pub fn with_options(mut self, options: PerturbOptions) -> Self {
        self.options = options;
        self
    }

    /// Execute the modification and write the result
    pub fn execute(self) -> Result<Modification, RehashError> {
        let Some(image) = self.image else {
            return Err(RehashError::MissingImage);
        };
        let strategy = Strategy::from_mode(self.mode, self.metadata, self.options)?;
        let output = self.output.as_deref().unwrap_or(&image);

        commands::modify_file_to(&image, output, &strategy)
    }
}
