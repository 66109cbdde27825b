//! # Rehash Core API
//!
//! Changes the SHA-1 digest of a JPEG or PNG while its pixels, dimensions and
//! container format stay the same (or, in pixel mode, visually the same).
//!
//! There are three strategies, see [`Mode`]:
//! - `random` inserts a region of random bytes (JPEG comment, PNG text chunk)
//! - `pixel` nudges one border pixel by at most 2 and re-encodes the raster
//! - `metadata` replaces the textual regions with an [`ImageMetadata`] record
//!
//! Every strategy goes through the hash guard, a result with an unchanged
//! digest is rejected with [`RehashError::NoOpFailure`].
//!
//! # Usage Examples
//!
//! ## Change the digest of a buffer
//!
//! ```rust
//! use rehash_core::{guard, ContainerFormat};
//!
//! let png = std::fs::read("tests/images/checkerboard.png").expect("Failed to read image");
//! let modification = guard::modify_by_auxiliary_chunk(&png, ContainerFormat::Png)
//!     .expect("Failed to modify image");
//!
//! assert_ne!(modification.original, modification.modified);
//! ```
//!
//! ## Write metadata into a file
//!
//! ```rust
//! use rehash_core::{ImageMetadata, Mode};
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//!
//! rehash_core::api::modify::prepare()
//!     .with_image("tests/images/checkerboard.png")
//!     .with_mode(Mode::Metadata)
//!     .with_metadata(ImageMetadata::default().with_artist("Ann Example"))
//!     .with_output(temp_dir.path().join("checkerboard-rehashed.png"))
//!     .execute()
//!     .expect("Failed to modify image");
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod commands;
pub mod container;
pub mod digest;
pub mod error;
pub mod guard;
pub mod media;
pub mod metadata;
pub mod result;
pub mod strategy;

pub use crate::digest::Digest;
pub use crate::error::RehashError;
pub use crate::guard::Modification;
pub use crate::media::{ContainerFormat, PerturbOptions};
pub use crate::metadata::ImageMetadata;
pub use crate::result::Result;
pub use crate::strategy::{Mode, SecureRng, Strategy, Transform};
