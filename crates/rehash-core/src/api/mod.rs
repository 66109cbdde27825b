//! Builder style entry points working on file paths.

pub mod inspect;
pub mod modify;
