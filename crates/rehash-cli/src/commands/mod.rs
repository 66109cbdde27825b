pub mod digest;
pub mod inspect;
pub mod metadata;
pub mod modify;
