#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for handler selection.
pub mod error;

/// Registration and first-match selection of video handlers.
///
/// See [`factory::VideoIoFactory::create_video_io`].
pub mod factory;

pub use crate::error::IoError;
pub use crate::factory::{IoMode, VideoIo, VideoIoFactory};
