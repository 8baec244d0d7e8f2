//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.
//! Unsupported formats and malformed width entries are not errors: the
//! first is a [`crate::pipeline::ProcessOutcome`], the second is skipped
//! while parsing configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Thumbnail exceeds image limits: {0}")]
    TooLarge(#[source] image::ImageError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upload of {name} failed: {message}")]
    Upload { name: String, message: String },

    #[error("Invalid object URL: {0}")]
    InvalidObjectUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
