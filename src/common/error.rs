//! # Error Types
//!
//! [`StegoError`] covers every failure the library reports. Binaries wrap it in
//! `anyhow::Result` at the edges.

use thiserror::Error;

/// Errors that can occur while loading, embedding into, or extracting from a carrier.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The value to embed cannot be represented as text.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The message needs more pixels than the carrier has.
    #[error("message too large for this image: need {required} pixels, image has {available}")]
    CapacityExceeded { required: usize, available: usize },

    /// The image container is not one of GIF, JPEG or PNG.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The run pattern decoded to something that is not a valid base64 code sequence.
    #[error("corrupted payload: {0}")]
    CorruptedPayload(String),

    /// The extracted message bytes are not valid UTF-8.
    #[error("extracted text is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, StegoError>;
