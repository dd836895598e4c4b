//! # Grayscale Run-Length Steganography
//!
//! This module hides text in a grayscale image as runs of pixels whose blue
//! channel has been moved by one step, and reads it back.
//!
//! - [`pixel`]: [`PixelGrid`] access and raster traversal
//! - [`validator`]: clean-carrier and message-image predicates
//! - [`encoder`]: message to code runs
//! - [`decoder`]: code runs back to message

pub mod decoder;
pub mod encoder;
pub mod pixel;
pub mod validator;

// Re-export main functions for convenience
pub use decoder::{extract_bytes, extract_message, Decoder};
pub use encoder::{embed_bytes, embed_message, EmbedSummary};
pub use pixel::{Color, PixelGrid};
pub use validator::{is_valid_clean_image, is_valid_message_image};
