//! # Message Embedding
//!
//! The message is base64-encoded and every base64 character becomes a *code*:
//! its byte value. Each code `N` is written as `N` consecutive modified pixels
//! followed by one unmodified boundary pixel, laid end to end in raster order.
//!
//! ## Perturbation
//! A modified pixel has its blue channel moved by exactly one step: down when
//! red is at 255, up otherwise. Red and green are never touched, so on a
//! grayscale carrier every modified pixel ends up with a channel difference of 1.
//!
//! ## Capacity
//! A message needs `sum(codes) + codes.len()` pixels. Larger messages are
//! rejected with [`StegoError::CapacityExceeded`] before any pixel changes.

use base64::{engine::general_purpose, Engine as _};
use log::debug;

use super::pixel::{pixel_count, raster_order, PixelGrid};
use crate::common::error::{Result, StegoError};

/// What an embedding wrote into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmbedSummary {
    /// Number of codes (base64 characters) written
    pub codes: usize,
    /// Pixels whose blue channel was perturbed
    pub modified_pixels: usize,
    /// Unmodified pixels consumed as run terminators
    pub boundary_pixels: usize,
}

/// Base64-encode `message` and return one code per base64 character.
pub fn message_to_codes(message: &[u8]) -> Vec<u8> {
    general_purpose::STANDARD.encode(message).into_bytes()
}

/// Number of pixels needed to write `codes`: every run plus its boundary pixel.
pub fn required_pixels(codes: &[u8]) -> usize {
    codes.iter().map(|&code| code as usize).sum::<usize>() + codes.len()
}

/// Embed a text message into a clean carrier.
///
/// The carrier should satisfy
/// [`is_valid_clean_image`](super::validator::is_valid_clean_image); this is
/// not re-checked here.
pub fn embed_message<G: PixelGrid + ?Sized>(grid: &mut G, message: &str) -> Result<EmbedSummary> {
    embed_codes(grid, &message_to_codes(message.as_bytes()))
}

/// Embed raw bytes that are expected to hold text.
///
/// Bytes that are not valid UTF-8 are rejected with
/// [`StegoError::InvalidInput`] and the grid is left untouched.
pub fn embed_bytes<G: PixelGrid + ?Sized>(grid: &mut G, bytes: &[u8]) -> Result<EmbedSummary> {
    let message = std::str::from_utf8(bytes).map_err(|e| {
        StegoError::InvalidInput(format!("only text can be embedded into the image: {}", e))
    })?;
    embed_message(grid, message)
}

/// Write an arbitrary code sequence into the grid as runs of modified pixels.
pub fn embed_codes<G: PixelGrid + ?Sized>(grid: &mut G, codes: &[u8]) -> Result<EmbedSummary> {
    let required = required_pixels(codes);
    let available = pixel_count(grid);

    if required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }

    let mut summary = EmbedSummary::default();
    if codes.is_empty() {
        debug!("Nothing to embed");
        return Ok(summary);
    }

    debug!(
        "Embedding {} codes into {}x{} grid ({} of {} pixels)",
        codes.len(),
        grid.width(),
        grid.height(),
        required,
        available
    );

    let mut remaining = codes.to_vec();
    let mut index = 0;

    for (x, y) in raster_order(grid.width(), grid.height()) {
        if remaining[index] > 0 {
            modify_pixel_at(grid, x, y);
            remaining[index] -= 1;
            summary.modified_pixels += 1;
            continue;
        }

        // Run complete: this pixel stays as the boundary.
        summary.boundary_pixels += 1;
        index += 1;
        if index == remaining.len() {
            break;
        }
    }

    summary.codes = index;
    Ok(summary)
}

/// Move the blue channel of one pixel by a single step.
///
/// Down when red is 255, up otherwise. Saturates instead of wrapping so a
/// pixel from a non-clean carrier can never overflow.
pub fn modify_pixel_at<G: PixelGrid + ?Sized>(grid: &mut G, x: u32, y: u32) {
    let mut color = grid.get_pixel(x, y);

    if color.r == u8::MAX {
        color.b = color.b.saturating_sub(1);
    } else {
        color.b = color.b.saturating_add(1);
    }

    grid.set_pixel(x, y, color);
}
