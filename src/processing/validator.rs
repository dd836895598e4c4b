//! Carrier classification.
//!
//! A *clean* image is pure grayscale and can receive a message. A *message*
//! image has every channel difference within one step and at least one pixel
//! that actually differs.

use super::pixel::{raster_order, PixelGrid};

/// True when every pixel has R = G = B. Stops at the first colored pixel.
pub fn is_valid_clean_image<G: PixelGrid + ?Sized>(grid: &G) -> bool {
    raster_order(grid.width(), grid.height()).all(|(x, y)| grid.get_pixel(x, y).is_gray())
}

/// True when no channel difference exceeds 1 and at least one equals 1.
///
/// Returns false as soon as a difference greater than 1 is seen, and false
/// after a full scan if no pixel was perturbed.
pub fn is_valid_message_image<G: PixelGrid + ?Sized>(grid: &G) -> bool {
    let mut message_found = false;

    for (x, y) in raster_order(grid.width(), grid.height()) {
        let max_diff = grid.get_pixel(x, y).max_diff();

        if max_diff > 1 {
            return false;
        }

        if max_diff == 1 {
            message_found = true;
        }
    }

    message_found
}
