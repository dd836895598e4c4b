//! # Pixel Access
//!
//! The core algorithms never touch an image container directly. They read and
//! write through [`PixelGrid`], which is implemented here for the `image`
//! crate's RGB and RGBA buffers.
//!
//! Every traversal uses [`raster_order`]: rows top to bottom, pixels left to
//! right within a row. Encoder and decoder must agree on this order for a
//! message to survive the round trip.

use image::{Rgb, RgbImage, RgbaImage};

/// Color of a single pixel. `alpha` is present only for formats that carry it
/// and is never interpreted by the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: Option<u8>,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: None }
    }

    pub fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Absolute channel differences `(|R-G|, |G-B|, |R-B|)`.
    pub fn channel_diffs(&self) -> (u8, u8, u8) {
        (
            self.r.abs_diff(self.g),
            self.g.abs_diff(self.b),
            self.r.abs_diff(self.b),
        )
    }

    /// Largest of the three channel differences.
    pub fn max_diff(&self) -> u8 {
        let (rg, gb, rb) = self.channel_diffs();
        rg.max(gb).max(rb)
    }

    /// True when R, G and B are all equal.
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

/// A rectangular grid of colors addressable by `(x, y)`.
///
/// Coordinates outside `[0, width) x [0, height)` are a contract violation;
/// implementations may panic on them.
pub trait PixelGrid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn get_pixel(&self, x: u32, y: u32) -> Color;
    /// Overwrite R, G and B. Alpha, if the grid has it, is left untouched.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

/// Total number of pixels in the grid.
pub fn pixel_count<G: PixelGrid + ?Sized>(grid: &G) -> usize {
    grid.width() as usize * grid.height() as usize
}

/// Coordinates of a `width` x `height` grid in row-major order.
pub fn raster_order(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}

impl PixelGrid for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        let [r, g, b] = image::ImageBuffer::get_pixel(self, x, y).0;
        Color::rgb(r, g, b)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.put_pixel(x, y, Rgb([color.r, color.g, color.b]));
    }
}

impl PixelGrid for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        let [r, g, b, a] = image::ImageBuffer::get_pixel(self, x, y).0;
        Color {
            r,
            g,
            b,
            alpha: Some(a),
        }
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let pixel = self.get_pixel_mut(x, y);
        pixel[0] = color.r;
        pixel[1] = color.g;
        pixel[2] = color.b;
    }
}
