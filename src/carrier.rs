//! # Carrier Images
//!
//! [`CarrierImage`] loads a GIF, JPEG or PNG into memory, exposes its pixels
//! through [`PixelGrid`] and writes the result back out as PNG. The source
//! file is never modified.
//!
//! Only PNG is written: any lossy re-encoding would destroy the one-step
//! channel differences the message lives in.
//!
//! ## Example
//! ```ignore
//! let mut carrier = CarrierImage::open("cover.jpg")?;
//! if carrier.is_valid_clean_image() {
//!     carrier.embed_message("hello")?;
//!     carrier.save_as("out.png")?;
//! }
//! ```

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use log::debug;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::common::error::{Result, StegoError};
use crate::processing::decoder::{self, Decoder};
use crate::processing::encoder::{self, EmbedSummary};
use crate::processing::pixel::{Color, PixelGrid};
use crate::processing::validator;

#[derive(Debug, Clone)]
enum Pixels {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

/// An image loaded into memory for embedding or extraction.
#[derive(Debug, Clone)]
pub struct CarrierImage {
    format: ImageFormat,
    pixels: Pixels,
}

impl CarrierImage {
    /// Read and decode an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading carrier from {}", path.display());
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Decode an image from memory. The format is detected from its content.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)
            .map_err(|_| StegoError::UnsupportedFormat("unrecognized image data".to_string()))?;

        match format {
            ImageFormat::Gif | ImageFormat::Jpeg | ImageFormat::Png => {}
            other => return Err(StegoError::UnsupportedFormat(format!("{:?}", other))),
        }

        let img = image::load_from_memory_with_format(bytes, format)?;
        Ok(Self::from_dynamic(img, format))
    }

    /// Wrap an already decoded image. `format` records where it came from.
    pub fn from_dynamic(img: DynamicImage, format: ImageFormat) -> Self {
        let pixels = if img.color().has_alpha() {
            Pixels::Rgba(img.to_rgba8())
        } else {
            Pixels::Rgb(img.to_rgb8())
        };

        Self { format, pixels }
    }

    /// Format the image was loaded from.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match &self.pixels {
            Pixels::Rgb(img) => img.dimensions(),
            Pixels::Rgba(img) => img.dimensions(),
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self.pixels, Pixels::Rgba(_))
    }

    pub fn is_valid_clean_image(&self) -> bool {
        validator::is_valid_clean_image(self)
    }

    pub fn is_valid_message_image(&self) -> bool {
        validator::is_valid_message_image(self)
    }

    pub fn embed_message(&mut self, message: &str) -> Result<EmbedSummary> {
        encoder::embed_message(self, message)
    }

    pub fn extract_message(&self) -> Result<String> {
        decoder::extract_message(self)
    }

    pub fn extract_message_with(&self, decoder: &Decoder) -> Result<String> {
        decoder.extract_message(self)
    }

    /// Encode the current pixels as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut output_bytes = Vec::new();
        let mut cursor = Cursor::new(&mut output_bytes);
        match &self.pixels {
            Pixels::Rgb(img) => img.write_to(&mut cursor, ImageFormat::Png)?,
            Pixels::Rgba(img) => img.write_to(&mut cursor, ImageFormat::Png)?,
        }
        Ok(output_bytes)
    }

    /// Write the current pixels to `path` as PNG, whatever its extension.
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_png_bytes()?;
        fs::write(path, bytes)?;
        debug!("Saved carrier to {}", path.display());
        Ok(())
    }
}

impl PixelGrid for CarrierImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        match &self.pixels {
            Pixels::Rgb(img) => PixelGrid::get_pixel(img, x, y),
            Pixels::Rgba(img) => PixelGrid::get_pixel(img, x, y),
        }
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        match &mut self.pixels {
            Pixels::Rgb(img) => PixelGrid::set_pixel(img, x, y, color),
            Pixels::Rgba(img) => PixelGrid::set_pixel(img, x, y, color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_rgb_png_has_no_alpha() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([9, 9, 9])));
        let carrier = CarrierImage::from_bytes(&png_bytes(img)).unwrap();

        assert_eq!(carrier.format(), ImageFormat::Png);
        assert_eq!(carrier.dimensions(), (3, 2));
        assert!(!carrier.has_alpha());
        assert_eq!(carrier.get_pixel(2, 1).alpha, None);
    }

    #[test]
    fn test_rgba_png_keeps_alpha_through_embedding() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([80, 80, 80, 200])));
        let mut carrier = CarrierImage::from_bytes(&png_bytes(img)).unwrap();
        assert!(carrier.has_alpha());

        carrier.embed_message("A").unwrap();
        let reloaded = CarrierImage::from_bytes(&carrier.to_png_bytes().unwrap()).unwrap();

        assert!(reloaded.has_alpha());
        assert_eq!(reloaded.get_pixel(0, 0).alpha, Some(200));
        assert_eq!(reloaded.extract_message().unwrap(), "A");
    }

    #[test]
    fn test_jpeg_is_accepted_as_input() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([128, 128, 128])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();

        let carrier = CarrierImage::from_bytes(&bytes).unwrap();

        assert_eq!(carrier.format(), ImageFormat::Jpeg);
        assert_eq!(carrier.dimensions(), (8, 8));
    }

    #[test]
    fn test_bmp_is_unsupported() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 1, 1])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)
            .unwrap();

        let result = CarrierImage::from_bytes(&bytes);
        assert!(matches!(result, Err(StegoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let result = CarrierImage::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(StegoError::UnsupportedFormat(_))));
    }
}
