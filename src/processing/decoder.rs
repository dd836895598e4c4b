//! # Message Extraction
//!
//! Reads the run pattern written by the [`encoder`](super::encoder) back into
//! a code sequence and base64-decodes it.
//!
//! The scan counts modified pixels into the current slot and advances to the
//! next slot on every unmodified pixel. Nothing in the image records the
//! message length, so the scan stops once more than `tolerance` unmodified
//! pixels appear in a row. Inside a message there is only ever one, the
//! boundary pixel after each run.

use base64::{engine::general_purpose, Engine as _};
use log::{debug, warn};
use std::collections::BTreeMap;

use super::pixel::{raster_order, PixelGrid};
use super::validator::is_valid_message_image;
use crate::common::config::DecoderConfig;
use crate::common::error::{Result, StegoError};

/// Consecutive unmodified pixels tolerated before the scan stops (it stops on
/// the next one).
pub const DEFAULT_BOUNDARY_TOLERANCE: u32 = 3;

/// Smallest usable tolerance: every run is followed by one boundary pixel.
pub const MIN_BOUNDARY_TOLERANCE: u32 = 1;

/// Extractor with a configurable end-of-message cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    tolerance: u32,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_BOUNDARY_TOLERANCE,
        }
    }
}

impl Decoder {
    /// Tolerances below [`MIN_BOUNDARY_TOLERANCE`] are raised to it.
    pub fn new(tolerance: u32) -> Self {
        if tolerance < MIN_BOUNDARY_TOLERANCE {
            warn!(
                "Boundary tolerance {} would stop at the first boundary pixel, using {}",
                tolerance, MIN_BOUNDARY_TOLERANCE
            );
            return Self {
                tolerance: MIN_BOUNDARY_TOLERANCE,
            };
        }
        Self { tolerance }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.boundary_tolerance)
    }

    pub fn tolerance(&self) -> u32 {
        self.tolerance
    }

    /// Extract the embedded message bytes.
    ///
    /// Returns an empty vector when the grid is not a message image, and
    /// [`StegoError::CorruptedPayload`] when it is one but its runs do not
    /// decode.
    pub fn try_extract_bytes<G: PixelGrid + ?Sized>(&self, grid: &G) -> Result<Vec<u8>> {
        if !is_valid_message_image(grid) {
            debug!("Grid is not a valid message image, nothing to extract");
            return Ok(Vec::new());
        }

        let codes = extract_codes(grid, self.tolerance);
        debug!("Recovered {} codes", codes.len());
        codes_to_message(&codes)
    }

    /// Strict text extraction: undecodable runs and non-UTF-8 bytes are errors.
    pub fn try_extract_message<G: PixelGrid + ?Sized>(&self, grid: &G) -> Result<String> {
        let bytes = self.try_extract_bytes(grid)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Extract the embedded message bytes, or an empty vector when there is no
    /// readable message.
    pub fn extract_bytes<G: PixelGrid + ?Sized>(&self, grid: &G) -> Result<Vec<u8>> {
        match self.try_extract_bytes(grid) {
            Err(StegoError::CorruptedPayload(reason)) => {
                warn!("Perturbed pixels do not hold a message: {}", reason);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Extract the embedded message as text, or an empty string when there is
    /// no readable message.
    pub fn extract_message<G: PixelGrid + ?Sized>(&self, grid: &G) -> Result<String> {
        let bytes = self.extract_bytes(grid)?;
        match String::from_utf8(bytes) {
            Ok(message) => Ok(message),
            Err(e) => {
                warn!("Extracted bytes are not text: {}", e);
                Ok(String::new())
            }
        }
    }
}

/// Extract the embedded message with the default cutoff. Returns an empty
/// string when the grid holds no readable message.
pub fn extract_message<G: PixelGrid + ?Sized>(grid: &G) -> Result<String> {
    Decoder::default().extract_message(grid)
}

/// Byte-level counterpart of [`extract_message`].
pub fn extract_bytes<G: PixelGrid + ?Sized>(grid: &G) -> Result<Vec<u8>> {
    Decoder::default().extract_bytes(grid)
}

/// True when the pixel's R, G and B are not all equal.
pub fn get_modification_at<G: PixelGrid + ?Sized>(grid: &G, x: u32, y: u32) -> bool {
    !grid.get_pixel(x, y).is_gray()
}

/// Turn the run pattern into run lengths.
///
/// Slots are created only when a modified pixel is counted into them, so
/// empty slots (from the trailing unmodified pixels) never show up as codes.
pub fn extract_codes<G: PixelGrid + ?Sized>(grid: &G, tolerance: u32) -> Vec<u32> {
    let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
    let mut index = 0usize;
    let mut unmodified_count = 0u32;

    for (x, y) in raster_order(grid.width(), grid.height()) {
        if get_modification_at(grid, x, y) {
            unmodified_count = 0;
            *counts.entry(index).or_insert(0) += 1;
            continue;
        }

        if unmodified_count >= tolerance {
            debug!("End of message at ({}, {})", x, y);
            break;
        }

        unmodified_count += 1;
        index += 1;
    }

    counts.into_values().collect()
}

/// Map codes back to base64 characters and decode them.
pub fn codes_to_message(codes: &[u32]) -> Result<Vec<u8>> {
    let base64 = codes
        .iter()
        .map(|&code| {
            u8::try_from(code).map_err(|_| {
                StegoError::CorruptedPayload(format!("run of {} pixels is not a character code", code))
            })
        })
        .collect::<Result<Vec<u8>>>()?;

    general_purpose::STANDARD
        .decode(&base64)
        .map_err(|e| StegoError::CorruptedPayload(format!("invalid base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::encoder::{embed_codes, embed_message};
    use crate::processing::pixel::Color;
    use image::{Rgb, RgbImage};

    const GRAY: Rgb<u8> = Rgb([100, 100, 100]);
    const MODIFIED: Color = Color {
        r: 100,
        g: 100,
        b: 101,
        alpha: None,
    };

    fn row_from_pattern(pattern: &[bool]) -> RgbImage {
        let mut img = RgbImage::from_pixel(pattern.len() as u32, 1, GRAY);
        for (x, &modified) in pattern.iter().enumerate() {
            if modified {
                img.set_pixel(x as u32, 0, MODIFIED);
            }
        }
        img
    }

    #[test]
    fn test_fixture_pattern_decodes_to_codes() {
        let img = row_from_pattern(&[true, true, false, true, false, false]);
        assert_eq!(extract_codes(&img, DEFAULT_BOUNDARY_TOLERANCE), vec![2, 1]);
    }

    #[test]
    fn test_embedded_codes_read_back() {
        let mut img = RgbImage::from_pixel(6, 1, GRAY);
        embed_codes(&mut img, &[2, 1]).unwrap();

        assert_eq!(extract_codes(&img, DEFAULT_BOUNDARY_TOLERANCE), vec![2, 1]);
    }

    #[test]
    fn test_scan_stops_on_fourth_unmodified_pixel() {
        // Modified pixels after the fourth unmodified one are never counted
        let img = row_from_pattern(&[true, false, false, false, false, true, true]);
        assert_eq!(extract_codes(&img, DEFAULT_BOUNDARY_TOLERANCE), vec![1]);

        // Three in a row are tolerated
        let img = row_from_pattern(&[true, false, false, false, true, true]);
        assert_eq!(extract_codes(&img, DEFAULT_BOUNDARY_TOLERANCE), vec![1, 2]);
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let img = row_from_pattern(&[true, false, false, true]);

        assert_eq!(extract_codes(&img, 1), vec![1]);
        assert_eq!(extract_codes(&img, 2), vec![1, 1]);
    }

    #[test]
    fn test_get_modification_at() {
        let img = row_from_pattern(&[false, true]);

        assert!(!get_modification_at(&img, 0, 0));
        assert!(get_modification_at(&img, 1, 0));
    }

    #[test]
    fn test_codes_to_message() {
        assert_eq!(codes_to_message(&[81, 81, 61, 61]).unwrap(), b"A".to_vec());
        assert!(codes_to_message(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_codes_to_message_rejects_oversized_run() {
        let result = codes_to_message(&[81, 300]);
        assert!(matches!(result, Err(StegoError::CorruptedPayload(_))));
    }

    #[test]
    fn test_codes_to_message_rejects_bad_base64() {
        // '!' is not in the base64 alphabet
        let result = codes_to_message(&[33, 33, 33, 33]);
        assert!(matches!(result, Err(StegoError::CorruptedPayload(_))));
    }

    #[test]
    fn test_round_trip_single_character() {
        let mut img = RgbImage::from_pixel(20, 20, GRAY);
        embed_message(&mut img, "A").unwrap();

        assert_eq!(extract_message(&img).unwrap(), "A");
    }

    #[test]
    fn test_round_trip_on_white_carrier() {
        let mut img = RgbImage::from_pixel(256, 256, Rgb([255, 255, 255]));
        let message = "This is a test message to determine if both the basic message embedding and extraction it works.";
        embed_message(&mut img, message).unwrap();

        assert_eq!(extract_message(&img).unwrap(), message);
    }

    #[test]
    fn test_round_trip_unicode() {
        let mut img = RgbImage::from_pixel(64, 64, Rgb([30, 30, 30]));
        embed_message(&mut img, "héllo wörld ✓").unwrap();

        assert_eq!(extract_message(&img).unwrap(), "héllo wörld ✓");
    }

    #[test]
    fn test_clean_grid_extracts_empty_message() {
        let img = RgbImage::from_pixel(10, 10, GRAY);
        assert_eq!(extract_message(&img).unwrap(), "");
    }

    #[test]
    fn test_invalid_carrier_extracts_empty_message() {
        let mut img = RgbImage::from_pixel(20, 20, GRAY);
        embed_message(&mut img, "A").unwrap();
        img.set_pixel(19, 19, Color::rgb(100, 100, 110));

        assert_eq!(extract_message(&img).unwrap(), "");
    }

    #[test]
    fn test_single_perturbed_pixel_extracts_empty_message() {
        let mut img = RgbImage::from_pixel(10, 10, GRAY);
        img.set_pixel(0, 0, MODIFIED);

        assert!(is_valid_message_image(&img));
        assert_eq!(extract_message(&img).unwrap(), "");
        assert!(extract_bytes(&img).unwrap().is_empty());
    }

    #[test]
    fn test_strict_extraction_reports_corrupted_runs() {
        let mut img = RgbImage::from_pixel(10, 10, GRAY);
        img.set_pixel(0, 0, MODIFIED);

        let result = Decoder::default().try_extract_message(&img);
        assert!(matches!(result, Err(StegoError::CorruptedPayload(_))));
    }

    #[test]
    fn test_strict_extraction_round_trip() {
        let mut img = RgbImage::from_pixel(40, 40, GRAY);
        embed_message(&mut img, "hello").unwrap();

        assert_eq!(Decoder::default().try_extract_message(&img).unwrap(), "hello");
    }

    #[test]
    fn test_zero_tolerance_is_raised_to_minimum() {
        let decoder = Decoder::from_config(&DecoderConfig {
            boundary_tolerance: 0,
        });
        assert_eq!(decoder.tolerance(), MIN_BOUNDARY_TOLERANCE);

        let mut img = RgbImage::from_pixel(40, 40, GRAY);
        embed_message(&mut img, "hello").unwrap();
        assert_eq!(decoder.extract_message(&img).unwrap(), "hello");
    }

    #[test]
    fn test_decoder_from_config() {
        let decoder = Decoder::from_config(&DecoderConfig {
            boundary_tolerance: 7,
        });
        assert_eq!(decoder.tolerance(), 7);
        assert_eq!(Decoder::default().tolerance(), DEFAULT_BOUNDARY_TOLERANCE);
    }
}
