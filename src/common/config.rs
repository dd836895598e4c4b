//! # Configuration Utilities
//!
//! TOML configuration shared by the library and the `graystego` binary. Every
//! section falls back to its defaults, so a partial file (or no file) is valid.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::processing::decoder::DEFAULT_BOUNDARY_TOLERANCE;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("config/graystego.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub logging: LoggingConfig,
    pub encoder: EncoderConfig,
    pub decoder: DecoderConfig,
}

/// Logging configuration for the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Embedding behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Refuse to embed into images that are not pure grayscale
    pub require_clean: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            require_clean: true,
        }
    }
}

/// Extraction behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Consecutive unmodified pixels tolerated before the scan stops
    pub boundary_tolerance: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            boundary_tolerance: DEFAULT_BOUNDARY_TOLERANCE,
        }
    }
}
