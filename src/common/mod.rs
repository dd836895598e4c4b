//! # Common Components
//!
//! Shared utilities used by the library core and the binary.
//!
//! ## Modules
//!
//! - [`error`]: The [`StegoError`](error::StegoError) type and `Result` alias
//! - [`config`]: Configuration parsing utilities

pub mod config;
pub mod error;
