pub mod carrier;
pub mod common;
pub mod processing;

pub use carrier::CarrierImage;
pub use common::config::StegoConfig;
pub use common::error::{Result, StegoError};
pub use processing::{
    embed_message, extract_message, is_valid_clean_image, is_valid_message_image, PixelGrid,
};
