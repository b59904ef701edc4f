// AnyTone codeplug codec
// Converts between a radio configuration and the binary codeplug image of
// AnyTone AT-D868UV/D878UV family radios.

pub mod bitwise;
pub mod codeplug;
pub mod config;
pub mod core;
pub mod formats;
pub mod memmap;
pub mod models;

// Re-export commonly used types
pub use codeplug::{Codeplug, CodeplugError, Decoded, EncodeFlags, Encoded, Warning};
pub use config::Config;
pub use formats::{load_img, save_img, Metadata};
pub use memmap::{CodeplugLayout, Image};
pub use models::{get_model, init_models, list_models, ModelInfo};

/// Crate version, recorded in saved images
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
