// Codeplug codec for AnyTone DMR radios
// Translates between a sparse memory image and the configuration object model.
// Encoding allocates and fills a fresh image; decoding creates every object
// first and resolves the references between them in a second pass.

pub mod context;
pub mod decode;
pub mod elements;
pub mod encode;

pub use context::{Context, Handle, Phase, Warning};

use crate::bitwise::bcd::BcdError;
use crate::bitwise::dtmf::DtmfError;
use crate::bitwise::elements::ElementError;
use crate::config::Config;
use crate::memmap::{CodeplugLayout, Family, Image, ImageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodeplugError {
    #[error("Memory image error: {0}")]
    Image(#[from] ImageError),

    #[error("Record error: {0}")]
    Element(#[from] ElementError),

    #[error("BCD error: {0}")]
    Bcd(#[from] BcdError),

    #[error("DTMF error: {0}")]
    Dtmf(#[from] DtmfError),

    #[error("Cannot link {family}s before {required}s are created")]
    Phase { family: Family, required: Family },

    #[error("Cannot encode {family} {slot}: {source}")]
    Record {
        family: Family,
        slot: usize,
        source: Box<CodeplugError>,
    },
}

impl CodeplugError {
    /// Attach the record that failed to @err
    pub fn record(family: Family, slot: usize, err: impl Into<CodeplugError>) -> Self {
        CodeplugError::Record {
            family,
            slot,
            source: Box::new(err.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodeplugError>;

/// Options that change how a configuration is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodeFlags {
    /// Switch the GPS receiver on exactly when a channel reports its position
    pub auto_enable_gps: bool,
    /// Time zone written together with an auto-enabled receiver
    pub utc_offset_hours: i8,
    pub imperial_units: bool,
}

/// Result of an encode run
#[derive(Debug, Clone)]
pub struct Encoded {
    pub image: Image,
    pub warnings: Vec<Warning>,
}

/// Result of a decode run
#[derive(Debug, Clone)]
pub struct Decoded {
    pub config: Config,
    pub warnings: Vec<Warning>,
}

/// Codec bound to the memory map of one device variant
#[derive(Debug, Clone, Copy)]
pub struct Codeplug {
    layout: CodeplugLayout,
}

impl Codeplug {
    pub fn new(layout: CodeplugLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CodeplugLayout {
        &self.layout
    }

    /// Encode @config into a fresh image
    pub fn encode(&self, config: &Config, flags: &EncodeFlags) -> Result<Encoded> {
        let mut image = Image::new();
        let warnings = self.encode_into(&mut image, config, flags)?;
        Ok(Encoded { image, warnings })
    }

    /// Encode @config into @image, allocating whatever is missing
    ///
    /// Regions already present (for example a downloaded codeplug) keep the
    /// bytes no record covers.
    pub fn encode_into(
        &self,
        image: &mut Image,
        config: &Config,
        flags: &EncodeFlags,
    ) -> Result<Vec<Warning>> {
        encode::encode(&self.layout, image, config, flags)
    }

    /// Allocate every region the indicators resident in @image refer to
    pub fn allocate_for_decoding(&self, image: &mut Image) -> Result<()> {
        crate::memmap::allocate_for_decoding(image, &self.layout)?;
        Ok(())
    }

    /// Decode @image into a configuration
    pub fn decode(&self, image: &Image) -> Result<Decoded> {
        decode::decode(&self.layout, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_names_record() {
        let err = CodeplugError::record(
            Family::DtmfContact,
            3,
            DtmfError::InvalidNumber("12X".to_string()),
        );
        assert!(err.to_string().starts_with("Cannot encode DTMF contact 3:"));
        assert!(matches!(err, CodeplugError::Record { slot: 3, .. }));
    }

    #[test]
    fn test_empty_config_roundtrip() {
        let codeplug = Codeplug::new(CodeplugLayout::D868UV);
        let encoded = codeplug
            .encode(&Config::new(), &EncodeFlags::default())
            .unwrap();
        assert!(encoded.warnings.is_empty());
        let decoded = codeplug.decode(&encoded.image).unwrap();
        assert_eq!(decoded.config, Config::new());
        assert!(decoded.warnings.is_empty());
    }
}
