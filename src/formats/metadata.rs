// Metadata stored alongside a codeplug image

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata stored in .img files
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Metadata {
    /// Vendor name
    #[serde(default)]
    pub vendor: String,

    /// Model name, as registered in [`crate::models`]
    #[serde(default)]
    pub model: String,

    /// Version of this crate that wrote the file
    #[serde(default)]
    pub crate_version: String,

    /// Additional properties
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Metadata {
    pub fn new(vendor: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            crate_version: crate::VERSION.to_string(),
            ..Default::default()
        }
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extra.insert(key.into(), value);
    }

    pub fn get_extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_creation() {
        let meta = Metadata::new("AnyTone", "AT-D878UV");
        assert_eq!(meta.vendor, "AnyTone");
        assert_eq!(meta.crate_version, crate::VERSION);
    }

    #[test]
    fn test_unknown_keys_kept() {
        let meta = Metadata::from_json(r#"{"vendor":"BTECH","model":"DMR-6X2","serial":"A1"}"#)
            .unwrap();
        assert_eq!(meta.model, "DMR-6X2");
        assert!(meta.crate_version.is_empty());
        assert_eq!(meta.get_extra("serial"), Some(&serde_json::json!("A1")));

        let again = Metadata::from_json(&meta.to_json().unwrap()).unwrap();
        assert_eq!(again, meta);
    }
}
