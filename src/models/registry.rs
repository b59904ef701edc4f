// Model registry mapping radio names to their memory maps

use crate::codeplug::Codeplug;
use crate::memmap::CodeplugLayout;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A radio model and the memory map its codeplug uses
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub vendor: String,
    pub model: String,
    pub description: String,
    pub layout: CodeplugLayout,
}

impl ModelInfo {
    pub fn new(
        vendor: impl Into<String>,
        model: impl Into<String>,
        description: impl Into<String>,
        layout: CodeplugLayout,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            description: description.into(),
            layout,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.vendor, self.model)
    }

    /// Codec for this model's codeplug
    pub fn codeplug(&self) -> Codeplug {
        Codeplug::new(self.layout)
    }
}

lazy_static::lazy_static! {
    static ref MODEL_REGISTRY: Mutex<HashMap<String, ModelInfo>> = Mutex::new(HashMap::new());
}

// Entries are inserted whole, a poisoned lock still holds a usable map.
fn registry() -> MutexGuard<'static, HashMap<String, ModelInfo>> {
    MODEL_REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(vendor: &str, model: &str) -> String {
    format!("{}::{}", vendor, model)
}

/// Register a model in the global registry
pub fn register_model(info: ModelInfo) {
    registry().insert(key(&info.vendor, &info.model), info);
}

/// Get information about a specific model
pub fn get_model(vendor: &str, model: &str) -> Option<ModelInfo> {
    registry().get(&key(vendor, model)).cloned()
}

/// List all registered models
pub fn list_models() -> Vec<ModelInfo> {
    registry().values().cloned().collect()
}

/// List models grouped by vendor, sorted by model name
pub fn list_models_by_vendor() -> HashMap<String, Vec<ModelInfo>> {
    let mut by_vendor: HashMap<String, Vec<ModelInfo>> = HashMap::new();

    for info in list_models() {
        by_vendor.entry(info.vendor.clone()).or_default().push(info);
    }

    for models in by_vendor.values_mut() {
        models.sort_by(|a, b| a.model.cmp(&b.model));
    }

    by_vendor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_info() {
        let info = ModelInfo::new("AnyTone", "AT-D868UV", "Test", CodeplugLayout::D868UV);
        assert_eq!(info.full_name(), "AnyTone AT-D868UV");
        assert_eq!(info.codeplug().layout().name, CodeplugLayout::D868UV.name);
    }

    #[test]
    fn test_registry() {
        register_model(ModelInfo::new("Test", "Radio-1", "Test radio", CodeplugLayout::D868UV));

        let retrieved = get_model("Test", "Radio-1");
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().model, "Radio-1");
        assert!(get_model("Test", "Radio-2").is_none());
    }

    #[test]
    fn test_list_by_vendor() {
        register_model(ModelInfo::new("Sorted", "B", "Test", CodeplugLayout::D868UV));
        register_model(ModelInfo::new("Sorted", "A", "Test", CodeplugLayout::D878UV));

        let by_vendor = list_models_by_vendor();
        let models: Vec<_> = by_vendor["Sorted"].iter().map(|m| m.model.as_str()).collect();
        assert_eq!(models, ["A", "B"]);
    }
}
