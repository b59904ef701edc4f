// Supported radio models
pub mod registry;

pub use registry::{
    get_model, list_models, list_models_by_vendor, register_model, ModelInfo,
};

use crate::memmap::CodeplugLayout;

/// Register every supported model
///
/// Call once at startup before looking models up by name.
pub fn init_models() {
    register_model(ModelInfo::new(
        "AnyTone",
        "AT-D868UV",
        "Dual-band DMR/FM handheld",
        CodeplugLayout::D868UV,
    ));

    // Rebadged AT-D868UV, identical codeplug
    register_model(ModelInfo::new(
        "BTECH",
        "DMR-6X2",
        "Dual-band DMR/FM handheld",
        CodeplugLayout::D868UV,
    ));

    register_model(ModelInfo::new(
        "AnyTone",
        "AT-D878UV",
        "Dual-band DMR/FM handheld with APRS",
        CodeplugLayout::D878UV,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_models() {
        init_models();

        let models = list_models();
        assert!(models.len() >= 3, "Expected at least 3 models");

        let d878 = get_model("AnyTone", "AT-D878UV").expect("AT-D878UV not found");
        assert_eq!(d878.layout.name, CodeplugLayout::D878UV.name);

        let btech = get_model("BTECH", "DMR-6X2").expect("DMR-6X2 not found");
        assert_eq!(btech.layout.name, CodeplugLayout::D868UV.name);
    }
}
