// Radio-level value types shared by the object model and the record codecs
pub mod constants;
pub mod frequency;
pub mod power;
pub mod signaling;

pub use constants::*;
pub use frequency::{format_mhz, split_offset, tx_frequency, RepeaterMode};
pub use power::{Power, PowerCode};
pub use signaling::Signaling;
