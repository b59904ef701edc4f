// Radio-wide settings

use super::TimeSlot;
use crate::core::Power;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DisplayColor {
    #[default]
    Orange,
    Red,
    Yellow,
    Green,
    Turquoise,
    Blue,
    White,
}

impl DisplayColor {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => DisplayColor::Red,
            2 => DisplayColor::Yellow,
            3 => DisplayColor::Green,
            4 => DisplayColor::Turquoise,
            5 => DisplayColor::Blue,
            6 => DisplayColor::White,
            _ => DisplayColor::Orange,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyLocks {
    pub knob: bool,
    pub keypad: bool,
    pub side_keys: bool,
    pub forced: bool,
}

/// Frequency windows for automatic repeater offsets, in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AutoRepeater {
    pub vhf_min: u64,
    pub vhf_max: u64,
    pub uhf_min: u64,
    pub uhf_max: u64,
    /// Offset direction of VFO B (0 off, 1 positive, 2 negative)
    pub direction_b: u8,
}

/// Power-on zone and channel, channel None means VFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DefaultChannels {
    pub zone_a: u8,
    pub zone_b: u8,
    pub channel_a: Option<u8>,
    pub channel_b: Option<u8>,
}

/// Settings shared by all positioning systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsSettings {
    /// Enable the GPS receiver
    pub enabled: bool,
    pub get_position: bool,
    /// Offset to UTC in hours
    pub time_zone: i8,
    /// Seconds between receiver updates
    pub update_period: u8,
    pub imperial_units: bool,
    /// Manual report interval in seconds
    pub manual_interval: u8,
    /// Latitude and longitude in degrees, reported instead of the receiver's fix
    pub fixed_location: Option<(f64, f64)>,
    pub power: Power,
    /// None sends on the channel's own time slot
    pub time_slot: Option<TimeSlot>,
}

impl Default for GpsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            get_position: false,
            time_zone: 0,
            update_period: 5,
            imperial_units: false,
            manual_interval: 0,
            fixed_location: None,
            power: Power::High,
            time_slot: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub intro_line1: String,
    pub intro_line2: String,
    /// Microphone level 1..10
    pub mic_level: u8,
    pub key_tone: bool,
    /// Key tone level 1..15, None lets the user adjust it
    pub key_tone_level: Option<u8>,
    pub call_display_color: DisplayColor,
    pub show_zone_and_contact: bool,
    pub show_last_heard: bool,
    pub keep_last_caller: bool,
    pub locks: KeyLocks,
    pub auto_repeater: AutoRepeater,
    pub default_channels: Option<DefaultChannels>,
    pub gps: GpsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            intro_line1: String::new(),
            intro_line2: String::new(),
            mic_level: 3,
            key_tone: false,
            key_tone_level: None,
            call_display_color: DisplayColor::default(),
            show_zone_and_contact: true,
            show_last_heard: false,
            keep_last_caller: false,
            locks: KeyLocks::default(),
            auto_repeater: AutoRepeater::default(),
            default_channels: None,
            gps: GpsSettings::default(),
        }
    }
}
