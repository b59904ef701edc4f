// Channels

use super::{ContactRef, GpsSystemRef, GroupListRef, RadioIdRef, ScanListRef};
use crate::core::{Power, Signaling};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Bandwidth {
    #[default]
    Narrow,
    Wide,
}

/// Transmit admit criterion of an analog channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnalogAdmit {
    #[default]
    Always,
    Free,
    Tone,
}

/// Transmit admit criterion of a digital channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DigitalAdmit {
    #[default]
    Always,
    Free,
    ColorCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeSlot {
    #[default]
    Ts1,
    Ts2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalogChannel {
    pub admit: AnalogAdmit,
    pub rx_tone: Signaling,
    pub tx_tone: Signaling,
    pub bandwidth: Bandwidth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DigitalChannel {
    pub admit: DigitalAdmit,
    pub color_code: u8,
    pub time_slot: TimeSlot,
    pub tx_contact: Option<ContactRef>,
    pub group_list: Option<GroupListRef>,
    /// None selects the radio's default ID
    pub radio_id: Option<RadioIdRef>,
    /// Position reports are sent with this system
    pub aprs: Option<GpsSystemRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChannelMode {
    Analog(AnalogChannel),
    Digital(DigitalChannel),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    /// Hz
    pub rx_frequency: u64,
    /// Hz
    pub tx_frequency: u64,
    pub power: Power,
    pub rx_only: bool,
    pub scan_list: Option<ScanListRef>,
    pub mode: ChannelMode,
}

impl Channel {
    /// Simplex analog channel with default settings
    pub fn analog(name: impl Into<String>, frequency: u64) -> Self {
        Self {
            name: name.into(),
            rx_frequency: frequency,
            tx_frequency: frequency,
            power: Power::default(),
            rx_only: false,
            scan_list: None,
            mode: ChannelMode::Analog(AnalogChannel::default()),
        }
    }

    /// Simplex digital channel with default settings
    pub fn digital(
        name: impl Into<String>,
        frequency: u64,
        color_code: u8,
        time_slot: TimeSlot,
    ) -> Self {
        Self {
            name: name.into(),
            rx_frequency: frequency,
            tx_frequency: frequency,
            power: Power::default(),
            rx_only: false,
            scan_list: None,
            mode: ChannelMode::Digital(DigitalChannel {
                color_code,
                time_slot,
                ..Default::default()
            }),
        }
    }

    /// Set a split transmit frequency
    pub fn with_tx(mut self, tx_frequency: u64) -> Self {
        self.tx_frequency = tx_frequency;
        self
    }

    pub fn is_digital(&self) -> bool {
        matches!(self.mode, ChannelMode::Digital(_))
    }

    pub fn as_analog(&self) -> Option<&AnalogChannel> {
        match &self.mode {
            ChannelMode::Analog(a) => Some(a),
            ChannelMode::Digital(_) => None,
        }
    }

    pub fn as_analog_mut(&mut self) -> Option<&mut AnalogChannel> {
        match &mut self.mode {
            ChannelMode::Analog(a) => Some(a),
            ChannelMode::Digital(_) => None,
        }
    }

    pub fn as_digital(&self) -> Option<&DigitalChannel> {
        match &self.mode {
            ChannelMode::Digital(d) => Some(d),
            ChannelMode::Analog(_) => None,
        }
    }

    pub fn as_digital_mut(&mut self) -> Option<&mut DigitalChannel> {
        match &mut self.mode {
            ChannelMode::Digital(d) => Some(d),
            ChannelMode::Analog(_) => None,
        }
    }
}
