// Group lists, zones and scan lists

use super::{ChannelRef, ContactRef};
use serde::{Deserialize, Serialize};

/// Receive group list, member order is significant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GroupList {
    pub name: String,
    pub contacts: Vec<ContactRef>,
}

impl GroupList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contacts: Vec::new(),
        }
    }
}

/// Zone with independent channel lists for VFO A and B
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Zone {
    pub name: String,
    pub a: Vec<ChannelRef>,
    pub b: Vec<ChannelRef>,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            a: Vec::new(),
            b: Vec::new(),
        }
    }
}

/// Scan list priority channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityChannel {
    /// Whatever channel is selected when the scan starts
    Selected,
    Channel(ChannelRef),
}

/// Channel the radio returns to when transmitting during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScanRevert {
    #[default]
    Selected,
    SelectedTalkback,
    Priority1,
    Priority2,
    LastCalled,
    LastUsed,
    Priority1Talkback,
    Priority2Talkback,
}

impl ScanRevert {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => ScanRevert::SelectedTalkback,
            2 => ScanRevert::Priority1,
            3 => ScanRevert::Priority2,
            4 => ScanRevert::LastCalled,
            5 => ScanRevert::LastUsed,
            6 => ScanRevert::Priority1Talkback,
            7 => ScanRevert::Priority2Talkback,
            _ => ScanRevert::Selected,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ScanRevert::Selected => 0,
            ScanRevert::SelectedTalkback => 1,
            ScanRevert::Priority1 => 2,
            ScanRevert::Priority2 => 3,
            ScanRevert::LastCalled => 4,
            ScanRevert::LastUsed => 5,
            ScanRevert::Priority1Talkback => 6,
            ScanRevert::Priority2Talkback => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanList {
    pub name: String,
    pub primary: Option<PriorityChannel>,
    pub secondary: Option<PriorityChannel>,
    pub channels: Vec<ChannelRef>,
    /// Timing values in device units
    pub look_back_a: u16,
    pub look_back_b: u16,
    pub dropout_delay: u16,
    pub dwell: u16,
    pub revert: ScanRevert,
}

impl ScanList {
    pub const DEFAULT_LOOK_BACK_A: u16 = 0x000f;
    pub const DEFAULT_LOOK_BACK_B: u16 = 0x0019;
    pub const DEFAULT_DROPOUT_DELAY: u16 = 0x001d;
    pub const DEFAULT_DWELL: u16 = 0x001d;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: None,
            secondary: None,
            channels: Vec::new(),
            look_back_a: Self::DEFAULT_LOOK_BACK_A,
            look_back_b: Self::DEFAULT_LOOK_BACK_B,
            dropout_delay: Self::DEFAULT_DROPOUT_DELAY,
            dwell: Self::DEFAULT_DWELL,
            revert: ScanRevert::default(),
        }
    }
}
