// Contacts and radio IDs

use crate::core::ALL_CALL_ID;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CallType {
    #[default]
    Private,
    Group,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalContact {
    pub name: String,
    pub call_type: CallType,
    pub number: u32,
    /// Ring on incoming calls
    pub ring: bool,
}

impl DigitalContact {
    pub fn private(name: impl Into<String>, number: u32) -> Self {
        Self {
            name: name.into(),
            call_type: CallType::Private,
            number,
            ring: false,
        }
    }

    pub fn group(name: impl Into<String>, number: u32) -> Self {
        Self {
            name: name.into(),
            call_type: CallType::Group,
            number,
            ring: false,
        }
    }

    pub fn all_call(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            call_type: CallType::All,
            number: ALL_CALL_ID,
            ring: false,
        }
    }

    /// ID the radio dials, all-calls always use the all-call ID
    pub fn call_id(&self) -> u32 {
        match self.call_type {
            CallType::All => ALL_CALL_ID,
            _ => self.number,
        }
    }
}

/// Analog contact dialled with DTMF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtmfContact {
    pub name: String,
    pub number: String,
}

impl DtmfContact {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }
}

/// DMR ID the radio transmits with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioId {
    pub name: String,
    pub number: u32,
}

impl RadioId {
    pub fn new(name: impl Into<String>, number: u32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}
