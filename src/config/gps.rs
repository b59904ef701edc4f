// GPS/APRS positioning systems

use super::{ChannelRef, ContactRef};
use serde::{Deserialize, Serialize};

/// Channel a positioning system switches to for its reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RevertChannel {
    #[default]
    Selected,
    VfoA,
    VfoB,
    Channel(ChannelRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpsSystem {
    pub name: String,
    /// Destination of position reports
    pub contact: Option<ContactRef>,
    pub revert: RevertChannel,
    /// Update period in seconds, 0 disables automatic reports
    pub period: u16,
}

impl GpsSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: None,
            revert: RevertChannel::Selected,
            period: 300,
        }
    }
}
