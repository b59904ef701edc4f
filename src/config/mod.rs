// Configuration object model
// Everything a radio holds, independent of how a particular device stores it.
// Cross references are typed indices into the owning collection.

pub mod channel;
pub mod contact;
pub mod gps;
pub mod lists;
pub mod settings;

pub use channel::{
    AnalogAdmit, AnalogChannel, Bandwidth, Channel, ChannelMode, DigitalAdmit, DigitalChannel,
    TimeSlot,
};
pub use contact::{CallType, DigitalContact, DtmfContact, RadioId};
pub use gps::{GpsSystem, RevertChannel};
pub use lists::{GroupList, PriorityChannel, ScanList, ScanRevert, Zone};
pub use settings::{AutoRepeater, DefaultChannels, DisplayColor, GpsSettings, KeyLocks, Settings};

use serde::{Deserialize, Serialize};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

handle!(
    /// Index into [`Config::channels`]
    ChannelRef
);
handle!(
    /// Index into [`Config::contacts`]
    ContactRef
);
handle!(
    /// Index into [`Config::dtmf_contacts`]
    DtmfContactRef
);
handle!(
    /// Index into [`Config::group_lists`]
    GroupListRef
);
handle!(
    /// Index into [`Config::scan_lists`]
    ScanListRef
);
handle!(
    /// Index into [`Config::zones`]
    ZoneRef
);
handle!(
    /// Index into [`Config::gps_systems`]
    GpsSystemRef
);
handle!(
    /// Index into [`Config::radio_ids`]
    RadioIdRef
);

/// Complete radio configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub radio_ids: Vec<RadioId>,
    pub settings: Settings,
    pub channels: Vec<Channel>,
    pub contacts: Vec<DigitalContact>,
    pub dtmf_contacts: Vec<DtmfContact>,
    pub group_lists: Vec<GroupList>,
    pub zones: Vec<Zone>,
    pub scan_lists: Vec<ScanList>,
    pub gps_systems: Vec<GpsSystem>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_radio_id(&mut self, id: RadioId) -> RadioIdRef {
        self.radio_ids.push(id);
        RadioIdRef(self.radio_ids.len() - 1)
    }

    pub fn add_channel(&mut self, channel: Channel) -> ChannelRef {
        self.channels.push(channel);
        ChannelRef(self.channels.len() - 1)
    }

    pub fn add_contact(&mut self, contact: DigitalContact) -> ContactRef {
        self.contacts.push(contact);
        ContactRef(self.contacts.len() - 1)
    }

    pub fn add_dtmf_contact(&mut self, contact: DtmfContact) -> DtmfContactRef {
        self.dtmf_contacts.push(contact);
        DtmfContactRef(self.dtmf_contacts.len() - 1)
    }

    pub fn add_group_list(&mut self, list: GroupList) -> GroupListRef {
        self.group_lists.push(list);
        GroupListRef(self.group_lists.len() - 1)
    }

    pub fn add_zone(&mut self, zone: Zone) -> ZoneRef {
        self.zones.push(zone);
        ZoneRef(self.zones.len() - 1)
    }

    pub fn add_scan_list(&mut self, list: ScanList) -> ScanListRef {
        self.scan_lists.push(list);
        ScanListRef(self.scan_lists.len() - 1)
    }

    pub fn add_gps_system(&mut self, system: GpsSystem) -> GpsSystemRef {
        self.gps_systems.push(system);
        GpsSystemRef(self.gps_systems.len() - 1)
    }

    pub fn channel(&self, r: ChannelRef) -> Option<&Channel> {
        self.channels.get(r.0)
    }

    pub fn channel_mut(&mut self, r: ChannelRef) -> Option<&mut Channel> {
        self.channels.get_mut(r.0)
    }

    pub fn contact(&self, r: ContactRef) -> Option<&DigitalContact> {
        self.contacts.get(r.0)
    }

    pub fn group_list(&self, r: GroupListRef) -> Option<&GroupList> {
        self.group_lists.get(r.0)
    }

    pub fn scan_list(&self, r: ScanListRef) -> Option<&ScanList> {
        self.scan_lists.get(r.0)
    }

    pub fn gps_system(&self, r: GpsSystemRef) -> Option<&GpsSystem> {
        self.gps_systems.get(r.0)
    }

    /// First digital contact with the given call ID
    pub fn find_contact(&self, number: u32) -> Option<ContactRef> {
        self.contacts
            .iter()
            .position(|c| c.number == number)
            .map(ContactRef)
    }

    /// True when any channel reports its position
    pub fn requires_gps(&self) -> bool {
        !self.gps_systems.is_empty()
            && self
                .channels
                .iter()
                .filter_map(Channel::as_digital)
                .any(|d| d.aprs.is_some())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_follow_insertion_order() {
        let mut config = Config::new();
        let a = config.add_channel(Channel::analog("A", 145_500_000));
        let b = config.add_channel(Channel::analog("B", 145_525_000));
        assert_eq!(a, ChannelRef(0));
        assert_eq!(b, ChannelRef(1));
        assert_eq!(config.channel(b).map(|c| c.name.as_str()), Some("B"));
        assert!(config.channel(ChannelRef(2)).is_none());
    }

    #[test]
    fn test_find_contact() {
        let mut config = Config::new();
        config.add_contact(DigitalContact::group("Local", 9));
        let ww = config.add_contact(DigitalContact::group("World", 91));
        assert_eq!(config.find_contact(91), Some(ww));
        assert_eq!(config.find_contact(1), None);
    }

    #[test]
    fn test_requires_gps() {
        let mut config = Config::new();
        let gps = config.add_gps_system(GpsSystem::new("APRS"));
        let mut ch = Channel::digital("DMR", 439_000_000, 1, TimeSlot::Ts1);
        assert!(!config.requires_gps());
        if let Some(d) = ch.as_digital_mut() {
            d.aprs = Some(gps);
        }
        config.add_channel(ch);
        assert!(config.requires_gps());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = Config::new();
        config.add_radio_id(RadioId::new("DL1ABC", 2621370));
        config.add_channel(Channel::digital("DMR", 439_000_000, 1, TimeSlot::Ts2));
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
