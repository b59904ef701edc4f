// DMR APRS (GPS) settings record
// One record carries the shared settings of up to eight positioning systems;
// only the revert channel is stored per system.

use crate::bitwise::bcd::{decode_dmr_id, encode_dmr_id, BcdError};
use crate::bitwise::elements::{read_u16_le, write_u16_le};
use crate::bitwise::Endianness;
use crate::codeplug::context::Context;
use crate::codeplug::Result;
use crate::config::{
    CallType, ChannelRef, Config, DigitalContact, GpsSettings, GpsSystem, GpsSystemRef,
    RevertChannel, TimeSlot,
};
use crate::core::{Power, PowerCode};
use crate::memmap::Family;

element!(
    /// Shared GPS/APRS settings and per-system revert channels
    GpsSettingsElement,
    0x30
);

const MANUAL_INTERVAL: usize = 0x00;
const AUTO_INTERVAL: usize = 0x01;
const FIXED_LOCATION: usize = 0x02;
const LATITUDE: usize = 0x03;
const LONGITUDE: usize = 0x07;
const POWER: usize = 0x0b;
const REVERT_CHANNELS: usize = 0x0c;
const TARGET_ID: usize = 0x1c;
const CALL_TYPE: usize = 0x20;
const TIME_SLOT: usize = 0x21;

/// Number of positioning systems a record holds
pub const MAX_SYSTEMS: usize = 8;

const REVERT_VFO_A: u16 = 0x0fa0;
const REVERT_VFO_B: u16 = 0x0fa1;
const REVERT_SELECTED: u16 = 0x0fa2;

const CALL_PRIVATE: u8 = 0;
const CALL_GROUP: u8 = 1;
const CALL_ALL: u8 = 2;

/// Raw revert channel field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertField {
    Selected,
    VfoA,
    VfoB,
    Slot(usize),
}

/// Automatic report interval code for a period in seconds
fn period_code(period: u16) -> u8 {
    match period {
        0 => 0,
        p if p < 60 => 1,
        p => ((p - 45) / 15).min(u8::MAX as u16) as u8,
    }
}

fn decode_angle(data: &[u8]) -> f64 {
    let value = data[0] as f64 + data[1] as f64 / 60.0 + data[2] as f64 / 3600.0;
    if data[3] == 1 {
        -value
    } else {
        value
    }
}

fn encode_angle(dest: &mut [u8], angle: f64) {
    let mut rest = angle.abs();
    let deg = rest.trunc();
    rest = (rest - deg) * 60.0;
    let min = rest.trunc();
    rest = (rest - min) * 60.0;
    dest[0] = deg as u8;
    dest[1] = min as u8;
    dest[2] = rest.trunc() as u8;
    dest[3] = u8::from(angle < 0.0);
}

impl<B: AsRef<[u8]>> GpsSettingsElement<B> {
    pub fn manual_interval(&self) -> u8 {
        self.bytes()[MANUAL_INTERVAL]
    }

    /// Automatic report period in seconds, 0 when disabled
    pub fn period(&self) -> u16 {
        match self.bytes()[AUTO_INTERVAL] {
            0 => 0,
            code => 45 + 15 * code as u16,
        }
    }

    /// Latitude and longitude in degrees when a fixed location is reported
    pub fn fixed_location(&self) -> Option<(f64, f64)> {
        let data = self.bytes();
        if data[FIXED_LOCATION] == 0 {
            return None;
        }
        Some((
            decode_angle(&data[LATITUDE..LATITUDE + 4]),
            decode_angle(&data[LONGITUDE..LONGITUDE + 4]),
        ))
    }

    pub fn power(&self) -> Power {
        PowerCode::from_bits(self.bytes()[POWER]).into()
    }

    pub fn revert(&self, n: usize) -> RevertField {
        match read_u16_le(self.bytes(), REVERT_CHANNELS + 2 * n) {
            REVERT_VFO_A => RevertField::VfoA,
            REVERT_VFO_B => RevertField::VfoB,
            REVERT_SELECTED => RevertField::Selected,
            slot => RevertField::Slot(slot as usize),
        }
    }

    pub fn target_id(&self) -> std::result::Result<u32, BcdError> {
        decode_dmr_id(&self.bytes()[TARGET_ID..TARGET_ID + 4], Endianness::Big)
    }

    pub fn call_type(&self) -> CallType {
        match self.bytes()[CALL_TYPE] {
            CALL_GROUP => CallType::Group,
            CALL_ALL => CallType::All,
            _ => CallType::Private,
        }
    }

    /// None sends on the time slot of the revert channel
    pub fn time_slot(&self) -> Option<TimeSlot> {
        match self.bytes()[TIME_SLOT] {
            1 => Some(TimeSlot::Ts1),
            2 => Some(TimeSlot::Ts2),
            _ => None,
        }
    }

    /// Copy the shared settings into @gps
    pub fn update_settings(&self, gps: &mut GpsSettings) {
        gps.manual_interval = self.manual_interval();
        gps.fixed_location = self.fixed_location();
        gps.power = self.power();
        gps.time_slot = self.time_slot();
    }

    /// System @n as stored; contact and revert channel are resolved by [`Self::link`]
    pub fn to_object(&self, n: usize) -> GpsSystem {
        GpsSystem {
            period: self.period(),
            ..GpsSystem::new(format!("GPS sys {}", n + 1))
        }
    }

    /// Attach the target contact and revert channel to system @n
    ///
    /// The target is looked up by ID among the decoded contacts and created when
    /// missing. Only digital channels are accepted as revert channel.
    pub fn link(&self, n: usize, system: GpsSystemRef, config: &mut Config, ctx: &mut Context) {
        match self.target_id() {
            Ok(id) => {
                let contact = config.find_contact(id).unwrap_or_else(|| {
                    config.add_contact(DigitalContact {
                        name: "GPS target".to_string(),
                        call_type: self.call_type(),
                        number: id,
                        ring: false,
                    })
                });
                if let Some(sys) = config.gps_systems.get_mut(system.index()) {
                    sys.contact = Some(contact);
                }
            }
            Err(err) => ctx.warn(
                Family::GpsSystem,
                Some(n),
                format!("invalid target ID: {}", err),
            ),
        }

        let revert = match self.revert(n) {
            RevertField::Selected => RevertChannel::Selected,
            RevertField::VfoA => RevertChannel::VfoA,
            RevertField::VfoB => RevertChannel::VfoB,
            RevertField::Slot(slot) => match ctx.get::<ChannelRef>(slot) {
                Some(ch) if config.channel(ch).is_some_and(|c| c.is_digital()) => {
                    RevertChannel::Channel(ch)
                }
                Some(_) => {
                    ctx.warn(
                        Family::GpsSystem,
                        Some(n),
                        format!("revert channel {} is not digital, ignored", slot),
                    );
                    RevertChannel::Selected
                }
                None => {
                    ctx.warn(
                        Family::GpsSystem,
                        Some(n),
                        format!("revert channel {} unknown, ignored", slot),
                    );
                    RevertChannel::Selected
                }
            },
        };
        if let Some(sys) = config.gps_systems.get_mut(system.index()) {
            sys.revert = revert;
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> GpsSettingsElement<B> {
    /// Reset to device defaults: no reports, every system reverting to VFO B
    pub fn clear(&mut self) {
        let data = self.bytes_mut();
        data[..Self::SIZE].fill(0x00);
        data[POWER] = PowerCode::Low as u8;
        for n in 0..MAX_SYSTEMS {
            write_u16_le(data, REVERT_CHANNELS + 2 * n, REVERT_VFO_B);
        }
        data[TARGET_ID..TARGET_ID + 4].copy_from_slice(&[0x00, 0x00, 0x00, 0x01]);
        data[CALL_TYPE] = CALL_PRIVATE;
    }

    pub fn set_manual_interval(&mut self, seconds: u8) {
        self.bytes_mut()[MANUAL_INTERVAL] = seconds;
    }

    pub fn set_period(&mut self, seconds: u16) {
        self.bytes_mut()[AUTO_INTERVAL] = period_code(seconds);
    }

    pub fn set_fixed_location(&mut self, location: Option<(f64, f64)>) {
        let data = self.bytes_mut();
        match location {
            Some((lat, lon)) => {
                data[FIXED_LOCATION] = 1;
                encode_angle(&mut data[LATITUDE..LATITUDE + 4], lat);
                encode_angle(&mut data[LONGITUDE..LONGITUDE + 4], lon);
            }
            None => {
                data[FIXED_LOCATION] = 0;
                data[LATITUDE..POWER].fill(0x00);
            }
        }
    }

    pub fn set_power(&mut self, power: Power) {
        self.bytes_mut()[POWER] = PowerCode::from(power) as u8;
    }

    pub fn set_revert(&mut self, n: usize, revert: RevertField) {
        let value = match revert {
            RevertField::Selected => REVERT_SELECTED,
            RevertField::VfoA => REVERT_VFO_A,
            RevertField::VfoB => REVERT_VFO_B,
            RevertField::Slot(slot) => slot as u16,
        };
        write_u16_le(self.bytes_mut(), REVERT_CHANNELS + 2 * n, value);
    }

    pub fn set_target(&mut self, id: u32, call_type: CallType) -> std::result::Result<(), BcdError> {
        let bcd = encode_dmr_id(id, Endianness::Big)?;
        let data = self.bytes_mut();
        data[TARGET_ID..TARGET_ID + 4].copy_from_slice(&bcd);
        data[CALL_TYPE] = match call_type {
            CallType::Private => CALL_PRIVATE,
            CallType::Group => CALL_GROUP,
            CallType::All => CALL_ALL,
        };
        Ok(())
    }

    pub fn set_time_slot(&mut self, time_slot: Option<TimeSlot>) {
        self.bytes_mut()[TIME_SLOT] = match time_slot {
            None => 0,
            Some(TimeSlot::Ts1) => 1,
            Some(TimeSlot::Ts2) => 2,
        };
    }

    /// Encode the shared settings and every positioning system of @config
    ///
    /// Target and period are shared by all systems and taken from the first one.
    pub fn from_object(&mut self, config: &Config, ctx: &mut Context) -> Result<()> {
        self.clear();
        let gps = &config.settings.gps;
        self.set_manual_interval(gps.manual_interval);
        self.set_fixed_location(gps.fixed_location);
        self.set_power(gps.power);
        self.set_time_slot(gps.time_slot);

        let Some(first) = config.gps_systems.first() else {
            return Ok(());
        };
        if config.gps_systems.len() > MAX_SYSTEMS {
            ctx.warn(
                Family::GpsSystem,
                None,
                format!(
                    "{} positioning systems defined, only {} are stored",
                    config.gps_systems.len(),
                    MAX_SYSTEMS
                ),
            );
        }
        if config
            .gps_systems
            .iter()
            .any(|s| s.contact != first.contact || s.period != first.period)
        {
            ctx.warn(
                Family::GpsSystem,
                None,
                format!(
                    "positioning systems share one target and period, using those of '{}'",
                    first.name
                ),
            );
        }

        match first.contact.and_then(|c| config.contact(c)) {
            Some(contact) => self.set_target(contact.number, contact.call_type)?,
            None => ctx.warn(
                Family::GpsSystem,
                Some(0),
                format!("'{}' has no target contact", first.name),
            ),
        }
        self.set_period(first.period);

        for (n, system) in config.gps_systems.iter().take(MAX_SYSTEMS).enumerate() {
            let field = match system.revert {
                RevertChannel::Selected => RevertField::Selected,
                RevertChannel::VfoA => RevertField::VfoA,
                RevertChannel::VfoB => RevertField::VfoB,
                RevertChannel::Channel(ch) => match ctx.slot_of(ch) {
                    Some(slot) => RevertField::Slot(slot),
                    None => {
                        ctx.warn(
                            Family::GpsSystem,
                            Some(n),
                            format!(
                                "revert channel {} of '{}' not encoded",
                                ch.index(),
                                system.name
                            ),
                        );
                        RevertField::Selected
                    }
                },
            };
            self.set_revert(n, field);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Channel, ContactRef};

    #[test]
    fn test_period_codes() {
        assert_eq!(period_code(0), 0);
        assert_eq!(period_code(30), 1);
        assert_eq!(period_code(60), 1);
        assert_eq!(period_code(300), 17);

        let mut el = GpsSettingsElement::new([0u8; 0x30]).unwrap();
        el.set_period(300);
        assert_eq!(el.period(), 300);
        el.set_period(0);
        assert_eq!(el.period(), 0);
    }

    #[test]
    fn test_clear_defaults() {
        let mut el = GpsSettingsElement::new([0xffu8; 0x30]).unwrap();
        el.clear();
        for n in 0..MAX_SYSTEMS {
            assert_eq!(el.revert(n), RevertField::VfoB);
        }
        assert_eq!(el.target_id().unwrap(), 1);
        assert_eq!(el.call_type(), CallType::Private);
        assert_eq!(el.time_slot(), None);
        assert_eq!(el.fixed_location(), None);
    }

    #[test]
    fn test_fixed_location() {
        let mut el = GpsSettingsElement::new([0u8; 0x30]).unwrap();
        el.set_fixed_location(Some((52.5, -13.25)));
        assert_eq!(&el.as_bytes()[3..11], &[52, 30, 0, 0, 13, 15, 0, 1]);
        assert_eq!(el.fixed_location(), Some((52.5, -13.25)));
    }

    #[test]
    fn test_encode_and_link() {
        let mut config = Config::new();
        let ch = config.add_channel(Channel::digital("APRS", 439_000_000, 1, TimeSlot::Ts1));
        let target = config.add_contact(DigitalContact::private("APRS GW", 262999));
        let mut sys = GpsSystem::new("APRS");
        sys.contact = Some(target);
        sys.revert = RevertChannel::Channel(ch);
        config.add_gps_system(sys);

        let mut ctx = Context::new();
        ctx.add(0, ch);
        ctx.add(0, target);
        let mut el = GpsSettingsElement::new([0u8; 0x30]).unwrap();
        el.from_object(&config, &mut ctx).unwrap();
        assert_eq!(el.revert(0), RevertField::Slot(0));
        assert_eq!(el.revert(1), RevertField::VfoB);
        assert_eq!(el.target_id().unwrap(), 262999);
        assert!(ctx.warnings().is_empty());

        let mut decoded = Config::new();
        decoded.add_channel(Channel::digital("APRS", 439_000_000, 1, TimeSlot::Ts1));
        let sys = decoded.add_gps_system(el.to_object(0));
        let mut ctx = Context::new();
        ctx.add(0, ChannelRef(0));
        el.link(0, sys, &mut decoded, &mut ctx);

        let linked = &decoded.gps_systems[0];
        assert_eq!(linked.name, "GPS sys 1");
        assert_eq!(linked.period, 300);
        assert_eq!(linked.revert, RevertChannel::Channel(ChannelRef(0)));
        assert_eq!(linked.contact, Some(ContactRef(0)));
        assert_eq!(decoded.contacts[0].name, "GPS target");
        assert_eq!(decoded.contacts[0].number, 262999);
    }

    #[test]
    fn test_analog_revert_channel_rejected() {
        let mut config = Config::new();
        config.add_channel(Channel::analog("FM", 145_500_000));
        config.add_contact(DigitalContact::private("Target", 1));
        let sys = config.add_gps_system(GpsSystem::new("GPS sys 1"));

        let mut el = GpsSettingsElement::new([0u8; 0x30]).unwrap();
        el.clear();
        el.set_revert(0, RevertField::Slot(0));
        let mut ctx = Context::new();
        ctx.add(0, ChannelRef(0));
        el.link(0, sys, &mut config, &mut ctx);
        assert_eq!(config.gps_systems[0].revert, RevertChannel::Selected);
        assert_eq!(config.gps_systems[0].contact, Some(ContactRef(0)));
        assert_eq!(config.contacts.len(), 1);
        assert_eq!(ctx.warnings().len(), 1);
    }
}
