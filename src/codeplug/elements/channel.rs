// Channel record

use super::name_in_use;
use crate::bitwise::ascii::{decode_ascii, encode_ascii};
use crate::bitwise::bcd::BcdError;
use crate::bitwise::elements::{
    get_bit, get_bits, read_u16_le, read_u32_le, set_bit, set_bits, write_u16_le, write_u32_le,
};
use crate::codeplug::context::{Context, Handle};
use crate::codeplug::Result;
use crate::config::{
    AnalogAdmit, AnalogChannel, Bandwidth, Channel, ChannelMode, ContactRef,
    DigitalAdmit, DigitalChannel, GpsSystemRef, GroupListRef, RadioIdRef, ScanListRef, TimeSlot,
};
use crate::core::frequency::{decode_frequency, encode_frequency, split_offset, tx_frequency};
use crate::core::signaling::{ctcss_code_to_num, ctcss_num_to_code, decode_dcs, encode_dcs};
use crate::core::{Power, PowerCode, RepeaterMode, Signaling, DEFAULT_CUSTOM_CTCSS};
use crate::memmap::Family;

element!(
    /// Analog or digital channel, also used for the VFO records
    ChannelElement,
    0x40
);

const RX_FREQUENCY: usize = 0x00;
const TX_OFFSET: usize = 0x04;
const MODE_FLAGS: usize = 0x08;
const TONE_FLAGS: usize = 0x09;
const CTCSS_TX: usize = 0x0a;
const CTCSS_RX: usize = 0x0b;
const DCS_TX: usize = 0x0c;
const DCS_RX: usize = 0x0e;
const CUSTOM_CTCSS: usize = 0x10;
const TX_CONTACT: usize = 0x14;
const RADIO_ID: usize = 0x18;
const SQUELCH: usize = 0x19;
const ADMIT: usize = 0x1a;
const SCAN_LIST: usize = 0x1b;
const GROUP_LIST: usize = 0x1c;
const COLOR_CODE: usize = 0x20;
const SLOT_FLAGS: usize = 0x21;
const NAME: usize = 0x23;
const NAME_LEN: usize = 16;
const APRS_FLAGS: usize = 0x34;
const APRS_SYSTEM: usize = 0x35;

const ADMIT_ALWAYS: u8 = 0;
const ADMIT_FREE: u8 = 1;
const ADMIT_CC_SAME: u8 = 2;
const ADMIT_CC_DIFF: u8 = 3;

const NO_CONTACT: u32 = 0xffff_ffff;
const NO_LIST: u8 = 0xff;

/// Contents of the two mode bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Analog,
    Digital,
    /// Receives both, transmits analog
    MixedAnalog,
    /// Receives both, transmits digital
    MixedDigital,
}

impl ChannelType {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => ChannelType::Analog,
            1 => ChannelType::Digital,
            2 => ChannelType::MixedAnalog,
            _ => ChannelType::MixedDigital,
        }
    }

    fn bits(self) -> u8 {
        match self {
            ChannelType::Analog => 0,
            ChannelType::Digital => 1,
            ChannelType::MixedAnalog => 2,
            ChannelType::MixedDigital => 3,
        }
    }
}

impl<B: AsRef<[u8]>> ChannelElement<B> {
    pub fn is_valid(&self) -> bool {
        name_in_use(self.bytes()[NAME])
    }

    pub fn name(&self) -> String {
        decode_ascii(&self.bytes()[NAME..NAME + NAME_LEN], 0x00)
    }

    pub fn rx_frequency(&self) -> std::result::Result<u64, BcdError> {
        decode_frequency(&self.bytes()[RX_FREQUENCY..])
    }

    pub fn tx_offset(&self) -> std::result::Result<u64, BcdError> {
        decode_frequency(&self.bytes()[TX_OFFSET..])
    }

    pub fn repeater_mode(&self) -> RepeaterMode {
        RepeaterMode::from_bits(get_bits(self.bytes(), MODE_FLAGS, 6, 2))
    }

    pub fn tx_frequency(&self) -> std::result::Result<u64, BcdError> {
        Ok(tx_frequency(
            self.rx_frequency()?,
            self.tx_offset()?,
            self.repeater_mode(),
        ))
    }

    pub fn channel_type(&self) -> ChannelType {
        ChannelType::from_bits(get_bits(self.bytes(), MODE_FLAGS, 0, 2))
    }

    pub fn power(&self) -> Power {
        PowerCode::from_bits(get_bits(self.bytes(), MODE_FLAGS, 2, 2)).into()
    }

    pub fn bandwidth(&self) -> Bandwidth {
        if get_bit(self.bytes(), MODE_FLAGS, 4) {
            Bandwidth::Wide
        } else {
            Bandwidth::Narrow
        }
    }

    pub fn rx_only(&self) -> bool {
        get_bit(self.bytes(), TONE_FLAGS, 5)
    }

    /// Squelch opens on the receive tone only
    pub fn tone_squelch(&self) -> bool {
        get_bits(self.bytes(), SQUELCH, 4, 2) == 1
    }

    /// Receive tone, ignored unless the squelch is in tone mode
    pub fn rx_tone(&self) -> Signaling {
        if !self.tone_squelch() {
            return Signaling::None;
        }
        let data = self.bytes();
        if get_bit(data, TONE_FLAGS, 0) {
            ctcss_num_to_code(data[CTCSS_RX])
        } else if get_bit(data, TONE_FLAGS, 1) {
            decode_dcs(read_u16_le(data, DCS_RX))
        } else {
            Signaling::None
        }
    }

    pub fn tx_tone(&self) -> Signaling {
        let data = self.bytes();
        if get_bit(data, TONE_FLAGS, 2) {
            ctcss_num_to_code(data[CTCSS_TX])
        } else if get_bit(data, TONE_FLAGS, 3) {
            decode_dcs(read_u16_le(data, DCS_TX))
        } else {
            Signaling::None
        }
    }

    pub fn custom_ctcss(&self) -> u16 {
        read_u16_le(self.bytes(), CUSTOM_CTCSS)
    }

    pub fn admit_code(&self) -> u8 {
        get_bits(self.bytes(), ADMIT, 0, 2)
    }

    pub fn tx_contact_slot(&self) -> Option<usize> {
        match read_u32_le(self.bytes(), TX_CONTACT) {
            NO_CONTACT => None,
            slot => Some(slot as usize),
        }
    }

    pub fn radio_id_slot(&self) -> usize {
        self.bytes()[RADIO_ID] as usize
    }

    pub fn scan_list_slot(&self) -> Option<usize> {
        match self.bytes()[SCAN_LIST] {
            NO_LIST => None,
            slot => Some(slot as usize),
        }
    }

    pub fn group_list_slot(&self) -> Option<usize> {
        match self.bytes()[GROUP_LIST] {
            NO_LIST => None,
            slot => Some(slot as usize),
        }
    }

    pub fn color_code(&self) -> u8 {
        self.bytes()[COLOR_CODE]
    }

    pub fn time_slot(&self) -> TimeSlot {
        if get_bit(self.bytes(), SLOT_FLAGS, 0) {
            TimeSlot::Ts2
        } else {
            TimeSlot::Ts1
        }
    }

    /// Positioning system used for digital APRS reports
    pub fn aprs_system(&self) -> Option<usize> {
        if get_bit(self.bytes(), APRS_FLAGS, 0) {
            Some(self.bytes()[APRS_SYSTEM] as usize)
        } else {
            None
        }
    }

    /// Build the channel object, references are resolved by [`Self::link`].
    pub fn to_object(&self, slot: usize, ctx: &mut Context) -> Option<Channel> {
        let name = self.name();
        let (rx_frequency, tx_frequency) = match (self.rx_frequency(), self.tx_frequency()) {
            (Ok(rx), Ok(tx)) => (rx, tx),
            (Err(e), _) | (_, Err(e)) => {
                ctx.warn(
                    Family::Channel,
                    Some(slot),
                    format!("cannot decode frequency of '{}': {}", name, e),
                );
                return None;
            }
        };

        let mode = match self.channel_type() {
            ChannelType::Analog => ChannelMode::Analog(AnalogChannel {
                admit: match self.admit_code() {
                    ADMIT_FREE => AnalogAdmit::Free,
                    _ => AnalogAdmit::Always,
                },
                rx_tone: self.rx_tone(),
                tx_tone: self.tx_tone(),
                bandwidth: self.bandwidth(),
            }),
            ChannelType::Digital => ChannelMode::Digital(DigitalChannel {
                admit: match self.admit_code() {
                    ADMIT_FREE => DigitalAdmit::Free,
                    ADMIT_CC_SAME | ADMIT_CC_DIFF => DigitalAdmit::ColorCode,
                    _ => DigitalAdmit::Always,
                },
                color_code: self.color_code(),
                time_slot: self.time_slot(),
                ..Default::default()
            }),
            other => {
                ctx.warn(
                    Family::Channel,
                    Some(slot),
                    format!("cannot create channel '{}': {:?} mode not supported", name, other),
                );
                return None;
            }
        };

        Some(Channel {
            name,
            rx_frequency,
            tx_frequency,
            power: self.power(),
            rx_only: self.rx_only(),
            scan_list: None,
            mode,
        })
    }

    /// Resolve the slot references of this record into @channel
    pub fn link(&self, channel: &mut Channel, slot: usize, ctx: &mut Context) {
        if let Some(idx) = self.scan_list_slot() {
            channel.scan_list = ctx.get::<ScanListRef>(idx);
            if channel.scan_list.is_none() {
                ctx.warn(
                    Family::Channel,
                    Some(slot),
                    format!("scan list {} of '{}' unknown", idx, channel.name),
                );
            }
        }

        let name = channel.name.clone();
        let Some(digital) = channel.as_digital_mut() else {
            return;
        };

        if let Some(idx) = self.tx_contact_slot() {
            digital.tx_contact = ctx.get::<ContactRef>(idx);
            if digital.tx_contact.is_none() {
                ctx.warn(
                    Family::Channel,
                    Some(slot),
                    format!("transmit contact {} of '{}' unknown", idx, name),
                );
            }
        }

        if let Some(idx) = self.group_list_slot() {
            digital.group_list = ctx.get::<GroupListRef>(idx);
            if digital.group_list.is_none() {
                ctx.warn(
                    Family::Channel,
                    Some(slot),
                    format!("group list {} of '{}' unknown", idx, name),
                );
            }
        }

        // Slot 0 is the radio's default ID.
        let idx = self.radio_id_slot();
        if idx != 0 {
            digital.radio_id = ctx.get::<RadioIdRef>(idx);
            if digital.radio_id.is_none() {
                ctx.warn(
                    Family::Channel,
                    Some(slot),
                    format!("radio ID {} of '{}' unknown", idx, name),
                );
            }
        }

        if let Some(idx) = self.aprs_system() {
            digital.aprs = ctx.get::<GpsSystemRef>(idx);
            if digital.aprs.is_none() {
                ctx.warn(
                    Family::Channel,
                    Some(slot),
                    format!("GPS system {} of '{}' unknown", idx, name),
                );
            }
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ChannelElement<B> {
    /// Reset to an unused record
    pub fn clear(&mut self) {
        let data = self.bytes_mut();
        data[..Self::SIZE].fill(0x00);
        write_u16_le(data, CUSTOM_CTCSS, DEFAULT_CUSTOM_CTCSS);
        data[SCAN_LIST] = NO_LIST;
        data[GROUP_LIST] = NO_LIST;
        write_u32_le(data, TX_CONTACT, NO_CONTACT);
    }

    pub fn set_name(&mut self, name: &str) {
        encode_ascii(&mut self.bytes_mut()[NAME..NAME + NAME_LEN], name, 0x00);
    }

    pub fn set_rx_frequency(&mut self, hz: u64) -> std::result::Result<(), BcdError> {
        encode_frequency(hz, &mut self.bytes_mut()[RX_FREQUENCY..])
    }

    /// Store @hz as offset and direction relative to the receive frequency
    pub fn set_tx_frequency(&mut self, rx: u64, hz: u64) -> std::result::Result<(), BcdError> {
        let (offset, mode) = split_offset(rx, hz);
        encode_frequency(offset, &mut self.bytes_mut()[TX_OFFSET..])?;
        set_bits(self.bytes_mut(), MODE_FLAGS, 6, 2, mode.to_bits());
        Ok(())
    }

    pub fn set_channel_type(&mut self, ty: ChannelType) {
        set_bits(self.bytes_mut(), MODE_FLAGS, 0, 2, ty.bits());
    }

    pub fn set_power(&mut self, power: Power) {
        set_bits(self.bytes_mut(), MODE_FLAGS, 2, 2, PowerCode::from(power) as u8);
    }

    pub fn set_bandwidth(&mut self, bw: Bandwidth) {
        set_bit(self.bytes_mut(), MODE_FLAGS, 4, bw == Bandwidth::Wide);
    }

    pub fn set_rx_only(&mut self, enable: bool) {
        set_bit(self.bytes_mut(), TONE_FLAGS, 5, enable);
    }

    /// Set the receive tone and the matching squelch mode.
    /// Returns false when the tone has no device code and was dropped.
    pub fn set_rx_tone(&mut self, tone: Signaling) -> bool {
        let data = self.bytes_mut();
        set_bit(data, TONE_FLAGS, 0, false);
        set_bit(data, TONE_FLAGS, 1, false);
        data[CTCSS_RX] = 0;
        write_u16_le(data, DCS_RX, 0);
        set_bits(data, SQUELCH, 4, 2, 0);
        match tone {
            Signaling::None => true,
            Signaling::Ctcss(_) => match ctcss_code_to_num(tone) {
                0 => false,
                num => {
                    set_bit(data, TONE_FLAGS, 0, true);
                    data[CTCSS_RX] = num;
                    set_bits(data, SQUELCH, 4, 2, 1);
                    true
                }
            },
            Signaling::Dcs { .. } => {
                set_bit(data, TONE_FLAGS, 1, true);
                write_u16_le(data, DCS_RX, encode_dcs(tone));
                set_bits(data, SQUELCH, 4, 2, 1);
                true
            }
        }
    }

    /// Set the transmit tone.
    /// Returns false when the tone has no device code and was dropped.
    pub fn set_tx_tone(&mut self, tone: Signaling) -> bool {
        let data = self.bytes_mut();
        set_bit(data, TONE_FLAGS, 2, false);
        set_bit(data, TONE_FLAGS, 3, false);
        data[CTCSS_TX] = 0;
        write_u16_le(data, DCS_TX, 0);
        match tone {
            Signaling::None => true,
            Signaling::Ctcss(_) => match ctcss_code_to_num(tone) {
                0 => false,
                num => {
                    set_bit(data, TONE_FLAGS, 2, true);
                    data[CTCSS_TX] = num;
                    true
                }
            },
            Signaling::Dcs { .. } => {
                set_bit(data, TONE_FLAGS, 3, true);
                write_u16_le(data, DCS_TX, encode_dcs(tone));
                true
            }
        }
    }

    pub fn set_admit_code(&mut self, code: u8) {
        set_bits(self.bytes_mut(), ADMIT, 0, 2, code);
    }

    pub fn set_tx_contact_slot(&mut self, slot: Option<usize>) {
        let value = slot.map_or(NO_CONTACT, |s| s as u32);
        write_u32_le(self.bytes_mut(), TX_CONTACT, value);
    }

    pub fn set_radio_id_slot(&mut self, slot: usize) {
        self.bytes_mut()[RADIO_ID] = slot as u8;
    }

    pub fn set_scan_list_slot(&mut self, slot: Option<usize>) {
        self.bytes_mut()[SCAN_LIST] = slot.map_or(NO_LIST, |s| s as u8);
    }

    pub fn set_group_list_slot(&mut self, slot: Option<usize>) {
        self.bytes_mut()[GROUP_LIST] = slot.map_or(NO_LIST, |s| s as u8);
    }

    pub fn set_color_code(&mut self, cc: u8) {
        self.bytes_mut()[COLOR_CODE] = cc;
    }

    pub fn set_time_slot(&mut self, ts: TimeSlot) {
        set_bit(self.bytes_mut(), SLOT_FLAGS, 0, ts == TimeSlot::Ts2);
    }

    pub fn set_aprs_system(&mut self, system: Option<usize>) {
        let data = self.bytes_mut();
        set_bit(data, APRS_FLAGS, 0, system.is_some());
        data[APRS_SYSTEM] = system.unwrap_or(0) as u8;
    }

    /// Encode @channel into this record.
    /// References are written as slots looked up in @ctx; unknown ones are
    /// dropped with a warning.
    pub fn from_object(&mut self, channel: &Channel, slot: usize, ctx: &mut Context) -> Result<()> {
        self.clear();
        self.set_name(&channel.name);
        self.set_rx_frequency(channel.rx_frequency)?;
        self.set_tx_frequency(channel.rx_frequency, channel.tx_frequency)?;
        self.set_power(channel.power);
        self.set_rx_only(channel.rx_only);
        let scan_list = lookup(ctx, channel.scan_list, slot, NO_LIST as usize, "scan list");
        self.set_scan_list_slot(scan_list);

        match &channel.mode {
            ChannelMode::Analog(analog) => {
                self.set_channel_type(ChannelType::Analog);
                // Tone admit has no device counterpart.
                self.set_admit_code(match analog.admit {
                    AnalogAdmit::Free => ADMIT_FREE,
                    AnalogAdmit::Always | AnalogAdmit::Tone => ADMIT_ALWAYS,
                });
                if !self.set_rx_tone(analog.rx_tone) {
                    ctx.warn(
                        Family::Channel,
                        Some(slot),
                        format!("receive tone {} of '{}' not supported", analog.rx_tone, channel.name),
                    );
                }
                if !self.set_tx_tone(analog.tx_tone) {
                    ctx.warn(
                        Family::Channel,
                        Some(slot),
                        format!("transmit tone {} of '{}' not supported", analog.tx_tone, channel.name),
                    );
                }
                self.set_bandwidth(analog.bandwidth);
            }
            ChannelMode::Digital(digital) => {
                self.set_channel_type(ChannelType::Digital);
                self.set_admit_code(match digital.admit {
                    DigitalAdmit::Always => ADMIT_ALWAYS,
                    DigitalAdmit::Free => ADMIT_FREE,
                    DigitalAdmit::ColorCode => ADMIT_CC_SAME,
                });
                self.set_color_code(digital.color_code);
                self.set_time_slot(digital.time_slot);

                let contact = lookup(ctx, digital.tx_contact, slot, usize::MAX, "transmit contact");
                self.set_tx_contact_slot(contact);
                let group = lookup(ctx, digital.group_list, slot, NO_LIST as usize, "group list");
                self.set_group_list_slot(group);
                let id = lookup(ctx, digital.radio_id, slot, 0x100, "radio ID");
                self.set_radio_id_slot(id.unwrap_or(0));
                let aprs = lookup(ctx, digital.aprs, slot, 8, "GPS system");
                self.set_aprs_system(aprs);
            }
        }
        Ok(())
    }
}

/// Slot of @handle if it was encoded and is below @limit
fn lookup<H: Handle>(
    ctx: &mut Context,
    handle: Option<H>,
    slot: usize,
    limit: usize,
    what: &str,
) -> Option<usize> {
    let handle = handle?;
    match ctx.slot_of(handle) {
        Some(s) if s < limit => Some(s),
        _ => {
            ctx.warn(
                Family::Channel,
                Some(slot),
                format!("{} {} not encoded, reference dropped", what, handle.to_index()),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> ChannelElement<[u8; 0x40]> {
        let mut el = ChannelElement::new([0u8; 0x40]).unwrap();
        el.clear();
        el
    }

    #[test]
    fn test_clear() {
        let el = element();
        assert!(!el.is_valid());
        assert_eq!(el.custom_ctcss(), 0x09cf);
        assert_eq!(el.scan_list_slot(), None);
        assert_eq!(el.group_list_slot(), None);
        assert_eq!(el.tx_contact_slot(), None);
    }

    #[test]
    fn test_short_buffer_rejected() {
        assert!(ChannelElement::new([0u8; 0x20]).is_err());
    }

    #[test]
    fn test_analog_channel() {
        let mut ctx = Context::new();
        let mut el = element();
        let mut ch = Channel::analog("Relay", 145_600_000).with_tx(145_000_000);
        if let Some(a) = ch.as_analog_mut() {
            a.rx_tone = Signaling::ctcss_hz(88.5);
            a.tx_tone = Signaling::dcs(23, true);
            a.bandwidth = Bandwidth::Wide;
            a.admit = AnalogAdmit::Tone;
        }
        el.from_object(&ch, 0, &mut ctx).unwrap();

        let data = el.as_bytes();
        assert_eq!(&data[0..4], &[0x14, 0x56, 0x00, 0x00]);
        assert_eq!(&data[4..8], &[0x00, 0x06, 0x00, 0x00]);
        assert_eq!(el.repeater_mode(), RepeaterMode::Negative);
        assert!(el.tone_squelch());
        assert_eq!(el.bandwidth(), Bandwidth::Wide);

        let decoded = el.to_object(0, &mut ctx).unwrap();
        assert_eq!(decoded.name, "Relay");
        assert_eq!(decoded.tx_frequency, 145_000_000);
        let a = decoded.as_analog().unwrap();
        assert_eq!(a.rx_tone, Signaling::Ctcss(885));
        assert_eq!(a.tx_tone, Signaling::dcs(23, true));
        // Tone admit is stored as always.
        assert_eq!(a.admit, AnalogAdmit::Always);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_rx_tone_needs_tone_squelch() {
        let mut el = element();
        el.set_rx_tone(Signaling::ctcss_hz(88.5));
        set_bits(el.bytes_mut(), SQUELCH, 4, 2, 0);
        assert_eq!(el.rx_tone(), Signaling::None);
    }

    #[test]
    fn test_unsupported_tone_warns() {
        let mut ctx = Context::new();
        let mut el = element();
        let mut ch = Channel::analog("Odd", 145_500_000);
        if let Some(a) = ch.as_analog_mut() {
            a.tx_tone = Signaling::ctcss_hz(69.3);
        }
        el.from_object(&ch, 4, &mut ctx).unwrap();
        assert_eq!(el.tx_tone(), Signaling::None);
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].slot, Some(4));
    }

    #[test]
    fn test_digital_channel_references() {
        let mut ctx = Context::new();
        ctx.add(5, ContactRef(0));
        ctx.add(2, GroupListRef(0));
        ctx.add(0, GpsSystemRef(0));

        let mut el = element();
        let mut ch = Channel::digital("DMR", 439_000_000, 1, TimeSlot::Ts2).with_tx(431_400_000);
        ch.power = Power::Max;
        if let Some(d) = ch.as_digital_mut() {
            d.tx_contact = Some(ContactRef(0));
            d.group_list = Some(GroupListRef(0));
            d.aprs = Some(GpsSystemRef(0));
            d.admit = DigitalAdmit::ColorCode;
        }
        el.from_object(&ch, 0, &mut ctx).unwrap();
        assert_eq!(el.channel_type(), ChannelType::Digital);
        assert_eq!(el.tx_contact_slot(), Some(5));
        assert_eq!(el.group_list_slot(), Some(2));
        assert_eq!(el.aprs_system(), Some(0));
        assert_eq!(el.power(), Power::Max);
        assert_eq!(el.admit_code(), ADMIT_CC_SAME);

        let mut decoded = el.to_object(0, &mut ctx).unwrap();
        el.link(&mut decoded, 0, &mut ctx);
        assert_eq!(decoded, ch);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_dangling_reference_dropped() {
        let mut ctx = Context::new();
        let mut el = element();
        let mut ch = Channel::digital("DMR", 439_000_000, 1, TimeSlot::Ts1);
        if let Some(d) = ch.as_digital_mut() {
            d.tx_contact = Some(ContactRef(3));
        }
        el.from_object(&ch, 1, &mut ctx).unwrap();
        assert_eq!(el.tx_contact_slot(), None);
        assert_eq!(ctx.warnings().len(), 1);

        // Decoding a slot nobody created
        el.set_tx_contact_slot(Some(9));
        let mut decoded = el.to_object(1, &mut ctx).unwrap();
        el.link(&mut decoded, 1, &mut ctx);
        assert_eq!(decoded.as_digital().unwrap().tx_contact, None);
        assert_eq!(ctx.warnings().len(), 2);
    }

    #[test]
    fn test_mixed_mode_skipped() {
        let mut ctx = Context::new();
        let mut el = element();
        el.set_name("Mixed");
        el.set_channel_type(ChannelType::MixedAnalog);
        assert!(el.to_object(7, &mut ctx).is_none());
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_frequency_overflow_fails() {
        let mut ctx = Context::new();
        let mut el = element();
        let ch = Channel::analog("Too high", 1_500_000_000);
        assert!(el.from_object(&ch, 0, &mut ctx).is_err());
    }
}
