// General and boot settings records

use crate::bitwise::ascii::{decode_ascii, encode_ascii};
use crate::bitwise::bcd::{bcd_to_int_le, int_to_bcd_le, BcdError};
use crate::bitwise::elements::{get_bit, set_bit};
use crate::codeplug::EncodeFlags;
use crate::config::{AutoRepeater, DefaultChannels, DisplayColor, KeyLocks, Settings};

element!(
    /// Radio-wide settings block
    GeneralSettingsElement,
    0xd0
);

element!(
    /// Power-on intro text
    BootSettingsElement,
    0x30
);

const KEY_TONE: usize = 0x00;
const MIC_GAIN: usize = 0x20;
const GPS_ENABLE: usize = 0x22;
const GPS_GET_POSITION: usize = 0x23;
const GPS_TIME_ZONE: usize = 0x24;
const CALL_DISPLAY_COLOR: usize = 0xb0;
const GPS_UPDATE_PERIOD: usize = 0xb1;
const SHOW_ZONE_AND_CONTACT: usize = 0xb2;
const KEY_TONE_LEVEL: usize = 0xb3;
const GPS_UNITS: usize = 0xb4;
const KEY_LOCKS: usize = 0xb5;
const SHOW_LAST_HEARD: usize = 0xb6;
const AUTO_REPEATER_VHF_MIN: usize = 0xb8;
const AUTO_REPEATER_VHF_MAX: usize = 0xbc;
const AUTO_REPEATER_UHF_MIN: usize = 0xc0;
const AUTO_REPEATER_UHF_MAX: usize = 0xc4;
const AUTO_REPEATER_DIR_B: usize = 0xc8;
const DEFAULT_CHANNEL: usize = 0xca;
const DEFAULT_ZONE_A: usize = 0xcb;
const DEFAULT_ZONE_B: usize = 0xcc;
const DEFAULT_CHANNEL_A: usize = 0xcd;
const DEFAULT_CHANNEL_B: usize = 0xce;
const KEEP_LAST_CALLER: usize = 0xcf;

const LOCK_KNOB: u8 = 0;
const LOCK_KEYPAD: u8 = 1;
const LOCK_SIDE_KEYS: u8 = 3;
const LOCK_FORCED: u8 = 4;

const CHANNEL_VFO: u8 = 0xff;
const UTC_OFFSET: i16 = 12;

const INTRO_LINE1: usize = 0x00;
const INTRO_LINE2: usize = 0x10;
const INTRO_LEN: usize = 14;

/// Microphone gain code (0..4) for a level 1..10
fn mic_gain_code(level: u8) -> u8 {
    (level.max(1) - 1) / 2
}

impl<B: AsRef<[u8]>> GeneralSettingsElement<B> {
    fn flag(&self, offset: usize) -> bool {
        self.bytes()[offset] != 0
    }

    pub fn key_tone(&self) -> bool {
        self.flag(KEY_TONE)
    }

    /// Microphone level on a 1..10 scale
    pub fn mic_level(&self) -> u8 {
        2 * self.bytes()[MIC_GAIN].min(4) + 1
    }

    pub fn gps_enabled(&self) -> bool {
        self.flag(GPS_ENABLE)
    }

    /// Offset to UTC in hours
    pub fn gps_time_zone(&self) -> i8 {
        (self.bytes()[GPS_TIME_ZONE] as i16 - UTC_OFFSET) as i8
    }

    pub fn call_display_color(&self) -> DisplayColor {
        DisplayColor::from_code(self.bytes()[CALL_DISPLAY_COLOR])
    }

    /// Key tone level 1..15, None when adjustable on the radio
    pub fn key_tone_level(&self) -> Option<u8> {
        match self.bytes()[KEY_TONE_LEVEL] {
            0 => None,
            stored => Some(((stored as u16 * 15 + 5) / 10).min(15) as u8),
        }
    }

    pub fn locks(&self) -> KeyLocks {
        let data = self.bytes();
        KeyLocks {
            knob: get_bit(data, KEY_LOCKS, LOCK_KNOB),
            keypad: get_bit(data, KEY_LOCKS, LOCK_KEYPAD),
            side_keys: get_bit(data, KEY_LOCKS, LOCK_SIDE_KEYS),
            forced: get_bit(data, KEY_LOCKS, LOCK_FORCED),
        }
    }

    fn frequency(&self, offset: usize) -> Result<u64, BcdError> {
        Ok(bcd_to_int_le(&self.bytes()[offset..offset + 4])? * 10)
    }

    pub fn auto_repeater(&self) -> Result<AutoRepeater, BcdError> {
        Ok(AutoRepeater {
            vhf_min: self.frequency(AUTO_REPEATER_VHF_MIN)?,
            vhf_max: self.frequency(AUTO_REPEATER_VHF_MAX)?,
            uhf_min: self.frequency(AUTO_REPEATER_UHF_MIN)?,
            uhf_max: self.frequency(AUTO_REPEATER_UHF_MAX)?,
            direction_b: self.bytes()[AUTO_REPEATER_DIR_B],
        })
    }

    pub fn default_channels(&self) -> Option<DefaultChannels> {
        if !self.flag(DEFAULT_CHANNEL) {
            return None;
        }
        let data = self.bytes();
        let channel = |b: u8| (b != CHANNEL_VFO).then_some(b);
        Some(DefaultChannels {
            zone_a: data[DEFAULT_ZONE_A],
            zone_b: data[DEFAULT_ZONE_B],
            channel_a: channel(data[DEFAULT_CHANNEL_A]),
            channel_b: channel(data[DEFAULT_CHANNEL_B]),
        })
    }

    /// Copy every stored setting into @settings
    ///
    /// Fails on a corrupt auto-repeater window; everything else has been
    /// applied by then.
    pub fn update_settings(&self, settings: &mut Settings) -> Result<(), BcdError> {
        let data = self.bytes();
        settings.key_tone = self.key_tone();
        settings.mic_level = self.mic_level();
        settings.key_tone_level = self.key_tone_level();
        settings.call_display_color = self.call_display_color();
        settings.show_zone_and_contact = self.flag(SHOW_ZONE_AND_CONTACT);
        settings.show_last_heard = self.flag(SHOW_LAST_HEARD);
        settings.keep_last_caller = self.flag(KEEP_LAST_CALLER);
        settings.locks = self.locks();
        settings.default_channels = self.default_channels();

        settings.gps.enabled = self.gps_enabled();
        settings.gps.get_position = self.flag(GPS_GET_POSITION);
        settings.gps.time_zone = self.gps_time_zone();
        settings.gps.update_period = data[GPS_UPDATE_PERIOD];
        settings.gps.imperial_units = self.flag(GPS_UNITS);

        settings.auto_repeater = self.auto_repeater()?;
        Ok(())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> GeneralSettingsElement<B> {
    pub fn clear(&mut self) {
        self.bytes_mut()[..Self::SIZE].fill(0x00);
    }

    fn set_flag(&mut self, offset: usize, value: bool) {
        self.bytes_mut()[offset] = u8::from(value);
    }

    pub fn set_mic_level(&mut self, level: u8) {
        self.bytes_mut()[MIC_GAIN] = mic_gain_code(level).min(4);
    }

    pub fn set_key_tone_level(&mut self, level: Option<u8>) {
        self.bytes_mut()[KEY_TONE_LEVEL] = match level {
            None | Some(0) => 0,
            Some(level) => ((level.min(15) as u16 * 10 + 7) / 15) as u8,
        };
    }

    pub fn set_gps_time_zone(&mut self, hours: i8) {
        let clamped = (hours as i16).clamp(-UTC_OFFSET, UTC_OFFSET);
        self.bytes_mut()[GPS_TIME_ZONE] = (clamped + UTC_OFFSET) as u8;
    }

    pub fn set_locks(&mut self, locks: KeyLocks) {
        let data = self.bytes_mut();
        set_bit(data, KEY_LOCKS, LOCK_KNOB, locks.knob);
        set_bit(data, KEY_LOCKS, LOCK_KEYPAD, locks.keypad);
        set_bit(data, KEY_LOCKS, LOCK_SIDE_KEYS, locks.side_keys);
        set_bit(data, KEY_LOCKS, LOCK_FORCED, locks.forced);
    }

    fn set_frequency(&mut self, offset: usize, hz: u64) -> Result<(), BcdError> {
        int_to_bcd_le(hz / 10, &mut self.bytes_mut()[offset..offset + 4])
    }

    pub fn set_auto_repeater(&mut self, window: &AutoRepeater) -> Result<(), BcdError> {
        self.set_frequency(AUTO_REPEATER_VHF_MIN, window.vhf_min)?;
        self.set_frequency(AUTO_REPEATER_VHF_MAX, window.vhf_max)?;
        self.set_frequency(AUTO_REPEATER_UHF_MIN, window.uhf_min)?;
        self.set_frequency(AUTO_REPEATER_UHF_MAX, window.uhf_max)?;
        self.bytes_mut()[AUTO_REPEATER_DIR_B] = window.direction_b;
        Ok(())
    }

    pub fn set_default_channels(&mut self, defaults: Option<DefaultChannels>) {
        let data = self.bytes_mut();
        match defaults {
            Some(d) => {
                data[DEFAULT_CHANNEL] = 1;
                data[DEFAULT_ZONE_A] = d.zone_a;
                data[DEFAULT_ZONE_B] = d.zone_b;
                data[DEFAULT_CHANNEL_A] = d.channel_a.unwrap_or(CHANNEL_VFO);
                data[DEFAULT_CHANNEL_B] = d.channel_b.unwrap_or(CHANNEL_VFO);
            }
            None => {
                data[DEFAULT_CHANNEL] = 0;
                data[DEFAULT_ZONE_A] = 0;
                data[DEFAULT_ZONE_B] = 0;
                data[DEFAULT_CHANNEL_A] = CHANNEL_VFO;
                data[DEFAULT_CHANNEL_B] = CHANNEL_VFO;
            }
        }
    }

    /// Encode @settings
    ///
    /// With `auto_enable_gps` the receiver is switched on exactly when
    /// @requires_gps holds, using the time zone and units from @flags.
    pub fn from_object(
        &mut self,
        settings: &Settings,
        flags: &EncodeFlags,
        requires_gps: bool,
    ) -> Result<(), BcdError> {
        self.clear();
        self.set_flag(KEY_TONE, settings.key_tone);
        self.set_mic_level(settings.mic_level);
        self.set_key_tone_level(settings.key_tone_level);
        self.bytes_mut()[CALL_DISPLAY_COLOR] = settings.call_display_color.code();
        self.set_flag(SHOW_ZONE_AND_CONTACT, settings.show_zone_and_contact);
        self.set_flag(SHOW_LAST_HEARD, settings.show_last_heard);
        self.set_flag(KEEP_LAST_CALLER, settings.keep_last_caller);
        self.set_locks(settings.locks);
        self.set_default_channels(settings.default_channels);

        let gps = &settings.gps;
        self.set_flag(GPS_ENABLE, gps.enabled);
        self.set_flag(GPS_GET_POSITION, gps.get_position);
        self.set_gps_time_zone(gps.time_zone);
        self.bytes_mut()[GPS_UPDATE_PERIOD] = gps.update_period;
        self.set_flag(GPS_UNITS, gps.imperial_units);
        if flags.auto_enable_gps {
            self.set_flag(GPS_ENABLE, requires_gps);
            if requires_gps {
                self.set_gps_time_zone(flags.utc_offset_hours);
                self.set_flag(GPS_GET_POSITION, false);
                self.bytes_mut()[GPS_UPDATE_PERIOD] = 5;
                self.set_flag(GPS_UNITS, flags.imperial_units);
            }
        }

        self.set_auto_repeater(&settings.auto_repeater)
    }
}

impl<B: AsRef<[u8]>> BootSettingsElement<B> {
    pub fn intro_line1(&self) -> String {
        decode_ascii(&self.bytes()[INTRO_LINE1..INTRO_LINE1 + INTRO_LEN], 0x00)
    }

    pub fn intro_line2(&self) -> String {
        decode_ascii(&self.bytes()[INTRO_LINE2..INTRO_LINE2 + INTRO_LEN], 0x00)
    }

    pub fn update_settings(&self, settings: &mut Settings) {
        settings.intro_line1 = self.intro_line1();
        settings.intro_line2 = self.intro_line2();
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BootSettingsElement<B> {
    pub fn clear(&mut self) {
        self.bytes_mut()[..Self::SIZE].fill(0x00);
    }

    pub fn set_intro_line1(&mut self, line: &str) {
        encode_ascii(
            &mut self.bytes_mut()[INTRO_LINE1..INTRO_LINE1 + INTRO_LEN],
            line,
            0x00,
        );
    }

    pub fn set_intro_line2(&mut self, line: &str) {
        encode_ascii(
            &mut self.bytes_mut()[INTRO_LINE2..INTRO_LINE2 + INTRO_LEN],
            line,
            0x00,
        );
    }

    pub fn from_object(&mut self, settings: &Settings) {
        self.clear();
        self.set_intro_line1(&settings.intro_line1);
        self.set_intro_line2(&settings.intro_line2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(settings: &Settings, flags: &EncodeFlags, requires_gps: bool) -> Vec<u8> {
        let mut el = GeneralSettingsElement::new(vec![0xaau8; 0xd0]).unwrap();
        el.from_object(settings, flags, requires_gps).unwrap();
        el.as_bytes().to_vec()
    }

    fn decode(data: &[u8]) -> Settings {
        let el = GeneralSettingsElement::new(data).unwrap();
        let mut settings = Settings::default();
        el.update_settings(&mut settings).unwrap();
        settings
    }

    #[test]
    fn test_mic_level() {
        for (level, gain, back) in [(1, 0, 1), (3, 1, 3), (6, 2, 5), (10, 4, 9)] {
            let settings = Settings {
                mic_level: level,
                ..Settings::default()
            };
            let data = encode(&settings, &EncodeFlags::default(), false);
            assert_eq!(data[MIC_GAIN], gain);
            assert_eq!(decode(&data).mic_level, back);
        }
    }

    #[test]
    fn test_key_tone_level() {
        let mut el = GeneralSettingsElement::new([0u8; 0xd0]).unwrap();
        el.set_key_tone_level(Some(15));
        assert_eq!(el.as_bytes()[KEY_TONE_LEVEL], 10);
        assert_eq!(el.key_tone_level(), Some(15));
        el.set_key_tone_level(Some(3));
        assert_eq!(el.key_tone_level(), Some(3));
        el.set_key_tone_level(None);
        assert_eq!(el.key_tone_level(), None);
    }

    #[test]
    fn test_roundtrip() {
        let settings = Settings {
            key_tone: true,
            call_display_color: DisplayColor::Blue,
            show_last_heard: true,
            keep_last_caller: true,
            locks: KeyLocks {
                knob: true,
                keypad: false,
                side_keys: true,
                forced: true,
            },
            auto_repeater: AutoRepeater {
                vhf_min: 144_000_000,
                vhf_max: 146_000_000,
                uhf_min: 430_000_000,
                uhf_max: 440_000_000,
                direction_b: 2,
            },
            default_channels: Some(DefaultChannels {
                zone_a: 1,
                zone_b: 2,
                channel_a: Some(5),
                channel_b: None,
            }),
            ..Settings::default()
        };
        let data = encode(&settings, &EncodeFlags::default(), false);
        assert_eq!(data[KEY_LOCKS], 0b0001_1001);
        assert_eq!(data[DEFAULT_CHANNEL_B], 0xff);
        assert_eq!(&data[0xb8..0xbc], &[0x00, 0x00, 0x40, 0x14]);
        assert_eq!(decode(&data), settings);
    }

    #[test]
    fn test_auto_enable_gps() {
        let flags = EncodeFlags {
            auto_enable_gps: true,
            utc_offset_hours: 2,
            imperial_units: true,
        };
        let data = encode(&Settings::default(), &flags, true);
        assert_eq!(data[GPS_ENABLE], 1);
        assert_eq!(data[GPS_TIME_ZONE], 14);
        assert_eq!(data[GPS_UPDATE_PERIOD], 5);
        assert_eq!(data[GPS_UNITS], 1);

        let mut settings = Settings::default();
        settings.gps.enabled = true;
        let data = encode(&settings, &flags, false);
        assert_eq!(data[GPS_ENABLE], 0);
        assert_eq!(decode(&data).gps.time_zone, 0);
    }

    #[test]
    fn test_intro_lines() {
        let settings = Settings {
            intro_line1: "DL1ABC".to_string(),
            intro_line2: "A very long intro line".to_string(),
            ..Settings::default()
        };
        let mut el = BootSettingsElement::new([0xffu8; 0x30]).unwrap();
        el.from_object(&settings);
        assert_eq!(el.intro_line1(), "DL1ABC");
        assert_eq!(el.intro_line2(), "A very long in");

        let mut decoded = Settings::default();
        el.update_settings(&mut decoded);
        assert_eq!(decoded.intro_line1, "DL1ABC");
    }
}
