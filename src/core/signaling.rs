// Sub-audio signaling: CTCSS tones and DCS codes

use super::constants::CTCSS_TONES;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Squelch signaling of an analog channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Signaling {
    #[default]
    None,
    /// CTCSS tone in tenths of Hz (885 = 88.5 Hz)
    Ctcss(u16),
    /// DCS code given by its octal digits (23 = D023)
    Dcs { code: u16, inverted: bool },
}

impl Signaling {
    /// CTCSS tone from a frequency in Hz
    pub fn ctcss_hz(hz: f32) -> Self {
        Signaling::Ctcss((hz * 10.0).round() as u16)
    }

    pub fn dcs(code: u16, inverted: bool) -> Self {
        Signaling::Dcs { code, inverted }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Signaling::None)
    }

    pub fn is_ctcss(&self) -> bool {
        matches!(self, Signaling::Ctcss(_))
    }

    pub fn is_dcs(&self) -> bool {
        matches!(self, Signaling::Dcs { .. })
    }
}

impl fmt::Display for Signaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signaling::None => write!(f, "none"),
            Signaling::Ctcss(t) => write!(f, "{}.{} Hz", t / 10, t % 10),
            Signaling::Dcs { code, inverted } => {
                write!(f, "D{:03}{}", code, if *inverted { 'I' } else { 'N' })
            }
        }
    }
}

/// Map an on-device CTCSS code to a tone.
/// Unsupported and out-of-range codes yield [`Signaling::None`].
pub fn ctcss_num_to_code(num: u8) -> Signaling {
    match CTCSS_TONES.get(num as usize) {
        Some(&tone) if tone != 0 => Signaling::Ctcss(tone),
        _ => Signaling::None,
    }
}

/// Map a tone to its on-device CTCSS code, 0 when the radio has no such code.
pub fn ctcss_code_to_num(code: Signaling) -> u8 {
    match code {
        Signaling::Ctcss(tone) => CTCSS_TONES
            .iter()
            .position(|&t| t == tone)
            .map(|i| i as u8)
            .unwrap_or(0),
        _ => 0,
    }
}

/// Stored DCS values carry the code's binary value; +512 marks inverted polarity.
const DCS_INVERTED: u16 = 512;

/// Convert octal digits (written as decimal) to the binary value. 23 -> 0o23 = 19
fn oct_digits_to_value(digits: u16) -> u16 {
    let mut value = 0;
    let mut scale = 1;
    let mut rest = digits;
    while rest > 0 {
        value += (rest % 10) * scale;
        scale *= 8;
        rest /= 10;
    }
    value
}

/// Convert a binary value to its octal digits written as decimal. 19 -> 23
fn value_to_oct_digits(value: u16) -> u16 {
    let mut digits = 0;
    let mut scale = 1;
    let mut rest = value;
    while rest > 0 {
        digits += (rest % 8) * scale;
        scale *= 10;
        rest /= 8;
    }
    digits
}

/// Decode a stored DCS field
pub fn decode_dcs(raw: u16) -> Signaling {
    if raw >= DCS_INVERTED {
        Signaling::dcs(value_to_oct_digits(raw - DCS_INVERTED), true)
    } else {
        Signaling::dcs(value_to_oct_digits(raw), false)
    }
}

/// Encode a DCS code, 0 for anything that is not DCS
pub fn encode_dcs(code: Signaling) -> u16 {
    match code {
        Signaling::Dcs { code, inverted } => {
            let value = oct_digits_to_value(code) & 0x1ff;
            if inverted {
                value + DCS_INVERTED
            } else {
                value
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctcss_table_roundtrip() {
        for num in 0..52u8 {
            let code = ctcss_num_to_code(num);
            if code.is_none() {
                continue;
            }
            assert_eq!(ctcss_code_to_num(code), num);
        }
    }

    #[test]
    fn test_unsupported_ctcss() {
        // 69.3 Hz sits in the table but is not supported
        assert_eq!(ctcss_num_to_code(2), Signaling::None);
        assert_eq!(ctcss_code_to_num(Signaling::ctcss_hz(69.3)), 0);
        assert_eq!(ctcss_num_to_code(52), Signaling::None);
        assert_eq!(ctcss_num_to_code(0xff), Signaling::None);
        assert_eq!(ctcss_code_to_num(Signaling::None), 0);
    }

    #[test]
    fn test_ctcss_lookup() {
        assert_eq!(ctcss_code_to_num(Signaling::ctcss_hz(88.5)), 9);
        assert_eq!(ctcss_num_to_code(1), Signaling::Ctcss(670));
    }

    #[test]
    fn test_dcs() {
        assert_eq!(encode_dcs(Signaling::dcs(23, false)), 19);
        assert_eq!(encode_dcs(Signaling::dcs(23, true)), 19 + 512);
        assert_eq!(decode_dcs(19), Signaling::dcs(23, false));
        assert_eq!(decode_dcs(19 + 512), Signaling::dcs(23, true));
        assert_eq!(decode_dcs(encode_dcs(Signaling::dcs(754, true))), Signaling::dcs(754, true));
        assert_eq!(encode_dcs(Signaling::Ctcss(885)), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Signaling::Ctcss(885).to_string(), "88.5 Hz");
        assert_eq!(Signaling::dcs(23, true).to_string(), "D023I");
    }
}
