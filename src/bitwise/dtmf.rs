// DTMF digit strings packed as BCD nibbles
// Digits 0-9 map to themselves, A-D to 0xA-0xD, '*' to 0xE and '#' to 0xF.

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DtmfError {
    #[error("Invalid DTMF number: {0:?}")]
    InvalidNumber(String),

    #[error("DTMF number {number:?} exceeds {max} digits")]
    TooLong { number: String, max: usize },
}

pub type Result<T> = std::result::Result<T, DtmfError>;

lazy_static::lazy_static! {
    static ref DTMF_NUMBER: Regex = Regex::new(r"^[0-9A-Da-d*#]*$").expect("valid DTMF pattern");
}

/// Check whether @number consists only of DTMF digits
pub fn is_valid_dtmf(number: &str) -> bool {
    DTMF_NUMBER.is_match(number)
}

fn digit_to_nibble(c: char) -> Option<u8> {
    match c.to_ascii_uppercase() {
        '0'..='9' => Some(c as u8 - b'0'),
        c @ 'A'..='D' => Some(c as u8 - b'A' + 0x0A),
        '*' => Some(0x0E),
        '#' => Some(0x0F),
        _ => None,
    }
}

fn nibble_to_digit(n: u8) -> char {
    match n {
        0..=9 => (b'0' + n) as char,
        0x0A..=0x0D => (b'A' + n - 0x0A) as char,
        0x0E => '*',
        _ => '#',
    }
}

/// Encode @number into @dest, first digit in the high nibble of the first byte.
/// @dest is left untouched when the number is rejected.
pub fn encode_dtmf_bcd_be(number: &str, dest: &mut [u8]) -> Result<()> {
    if !is_valid_dtmf(number) {
        return Err(DtmfError::InvalidNumber(number.to_string()));
    }
    let max = dest.len() * 2;
    if number.len() > max {
        return Err(DtmfError::TooLong {
            number: number.to_string(),
            max,
        });
    }

    dest.fill(0);
    for (i, c) in number.chars().enumerate() {
        let nibble = digit_to_nibble(c).ok_or_else(|| DtmfError::InvalidNumber(number.to_string()))?;
        if i % 2 == 0 {
            dest[i / 2] |= nibble << 4;
        } else {
            dest[i / 2] |= nibble;
        }
    }
    Ok(())
}

/// Decode @digits DTMF digits from @data
pub fn decode_dtmf_bcd_be(data: &[u8], digits: usize) -> String {
    (0..digits.min(data.len() * 2))
        .map(|i| {
            let byte = data[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
            nibble_to_digit(nibble)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(is_valid_dtmf("0123456789ABCD*#"));
        assert!(is_valid_dtmf("abcd"));
        assert!(is_valid_dtmf(""));
        assert!(!is_valid_dtmf("12E"));
        assert!(!is_valid_dtmf("1 2"));
    }

    #[test]
    fn test_encode_decode() {
        let mut buf = [0u8; 7];
        encode_dtmf_bcd_be("123*#A", &mut buf).unwrap();
        assert_eq!(&buf[..3], &[0x12, 0x3E, 0xFA]);
        assert_eq!(decode_dtmf_bcd_be(&buf, 6), "123*#A");

        encode_dtmf_bcd_be("555", &mut buf).unwrap();
        assert_eq!(&buf[..2], &[0x55, 0x50]);
        assert_eq!(decode_dtmf_bcd_be(&buf, 3), "555");
    }

    #[test]
    fn test_rejects_without_mutation() {
        let mut buf = [0x77u8; 2];
        assert!(encode_dtmf_bcd_be("12X", &mut buf).is_err());
        assert_eq!(buf, [0x77, 0x77]);
        assert!(matches!(
            encode_dtmf_bcd_be("12345", &mut buf),
            Err(DtmfError::TooLong { max: 4, .. })
        ));
        assert_eq!(buf, [0x77, 0x77]);
    }
}
