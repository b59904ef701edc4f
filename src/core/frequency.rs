// Frequency encoding
// Frequencies are 8-digit BCD in units of 10 Hz, most significant digits first.

use crate::bitwise::bcd::{int_to_bcd_be, BcdError};
use crate::bitwise::parser::parse_bcd_be;
use serde::{Deserialize, Serialize};

/// Repeater shift direction of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RepeaterMode {
    #[default]
    Simplex,
    Positive,
    Negative,
}

impl RepeaterMode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            1 => RepeaterMode::Positive,
            2 => RepeaterMode::Negative,
            _ => RepeaterMode::Simplex,
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            RepeaterMode::Simplex => 0,
            RepeaterMode::Positive => 1,
            RepeaterMode::Negative => 2,
        }
    }
}

/// Decode a 4-byte frequency field to Hz
pub fn decode_frequency(bytes: &[u8]) -> Result<u64, BcdError> {
    match parse_bcd_be(4)(bytes) {
        Ok((_, value)) => Ok(value * 10),
        Err(_) => Err(BcdError::InvalidDigit(bytes.first().copied().unwrap_or(0))),
    }
}

/// Encode a frequency in Hz into a 4-byte field, truncating below 10 Hz
pub fn encode_frequency(hz: u64, dest: &mut [u8]) -> Result<(), BcdError> {
    int_to_bcd_be(hz / 10, &mut dest[..4])
}

/// Derive the transmit frequency from RX, offset and direction
pub fn tx_frequency(rx: u64, offset: u64, mode: RepeaterMode) -> u64 {
    match mode {
        RepeaterMode::Simplex => rx,
        RepeaterMode::Positive => rx + offset,
        RepeaterMode::Negative => rx.saturating_sub(offset),
    }
}

/// Split a TX frequency into offset and direction relative to @rx
pub fn split_offset(rx: u64, tx: u64) -> (u64, RepeaterMode) {
    if tx > rx {
        (tx - rx, RepeaterMode::Positive)
    } else if tx < rx {
        (rx - tx, RepeaterMode::Negative)
    } else {
        (0, RepeaterMode::Simplex)
    }
}

/// Format Hz as MHz with five decimals
pub fn format_mhz(hz: u64) -> String {
    format!("{}.{:05}", hz / 1_000_000, (hz % 1_000_000) / 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let mut buf = [0u8; 4];
        encode_frequency(145_000_000, &mut buf).unwrap();
        assert_eq!(buf, [0x14, 0x50, 0x00, 0x00]);
        assert_eq!(decode_frequency(&buf).unwrap(), 145_000_000);

        encode_frequency(438_012_510, &mut buf).unwrap();
        assert_eq!(decode_frequency(&buf).unwrap(), 438_012_510);
    }

    #[test]
    fn test_out_of_range() {
        let mut buf = [0u8; 4];
        assert!(encode_frequency(1_000_000_000, &mut buf).is_err());
        assert!(decode_frequency(&[0xff, 0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_tx_derivation() {
        assert_eq!(
            tx_frequency(145_000_000, 600_000, RepeaterMode::Positive),
            145_600_000
        );
        assert_eq!(
            tx_frequency(438_000_000, 7_600_000, RepeaterMode::Negative),
            430_400_000
        );
        assert_eq!(
            tx_frequency(145_500_000, 600_000, RepeaterMode::Simplex),
            145_500_000
        );
        assert_eq!(
            split_offset(438_000_000, 430_400_000),
            (7_600_000, RepeaterMode::Negative)
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(format_mhz(145_612_500), "145.61250");
    }
}
