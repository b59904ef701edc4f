// Binary-Coded Decimal (BCD) encoding/decoding
// DMR IDs, frequencies and auto-repeater limits are all stored as packed BCD.

use super::types::Endianness;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BcdError {
    #[error("Invalid BCD digit: {0:#x}")]
    InvalidDigit(u8),

    #[error("BCD array too small: need {needed} bytes, have {available}")]
    ArrayTooSmall { needed: usize, available: usize },

    #[error("Value too large for BCD array: {0}")]
    ValueTooLarge(u64),
}

pub type Result<T> = std::result::Result<T, BcdError>;

/// Largest value that fits into four packed BCD bytes.
pub const MAX_BCD32: u64 = 99_999_999;

/// Convert a BCD byte to its two decimal digits (tens, ones)
/// Example: 0x12 -> (1, 2), 0x95 -> (9, 5)
pub fn bcd_byte_to_digits(byte: u8) -> Result<(u8, u8)> {
    let tens = (byte & 0xF0) >> 4;
    let ones = byte & 0x0F;

    if tens > 9 || ones > 9 {
        return Err(BcdError::InvalidDigit(byte));
    }

    Ok((tens, ones))
}

/// Convert two decimal digits to a BCD byte
pub fn digits_to_bcd_byte(tens: u8, ones: u8) -> Result<u8> {
    if tens > 9 || ones > 9 {
        return Err(BcdError::InvalidDigit((tens << 4) | ones));
    }

    Ok((tens << 4) | ones)
}

/// Convert a BCD array to an integer, most significant digit pair first.
/// Example: [0x12, 0x34, 0x56] -> 123456
pub fn bcd_to_int_be(bcd_array: &[u8]) -> Result<u64> {
    bcd_array.iter().try_fold(0u64, |value, &byte| {
        let (tens, ones) = bcd_byte_to_digits(byte)?;
        value
            .checked_mul(100)
            .and_then(|v| v.checked_add((tens * 10 + ones) as u64))
            .ok_or(BcdError::ValueTooLarge(value))
    })
}

/// Convert a BCD array to an integer, least significant digit pair first.
/// Example: [0x56, 0x34, 0x12] -> 123456
pub fn bcd_to_int_le(bcd_array: &[u8]) -> Result<u64> {
    bcd_array.iter().rev().try_fold(0u64, |value, &byte| {
        let (tens, ones) = bcd_byte_to_digits(byte)?;
        value
            .checked_mul(100)
            .and_then(|v| v.checked_add((tens * 10 + ones) as u64))
            .ok_or(BcdError::ValueTooLarge(value))
    })
}

/// Write @value as BCD into @dest, most significant digit pair first.
/// Fails without touching @dest when the value needs more digits than available.
pub fn int_to_bcd_be(value: u64, dest: &mut [u8]) -> Result<()> {
    let mut tmp = vec![0u8; dest.len()];
    let mut remaining = value;

    for slot in tmp.iter_mut().rev() {
        let two_digits = (remaining % 100) as u8;
        remaining /= 100;
        *slot = digits_to_bcd_byte(two_digits / 10, two_digits % 10)?;
    }

    if remaining > 0 {
        return Err(BcdError::ValueTooLarge(value));
    }

    dest.copy_from_slice(&tmp);
    Ok(())
}

/// Write @value as BCD into @dest, least significant digit pair first.
pub fn int_to_bcd_le(value: u64, dest: &mut [u8]) -> Result<()> {
    let mut tmp = vec![0u8; dest.len()];
    let mut remaining = value;

    for slot in tmp.iter_mut() {
        let two_digits = (remaining % 100) as u8;
        remaining /= 100;
        *slot = digits_to_bcd_byte(two_digits / 10, two_digits % 10)?;
    }

    if remaining > 0 {
        return Err(BcdError::ValueTooLarge(value));
    }

    dest.copy_from_slice(&tmp);
    Ok(())
}

/// Decode a BCD array with the given digit order
pub fn bcd_to_int(bcd_array: &[u8], order: Endianness) -> Result<u64> {
    match order {
        Endianness::Big => bcd_to_int_be(bcd_array),
        Endianness::Little => bcd_to_int_le(bcd_array),
    }
}

/// Encode a value into a BCD array with the given digit order
pub fn int_to_bcd(value: u64, dest: &mut [u8], order: Endianness) -> Result<()> {
    match order {
        Endianness::Big => int_to_bcd_be(value, dest),
        Endianness::Little => int_to_bcd_le(value, dest),
    }
}

/// Decode a 4-byte BCD DMR ID
pub fn decode_dmr_id(bytes: &[u8], order: Endianness) -> Result<u32> {
    if bytes.len() < 4 {
        return Err(BcdError::ArrayTooSmall {
            needed: 4,
            available: bytes.len(),
        });
    }
    // At most 8 digits, always fits.
    Ok(bcd_to_int(&bytes[..4], order)? as u32)
}

/// Encode a DMR ID as 4-byte BCD
pub fn encode_dmr_id(id: u32, order: Endianness) -> Result<[u8; 4]> {
    let mut out = [0u8; 4];
    int_to_bcd(id as u64, &mut out, order)?;
    Ok(out)
}

/// Packs the decimal digits of @value into nibbles of a u32.
/// Example: 1234567 -> 0x01234567
pub fn to_bcd_hex(value: u32) -> Result<u32> {
    let bytes = encode_dmr_id(value, Endianness::Big)?;
    Ok(u32::from_be_bytes(bytes))
}

/// Inverse of [`to_bcd_hex`].
pub fn from_bcd_hex(value: u32) -> Result<u32> {
    decode_dmr_id(&value.to_be_bytes(), Endianness::Big)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd_byte_conversion() {
        assert_eq!(bcd_byte_to_digits(0x12).unwrap(), (1, 2));
        assert_eq!(bcd_byte_to_digits(0x95).unwrap(), (9, 5));
        assert!(bcd_byte_to_digits(0xAB).is_err());

        assert_eq!(digits_to_bcd_byte(1, 2).unwrap(), 0x12);
        assert!(digits_to_bcd_byte(10, 2).is_err());
    }

    #[test]
    fn test_bcd_to_int() {
        assert_eq!(bcd_to_int_be(&[0x12, 0x34, 0x56]).unwrap(), 123456);
        assert_eq!(bcd_to_int_le(&[0x56, 0x34, 0x12]).unwrap(), 123456);
        assert!(bcd_to_int_be(&[0x1F]).is_err());
    }

    #[test]
    fn test_int_to_bcd() {
        let mut be = [0u8; 3];
        int_to_bcd_be(123456, &mut be).unwrap();
        assert_eq!(be, [0x12, 0x34, 0x56]);

        let mut le = [0u8; 3];
        int_to_bcd_le(123456, &mut le).unwrap();
        assert_eq!(le, [0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_overflow_leaves_destination_untouched() {
        let mut dest = [0xAA; 3];
        assert_eq!(
            int_to_bcd_be(1234567, &mut dest),
            Err(BcdError::ValueTooLarge(1234567))
        );
        assert_eq!(dest, [0xAA; 3]);
    }

    #[test]
    fn test_dmr_id() {
        assert_eq!(
            encode_dmr_id(2621370, Endianness::Big).unwrap(),
            [0x02, 0x62, 0x13, 0x70]
        );
        assert_eq!(
            encode_dmr_id(2621370, Endianness::Little).unwrap(),
            [0x70, 0x13, 0x62, 0x02]
        );
        for id in [0u32, 1, 9, 10, 2621370, 16777215, 99_999_999] {
            for order in [Endianness::Big, Endianness::Little] {
                let bytes = encode_dmr_id(id, order).unwrap();
                assert_eq!(decode_dmr_id(&bytes, order).unwrap(), id);
            }
        }
        assert!(encode_dmr_id(100_000_000, Endianness::Big).is_err());
    }

    #[test]
    fn test_bcd_hex() {
        assert_eq!(to_bcd_hex(1234567).unwrap(), 0x01234567);
        assert_eq!(from_bcd_hex(0x16777215).unwrap(), 16777215);
    }
}
