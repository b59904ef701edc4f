// Fixed-offset field access for codeplug records
// Record views check their length once on construction; the accessors below
// index directly and expect the caller to stay inside that length.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    #[error("Insufficient data: expected {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ElementError>;

/// Ensure a byte span is large enough to hold a record
pub fn check_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(ElementError::InsufficientData {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

pub fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

pub fn write_u16_le(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

pub fn write_u32_le(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Single bit at (@offset, @bit)
pub fn get_bit(data: &[u8], offset: usize, bit: u8) -> bool {
    (data[offset] >> bit) & 0x01 == 0x01
}

pub fn set_bit(data: &mut [u8], offset: usize, bit: u8, value: bool) {
    if value {
        data[offset] |= 1 << bit;
    } else {
        data[offset] &= !(1 << bit);
    }
}

/// Multi-bit field of @width bits starting at bit @shift
pub fn get_bits(data: &[u8], offset: usize, shift: u8, width: u8) -> u8 {
    let mask = ((1u16 << width) - 1) as u8;
    (data[offset] >> shift) & mask
}

pub fn set_bits(data: &mut [u8], offset: usize, shift: u8, width: u8, value: u8) {
    let mask = (((1u16 << width) - 1) as u8) << shift;
    data[offset] = (data[offset] & !mask) | ((value << shift) & mask);
}

/// Presence bit for slot @index of a bitmap (bit `index % 8` of byte `index / 8`)
pub fn bitmap_get(bitmap: &[u8], index: usize) -> bool {
    bitmap
        .get(index / 8)
        .is_some_and(|byte| (byte >> (index % 8)) & 0x01 == 0x01)
}

pub fn bitmap_set(bitmap: &mut [u8], index: usize, value: bool) {
    if let Some(byte) = bitmap.get_mut(index / 8) {
        let mask = 1u8 << (index % 8);
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }
}
