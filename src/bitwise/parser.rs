// Parser combinators using nom for fixed-width codeplug fields

use super::bcd::{bcd_to_int_be, bcd_to_int_le};
use nom::{
    bytes::complete::take,
    error::{Error, ErrorKind},
    number::complete::le_u32,
    IResult, Parser,
};

/// Parse a BCD-encoded value (big-endian) of specified byte length
pub fn parse_bcd_be(num_bytes: usize) -> impl Fn(&[u8]) -> IResult<&[u8], u64> {
    move |input: &[u8]| {
        let (rest, bytes) = take(num_bytes).parse(input)?;
        let value = bcd_to_int_be(bytes)
            .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Verify)))?;
        Ok((rest, value))
    }
}

/// Parse a BCD-encoded value (little-endian) of specified byte length
pub fn parse_bcd_le(num_bytes: usize) -> impl Fn(&[u8]) -> IResult<&[u8], u64> {
    move |input: &[u8]| {
        let (rest, bytes) = take(num_bytes).parse(input)?;
        let value = bcd_to_int_le(bytes)
            .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Verify)))?;
        Ok((rest, value))
    }
}

/// Parse a fixed-width ASCII field, stopping at the first @terminator byte.
/// The whole field width is always consumed.
pub fn parse_ascii(width: usize, terminator: u8) -> impl Fn(&[u8]) -> IResult<&[u8], String> {
    move |input: &[u8]| {
        let (rest, bytes) = take(width).parse(input)?;
        let end = bytes
            .iter()
            .position(|&b| b == terminator)
            .unwrap_or(bytes.len());
        let s = bytes[..end]
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect();
        Ok((rest, s))
    }
}

/// Parse a length-prefixed region: `addr u32 LE, len u32 LE, bytes`
pub fn parse_region(input: &[u8]) -> IResult<&[u8], (u32, &[u8])> {
    let (input, (addr, len)) = (le_u32, le_u32).parse(input)?;
    let (input, bytes) = take(len as usize).parse(input)?;
    Ok((input, (addr, bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bcd() {
        let data = [0x12, 0x34, 0x56];
        let (_, value) = parse_bcd_be(3)(&data).unwrap();
        assert_eq!(value, 123456);

        let data_le = [0x56, 0x34, 0x12];
        let (_, value) = parse_bcd_le(3)(&data_le).unwrap();
        assert_eq!(value, 123456);

        assert!(parse_bcd_be(1)(&[0xAF]).is_err());
    }

    #[test]
    fn test_parse_ascii() {
        let data = b"Hello\0World";
        let (rest, s) = parse_ascii(11, 0)(data).unwrap();
        assert_eq!(s, "Hello");
        assert!(rest.is_empty());

        let (_, s) = parse_ascii(6, 0)(b"NoNull").unwrap();
        assert_eq!(s, "NoNull");

        let (_, s) = parse_ascii(4, 0xff)(&[b'A', b'B', 0xff, 0xff]).unwrap();
        assert_eq!(s, "AB");
    }

    #[test]
    fn test_parse_region() {
        let data = [0x00, 0x10, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0xAA, 0xBB, 0xCC];
        let (rest, (addr, bytes)) = parse_region(&data).unwrap();
        assert_eq!(addr, 0x1000);
        assert_eq!(bytes, &[0xAA, 0xBB]);
        assert_eq!(rest, &[0xCC]);

        // Truncated payload
        assert!(parse_region(&data[..9]).is_err());
    }
}
