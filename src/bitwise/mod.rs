// Binary field codecs shared by all codeplug records

pub mod ascii;
pub mod bcd;
pub mod dtmf;
pub mod elements;
pub mod parser;
pub mod types;

pub use ascii::{decode_ascii, encode_ascii};
pub use bcd::{bcd_to_int, decode_dmr_id, encode_dmr_id, int_to_bcd, BcdError};
pub use dtmf::{decode_dtmf_bcd_be, encode_dtmf_bcd_be, is_valid_dtmf, DtmfError};
pub use elements::{
    bitmap_get, bitmap_set, get_bit, get_bits, read_u16_le, read_u32_le, set_bit, set_bits,
    write_u16_le, write_u32_le, ElementError,
};
pub use parser::{parse_ascii, parse_bcd_be, parse_bcd_le, parse_region};
pub use types::Endianness;
