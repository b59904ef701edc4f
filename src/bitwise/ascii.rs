// Packed ASCII text fields

use super::parser::parse_ascii;

/// Decode a fixed-width text field terminated by @terminator or the field end
pub fn decode_ascii(data: &[u8], terminator: u8) -> String {
    parse_ascii(data.len(), terminator)(data)
        .map(|(_, s)| s)
        .unwrap_or_default()
}

/// Encode @text into @dest, padding with @terminator.
/// Longer strings are truncated to the field width, non-ASCII characters become '?'.
pub fn encode_ascii(dest: &mut [u8], text: &str, terminator: u8) {
    dest.fill(terminator);
    for (slot, c) in dest.iter_mut().zip(text.chars()) {
        *slot = if c.is_ascii() { c as u8 } else { b'?' };
    }
}
