// Tone tables and reserved values shared across device models

/// CTCSS tones indexed by their on-device code, in tenths of Hz.
/// A zero entry marks a code the radio reserves but does not support.
pub const CTCSS_TONES: [u16; 52] = [
    0, 670, 0, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109, 1148,
    1188, 1230, 1273, 1318, 1365, 1413, 1462, 1514, 1567, 0, 1622, 0, 1679, 0, 1738, 0, 1799, 0,
    1862, 0, 1928, 0, 0, 2035, 0, 2107, 2181, 2257, 0, 2336, 2418, 2503, 0, 0,
];

/// Standard DCS codes, written as their octal digits
pub const DCS_CODES: [u16; 104] = [
    23, 25, 26, 31, 32, 36, 43, 47, 51, 53, 54, 65, 71, 72, 73, 74, 114, 115, 116, 122, 125, 131,
    132, 134, 143, 145, 152, 155, 156, 162, 165, 172, 174, 205, 212, 223, 225, 226, 243, 244, 245,
    246, 251, 252, 255, 261, 263, 265, 266, 271, 274, 306, 311, 315, 325, 331, 332, 343, 346, 351,
    356, 364, 365, 371, 411, 412, 413, 423, 431, 432, 445, 446, 452, 454, 455, 462, 464, 465, 466,
    503, 506, 516, 523, 526, 532, 546, 565, 606, 612, 624, 627, 631, 632, 654, 662, 664, 703, 712,
    723, 731, 732, 734, 743, 754,
];

/// Call ID every all-call contact carries
pub const ALL_CALL_ID: u32 = 16_777_215;

/// Default custom CTCSS value written into fresh channel records (251.1 Hz)
pub const DEFAULT_CUSTOM_CTCSS: u16 = 0x09cf;

/// Check whether @code (octal digits) is a DCS code the radio can use
pub fn is_valid_dcs(code: u16) -> bool {
    code <= 777 && code.to_string().chars().all(|c| c < '8')
}

/// Check whether @code is one of the standard DCS codes
pub fn is_standard_dcs(code: u16) -> bool {
    DCS_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctcss_table_shape() {
        assert_eq!(CTCSS_TONES.iter().filter(|&&t| t != 0).count(), 38);
        assert_eq!(CTCSS_TONES[9], 885);
        assert_eq!(CTCSS_TONES[49], 2503);
    }

    #[test]
    fn test_dcs_validation() {
        assert!(is_valid_dcs(23));
        assert!(is_valid_dcs(754));
        assert!(!is_valid_dcs(28));
        assert!(!is_valid_dcs(1000));
        assert!(is_standard_dcs(445));
        assert!(!is_standard_dcs(24));
    }
}
