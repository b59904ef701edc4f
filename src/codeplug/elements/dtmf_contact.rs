// DTMF (analog) contact record

use crate::bitwise::ascii::{decode_ascii, encode_ascii};
use crate::bitwise::dtmf::{decode_dtmf_bcd_be, encode_dtmf_bcd_be, DtmfError};
use crate::config::DtmfContact;

element!(
    /// Analog contact dialled by DTMF
    DtmfContactElement,
    0x18
);

const NUMBER: usize = 0x00;
const NUMBER_LEN: usize = 7;
const DIGITS: usize = 0x07;
const NAME: usize = 0x08;
const NAME_LEN: usize = 15;

impl<B: AsRef<[u8]>> DtmfContactElement<B> {
    pub fn name(&self) -> String {
        decode_ascii(&self.bytes()[NAME..NAME + NAME_LEN], 0x00)
    }

    pub fn digits(&self) -> usize {
        (self.bytes()[DIGITS] as usize).min(NUMBER_LEN * 2)
    }

    pub fn number(&self) -> String {
        decode_dtmf_bcd_be(&self.bytes()[NUMBER..NUMBER + NUMBER_LEN], self.digits())
    }

    pub fn to_object(&self) -> DtmfContact {
        DtmfContact::new(self.name(), self.number())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> DtmfContactElement<B> {
    pub fn clear(&mut self) {
        self.bytes_mut()[..Self::SIZE].fill(0x00);
    }

    pub fn set_name(&mut self, name: &str) {
        encode_ascii(&mut self.bytes_mut()[NAME..NAME + NAME_LEN], name, 0x00);
    }

    /// Store @number; the record is left untouched when it is not a DTMF string
    pub fn set_number(&mut self, number: &str) -> Result<(), DtmfError> {
        encode_dtmf_bcd_be(number, &mut self.bytes_mut()[NUMBER..NUMBER + NUMBER_LEN])?;
        self.bytes_mut()[DIGITS] = number.len() as u8;
        Ok(())
    }

    /// Encode @contact, validating the number before anything is written
    pub fn from_object(&mut self, contact: &DtmfContact) -> Result<(), DtmfError> {
        let mut number = [0u8; NUMBER_LEN];
        encode_dtmf_bcd_be(&contact.number, &mut number)?;
        self.clear();
        self.set_number(&contact.number)?;
        self.set_name(&contact.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let mut el = DtmfContactElement::new([0xffu8; 0x18]).unwrap();
        el.from_object(&DtmfContact::new("Gate", "12*#A")).unwrap();
        let data = el.as_bytes();
        assert_eq!(&data[0..4], &[0x12, 0xef, 0xa0, 0x00]);
        assert_eq!(data[7], 5);
        assert_eq!(el.to_object(), DtmfContact::new("Gate", "12*#A"));
    }

    #[test]
    fn test_invalid_number_leaves_record_untouched() {
        let mut el = DtmfContactElement::new([0u8; 0x18]).unwrap();
        el.from_object(&DtmfContact::new("Gate", "123")).unwrap();
        let before = el.as_bytes().to_vec();
        assert!(el.from_object(&DtmfContact::new("Bad", "12X")).is_err());
        assert!(el
            .from_object(&DtmfContact::new("Long", "123456789012345"))
            .is_err());
        assert_eq!(el.as_bytes(), before.as_slice());
    }

    #[test]
    fn test_digit_count_clamped() {
        let mut data = [0u8; 0x18];
        data[7] = 0xff;
        let el = DtmfContactElement::new(data).unwrap();
        assert_eq!(el.number().len(), 14);
    }
}
