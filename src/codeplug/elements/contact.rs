// Digital contact record

use super::name_in_use;
use crate::bitwise::ascii::{decode_ascii, encode_ascii};
use crate::bitwise::bcd::{decode_dmr_id, encode_dmr_id, BcdError};
use crate::bitwise::Endianness;
use crate::codeplug::Result;
use crate::config::{CallType, DigitalContact};
use crate::core::ALL_CALL_ID;

element!(
    /// DMR contact
    ContactElement,
    0x64
);

const CALL_TYPE: usize = 0x00;
const NAME: usize = 0x01;
const NAME_LEN: usize = 16;
const ID: usize = 0x23;
const ALERT: usize = 0x27;

const CALL_PRIVATE: u8 = 0;
const CALL_GROUP: u8 = 1;
const CALL_ALL: u8 = 2;

const ALERT_NONE: u8 = 0;
const ALERT_RING: u8 = 1;

impl<B: AsRef<[u8]>> ContactElement<B> {
    pub fn is_valid(&self) -> bool {
        name_in_use(self.bytes()[NAME])
    }

    pub fn name(&self) -> String {
        decode_ascii(&self.bytes()[NAME..NAME + NAME_LEN], 0x00)
    }

    pub fn call_type(&self) -> CallType {
        match self.bytes()[CALL_TYPE] {
            CALL_GROUP => CallType::Group,
            CALL_ALL => CallType::All,
            _ => CallType::Private,
        }
    }

    pub fn id(&self) -> std::result::Result<u32, BcdError> {
        decode_dmr_id(&self.bytes()[ID..ID + 4], Endianness::Big)
    }

    /// Any alert other than none rings
    pub fn ring(&self) -> bool {
        self.bytes()[ALERT] != ALERT_NONE
    }

    pub fn to_object(&self) -> std::result::Result<DigitalContact, BcdError> {
        Ok(DigitalContact {
            name: self.name(),
            call_type: self.call_type(),
            number: self.id()?,
            ring: self.ring(),
        })
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ContactElement<B> {
    pub fn clear(&mut self) {
        self.bytes_mut()[..Self::SIZE].fill(0x00);
    }

    pub fn set_name(&mut self, name: &str) {
        encode_ascii(&mut self.bytes_mut()[NAME..NAME + NAME_LEN], name, 0x00);
    }

    pub fn set_id(&mut self, id: u32) -> std::result::Result<(), BcdError> {
        let bcd = encode_dmr_id(id, Endianness::Big)?;
        self.bytes_mut()[ID..ID + 4].copy_from_slice(&bcd);
        Ok(())
    }

    /// Set the call type; all-calls always carry the all-call ID
    pub fn set_call_type(&mut self, call_type: CallType) -> std::result::Result<(), BcdError> {
        self.bytes_mut()[CALL_TYPE] = match call_type {
            CallType::Private => CALL_PRIVATE,
            CallType::Group => CALL_GROUP,
            CallType::All => CALL_ALL,
        };
        if call_type == CallType::All {
            self.set_id(ALL_CALL_ID)?;
        }
        Ok(())
    }

    pub fn set_ring(&mut self, ring: bool) {
        self.bytes_mut()[ALERT] = if ring { ALERT_RING } else { ALERT_NONE };
    }

    pub fn from_object(&mut self, contact: &DigitalContact) -> Result<()> {
        self.clear();
        self.set_name(&contact.name);
        if contact.call_type != CallType::All {
            self.set_id(contact.number)?;
        }
        self.set_call_type(contact.call_type)?;
        self.set_ring(contact.ring);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_contact() {
        let mut el = ContactElement::new([0xffu8; 0x64]).unwrap();
        el.from_object(&DigitalContact::group("Local", 9)).unwrap();
        let data = el.as_bytes();
        assert_eq!(data[0], CALL_GROUP);
        assert_eq!(&data[0x23..0x27], &[0x00, 0x00, 0x00, 0x09]);
        assert_eq!(data[0x63], 0x00);
        assert!(el.is_valid());
        assert_eq!(el.to_object().unwrap(), DigitalContact::group("Local", 9));
    }

    #[test]
    fn test_all_call_forces_id() {
        let mut el = ContactElement::new([0u8; 0x64]).unwrap();
        let mut contact = DigitalContact::all_call("All");
        contact.number = 1234;
        el.from_object(&contact).unwrap();
        assert_eq!(el.id().unwrap(), ALL_CALL_ID);
        assert_eq!(&el.as_bytes()[0x23..0x27], &[0x16, 0x77, 0x72, 0x15]);
    }

    #[test]
    fn test_ring() {
        let mut el = ContactElement::new([0u8; 0x64]).unwrap();
        let mut contact = DigitalContact::private("Friend", 2621370);
        contact.ring = true;
        el.from_object(&contact).unwrap();
        assert!(el.ring());
        // Online alert also counts as ringing.
        el.bytes_mut()[ALERT] = 2;
        assert!(el.ring());
    }

    #[test]
    fn test_id_overflow_rejected() {
        let mut el = ContactElement::new([0u8; 0x64]).unwrap();
        assert!(el
            .from_object(&DigitalContact::private("Big", 100_000_000))
            .is_err());
    }

    #[test]
    fn test_unused_record() {
        let el = ContactElement::new([0u8; 0x64]).unwrap();
        assert!(!el.is_valid());
        let el = ContactElement::new([0xffu8; 0x64]).unwrap();
        assert!(!el.is_valid());
    }
}
