// Radio ID record

use super::name_in_use;
use crate::bitwise::ascii::{decode_ascii, encode_ascii};
use crate::bitwise::bcd::{decode_dmr_id, encode_dmr_id, BcdError};
use crate::bitwise::Endianness;
use crate::config::RadioId;

element!(
    /// One of the DMR IDs the radio can transmit with
    RadioIdElement,
    0x20
);

const ID: usize = 0x00;
const NAME: usize = 0x05;
const NAME_LEN: usize = 16;

impl<B: AsRef<[u8]>> RadioIdElement<B> {
    pub fn is_valid(&self) -> bool {
        name_in_use(self.bytes()[NAME])
    }

    pub fn name(&self) -> String {
        decode_ascii(&self.bytes()[NAME..NAME + NAME_LEN], 0x00)
    }

    pub fn id(&self) -> Result<u32, BcdError> {
        decode_dmr_id(&self.bytes()[ID..ID + 4], Endianness::Little)
    }

    pub fn to_object(&self) -> Result<RadioId, BcdError> {
        Ok(RadioId::new(self.name(), self.id()?))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> RadioIdElement<B> {
    pub fn clear(&mut self) {
        self.bytes_mut()[..Self::SIZE].fill(0x00);
    }

    pub fn set_id(&mut self, id: u32) -> Result<(), BcdError> {
        let bcd = encode_dmr_id(id, Endianness::Little)?;
        self.bytes_mut()[ID..ID + 4].copy_from_slice(&bcd);
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) {
        encode_ascii(&mut self.bytes_mut()[NAME..NAME + NAME_LEN], name, 0x00);
    }

    pub fn from_object(&mut self, id: &RadioId) -> Result<(), BcdError> {
        self.clear();
        self.set_id(id.number)?;
        self.set_name(&id.name);
        Ok(())
    }
}
