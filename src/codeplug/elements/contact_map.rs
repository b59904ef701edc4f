// Contact lookup tables: ID map and index lists
// The radio finds contacts by call ID through a sorted map; both index lists
// simply enumerate the used slots.

use crate::bitwise::bcd::{from_bcd_hex, to_bcd_hex, BcdError};
use crate::bitwise::elements::{read_u32_le, write_u32_le};
use crate::codeplug::context::Context;
use crate::config::{CallType, DigitalContact};
use crate::memmap::Family;

element!(
    /// One (call ID, group flag) to contact slot entry
    ContactMapElement,
    0x08
);

const ID_CODE: usize = 0x00;
const SLOT: usize = 0x04;

impl<B: AsRef<[u8]>> ContactMapElement<B> {
    pub fn is_valid(&self) -> bool {
        read_u32_le(self.bytes(), ID_CODE) != 0xffff_ffff
    }

    pub fn is_group(&self) -> bool {
        read_u32_le(self.bytes(), ID_CODE) & 1 == 1
    }

    pub fn id(&self) -> Result<u32, BcdError> {
        from_bcd_hex(read_u32_le(self.bytes(), ID_CODE) >> 1)
    }

    pub fn slot(&self) -> usize {
        read_u32_le(self.bytes(), SLOT) as usize
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ContactMapElement<B> {
    pub fn clear(&mut self) {
        self.bytes_mut()[..Self::SIZE].fill(0xff);
    }

    /// Store the entry; returns false when @id cannot be represented
    pub fn set(&mut self, id: u32, group: bool, slot: usize) -> Result<bool, BcdError> {
        let Some(code) = to_bcd_hex(id)?.checked_mul(2) else {
            return Ok(false);
        };
        let data = self.bytes_mut();
        write_u32_le(data, ID_CODE, code | u32::from(group));
        write_u32_le(data, SLOT, slot as u32);
        Ok(true)
    }
}

/// Rebuild the ID map in @region from the encoded contacts, sorted by call ID
///
/// @contacts pairs every contact with its slot. Unused entries keep the 0xff fill.
pub fn write_contact_map(
    region: &mut [u8],
    contacts: &[(usize, &DigitalContact)],
    ctx: &mut Context,
) -> crate::codeplug::Result<()> {
    let mut sorted = contacts.to_vec();
    sorted.sort_by_key(|(_, c)| c.call_id());

    region.fill(0xff);
    let mut chunks = region.chunks_exact_mut(ContactMapElement::<&[u8]>::SIZE);
    for (slot, contact) in sorted {
        let Some(chunk) = chunks.next() else {
            break;
        };
        let mut entry = ContactMapElement::new(chunk)?;
        let group = contact.call_type == CallType::Group;
        if !entry.set(contact.call_id(), group, slot)? {
            entry.clear();
            ctx.warn(
                Family::Contact,
                Some(slot),
                format!("ID {} of '{}' not mapped", contact.call_id(), contact.name),
            );
        }
    }
    Ok(())
}

/// Write the slot numbers `0..count` as u32 entries
pub fn write_contact_index(region: &mut [u8], count: usize) {
    region.fill(0xff);
    for (slot, chunk) in region.chunks_exact_mut(4).take(count).enumerate() {
        chunk.copy_from_slice(&(slot as u32).to_le_bytes());
    }
}

/// Write the slot numbers `0..count` as one byte each
pub fn write_dtmf_index(region: &mut [u8], count: usize) {
    region.fill(0xff);
    for (slot, byte) in region.iter_mut().take(count).enumerate() {
        *byte = slot as u8;
    }
}
