// Receive group list record

use super::name_in_use;
use crate::bitwise::ascii::{decode_ascii, encode_ascii};
use crate::bitwise::elements::{read_u32_le, write_u32_le};
use crate::codeplug::context::Context;
use crate::config::{ContactRef, GroupList};
use crate::memmap::Family;

element!(
    /// Contacts a digital channel listens to
    GroupListElement,
    0x120
);

const MEMBERS: usize = 0x000;
const NAME: usize = 0x100;
const NAME_LEN: usize = 16;

/// Member slots per list
pub const MAX_MEMBERS: usize = 64;
const NO_MEMBER: u32 = 0xffff_ffff;

impl<B: AsRef<[u8]>> GroupListElement<B> {
    pub fn is_valid(&self) -> bool {
        name_in_use(self.bytes()[NAME])
    }

    pub fn name(&self) -> String {
        decode_ascii(&self.bytes()[NAME..NAME + NAME_LEN], 0x00)
    }

    /// Contact slot of member @n, None when unused
    pub fn member(&self, n: usize) -> Option<usize> {
        match read_u32_le(self.bytes(), MEMBERS + 4 * n) {
            NO_MEMBER => None,
            slot => Some(slot as usize),
        }
    }

    pub fn to_object(&self) -> GroupList {
        GroupList::new(self.name())
    }

    /// Add the member contacts in stored order, skipping unknown slots
    pub fn link(&self, list: &mut GroupList, slot: usize, ctx: &mut Context) {
        for n in 0..MAX_MEMBERS {
            let Some(idx) = self.member(n) else {
                continue;
            };
            match ctx.get::<ContactRef>(idx) {
                Some(contact) => list.contacts.push(contact),
                None => ctx.warn(
                    Family::GroupList,
                    Some(slot),
                    format!("contact {} of '{}' unknown, ignored", idx, list.name),
                ),
            }
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> GroupListElement<B> {
    pub fn clear(&mut self) {
        let data = self.bytes_mut();
        data[MEMBERS..NAME].fill(0xff);
        data[NAME..Self::SIZE].fill(0x00);
    }

    pub fn set_name(&mut self, name: &str) {
        encode_ascii(&mut self.bytes_mut()[NAME..NAME + NAME_LEN], name, 0x00);
    }

    pub fn set_member(&mut self, n: usize, slot: Option<usize>) {
        let value = slot.map_or(NO_MEMBER, |s| s as u32);
        write_u32_le(self.bytes_mut(), MEMBERS + 4 * n, value);
    }

    pub fn from_object(&mut self, list: &GroupList, slot: usize, ctx: &mut Context) {
        self.clear();
        self.set_name(&list.name);
        if list.contacts.len() > MAX_MEMBERS {
            ctx.warn(
                Family::GroupList,
                Some(slot),
                format!(
                    "'{}' has {} members, only {} are stored",
                    list.name,
                    list.contacts.len(),
                    MAX_MEMBERS
                ),
            );
        }
        let mut n = 0;
        for &contact in list.contacts.iter().take(MAX_MEMBERS) {
            match ctx.slot_of(contact) {
                Some(s) => {
                    self.set_member(n, Some(s));
                    n += 1;
                }
                None => ctx.warn(
                    Family::GroupList,
                    Some(slot),
                    format!("contact {} of '{}' not encoded", contact.index(), list.name),
                ),
            }
        }
    }
}
