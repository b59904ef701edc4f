// Scan list record

use super::name_in_use;
use crate::bitwise::ascii::{decode_ascii, encode_ascii};
use crate::bitwise::elements::{get_bit, read_u16_le, set_bit, write_u16_le};
use crate::codeplug::context::Context;
use crate::config::{ChannelRef, PriorityChannel, ScanList, ScanRevert};
use crate::memmap::Family;

element!(
    /// Scan list with two optional priority channels
    ScanListElement,
    0x90
);

const PRIORITY_SELECT: usize = 0x01;
const PRIORITY_1: usize = 0x02;
const PRIORITY_2: usize = 0x04;
const LOOK_BACK_A: usize = 0x06;
const LOOK_BACK_B: usize = 0x08;
const DROPOUT_DELAY: usize = 0x0a;
const DWELL: usize = 0x0c;
const REVERT: usize = 0x0e;
const NAME: usize = 0x0f;
const NAME_LEN: usize = 16;
const MEMBERS: usize = 0x20;
const RESERVED: usize = 0x84;

/// Member slots per list
pub const MAX_MEMBERS: usize = 50;
const NO_CHANNEL: u16 = 0xffff;
const SELECTED_CHANNEL: u16 = 0x0000;

/// Raw priority channel field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PriorityField {
    Selected,
    Slot(usize),
}

impl<B: AsRef<[u8]>> ScanListElement<B> {
    pub fn is_valid(&self) -> bool {
        name_in_use(self.bytes()[NAME])
    }

    pub fn name(&self) -> String {
        decode_ascii(&self.bytes()[NAME..NAME + NAME_LEN], 0x00)
    }

    /// Priority channel @n (0 or 1), None when disabled or unset
    fn priority(&self, n: usize) -> Option<PriorityField> {
        if !get_bit(self.bytes(), PRIORITY_SELECT, n as u8) {
            return None;
        }
        let offset = if n == 0 { PRIORITY_1 } else { PRIORITY_2 };
        match read_u16_le(self.bytes(), offset) {
            NO_CHANNEL => None,
            SELECTED_CHANNEL => Some(PriorityField::Selected),
            value => Some(PriorityField::Slot(value as usize - 1)),
        }
    }

    /// Channel slot of member @n
    pub fn member(&self, n: usize) -> Option<usize> {
        match read_u16_le(self.bytes(), MEMBERS + 2 * n) {
            NO_CHANNEL => None,
            slot => Some(slot as usize),
        }
    }

    pub fn to_object(&self) -> ScanList {
        let data = self.bytes();
        ScanList {
            look_back_a: read_u16_le(data, LOOK_BACK_A),
            look_back_b: read_u16_le(data, LOOK_BACK_B),
            dropout_delay: read_u16_le(data, DROPOUT_DELAY),
            dwell: read_u16_le(data, DWELL),
            revert: ScanRevert::from_code(data[REVERT]),
            ..ScanList::new(self.name())
        }
    }

    /// Resolve priority and member channels, dropping unknown slots
    pub fn link(&self, list: &mut ScanList, slot: usize, ctx: &mut Context) {
        for n in 0..2 {
            let resolved = match self.priority(n) {
                None => None,
                Some(PriorityField::Selected) => Some(PriorityChannel::Selected),
                Some(PriorityField::Slot(idx)) => match ctx.get::<ChannelRef>(idx) {
                    Some(ch) => Some(PriorityChannel::Channel(ch)),
                    None => {
                        ctx.warn(
                            Family::ScanList,
                            Some(slot),
                            format!("priority channel {} of '{}' unknown", idx, list.name),
                        );
                        None
                    }
                },
            };
            if n == 0 {
                list.primary = resolved;
            } else {
                list.secondary = resolved;
            }
        }

        for n in 0..MAX_MEMBERS {
            let Some(idx) = self.member(n) else {
                continue;
            };
            match ctx.get::<ChannelRef>(idx) {
                Some(ch) => list.channels.push(ch),
                None => ctx.warn(
                    Family::ScanList,
                    Some(slot),
                    format!("channel {} of '{}' unknown, ignored", idx, list.name),
                ),
            }
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ScanListElement<B> {
    pub fn clear(&mut self) {
        let data = self.bytes_mut();
        data[0] = 0x00;
        data[PRIORITY_SELECT] = 0x00;
        write_u16_le(data, PRIORITY_1, NO_CHANNEL);
        write_u16_le(data, PRIORITY_2, NO_CHANNEL);
        write_u16_le(data, LOOK_BACK_A, ScanList::DEFAULT_LOOK_BACK_A);
        write_u16_le(data, LOOK_BACK_B, ScanList::DEFAULT_LOOK_BACK_B);
        write_u16_le(data, DROPOUT_DELAY, ScanList::DEFAULT_DROPOUT_DELAY);
        write_u16_le(data, DWELL, ScanList::DEFAULT_DWELL);
        data[REVERT] = ScanRevert::Selected.code();
        data[NAME..MEMBERS].fill(0x00);
        data[MEMBERS..RESERVED].fill(0xff);
        data[RESERVED..Self::SIZE].fill(0x00);
    }

    pub fn set_name(&mut self, name: &str) {
        encode_ascii(&mut self.bytes_mut()[NAME..NAME + NAME_LEN], name, 0x00);
    }

    fn set_priority(&mut self, n: usize, value: Option<PriorityField>) {
        let offset = if n == 0 { PRIORITY_1 } else { PRIORITY_2 };
        let raw = match value {
            None => NO_CHANNEL,
            Some(PriorityField::Selected) => SELECTED_CHANNEL,
            Some(PriorityField::Slot(slot)) => slot as u16 + 1,
        };
        let data = self.bytes_mut();
        set_bit(data, PRIORITY_SELECT, n as u8, value.is_some());
        write_u16_le(data, offset, raw);
    }

    pub fn set_member(&mut self, n: usize, slot: Option<usize>) {
        let value = slot.map_or(NO_CHANNEL, |s| s as u16);
        write_u16_le(self.bytes_mut(), MEMBERS + 2 * n, value);
    }

    pub fn from_object(&mut self, list: &ScanList, slot: usize, ctx: &mut Context) {
        self.clear();
        self.set_name(&list.name);

        for (n, priority) in [list.primary, list.secondary].into_iter().enumerate() {
            let field = match priority {
                None => None,
                Some(PriorityChannel::Selected) => Some(PriorityField::Selected),
                Some(PriorityChannel::Channel(ch)) => match ctx.slot_of(ch) {
                    Some(s) => Some(PriorityField::Slot(s)),
                    None => {
                        ctx.warn(
                            Family::ScanList,
                            Some(slot),
                            format!(
                                "priority channel {} of '{}' not encoded",
                                ch.index(),
                                list.name
                            ),
                        );
                        None
                    }
                },
            };
            self.set_priority(n, field);
        }

        let data = self.bytes_mut();
        write_u16_le(data, LOOK_BACK_A, list.look_back_a);
        write_u16_le(data, LOOK_BACK_B, list.look_back_b);
        write_u16_le(data, DROPOUT_DELAY, list.dropout_delay);
        write_u16_le(data, DWELL, list.dwell);
        data[REVERT] = list.revert.code();

        if list.channels.len() > MAX_MEMBERS {
            ctx.warn(
                Family::ScanList,
                Some(slot),
                format!(
                    "'{}' has {} channels, only {} are stored",
                    list.name,
                    list.channels.len(),
                    MAX_MEMBERS
                ),
            );
        }
        let mut n = 0;
        for &ch in list.channels.iter().take(MAX_MEMBERS) {
            match ctx.slot_of(ch) {
                Some(s) => {
                    self.set_member(n, Some(s));
                    n += 1;
                }
                None => ctx.warn(
                    Family::ScanList,
                    Some(slot),
                    format!("channel {} of '{}' not encoded", ch.index(), list.name),
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(channels: usize) -> Context {
        let mut ctx = Context::new();
        for i in 0..channels {
            ctx.add(i, ChannelRef(i));
        }
        ctx
    }

    #[test]
    fn test_clear_defaults() {
        let mut el = ScanListElement::new([0u8; 0x90]).unwrap();
        el.clear();
        let data = el.as_bytes();
        assert_eq!(read_u16_le(data, PRIORITY_1), 0xffff);
        assert_eq!(read_u16_le(data, LOOK_BACK_A), 0x000f);
        assert_eq!(read_u16_le(data, LOOK_BACK_B), 0x0019);
        assert_eq!(read_u16_le(data, DWELL), 0x001d);
        assert_eq!(el.member(0), None);
        assert_eq!(el.member(49), None);
    }

    #[test]
    fn test_selected_priority_is_not_slot_zero() {
        let mut ctx = context(3);
        let mut list = ScanList::new("Scan");
        list.primary = Some(PriorityChannel::Selected);
        list.secondary = Some(PriorityChannel::Channel(ChannelRef(0)));
        list.channels = vec![ChannelRef(0), ChannelRef(2)];

        let mut el = ScanListElement::new([0u8; 0x90]).unwrap();
        el.from_object(&list, 0, &mut ctx);
        let data = el.as_bytes();
        assert_eq!(data[PRIORITY_SELECT], 0b11);
        assert_eq!(read_u16_le(data, PRIORITY_1), 0);
        assert_eq!(read_u16_le(data, PRIORITY_2), 1);

        let mut decoded = el.to_object();
        el.link(&mut decoded, 0, &mut ctx);
        assert_eq!(decoded.primary, Some(PriorityChannel::Selected));
        assert_eq!(
            decoded.secondary,
            Some(PriorityChannel::Channel(ChannelRef(0)))
        );
        assert_eq!(decoded, list);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_dangling_member_warns_once() {
        let mut ctx = context(2);
        let mut el = ScanListElement::new([0u8; 0x90]).unwrap();
        el.clear();
        el.set_name("Scan");
        el.set_member(0, Some(0));
        el.set_member(1, Some(42));
        el.set_member(2, Some(1));

        let mut list = el.to_object();
        el.link(&mut list, 0, &mut ctx);
        assert_eq!(list.channels, vec![ChannelRef(0), ChannelRef(1)]);
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_members_clamped() {
        let mut ctx = context(60);
        let mut list = ScanList::new("Long");
        list.channels = (0..60).map(ChannelRef).collect();
        let mut el = ScanListElement::new([0u8; 0x90]).unwrap();
        el.from_object(&list, 0, &mut ctx);
        assert_eq!(el.member(49), Some(49));
        assert_eq!(ctx.warnings().len(), 1);
        assert!(el.as_bytes()[RESERVED..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_disabled_priority_ignored() {
        let mut data = [0u8; 0x90];
        data[PRIORITY_SELECT] = 0;
        data[PRIORITY_1] = 5;
        let el = ScanListElement::new(data).unwrap();
        assert_eq!(el.priority(0), None);
    }
}
