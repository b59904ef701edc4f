// Zone channel lists, zone names and per-zone selected channels

use super::name_in_use;
use crate::bitwise::ascii::{decode_ascii, encode_ascii};
use crate::bitwise::elements::{read_u16_le, write_u16_le};
use crate::codeplug::context::Context;
use crate::config::ChannelRef;
use crate::memmap::Family;

element!(
    /// Channel list of one zone slot
    ZoneElement,
    0x200
);

element!(
    /// Name of one zone slot, stored apart from its channel list
    ZoneNameElement,
    0x10
);

element!(
    /// Channel selected on VFO A and B for every zone
    ZoneChannelsElement,
    0x400
);

/// Member slots per zone
pub const MAX_MEMBERS: usize = 250;
const NO_CHANNEL: u16 = 0xffff;

const SELECTED_A: usize = 0x000;
const SELECTED_B: usize = 0x200;

impl<B: AsRef<[u8]>> ZoneElement<B> {
    /// Channel slot of member @n
    pub fn member(&self, n: usize) -> Option<usize> {
        match read_u16_le(self.bytes(), 2 * n) {
            NO_CHANNEL => None,
            slot => Some(slot as usize),
        }
    }

    /// Resolve the stored members, dropping unknown channels
    pub fn channels(&self, name: &str, slot: usize, ctx: &mut Context) -> Vec<ChannelRef> {
        let mut channels = Vec::new();
        for n in 0..MAX_MEMBERS {
            let Some(idx) = self.member(n) else {
                continue;
            };
            match ctx.get::<ChannelRef>(idx) {
                Some(ch) => channels.push(ch),
                None => ctx.warn(
                    Family::Zone,
                    Some(slot),
                    format!("channel {} of '{}' unknown, ignored", idx, name),
                ),
            }
        }
        channels
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ZoneElement<B> {
    pub fn clear(&mut self) {
        self.bytes_mut()[..Self::SIZE].fill(0xff);
    }

    pub fn set_member(&mut self, n: usize, slot: Option<usize>) {
        let value = slot.map_or(NO_CHANNEL, |s| s as u16);
        write_u16_le(self.bytes_mut(), 2 * n, value);
    }

    /// Store @channels, returning the slots actually written
    pub fn from_channels(
        &mut self,
        channels: &[ChannelRef],
        name: &str,
        slot: usize,
        ctx: &mut Context,
    ) -> Vec<usize> {
        self.clear();
        if channels.len() > MAX_MEMBERS {
            ctx.warn(
                Family::Zone,
                Some(slot),
                format!(
                    "'{}' has {} channels, only {} are stored",
                    name,
                    channels.len(),
                    MAX_MEMBERS
                ),
            );
        }
        let mut written = Vec::new();
        for &ch in channels.iter().take(MAX_MEMBERS) {
            match ctx.slot_of(ch) {
                Some(s) => {
                    self.set_member(written.len(), Some(s));
                    written.push(s);
                }
                None => ctx.warn(
                    Family::Zone,
                    Some(slot),
                    format!("channel {} of '{}' not encoded", ch.index(), name),
                ),
            }
        }
        written
    }
}

impl<B: AsRef<[u8]>> ZoneNameElement<B> {
    pub fn is_valid(&self) -> bool {
        name_in_use(self.bytes()[0])
    }

    pub fn name(&self) -> String {
        decode_ascii(&self.bytes()[..Self::SIZE], 0x00)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ZoneNameElement<B> {
    pub fn clear(&mut self) {
        self.bytes_mut()[..Self::SIZE].fill(0x00);
    }

    pub fn set_name(&mut self, name: &str) {
        encode_ascii(&mut self.bytes_mut()[..Self::SIZE], name, 0x00);
    }
}

// Selections are written only; decoding leaves the radio to pick.
#[cfg(test)]
impl<B: AsRef<[u8]>> ZoneChannelsElement<B> {
    fn selected_a(&self, zone: usize) -> Option<usize> {
        match read_u16_le(self.bytes(), SELECTED_A + 2 * zone) {
            NO_CHANNEL => None,
            slot => Some(slot as usize),
        }
    }

    fn selected_b(&self, zone: usize) -> Option<usize> {
        match read_u16_le(self.bytes(), SELECTED_B + 2 * zone) {
            NO_CHANNEL => None,
            slot => Some(slot as usize),
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ZoneChannelsElement<B> {
    /// Select the first stored channel on A and the second (or first) on B
    pub fn set_selected(&mut self, zone: usize, members: &[usize]) {
        let a = members.first().copied();
        let b = members.get(1).copied().or(a);
        let data = self.bytes_mut();
        write_u16_le(data, SELECTED_A + 2 * zone, a.map_or(NO_CHANNEL, |s| s as u16));
        write_u16_le(data, SELECTED_B + 2 * zone, b.map_or(NO_CHANNEL, |s| s as u16));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_roundtrip() {
        let mut ctx = Context::new();
        for i in 0..3 {
            ctx.add(i + 10, ChannelRef(i));
        }
        let mut el = ZoneElement::new(vec![0u8; 0x200]).unwrap();
        let written = el.from_channels(&[ChannelRef(2), ChannelRef(0)], "Home", 0, &mut ctx);
        assert_eq!(written, vec![12, 10]);
        assert_eq!(el.member(0), Some(12));
        assert_eq!(el.member(2), None);
        assert_eq!(
            el.channels("Home", 0, &mut ctx),
            vec![ChannelRef(2), ChannelRef(0)]
        );
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_unencoded_channel_skipped() {
        let mut ctx = Context::new();
        ctx.add(0, ChannelRef(0));
        let mut el = ZoneElement::new(vec![0u8; 0x200]).unwrap();
        let written = el.from_channels(&[ChannelRef(5), ChannelRef(0)], "Home", 1, &mut ctx);
        assert_eq!(written, vec![0]);
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].slot, Some(1));
    }

    #[test]
    fn test_name() {
        let mut el = ZoneNameElement::new([0xffu8; 0x10]).unwrap();
        assert!(!el.is_valid());
        el.clear();
        el.set_name("Repeaters A");
        assert!(el.is_valid());
        assert_eq!(el.name(), "Repeaters A");
    }

    #[test]
    fn test_selected_channels() {
        let mut el = ZoneChannelsElement::new(vec![0u8; 0x400]).unwrap();
        el.set_selected(0, &[4, 7]);
        el.set_selected(1, &[9]);
        el.set_selected(2, &[]);
        assert_eq!(el.selected_a(0), Some(4));
        assert_eq!(el.selected_b(0), Some(7));
        assert_eq!(el.selected_a(1), Some(9));
        assert_eq!(el.selected_b(1), Some(9));
        assert_eq!(el.selected_a(2), None);
        assert_eq!(&el.as_bytes()[0x200..0x202], &[7, 0]);
    }
}
