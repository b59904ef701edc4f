// Presence-driven allocation of record memory

use super::image::{Image, Result};
use super::layout::{CodeplugLayout, Family, Passthrough, Polarity, Presence, RecordFamily};
use crate::bitwise::elements::{bitmap_get, bitmap_set};
use std::collections::BTreeMap;
use tracing::debug;

/// Number of used slots per family, slots `0..n` are occupied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotCounts(BTreeMap<Family, usize>);

impl SlotCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, family: Family, count: usize) {
        self.0.insert(family, count);
    }

    pub fn get(&self, family: Family) -> usize {
        self.0.get(&family).copied().unwrap_or(0)
    }
}

/// Allocate the presence indicator regions of all families.
/// Bitmaps start out all clear, bytemaps all absent.
pub fn allocate_indicators(image: &mut Image, layout: &CodeplugLayout) -> Result<()> {
    for family in layout.families() {
        match family.presence {
            Presence::Bitmap { addr, size, .. } => {
                image.allocate(addr, size, 0x00)?;
            }
            Presence::Bytemap { addr, size, absent } => {
                image.allocate(addr, size, absent)?;
            }
            Presence::Scan => {}
        }
    }
    Ok(())
}

/// Whether @slot of @family is marked present.
/// Slots of scanned families always count as present.
pub fn is_present(image: &Image, family: &RecordFamily, slot: usize) -> Result<bool> {
    match family.presence {
        Presence::Bitmap {
            addr,
            size,
            polarity,
        } => {
            let bitmap = image.get(addr, size)?;
            let bit = bitmap_get(bitmap, slot);
            Ok(match polarity {
                Polarity::SetPresent => bit,
                Polarity::ClearPresent => !bit && slot / 8 < bitmap.len(),
            })
        }
        Presence::Bytemap { addr, size, absent } => {
            let bytemap = image.get(addr, size)?;
            Ok(bytemap.get(slot).is_some_and(|&b| b != absent))
        }
        Presence::Scan => Ok(slot < family.capacity),
    }
}

/// Rewrite the indicator of @family so that exactly slots `0..count` are present
pub fn write_presence(image: &mut Image, family: &RecordFamily, count: usize) -> Result<()> {
    let count = count.min(family.capacity);
    match family.presence {
        Presence::Bitmap {
            addr,
            size,
            polarity: Polarity::SetPresent,
        } => {
            let bitmap = image.get_mut(addr, size)?;
            bitmap.fill(0x00);
            for slot in 0..count {
                bitmap_set(bitmap, slot, true);
            }
        }
        Presence::Bitmap {
            addr,
            size,
            polarity: Polarity::ClearPresent,
        } => {
            // Only bits covering the capacity are set, the tail stays zero.
            let bitmap = image.get_mut(addr, size)?;
            bitmap.fill(0x00);
            let used = (family.capacity / 8 + 1).min(bitmap.len());
            bitmap[..used].fill(0xff);
            for slot in 0..count {
                bitmap_set(bitmap, slot, false);
            }
        }
        Presence::Bytemap { addr, size, absent } => {
            let bytemap = image.get_mut(addr, size)?;
            bytemap.fill(absent);
            for b in bytemap.iter_mut().take(count) {
                *b = 0x00;
            }
        }
        Presence::Scan => {}
    }
    Ok(())
}

/// Allocate the memory backing every present slot of @family.
/// Returns the number of regions that were newly allocated.
pub fn allocate_family(image: &mut Image, family: &RecordFamily) -> Result<usize> {
    let mut allocated = 0;
    for slot in 0..family.capacity {
        if !is_present(image, family, slot)? {
            continue;
        }
        let unit = family.unit_region(slot);
        if image.allocate(unit.addr, unit.size, family.fill)? {
            allocated += 1;
        }
        if let Some(offset) = family.shadow {
            let addr = family.address(slot) + offset;
            if image.allocate(addr, family.record_size, family.fill)? {
                allocated += 1;
            }
        }
        if let Some(names) = family.names {
            if image.allocate(names.address(slot), names.size, 0x00)? {
                allocated += 1;
            }
        }
    }
    debug!("allocated {} regions for {}s", allocated, family.family);
    Ok(allocated)
}

/// Allocate the fixed settings regions of @layout
pub fn allocate_settings(image: &mut Image, layout: &CodeplugLayout) -> Result<()> {
    let general = layout.general_settings;
    image.allocate(general.addr, general.size, 0x00)?;
    let optional = [
        layout.zone_channels,
        layout.boot_settings,
        layout.gps_settings,
        layout.gps_message,
    ];
    for region in optional.into_iter().flatten() {
        image.allocate(region.addr, region.size, 0x00)?;
    }
    Ok(())
}

/// Allocate the regions carried through unchanged.
/// Bitmapped and message entries follow indicators already in @image, so a
/// fresh image only gets the fixed regions and empty indicators.
pub fn allocate_updated(image: &mut Image, layout: &CodeplugLayout) -> Result<()> {
    let mut allocated = 0;
    for entry in layout.passthrough {
        match *entry {
            Passthrough::Fixed(region) => {
                allocated += image.allocate(region.addr, region.size, 0x00)? as usize;
            }
            Passthrough::Bitmapped {
                bitmap,
                base,
                count,
                record_size,
            } => {
                image.allocate(bitmap.addr, bitmap.size, 0x00)?;
                let present: Vec<usize> = {
                    let bits = image.get(bitmap.addr, bitmap.size)?;
                    (0..count).filter(|&i| bitmap_get(bits, i)).collect()
                };
                for i in present {
                    let addr = base + i as u32 * record_size;
                    allocated += image.allocate(addr, record_size, 0x00)? as usize;
                }
            }
            Passthrough::Messages {
                bytemap,
                count,
                per_bank,
                bank_base,
                bank_size,
                index,
            } => {
                image.allocate(bytemap.addr, bytemap.size, 0xff)?;
                let used: Vec<usize> = image
                    .get(bytemap.addr, bytemap.size)?
                    .iter()
                    .take(count)
                    .enumerate()
                    .filter(|&(_, &b)| b != 0xff)
                    .map(|(i, _)| i)
                    .collect();
                for i in &used {
                    let addr = bank_base + (i / per_bank) as u32 * bank_size;
                    allocated += image.allocate(addr, bank_size, 0x00)? as usize;
                }
                if !used.is_empty() {
                    image.allocate(index, 0x10 * used.len() as u32, 0xff)?;
                }
            }
        }
    }
    debug!("allocated {} pass-through regions", allocated);
    Ok(())
}

/// Allocate the VFO records and their shadows.
/// Returns true when the VFO records were not backed before.
pub fn allocate_vfos(image: &mut Image, layout: &CodeplugLayout) -> Result<bool> {
    let vfo = layout.vfo;
    let mut fresh = false;
    for addr in [vfo.a, vfo.b] {
        fresh |= image.allocate(addr, vfo.size, 0x00)?;
        image.allocate(addr + vfo.shadow, vfo.size, 0x00)?;
    }
    Ok(fresh)
}

/// Allocate everything needed to decode an image whose indicators are
/// already resident (or are about to be read from a device).
pub fn allocate_for_decoding(image: &mut Image, layout: &CodeplugLayout) -> Result<()> {
    allocate_indicators(image, layout)?;
    for family in layout.families() {
        allocate_family(image, family)?;
    }
    allocate_settings(image, layout)?;
    allocate_updated(image, layout)?;
    Ok(())
}

/// Write the indicators for @counts and allocate every region encoding will touch
pub fn allocate_for_encoding(
    image: &mut Image,
    layout: &CodeplugLayout,
    counts: &SlotCounts,
) -> Result<()> {
    allocate_indicators(image, layout)?;
    for family in layout.families() {
        write_presence(image, family, counts.get(family.family))?;
        allocate_family(image, family)?;
    }
    allocate_settings(image, layout)?;
    allocate_updated(image, layout)?;

    let contacts = counts.get(Family::Contact).min(layout.contacts.capacity) as u32;
    if contacts > 0 {
        image.allocate(layout.contact_index, align16(4 * contacts), 0xff)?;
        image.allocate(layout.contact_id_map, align16(8 * (contacts + 1)), 0xff)?;
    }
    let dtmf = layout.dtmf_index;
    image.allocate(dtmf.addr, dtmf.size, 0xff)?;
    Ok(())
}

/// Round @size up to a multiple of 16
pub fn align16(size: u32) -> u32 {
    size.div_ceil(16) * 16
}
