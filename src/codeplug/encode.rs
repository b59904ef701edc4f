// Encoding pipeline: configuration to memory image

use super::context::Context;
use super::elements::{
    write_contact_index, write_contact_map, write_dtmf_index, BootSettingsElement, ChannelElement,
    ContactElement, DtmfContactElement, GeneralSettingsElement, GpsSettingsElement,
    GroupListElement, RadioIdElement, ScanListElement, ZoneChannelsElement, ZoneElement,
    ZoneNameElement,
};
use super::{CodeplugError, EncodeFlags, Result, Warning};
use crate::bitwise::elements::bitmap_set;
use crate::config::{
    Channel, ChannelRef, Config, ContactRef, DtmfContactRef, GpsSystemRef, GroupListRef,
    RadioIdRef, ScanListRef, ZoneRef,
};
use crate::memmap::{
    align16, allocate_for_encoding, allocate_vfos, CodeplugLayout, Family, Image, Presence,
    RecordFamily, SlotCounts,
};
use tracing::{debug, info};

/// Zone names of split zones are cut to this length before " A"/" B" is appended
const SPLIT_ZONE_BASE_LEN: usize = 14;

/// Frequency of the VFO records written into a fresh image
const VFO_DEFAULT_FREQUENCY: u64 = 144_000_000;

/// Placement of one zone: its first slot and whether it occupies two
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZoneSlots {
    zone: usize,
    slot: usize,
    split: bool,
}

pub(super) fn encode(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    flags: &EncodeFlags,
) -> Result<Vec<Warning>> {
    let mut ctx = Context::new();
    info!("encoding {} codeplug", layout.name);

    let mut counts = register(layout, config, &mut ctx);
    let zones = plan_zones(layout, config, &mut ctx);
    counts.set(
        Family::Zone,
        zones.last().map_or(0, |z| z.slot + 1 + usize::from(z.split)),
    );

    allocate_for_encoding(image, layout, &counts)?;
    encode_vfos(layout, image, &mut ctx)?;

    encode_radio_ids(layout, image, config, &counts)?;
    encode_settings(layout, image, config, flags, &mut ctx)?;
    encode_channels(layout, image, config, &counts, &mut ctx)?;
    encode_contacts(layout, image, config, &counts, &mut ctx)?;
    encode_dtmf_contacts(layout, image, config, &counts)?;
    encode_group_lists(layout, image, config, &counts, &mut ctx)?;
    encode_zones(layout, image, config, &zones, &mut ctx)?;
    encode_scan_lists(layout, image, config, &counts, &mut ctx)?;
    encode_gps(layout, image, config, &mut ctx)?;

    info!(
        "encoded {} bytes in {} regions, {} warnings",
        image.allocated_bytes(),
        image.len(),
        ctx.warnings().len()
    );
    Ok(ctx.into_warnings())
}

/// Clamp @count to @capacity, warning when objects are dropped
fn clamp(ctx: &mut Context, family: Family, count: usize, capacity: usize) -> usize {
    if count > capacity {
        ctx.warn(
            family,
            None,
            format!(
                "{} {}s defined, only the first {} are encoded",
                count, family, capacity
            ),
        );
        return capacity;
    }
    count
}

/// Decide how many objects of each indexed family are encoded and map object
/// `i` to slot `i` in the context
fn register(layout: &CodeplugLayout, config: &Config, ctx: &mut Context) -> SlotCounts {
    let mut counts = SlotCounts::new();

    let mut count = |ctx: &mut Context, family: Family, len: usize| {
        let n = clamp(ctx, family, len, layout.capacity(family));
        counts.set(family, n);
        n
    };

    for i in 0..count(ctx, Family::RadioId, config.radio_ids.len()) {
        ctx.add(i, RadioIdRef(i));
    }
    for i in 0..count(ctx, Family::Channel, config.channels.len()) {
        ctx.add(i, ChannelRef(i));
    }
    for i in 0..count(ctx, Family::Contact, config.contacts.len()) {
        ctx.add(i, ContactRef(i));
    }
    for i in 0..count(ctx, Family::DtmfContact, config.dtmf_contacts.len()) {
        ctx.add(i, DtmfContactRef(i));
    }
    for i in 0..count(ctx, Family::GroupList, config.group_lists.len()) {
        ctx.add(i, GroupListRef(i));
    }
    for i in 0..count(ctx, Family::ScanList, config.scan_lists.len()) {
        ctx.add(i, ScanListRef(i));
    }

    if layout.gps_settings.is_none() {
        if !config.gps_systems.is_empty() {
            ctx.warn(
                Family::GpsSystem,
                None,
                format!(
                    "{} has no positioning settings, {} systems skipped",
                    layout.name,
                    config.gps_systems.len()
                ),
            );
        }
    } else {
        // The settings record reports an overflow itself.
        let n = config.gps_systems.len().min(layout.capacity(Family::GpsSystem));
        for i in 0..n {
            ctx.add(i, GpsSystemRef(i));
        }
        counts.set(Family::GpsSystem, n);
    }
    counts
}

/// Assign zone slots; a zone with a B list takes two consecutive slots
fn plan_zones(layout: &CodeplugLayout, config: &Config, ctx: &mut Context) -> Vec<ZoneSlots> {
    let capacity = layout.zones.capacity;
    let mut plan = Vec::new();
    let mut next = 0;
    for (zone, z) in config.zones.iter().enumerate() {
        let split = !z.b.is_empty();
        let needed = 1 + usize::from(split);
        if next + needed > capacity {
            ctx.warn(
                Family::Zone,
                None,
                format!(
                    "{} zones defined, only the first {} fit into {} slots",
                    config.zones.len(),
                    zone,
                    capacity
                ),
            );
            break;
        }
        ctx.add(next, ZoneRef(zone));
        plan.push(ZoneSlots {
            zone,
            slot: next,
            split,
        });
        next += needed;
    }
    plan
}

fn record_mut<'a>(
    image: &'a mut Image,
    family: &RecordFamily,
    slot: usize,
) -> Result<&'a mut [u8]> {
    Ok(image.get_mut(family.address(slot), family.record_size)?)
}

/// Write default VFO records into a fresh image and mark them in the channel bitmap
fn encode_vfos(layout: &CodeplugLayout, image: &mut Image, ctx: &mut Context) -> Result<()> {
    let vfo = layout.vfo;
    if allocate_vfos(image, layout)? {
        for (n, (addr, name)) in [(vfo.a, "VFO A"), (vfo.b, "VFO B")].into_iter().enumerate() {
            let channel = Channel::analog(name, VFO_DEFAULT_FREQUENCY);
            let mut el = ChannelElement::new(image.get_mut(addr, vfo.size)?)?;
            el.from_object(&channel, layout.channels.capacity + n, ctx)?;
        }
    }
    if let (Some(slot), Presence::Bitmap { addr, size, .. }) =
        (vfo.bitmap_slot, layout.channels.presence)
    {
        let bitmap = image.get_mut(addr, size)?;
        bitmap_set(bitmap, slot, true);
        bitmap_set(bitmap, slot + 1, true);
    }
    Ok(())
}

fn encode_radio_ids(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    counts: &SlotCounts,
) -> Result<()> {
    let family = &layout.radio_ids;
    for (slot, id) in config.radio_ids.iter().take(counts.get(Family::RadioId)).enumerate() {
        let mut el = RadioIdElement::new(record_mut(image, family, slot)?)?;
        el.from_object(id)
            .map_err(|e| CodeplugError::record(Family::RadioId, slot, e))?;
    }
    debug!("encoded {} radio IDs", counts.get(Family::RadioId));
    Ok(())
}

fn encode_settings(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    flags: &EncodeFlags,
    ctx: &mut Context,
) -> Result<()> {
    let settings = &config.settings;
    let region = layout.general_settings;
    let mut general = GeneralSettingsElement::new(image.get_mut(region.addr, region.size)?)?;
    general
        .from_object(settings, flags, config.requires_gps())
        .map_err(|e| CodeplugError::record(Family::Settings, 0, e))?;

    match layout.boot_settings {
        Some(region) => {
            let mut boot = BootSettingsElement::new(image.get_mut(region.addr, region.size)?)?;
            boot.from_object(settings);
        }
        None if !settings.intro_line1.is_empty() || !settings.intro_line2.is_empty() => {
            ctx.warn(
                Family::Settings,
                None,
                format!("{} has no boot settings, intro lines skipped", layout.name),
            );
        }
        None => {}
    }
    Ok(())
}

fn encode_channels(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    counts: &SlotCounts,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.channels;
    for (slot, channel) in config.channels.iter().take(counts.get(Family::Channel)).enumerate() {
        let mut el = ChannelElement::new(record_mut(image, family, slot)?)?;
        el.from_object(channel, slot, ctx)
            .map_err(|e| CodeplugError::record(Family::Channel, slot, e))?;
    }
    debug!("encoded {} channels", counts.get(Family::Channel));
    Ok(())
}

/// Contacts, then the index list and the ID map derived from them
fn encode_contacts(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    counts: &SlotCounts,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.contacts;
    let n = counts.get(Family::Contact);
    for (slot, contact) in config.contacts.iter().take(n).enumerate() {
        let mut el = ContactElement::new(record_mut(image, family, slot)?)?;
        el.from_object(contact)
            .map_err(|e| CodeplugError::record(Family::Contact, slot, e))?;
    }
    if n == 0 {
        return Ok(());
    }

    let n32 = n as u32;
    write_contact_index(image.get_mut(layout.contact_index, align16(4 * n32))?, n);
    let pairs: Vec<_> = config.contacts.iter().take(n).enumerate().collect();
    let map = image.get_mut(layout.contact_id_map, align16(8 * (n32 + 1)))?;
    write_contact_map(map, &pairs, ctx)?;
    debug!("encoded {} contacts", n);
    Ok(())
}

fn encode_dtmf_contacts(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    counts: &SlotCounts,
) -> Result<()> {
    let family = &layout.dtmf_contacts;
    let n = counts.get(Family::DtmfContact);
    for (slot, contact) in config.dtmf_contacts.iter().take(n).enumerate() {
        let mut el = DtmfContactElement::new(record_mut(image, family, slot)?)?;
        el.from_object(contact)
            .map_err(|e| CodeplugError::record(Family::DtmfContact, slot, e))?;
    }
    let index = layout.dtmf_index;
    write_dtmf_index(image.get_mut(index.addr, index.size)?, n);
    Ok(())
}

fn encode_group_lists(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    counts: &SlotCounts,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.group_lists;
    let n = counts.get(Family::GroupList);
    for (slot, list) in config.group_lists.iter().take(n).enumerate() {
        let mut el = GroupListElement::new(record_mut(image, family, slot)?)?;
        el.from_object(list, slot, ctx);
    }
    Ok(())
}

fn encode_zone_slot(
    layout: &CodeplugLayout,
    image: &mut Image,
    slot: usize,
    name: &str,
    channels: &[ChannelRef],
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.zones;
    let mut el = ZoneElement::new(record_mut(image, family, slot)?)?;
    let members = el.from_channels(channels, name, slot, ctx);

    if let Some(names) = family.names {
        let mut el = ZoneNameElement::new(image.get_mut(names.address(slot), names.size)?)?;
        el.clear();
        el.set_name(name);
    }
    if let Some(region) = layout.zone_channels {
        let mut el = ZoneChannelsElement::new(image.get_mut(region.addr, region.size)?)?;
        el.set_selected(slot, &members);
    }
    Ok(())
}

fn encode_zones(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    plan: &[ZoneSlots],
    ctx: &mut Context,
) -> Result<()> {
    for placement in plan {
        let zone = &config.zones[placement.zone];
        if placement.split {
            let base: String = zone.name.chars().take(SPLIT_ZONE_BASE_LEN).collect();
            let (a, b) = (format!("{} A", base), format!("{} B", base));
            encode_zone_slot(layout, image, placement.slot, &a, &zone.a, ctx)?;
            encode_zone_slot(layout, image, placement.slot + 1, &b, &zone.b, ctx)?;
        } else {
            encode_zone_slot(layout, image, placement.slot, &zone.name, &zone.a, ctx)?;
        }
    }
    debug!("encoded {} zones", plan.len());
    Ok(())
}

fn encode_scan_lists(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    counts: &SlotCounts,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.scan_lists;
    let n = counts.get(Family::ScanList);
    for (slot, list) in config.scan_lists.iter().take(n).enumerate() {
        let mut el = ScanListElement::new(record_mut(image, family, slot)?)?;
        el.from_object(list, slot, ctx);
    }
    Ok(())
}

fn encode_gps(
    layout: &CodeplugLayout,
    image: &mut Image,
    config: &Config,
    ctx: &mut Context,
) -> Result<()> {
    let Some(region) = layout.gps_settings else {
        return Ok(());
    };
    let mut el = GpsSettingsElement::new(image.get_mut(region.addr, region.size)?)?;
    el.from_object(config, ctx)
        .map_err(|e| CodeplugError::record(Family::GpsSystem, 0, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Zone;

    #[test]
    fn test_zone_plan() {
        let mut config = Config::new();
        let mut a = Zone::new("Simplex");
        a.a.push(ChannelRef(0));
        let mut b = Zone::new("Repeaters");
        b.a.push(ChannelRef(0));
        b.b.push(ChannelRef(1));
        config.add_zone(a);
        config.add_zone(b);
        config.add_zone(Zone::new("Empty"));

        let mut ctx = Context::new();
        let plan = plan_zones(&CodeplugLayout::D868UV, &config, &mut ctx);
        let slots: Vec<_> = plan.iter().map(|z| (z.slot, z.split)).collect();
        assert_eq!(slots, vec![(0, false), (1, true), (3, false)]);
        assert_eq!(ctx.slot_of(ZoneRef(2)), Some(3));
    }

    #[test]
    fn test_zone_overflow_warns() {
        let mut config = Config::new();
        for i in 0..126 {
            let mut z = Zone::new(format!("Z{}", i));
            z.b.push(ChannelRef(0));
            config.add_zone(z);
        }
        let mut ctx = Context::new();
        let plan = plan_zones(&CodeplugLayout::D868UV, &config, &mut ctx);
        assert_eq!(plan.len(), 125);
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_clamped_families() {
        let mut config = Config::new();
        for i in 0..130 {
            config.add_dtmf_contact(crate::config::DtmfContact::new(format!("D{}", i), "1"));
        }
        let mut ctx = Context::new();
        let counts = register(&CodeplugLayout::D868UV, &config, &mut ctx);
        assert_eq!(counts.get(Family::DtmfContact), 128);
        assert!(ctx.has::<DtmfContactRef>(127));
        assert!(!ctx.has::<DtmfContactRef>(128));
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[test]
    fn test_vfo_bits_on_d878() {
        let layout = CodeplugLayout::D878UV;
        let encoded = super::super::Codeplug::new(layout)
            .encode(&Config::new(), &EncodeFlags::default())
            .unwrap();
        let Presence::Bitmap { addr, size, .. } = layout.channels.presence else {
            panic!("channel bitmap expected");
        };
        let bitmap = encoded.image.get(addr, size).unwrap();
        assert_eq!(bitmap[500], 0b11);
        assert!(bitmap[..500].iter().all(|&b| b == 0));
    }
}
