// Decoding pipeline: memory image to configuration
// Pass one creates an object for every present and valid record, pass two
// resolves the slot references between them.

use super::context::Context;
use super::elements::{
    BootSettingsElement, ChannelElement, ChannelType, ContactElement, DtmfContactElement,
    GeneralSettingsElement, GpsSettingsElement, GroupListElement, RadioIdElement,
    ScanListElement, ZoneElement, ZoneNameElement,
};
use super::{Decoded, Result};
use crate::config::{Config, DtmfContactRef, GpsSystemRef, Zone, ZoneRef};
use crate::memmap::{is_present, CodeplugLayout, Family, Image, Presence, RecordFamily};
use std::collections::BTreeSet;
use tracing::{debug, info};

const ZONE_A_SUFFIX: &str = " A";
const ZONE_B_SUFFIX: &str = " B";

/// Zone object with the slots holding its A and B lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZoneSource {
    zone: ZoneRef,
    a: usize,
    b: Option<usize>,
}

pub(super) fn decode(layout: &CodeplugLayout, image: &Image) -> Result<Decoded> {
    let mut ctx = Context::new();
    let mut config = Config::new();
    info!("decoding {} codeplug", layout.name);

    create_radio_ids(layout, image, &mut config, &mut ctx)?;
    create_settings(layout, image, &mut config, &mut ctx)?;
    create_channels(layout, image, &mut config, &mut ctx)?;
    create_contacts(layout, image, &mut config, &mut ctx)?;
    create_dtmf_contacts(layout, image, &mut config, &mut ctx)?;
    create_group_lists(layout, image, &mut config, &mut ctx)?;
    let zones = create_zones(layout, image, &mut config, &mut ctx)?;
    create_scan_lists(layout, image, &mut config, &mut ctx)?;
    create_gps_systems(layout, image, &mut config, &mut ctx)?;

    link_group_lists(layout, image, &mut config, &mut ctx)?;
    link_zones(layout, image, &mut config, &zones, &mut ctx)?;
    link_scan_lists(layout, image, &mut config, &mut ctx)?;
    link_channels(layout, image, &mut config, &mut ctx)?;
    link_gps_systems(layout, image, &mut config, &mut ctx)?;

    info!(
        "decoded {} channels, {} contacts, {} zones, {} warnings",
        config.channels.len(),
        config.contacts.len(),
        config.zones.len(),
        ctx.warnings().len()
    );
    Ok(Decoded {
        config,
        warnings: ctx.into_warnings(),
    })
}

fn record<'a>(image: &'a Image, family: &RecordFamily, slot: usize) -> Result<&'a [u8]> {
    Ok(image.get(family.address(slot), family.record_size)?)
}

/// Slots of @family that are marked present and pass @is_valid
///
/// A slot marked present whose record is empty is reported and skipped.
fn present_slots(
    image: &Image,
    family: &RecordFamily,
    ctx: &mut Context,
    is_valid: impl Fn(usize) -> Result<bool>,
) -> Result<Vec<usize>> {
    let mut slots = Vec::new();
    for slot in 0..family.capacity {
        if !is_present(image, family, slot)? {
            continue;
        }
        if is_valid(slot)? {
            slots.push(slot);
        } else if family.presence != Presence::Scan {
            ctx.warn(
                family.family,
                Some(slot),
                "marked present but holds no record, skipped",
            );
        }
    }
    Ok(slots)
}

fn create_radio_ids(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.radio_ids;
    let slots = present_slots(image, family, ctx, |slot| {
        Ok(RadioIdElement::new(record(image, family, slot)?)?.is_valid())
    })?;
    for slot in slots {
        match RadioIdElement::new(record(image, family, slot)?)?.to_object() {
            Ok(id) => ctx.add(slot, config.add_radio_id(id)),
            Err(err) => ctx.warn(Family::RadioId, Some(slot), format!("invalid ID: {}", err)),
        }
    }
    ctx.mark_created(Family::RadioId);
    debug!("created {} radio IDs", config.radio_ids.len());
    Ok(())
}

fn create_settings(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    let region = layout.general_settings;
    let general = GeneralSettingsElement::new(image.get(region.addr, region.size)?)?;
    if let Err(err) = general.update_settings(&mut config.settings) {
        ctx.warn(
            Family::Settings,
            None,
            format!("invalid auto-repeater window: {}", err),
        );
    }
    if let Some(region) = layout.boot_settings {
        BootSettingsElement::new(image.get(region.addr, region.size)?)?
            .update_settings(&mut config.settings);
    }
    if let Some(region) = layout.gps_settings {
        GpsSettingsElement::new(image.get(region.addr, region.size)?)?
            .update_settings(&mut config.settings.gps);
    }
    ctx.mark_created(Family::Settings);
    Ok(())
}

fn create_channels(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.channels;
    let slots = present_slots(image, family, ctx, |slot| {
        Ok(ChannelElement::new(record(image, family, slot)?)?.is_valid())
    })?;
    for slot in slots {
        let el = ChannelElement::new(record(image, family, slot)?)?;
        if let Some(channel) = el.to_object(slot, ctx) {
            ctx.add(slot, config.add_channel(channel));
        }
    }
    ctx.mark_created(Family::Channel);
    debug!("created {} channels", config.channels.len());
    Ok(())
}

fn create_contacts(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.contacts;
    let slots = present_slots(image, family, ctx, |slot| {
        Ok(ContactElement::new(record(image, family, slot)?)?.is_valid())
    })?;
    for slot in slots {
        match ContactElement::new(record(image, family, slot)?)?.to_object() {
            Ok(contact) => ctx.add(slot, config.add_contact(contact)),
            Err(err) => ctx.warn(Family::Contact, Some(slot), format!("invalid ID: {}", err)),
        }
    }
    ctx.mark_created(Family::Contact);
    debug!("created {} contacts", config.contacts.len());
    Ok(())
}

fn create_dtmf_contacts(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.dtmf_contacts;
    let slots = present_slots(image, family, ctx, |_| Ok(true))?;
    for slot in slots {
        let contact = DtmfContactElement::new(record(image, family, slot)?)?.to_object();
        let handle: DtmfContactRef = config.add_dtmf_contact(contact);
        ctx.add(slot, handle);
    }
    ctx.mark_created(Family::DtmfContact);
    Ok(())
}

fn create_group_lists(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.group_lists;
    let slots = present_slots(image, family, ctx, |slot| {
        Ok(GroupListElement::new(record(image, family, slot)?)?.is_valid())
    })?;
    for slot in slots {
        let list = GroupListElement::new(record(image, family, slot)?)?.to_object();
        ctx.add(slot, config.add_group_list(list));
    }
    ctx.mark_created(Family::GroupList);
    Ok(())
}

fn zone_name(image: &Image, family: &RecordFamily, slot: usize) -> Result<Option<String>> {
    let Some(names) = family.names else {
        return Ok(None);
    };
    let el = ZoneNameElement::new(image.get(names.address(slot), names.size)?)?;
    Ok(el.is_valid().then(|| el.name()))
}

/// Create zones, merging "<name> A"/"<name> B" pairs into one zone.
/// The pair must be consecutive among present slots, empty slots between them are skipped.
fn create_zones(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<Vec<ZoneSource>> {
    let family = &layout.zones;
    let slots = present_slots(image, family, ctx, |slot| {
        Ok(zone_name(image, family, slot)?.is_some())
    })?;

    let mut sources: Vec<ZoneSource> = Vec::new();
    for slot in slots {
        let Some(name) = zone_name(image, family, slot)? else {
            continue;
        };

        if let Some(prev) = sources.last_mut() {
            let prev_zone = &mut config.zones[prev.zone.index()];
            let base = name.strip_suffix(ZONE_B_SUFFIX);
            let prev_base = prev_zone.name.strip_suffix(ZONE_A_SUFFIX);
            if prev.b.is_none() && base.is_some() && base == prev_base {
                let merged = prev_base.unwrap_or_default().to_string();
                debug!("zone slots {} and {} merged into '{}'", prev.a, slot, merged);
                prev_zone.name = merged;
                prev.b = Some(slot);
                ctx.add(slot, prev.zone);
                continue;
            }
        }

        let zone = config.add_zone(Zone::new(name));
        ctx.add(slot, zone);
        sources.push(ZoneSource {
            zone,
            a: slot,
            b: None,
        });
    }
    ctx.mark_created(Family::Zone);
    Ok(sources)
}

fn create_scan_lists(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    let family = &layout.scan_lists;
    let slots = present_slots(image, family, ctx, |slot| {
        Ok(ScanListElement::new(record(image, family, slot)?)?.is_valid())
    })?;
    for slot in slots {
        let list = ScanListElement::new(record(image, family, slot)?)?.to_object();
        ctx.add(slot, config.add_scan_list(list));
    }
    ctx.mark_created(Family::ScanList);
    Ok(())
}

/// Create exactly the positioning systems some decoded channel reports with
fn create_gps_systems(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    ctx.mark_created(Family::GpsSystem);
    let Some(region) = layout.gps_settings else {
        return Ok(());
    };

    let family = &layout.channels;
    let mut referenced = BTreeSet::new();
    for (slot, _) in ctx.slots(Family::Channel) {
        let el = ChannelElement::new(record(image, family, slot)?)?;
        // Analog records never report positions, whatever the flag says.
        if el.channel_type() != ChannelType::Digital {
            continue;
        }
        if let Some(n) = el.aprs_system() {
            referenced.insert(n);
        }
    }

    let el = GpsSettingsElement::new(image.get(region.addr, region.size)?)?;
    for n in referenced {
        if n >= layout.gps_systems {
            // Reported by the channel link.
            continue;
        }
        let system: GpsSystemRef = config.add_gps_system(el.to_object(n));
        ctx.add(n, system);
    }
    debug!("created {} GPS systems", config.gps_systems.len());
    Ok(())
}

fn link_group_lists(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    ctx.begin_link(Family::GroupList, &[Family::Contact])?;
    let family = &layout.group_lists;
    for (slot, idx) in ctx.slots(Family::GroupList) {
        let el = GroupListElement::new(record(image, family, slot)?)?;
        el.link(&mut config.group_lists[idx], slot, ctx);
    }
    Ok(())
}

fn link_zones(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    zones: &[ZoneSource],
    ctx: &mut Context,
) -> Result<()> {
    ctx.begin_link(Family::Zone, &[Family::Channel])?;
    let family = &layout.zones;
    for source in zones {
        let zone = &mut config.zones[source.zone.index()];
        let el = ZoneElement::new(record(image, family, source.a)?)?;
        zone.a = el.channels(&zone.name, source.a, ctx);
        if let Some(b) = source.b {
            let el = ZoneElement::new(record(image, family, b)?)?;
            zone.b = el.channels(&zone.name, b, ctx);
        }
    }
    Ok(())
}

fn link_scan_lists(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    ctx.begin_link(Family::ScanList, &[Family::Channel])?;
    let family = &layout.scan_lists;
    for (slot, idx) in ctx.slots(Family::ScanList) {
        let el = ScanListElement::new(record(image, family, slot)?)?;
        el.link(&mut config.scan_lists[idx], slot, ctx);
    }
    Ok(())
}

fn link_channels(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    ctx.begin_link(
        Family::Channel,
        &[
            Family::Contact,
            Family::GroupList,
            Family::ScanList,
            Family::RadioId,
            Family::GpsSystem,
        ],
    )?;
    let family = &layout.channels;
    for (slot, idx) in ctx.slots(Family::Channel) {
        let el = ChannelElement::new(record(image, family, slot)?)?;
        el.link(&mut config.channels[idx], slot, ctx);
    }
    Ok(())
}

fn link_gps_systems(
    layout: &CodeplugLayout,
    image: &Image,
    config: &mut Config,
    ctx: &mut Context,
) -> Result<()> {
    ctx.begin_link(Family::GpsSystem, &[Family::Contact, Family::Channel])?;
    let Some(region) = layout.gps_settings else {
        return Ok(());
    };
    let el = GpsSettingsElement::new(image.get(region.addr, region.size)?)?;
    for (n, idx) in ctx.slots(Family::GpsSystem) {
        el.link(n, GpsSystemRef(idx), config, ctx);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeplug::{Codeplug, CodeplugError, EncodeFlags};
    use crate::config::Channel;

    #[test]
    fn test_link_before_create_fails() {
        let mut ctx = Context::new();
        ctx.mark_created(Family::Channel);
        let err = ctx
            .begin_link(Family::Channel, &[Family::Contact])
            .unwrap_err();
        assert_eq!(
            err,
            CodeplugError::Phase {
                family: Family::Channel,
                required: Family::Contact,
            }
        );
    }

    #[test]
    fn test_unallocated_image_fails() {
        let err = decode(&CodeplugLayout::D868UV, &Image::new()).unwrap_err();
        assert!(matches!(err, CodeplugError::Image(_)));
    }

    #[test]
    fn test_split_zone_merged() {
        let mut config = Config::new();
        let local = config.add_channel(Channel::analog("Local", 145_500_000));
        let rep = config.add_channel(Channel::analog("Repeater", 439_000_000));
        let mut zone = Zone::new("Repeaters");
        zone.a = vec![local];
        zone.b = vec![rep];
        config.add_zone(zone);
        let mut simplex = Zone::new("Simplex");
        simplex.a = vec![local];
        config.add_zone(simplex);

        let codeplug = Codeplug::new(CodeplugLayout::D868UV);
        let encoded = codeplug.encode(&config, &EncodeFlags::default()).unwrap();
        let decoded = codeplug.decode(&encoded.image).unwrap();
        assert_eq!(decoded.config.zones, config.zones);
    }

    #[test]
    fn test_split_zone_merged_across_empty_slot() {
        let mut config = Config::new();
        let ch = config.add_channel(Channel::analog("Local", 145_500_000));
        for name in ["Rep A", "Gap", "Rep B"] {
            let mut zone = Zone::new(name);
            zone.a = vec![ch];
            config.add_zone(zone);
        }

        let layout = CodeplugLayout::D868UV;
        let codeplug = Codeplug::new(layout);
        let mut encoded = codeplug.encode(&config, &EncodeFlags::default()).unwrap();
        let Some(bitmap) = layout.zones.presence.region() else {
            panic!("zones carry a bitmap");
        };
        encoded.image.write(bitmap.addr, &[0b0000_0101]).unwrap();

        let decoded = codeplug.decode(&encoded.image).unwrap();
        let zones = &decoded.config.zones;
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].name, "Rep");
        assert_eq!(zones[0].a, vec![ch]);
        assert_eq!(zones[0].b, vec![ch]);
    }

    #[test]
    fn test_unrelated_suffixes_kept() {
        let mut config = Config::new();
        let ch = config.add_channel(Channel::analog("Local", 145_500_000));
        for name in ["North A", "South B"] {
            let mut zone = Zone::new(name);
            zone.a = vec![ch];
            config.add_zone(zone);
        }

        let codeplug = Codeplug::new(CodeplugLayout::D868UV);
        let encoded = codeplug.encode(&config, &EncodeFlags::default()).unwrap();
        let decoded = codeplug.decode(&encoded.image).unwrap();
        let names: Vec<_> = decoded.config.zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, ["North A", "South B"]);
    }
}
