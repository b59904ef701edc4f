// Per-call lookup tables between codeplug slots and object handles

use super::{CodeplugError, Result};
use crate::config::{
    ChannelRef, ContactRef, DtmfContactRef, GpsSystemRef, GroupListRef, RadioIdRef, ScanListRef,
    ZoneRef,
};
use crate::memmap::Family;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Typed object handle belonging to one record family
pub trait Handle: Copy {
    const FAMILY: Family;

    fn from_index(index: usize) -> Self;
    fn to_index(self) -> usize;
}

macro_rules! impl_handle {
    ($($ty:ty => $family:expr),* $(,)?) => {
        $(
            impl Handle for $ty {
                const FAMILY: Family = $family;

                fn from_index(index: usize) -> Self {
                    Self(index)
                }

                fn to_index(self) -> usize {
                    self.0
                }
            }
        )*
    };
}

impl_handle!(
    RadioIdRef => Family::RadioId,
    ChannelRef => Family::Channel,
    ContactRef => Family::Contact,
    DtmfContactRef => Family::DtmfContact,
    GroupListRef => Family::GroupList,
    ZoneRef => Family::Zone,
    ScanListRef => Family::ScanList,
    GpsSystemRef => Family::GpsSystem,
);

/// Something that went wrong without stopping the codec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub family: Family,
    pub slot: Option<usize>,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            Some(slot) => write!(f, "{} {}: {}", self.family, slot, self.message),
            None => write!(f, "{}: {}", self.family, self.message),
        }
    }
}

/// Decoding progress of a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Phase {
    #[default]
    Pending,
    Created,
    Linked,
}

#[derive(Debug, Default)]
struct Table {
    by_slot: BTreeMap<usize, usize>,
    by_index: BTreeMap<usize, usize>,
}

/// Slot to handle maps, phase state and collected warnings of one codec run
#[derive(Debug, Default)]
pub struct Context {
    tables: BTreeMap<Family, Table>,
    phases: BTreeMap<Family, Phase>,
    warnings: Vec<Warning>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate @slot with @handle
    pub fn add<H: Handle>(&mut self, slot: usize, handle: H) {
        let table = self.tables.entry(H::FAMILY).or_default();
        table.by_slot.insert(slot, handle.to_index());
        table.by_index.insert(handle.to_index(), slot);
    }

    /// Handle stored in @slot
    pub fn get<H: Handle>(&self, slot: usize) -> Option<H> {
        self.tables
            .get(&H::FAMILY)
            .and_then(|t| t.by_slot.get(&slot))
            .map(|&index| H::from_index(index))
    }

    pub fn has<H: Handle>(&self, slot: usize) -> bool {
        self.get::<H>(slot).is_some()
    }

    /// Slot holding @handle
    pub fn slot_of<H: Handle>(&self, handle: H) -> Option<usize> {
        self.tables
            .get(&H::FAMILY)
            .and_then(|t| t.by_index.get(&handle.to_index()))
            .copied()
    }

    /// Number of slots known for @family
    pub fn count(&self, family: Family) -> usize {
        self.tables.get(&family).map_or(0, |t| t.by_slot.len())
    }

    /// Slots of @family with their object index, in slot order
    pub fn slots(&self, family: Family) -> Vec<(usize, usize)> {
        self.tables
            .get(&family)
            .map(|t| t.by_slot.iter().map(|(&s, &i)| (s, i)).collect())
            .unwrap_or_default()
    }

    pub fn phase(&self, family: Family) -> Phase {
        self.phases.get(&family).copied().unwrap_or_default()
    }

    pub fn mark_created(&mut self, family: Family) {
        self.phases.insert(family, Phase::Created);
    }

    /// Enter the link phase of @family once it and every family it refers to exist
    pub fn begin_link(&mut self, family: Family, requires: &[Family]) -> Result<()> {
        for &required in std::iter::once(&family).chain(requires) {
            if self.phase(required) < Phase::Created {
                return Err(CodeplugError::Phase { family, required });
            }
        }
        self.phases.insert(family, Phase::Linked);
        Ok(())
    }

    /// Record a warning and log it
    pub fn warn(&mut self, family: Family, slot: Option<usize>, message: impl Into<String>) {
        let warning = Warning {
            family,
            slot,
            message: message.into(),
        };
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_mapping() {
        let mut ctx = Context::new();
        ctx.add(7, ChannelRef(0));
        ctx.add(9, ChannelRef(1));
        assert_eq!(ctx.get::<ChannelRef>(9), Some(ChannelRef(1)));
        assert_eq!(ctx.slot_of(ChannelRef(0)), Some(7));
        assert!(!ctx.has::<ChannelRef>(8));
        // Families do not share slots.
        assert!(!ctx.has::<ContactRef>(7));
        assert_eq!(ctx.count(Family::Channel), 2);
        assert_eq!(ctx.slots(Family::Channel), vec![(7, 0), (9, 1)]);
    }

    #[test]
    fn test_phase_order() {
        let mut ctx = Context::new();
        ctx.mark_created(Family::GroupList);
        assert_eq!(
            ctx.begin_link(Family::GroupList, &[Family::Contact]),
            Err(CodeplugError::Phase {
                family: Family::GroupList,
                required: Family::Contact
            })
        );
        ctx.mark_created(Family::Contact);
        ctx.begin_link(Family::GroupList, &[Family::Contact]).unwrap();
        assert_eq!(ctx.phase(Family::GroupList), Phase::Linked);
        assert!(ctx.begin_link(Family::Zone, &[]).is_err());
    }

    #[test]
    fn test_warnings() {
        let mut ctx = Context::new();
        ctx.warn(Family::ScanList, Some(3), "channel 12 unknown");
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].to_string(), "scan list 3: channel 12 unknown");
    }
}
