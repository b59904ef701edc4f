// Declarative memory maps of the supported codeplug variants
// One generic pipeline walks these tables; adding a device means adding a layout.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of records in a codeplug
/// Settings are a single fixed record, every other family is an indexed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Family {
    Settings,
    RadioId,
    Channel,
    Contact,
    DtmfContact,
    GroupList,
    Zone,
    ScanList,
    GpsSystem,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Settings => "settings",
            Family::RadioId => "radio ID",
            Family::Channel => "channel",
            Family::Contact => "contact",
            Family::DtmfContact => "DTMF contact",
            Family::GroupList => "group list",
            Family::Zone => "zone",
            Family::ScanList => "scan list",
            Family::GpsSystem => "GPS system",
        };
        write!(f, "{}", name)
    }
}

/// Meaning of a bit in a presence bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    SetPresent,
    ClearPresent,
}

/// How a family marks which slots hold a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// One bit per slot, bit `i % 8` of byte `i / 8`
    Bitmap {
        addr: u32,
        size: u32,
        polarity: Polarity,
    },
    /// One byte per slot, @absent marks an empty slot
    Bytemap { addr: u32, size: u32, absent: u8 },
    /// No indicator, every slot is read and checked for validity
    Scan,
}

impl Presence {
    /// Address and size of the indicator region
    pub fn region(&self) -> Option<Region> {
        match *self {
            Presence::Bitmap { addr, size, .. } | Presence::Bytemap { addr, size, .. } => {
                Some(Region::new(addr, size))
            }
            Presence::Scan => None,
        }
    }
}

/// Granularity at which a family's memory is allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocUnit {
    /// Each record on its own
    Record,
    /// Whole banks of `per_bank` records, the last bank cut at capacity
    Bank { size: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub addr: u32,
    pub size: u32,
}

impl Region {
    pub const fn new(addr: u32, size: u32) -> Self {
        Self { addr, size }
    }
}

/// Companion table indexed like the family itself (zone names)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideTable {
    pub base: u32,
    pub stride: u32,
    pub size: u32,
}

impl SideTable {
    pub fn address(&self, slot: usize) -> u32 {
        self.base + slot as u32 * self.stride
    }
}

/// Addressing of one record family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFamily {
    pub family: Family,
    pub capacity: usize,
    pub presence: Presence,
    pub base: u32,
    /// Records per bank, equal to capacity for flat tables
    pub per_bank: usize,
    pub bank_stride: u32,
    pub record_stride: u32,
    pub record_size: u32,
    pub unit: AllocUnit,
    /// Fill byte of freshly allocated memory
    pub fill: u8,
    /// Offset of a second copy allocated alongside each record
    pub shadow: Option<u32>,
    pub names: Option<SideTable>,
}

impl RecordFamily {
    /// Address of the record in @slot
    pub fn address(&self, slot: usize) -> u32 {
        self.base
            + (slot / self.per_bank) as u32 * self.bank_stride
            + (slot % self.per_bank) as u32 * self.record_stride
    }

    /// Region that must be allocated to back @slot
    pub fn unit_region(&self, slot: usize) -> Region {
        match self.unit {
            AllocUnit::Record => Region::new(self.address(slot), self.record_size),
            AllocUnit::Bank { size } => {
                let bank = slot / self.per_bank;
                let first = bank * self.per_bank;
                let records = (self.capacity - first).min(self.per_bank) as u32;
                let size = size.min(records * self.record_stride);
                Region::new(self.base + bank as u32 * self.bank_stride, size)
            }
        }
    }
}

/// VFO channel records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfoLayout {
    pub a: u32,
    pub b: u32,
    pub size: u32,
    pub shadow: u32,
    /// Channel bitmap slot of VFO A, VFO B follows it
    pub bitmap_slot: Option<usize>,
}

/// Device memory carried through decode and encode without interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    /// Always allocated
    Fixed(Region),
    /// One record of @record_size per set bit of @bitmap, the bitmap included
    Bitmapped {
        bitmap: Region,
        base: u32,
        count: usize,
        record_size: u32,
    },
    /// Prefabricated messages: a bytemap entry other than 0xff pulls in the
    /// whole bank holding that message, plus 0x10 index bytes per message
    Messages {
        bytemap: Region,
        count: usize,
        per_bank: usize,
        bank_base: u32,
        bank_size: u32,
        index: u32,
    },
}

/// Regions the AT-D868UV keeps beside the interpreted records
const D868UV_PASSTHROUGH: &[Passthrough] = &[
    // DTMF numbers
    Passthrough::Fixed(Region::new(0x0250_0500, 0x100)),
    Passthrough::Messages {
        bytemap: Region::new(0x0164_0800, 0x90),
        count: 100,
        per_bank: 8,
        bank_base: 0x0214_0000,
        bank_size: 0x800,
        index: 0x0164_0000,
    },
    // Hot keys, status message bitmap included
    Passthrough::Fixed(Region::new(0x025c_0000, 0x860)),
    Passthrough::Fixed(Region::new(0x025c_0b00, 0x10)),
    // Repeater offset frequencies
    Passthrough::Fixed(Region::new(0x024c_2000, 0x3f0)),
    // Analog and digital alarm
    Passthrough::Fixed(Region::new(0x024c_1400, 0x20)),
    Passthrough::Fixed(Region::new(0x024c_1440, 0x30)),
    // FM broadcast channels and VFO, then their bitmap
    Passthrough::Fixed(Region::new(0x0248_0000, 0x210)),
    Passthrough::Fixed(Region::new(0x0248_0210, 0x20)),
    // 5-tone IDs, functions and settings
    Passthrough::Bitmapped {
        bitmap: Region::new(0x024c_0c80, 0x10),
        base: 0x024c_0000,
        count: 100,
        record_size: 0x20,
    },
    Passthrough::Fixed(Region::new(0x024c_0d00, 0x200)),
    Passthrough::Fixed(Region::new(0x024c_1000, 0x80)),
    // 2-tone IDs and functions with their bitmaps, then settings
    Passthrough::Bitmapped {
        bitmap: Region::new(0x024c_1280, 0x10),
        base: 0x024c_1100,
        count: 24,
        record_size: 0x10,
    },
    Passthrough::Bitmapped {
        bitmap: Region::new(0x024c_2600, 0x10),
        base: 0x024c_2400,
        count: 16,
        record_size: 0x20,
    },
    Passthrough::Fixed(Region::new(0x024c_1290, 0x10)),
    // DTMF settings
    Passthrough::Fixed(Region::new(0x024c_1080, 0x50)),
    // DMR encryption list and keys
    Passthrough::Fixed(Region::new(0x024c_1700, 0x40)),
    Passthrough::Fixed(Region::new(0x024c_1800, 0x500)),
];

/// Complete memory map of one codeplug variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeplugLayout {
    pub name: &'static str,
    pub radio_ids: RecordFamily,
    pub channels: RecordFamily,
    pub contacts: RecordFamily,
    pub dtmf_contacts: RecordFamily,
    pub group_lists: RecordFamily,
    pub zones: RecordFamily,
    pub scan_lists: RecordFamily,
    pub scan_list_members: usize,
    pub general_settings: Region,
    pub zone_channels: Option<Region>,
    pub boot_settings: Option<Region>,
    pub gps_settings: Option<Region>,
    pub gps_message: Option<Region>,
    pub gps_systems: usize,
    pub vfo: VfoLayout,
    pub contact_index: u32,
    pub contact_id_map: u32,
    pub dtmf_index: Region,
    pub passthrough: &'static [Passthrough],
}

impl CodeplugLayout {
    /// Record families in encoding order
    pub fn families(&self) -> [&RecordFamily; 7] {
        [
            &self.radio_ids,
            &self.channels,
            &self.contacts,
            &self.dtmf_contacts,
            &self.group_lists,
            &self.zones,
            &self.scan_lists,
        ]
    }

    pub fn family(&self, family: Family) -> Option<&RecordFamily> {
        self.families().into_iter().find(|f| f.family == family)
    }

    /// Number of slots of @family, including fixed tables
    pub fn capacity(&self, family: Family) -> usize {
        match family {
            Family::GpsSystem => {
                if self.gps_settings.is_some() {
                    self.gps_systems
                } else {
                    0
                }
            }
            other => self.family(other).map_or(0, |f| f.capacity),
        }
    }

    /// Memory map of the AT-D868UV and its relatives
    pub const D868UV: CodeplugLayout = CodeplugLayout {
        name: "D868UV",
        radio_ids: RecordFamily {
            family: Family::RadioId,
            capacity: 250,
            presence: Presence::Bitmap {
                addr: 0x024c_1320,
                size: 0x20,
                polarity: Polarity::SetPresent,
            },
            base: 0x0258_0000,
            per_bank: 250,
            bank_stride: 0,
            record_stride: 0x20,
            record_size: 0x20,
            unit: AllocUnit::Record,
            fill: 0x00,
            shadow: None,
            names: None,
        },
        channels: RecordFamily {
            family: Family::Channel,
            capacity: 4000,
            presence: Presence::Bitmap {
                addr: 0x024c_1500,
                size: 0x200,
                polarity: Polarity::SetPresent,
            },
            base: 0x0080_0000,
            per_bank: 128,
            bank_stride: 0x4_0000,
            record_stride: 0x40,
            record_size: 0x40,
            unit: AllocUnit::Record,
            fill: 0x00,
            shadow: None,
            names: None,
        },
        contacts: RecordFamily {
            family: Family::Contact,
            capacity: 10000,
            presence: Presence::Bitmap {
                addr: 0x0264_0000,
                size: 0x500,
                polarity: Polarity::ClearPresent,
            },
            base: 0x0268_0000,
            per_bank: 4,
            bank_stride: 0x190,
            record_stride: 0x64,
            record_size: 0x64,
            unit: AllocUnit::Bank { size: 0x190 },
            fill: 0x00,
            shadow: None,
            names: None,
        },
        dtmf_contacts: RecordFamily {
            family: Family::DtmfContact,
            capacity: 128,
            presence: Presence::Bytemap {
                addr: 0x0290_0100,
                size: 0x80,
                absent: 0xff,
            },
            base: 0x0294_0000,
            per_bank: 2,
            bank_stride: 0x30,
            record_stride: 0x18,
            record_size: 0x18,
            unit: AllocUnit::Bank { size: 0x30 },
            fill: 0x00,
            shadow: None,
            names: None,
        },
        group_lists: RecordFamily {
            family: Family::GroupList,
            capacity: 250,
            presence: Presence::Bitmap {
                addr: 0x025c_0b10,
                size: 0x20,
                polarity: Polarity::SetPresent,
            },
            base: 0x0298_0000,
            per_bank: 250,
            bank_stride: 0,
            record_stride: 0x200,
            record_size: 0x120,
            unit: AllocUnit::Record,
            fill: 0xff,
            shadow: None,
            names: None,
        },
        zones: RecordFamily {
            family: Family::Zone,
            capacity: 250,
            presence: Presence::Bitmap {
                addr: 0x024c_1300,
                size: 0x20,
                polarity: Polarity::SetPresent,
            },
            base: 0x0100_0000,
            per_bank: 250,
            bank_stride: 0,
            record_stride: 0x200,
            record_size: 0x200,
            unit: AllocUnit::Record,
            fill: 0x00,
            shadow: None,
            names: Some(SideTable {
                base: 0x0254_0000,
                stride: 0x20,
                size: 0x10,
            }),
        },
        scan_lists: RecordFamily {
            family: Family::ScanList,
            capacity: 250,
            presence: Presence::Bitmap {
                addr: 0x024c_1340,
                size: 0x20,
                polarity: Polarity::SetPresent,
            },
            base: 0x0108_0000,
            per_bank: 16,
            bank_stride: 0x4_0000,
            record_stride: 0x200,
            record_size: 0x90,
            unit: AllocUnit::Record,
            fill: 0xff,
            shadow: None,
            names: None,
        },
        scan_list_members: 50,
        general_settings: Region::new(0x0250_0000, 0xd0),
        zone_channels: Some(Region::new(0x0250_0100, 0x400)),
        boot_settings: Some(Region::new(0x0250_0600, 0x30)),
        gps_settings: Some(Region::new(0x0250_1000, 0x30)),
        gps_message: Some(Region::new(0x0250_1100, 0x30)),
        gps_systems: 8,
        vfo: VfoLayout {
            a: 0x00fc_0800,
            b: 0x00fc_0840,
            size: 0x40,
            shadow: 0x2000,
            bitmap_slot: None,
        },
        contact_index: 0x0260_0000,
        contact_id_map: 0x0434_0000,
        dtmf_index: Region::new(0x0290_0000, 0x80),
        passthrough: D868UV_PASSTHROUGH,
    };

    /// Memory map of the AT-D878UV
    pub const D878UV: CodeplugLayout = CodeplugLayout {
        name: "D878UV",
        radio_ids: RecordFamily {
            presence: Presence::Scan,
            ..Self::D868UV.radio_ids
        },
        channels: RecordFamily {
            shadow: Some(0x2000),
            ..Self::D868UV.channels
        },
        contacts: RecordFamily {
            presence: Presence::Bitmap {
                addr: 0x0264_0000,
                size: 0x4f0,
                polarity: Polarity::ClearPresent,
            },
            per_bank: 32,
            bank_stride: 0xc80,
            unit: AllocUnit::Bank { size: 0xc80 },
            ..Self::D868UV.contacts
        },
        scan_lists: RecordFamily {
            presence: Presence::Bitmap {
                addr: 0x024c_1340,
                size: 0x40,
                polarity: Polarity::SetPresent,
            },
            per_bank: 32,
            bank_stride: 0x8_0000,
            record_size: 0xc0,
            ..Self::D868UV.scan_lists
        },
        general_settings: Region::new(0x0250_0000, 0x640),
        boot_settings: None,
        gps_settings: None,
        gps_message: None,
        vfo: VfoLayout {
            bitmap_slot: Some(4000),
            ..Self::D868UV.vfo
        },
        passthrough: &[],
        ..Self::D868UV
    };
}
