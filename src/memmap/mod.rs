// Sparse codeplug memory: the image itself, device memory maps and the allocator

pub mod allocator;
pub mod image;
pub mod layout;

pub use allocator::{
    align16, allocate_for_decoding, allocate_for_encoding, allocate_updated, allocate_vfos,
    is_present, write_presence, SlotCounts,
};
pub use image::{hexdump, Image, ImageError};
pub use layout::{
    AllocUnit, CodeplugLayout, Family, Passthrough, Polarity, Presence, RecordFamily, Region,
    SideTable, VfoLayout,
};
