// Fixed-layout views over codeplug records
// Each view borrows a byte span (or owns a buffer in tests) and exposes typed
// accessors. Views over `&[u8]` decode, views over `&mut [u8]` also encode.

macro_rules! element {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<B> {
            data: B,
        }

        impl<B: AsRef<[u8]>> $name<B> {
            pub const SIZE: usize = $size;

            pub fn new(data: B) -> crate::bitwise::elements::Result<Self> {
                crate::bitwise::elements::check_len(data.as_ref(), Self::SIZE)?;
                Ok(Self { data })
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.data.as_ref()[..Self::SIZE]
            }

            #[allow(dead_code)]
            fn bytes(&self) -> &[u8] {
                self.data.as_ref()
            }
        }

        impl<B: AsRef<[u8]> + AsMut<[u8]>> $name<B> {
            #[allow(dead_code)]
            fn bytes_mut(&mut self) -> &mut [u8] {
                self.data.as_mut()
            }
        }
    };
}

pub mod channel;
pub mod contact;
pub mod contact_map;
pub mod dtmf_contact;
pub mod gps;
pub mod group_list;
pub mod radio_id;
pub mod scan_list;
pub mod settings;
pub mod zone;

pub use channel::{ChannelElement, ChannelType};
pub use contact::ContactElement;
pub use contact_map::{write_contact_index, write_contact_map, write_dtmf_index, ContactMapElement};
pub use dtmf_contact::DtmfContactElement;
pub use gps::GpsSettingsElement;
pub use group_list::GroupListElement;
pub use radio_id::RadioIdElement;
pub use scan_list::ScanListElement;
pub use settings::{BootSettingsElement, GeneralSettingsElement};
pub use zone::{ZoneChannelsElement, ZoneElement, ZoneNameElement};

/// Name fields start with a printable character when a record is in use
pub(crate) fn name_in_use(first: u8) -> bool {
    first != 0x00 && first != 0xff
}
