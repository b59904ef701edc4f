// Sparse memory image of a codeplug
// Maps 32-bit device addresses to allocated byte regions.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Unallocated memory access at {addr:#010x} ({len} bytes)")]
    Unallocated { addr: u32, len: u32 },

    #[error("Region at {addr:#010x} ({len} bytes) exceeds the 32-bit address space")]
    OutOfRange { addr: u32, len: u32 },
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// Byte-addressable sparse buffer.
/// Allocated regions never overlap or touch: allocating over or next to an
/// existing region merges both into one, keeping the bytes already present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    regions: BTreeMap<u32, Vec<u8>>,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total number of allocated bytes
    pub fn allocated_bytes(&self) -> usize {
        self.regions.values().map(Vec::len).sum()
    }

    /// Iterate regions in address order
    pub fn regions(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.regions.iter().map(|(&addr, data)| (addr, data.as_slice()))
    }

    /// Region containing all of [addr, addr+len), with its start address
    fn find(&self, addr: u32, len: u32) -> Option<(u32, &Vec<u8>)> {
        let end = addr as u64 + len as u64;
        self.regions
            .range(..=addr)
            .next_back()
            .filter(|(&start, data)| start as u64 + data.len() as u64 >= end)
            .map(|(&start, data)| (start, data))
    }

    /// Check whether [addr, addr+len) is backed by memory
    pub fn is_allocated(&self, addr: u32, len: u32) -> bool {
        self.find(addr, len).is_some()
    }

    /// Allocate [addr, addr+len), filling new bytes with @fill.
    /// Returns false when the range was already fully allocated.
    pub fn allocate(&mut self, addr: u32, len: u32, fill: u8) -> Result<bool> {
        let end = addr as u64 + len as u64;
        if end > u32::MAX as u64 + 1 {
            return Err(ImageError::OutOfRange { addr, len });
        }
        if len == 0 || self.is_allocated(addr, len) {
            return Ok(false);
        }

        // Every region overlapping or adjoining the new range gets merged into it.
        let touching: Vec<u32> = self
            .regions
            .iter()
            .filter(|(&start, data)| {
                (start as u64) <= end && start as u64 + data.len() as u64 >= addr as u64
            })
            .map(|(&start, _)| start)
            .collect();

        let mut start = addr as u64;
        let mut stop = end;
        for s in &touching {
            let data = &self.regions[s];
            start = start.min(*s as u64);
            stop = stop.max(*s as u64 + data.len() as u64);
        }

        let mut merged = vec![fill; (stop - start) as usize];
        for s in touching {
            if let Some(data) = self.regions.remove(&s) {
                let off = (s as u64 - start) as usize;
                merged[off..off + data.len()].copy_from_slice(&data);
            }
        }
        tracing::trace!("allocated {:#010x}+{:#x}", addr, len);
        self.regions.insert(start as u32, merged);
        Ok(true)
    }

    /// Read @len bytes at @addr
    pub fn get(&self, addr: u32, len: u32) -> Result<&[u8]> {
        let (start, data) = self
            .find(addr, len)
            .ok_or(ImageError::Unallocated { addr, len })?;
        let off = (addr - start) as usize;
        Ok(&data[off..off + len as usize])
    }

    /// Mutable access to @len bytes at @addr
    pub fn get_mut(&mut self, addr: u32, len: u32) -> Result<&mut [u8]> {
        let start = self
            .find(addr, len)
            .map(|(start, _)| start)
            .ok_or(ImageError::Unallocated { addr, len })?;
        let data = self
            .regions
            .get_mut(&start)
            .ok_or(ImageError::Unallocated { addr, len })?;
        let off = (addr - start) as usize;
        Ok(&mut data[off..off + len as usize])
    }

    /// Copy @bytes to @addr
    pub fn write(&mut self, addr: u32, bytes: &[u8]) -> Result<()> {
        self.get_mut(addr, bytes.len() as u32)?
            .copy_from_slice(bytes);
        Ok(())
    }

    /// Set @len bytes at @addr to @value
    pub fn fill(&mut self, addr: u32, len: u32, value: u8) -> Result<()> {
        self.get_mut(addr, len)?.fill(value);
        Ok(())
    }

    /// Hex dump of @len bytes at @addr
    pub fn printable(&self, addr: u32, len: u32) -> Result<String> {
        Ok(hexdump(addr, self.get(addr, len)?))
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image({} regions, {} bytes)",
            self.len(),
            self.allocated_bytes()
        )
    }
}

/// Create a hex dump of bytes (similar to hexdump -C), offsets relative to @base
pub fn hexdump(base: u32, data: &[u8]) -> String {
    let mut output = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        output.push_str(&format!("{:08x}  ", base as usize + i * 16));

        for j in 0..16 {
            if j == 8 {
                output.push(' ');
            }
            match chunk.get(j) {
                Some(byte) => output.push_str(&format!("{:02x} ", byte)),
                None => output.push_str("   "),
            }
        }

        output.push_str(" |");
        for byte in chunk {
            if (0x20..=0x7e).contains(byte) {
                output.push(*byte as char);
            } else {
                output.push('.');
            }
        }
        output.push_str("|\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_access() {
        let mut image = Image::new();
        assert!(image.allocate(0x1000, 0x40, 0x00).unwrap());
        image.write(0x1010, &[1, 2, 3]).unwrap();
        assert_eq!(image.get(0x1010, 3).unwrap(), &[1, 2, 3]);
        assert_eq!(image.len(), 1);
        assert_eq!(image.allocated_bytes(), 0x40);
    }

    #[test]
    fn test_unallocated_access_fails() {
        let mut image = Image::new();
        image.allocate(0x1000, 0x10, 0).unwrap();
        assert_eq!(
            image.get(0x2000, 4),
            Err(ImageError::Unallocated {
                addr: 0x2000,
                len: 4
            })
        );
        // Crossing the end of a region
        assert!(image.get(0x100c, 8).is_err());
        assert!(image.fill(0x0ff0, 0x20, 0xff).is_err());
    }

    #[test]
    fn test_allocation_is_idempotent() {
        let mut image = Image::new();
        assert!(image.allocate(0x2000, 0x190, 0xff).unwrap());
        image.write(0x2000, &[0x42]).unwrap();
        assert!(!image.allocate(0x2000, 0x190, 0x00).unwrap());
        assert!(!image.allocate(0x2064, 0x64, 0x00).unwrap());
        assert_eq!(image.get(0x2000, 1).unwrap(), &[0x42]);
        assert_eq!(image.get(0x2064, 1).unwrap(), &[0xff]);
        assert_eq!(image.len(), 1);
    }

    #[test]
    fn test_overlapping_allocation_merges() {
        let mut image = Image::new();
        image.allocate(0x100, 0x10, 0xaa).unwrap();
        image.allocate(0x120, 0x10, 0xbb).unwrap();
        assert!(image.allocate(0x0f8, 0x40, 0x00).unwrap());
        assert_eq!(image.len(), 1);
        assert_eq!(image.get(0x0f8, 1).unwrap(), &[0x00]);
        assert_eq!(image.get(0x100, 1).unwrap(), &[0xaa]);
        assert_eq!(image.get(0x110, 1).unwrap(), &[0x00]);
        assert_eq!(image.get(0x12f, 1).unwrap(), &[0xbb]);
        assert_eq!(image.allocated_bytes(), 0x40);
    }

    #[test]
    fn test_adjacent_regions_join() {
        let mut image = Image::new();
        image.allocate(0x100, 0x10, 0).unwrap();
        image.allocate(0x120, 0x10, 0).unwrap();
        assert_eq!(image.len(), 2);
        assert!(image.get(0x108, 0x10).is_err());

        image.allocate(0x110, 0x10, 0).unwrap();
        assert_eq!(image.len(), 1);
        assert_eq!(image.get(0x108, 0x10).unwrap().len(), 0x10);
    }

    #[test]
    fn test_address_space_limit() {
        let mut image = Image::new();
        assert!(image.allocate(0xffff_fff0, 0x10, 0).unwrap());
        assert!(image.allocate(0xffff_fff8, 0x10, 0).is_err());
    }

    #[test]
    fn test_hexdump() {
        let data = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f, 0x41, 0x42, 0x43,
        ];
        let dump = hexdump(0x02500000, &data);
        assert!(dump.starts_with("02500000  00 01 02 03"));
        assert!(dump.contains("02500010  41 42 43"));
        assert!(dump.contains("|ABC|"));
    }
}
