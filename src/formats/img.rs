// .img container for sparse codeplug images
// Layout: "ATCP", region count (u32 LE), then `addr u32 LE, len u32 LE, bytes`
// per region, optionally followed by MAGIC and base64-encoded JSON metadata.

use super::metadata::Metadata;
use crate::bitwise::parse_region;
use crate::memmap::{Image, ImageError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use nom::{bytes::complete::tag, multi::count, number::complete::le_u32, IResult, Parser};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ImgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed region table: {0}")]
    RegionTable(String),

    #[error("Invalid region: {0}")]
    Image(#[from] ImageError),

    #[error("Failed to decode metadata: {0}")]
    MetadataDecode(String),

    #[error("Failed to parse metadata JSON: {0}")]
    MetadataJson(#[from] serde_json::Error),

    #[error("Failed to decode base64 metadata: {0}")]
    Base64Decode(String),
}

pub type Result<T> = std::result::Result<T, ImgError>;

/// Start of the region table
pub const TABLE_MAGIC: &[u8] = b"ATCP";

/// Magic bytes that separate the region table from the metadata
pub const MAGIC: &[u8] = b"\x00\xffchirp\xeeimg\x00\x01";

/// Load a .img file and return the image and its metadata
pub fn load_img(filename: impl AsRef<Path>) -> Result<(Image, Metadata)> {
    let mut file = File::open(filename)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    from_bytes(&data)
}

/// Save @image and @metadata to a .img file
pub fn save_img(filename: impl AsRef<Path>, image: &Image, metadata: &Metadata) -> Result<()> {
    let mut file = File::create(filename)?;
    file.write_all(&to_bytes(image, metadata)?)?;
    Ok(())
}

/// Serialize @image and @metadata into the container format
pub fn to_bytes(image: &Image, metadata: &Metadata) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(image.allocated_bytes() + 64);
    out.extend_from_slice(TABLE_MAGIC);
    out.extend_from_slice(&(image.len() as u32).to_le_bytes());
    for (addr, bytes) in image.regions() {
        out.extend_from_slice(&addr.to_le_bytes());
        out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(bytes);
    }

    out.extend_from_slice(MAGIC);
    let metadata_json = metadata.to_json()?;
    out.extend_from_slice(STANDARD.encode(metadata_json.as_bytes()).as_bytes());
    Ok(out)
}

/// Parse the container format
pub fn from_bytes(data: &[u8]) -> Result<(Image, Metadata)> {
    let (rest, regions) =
        region_table(data).map_err(|e| ImgError::RegionTable(e.to_string()))?;

    let mut image = Image::new();
    for (addr, bytes) in regions {
        if bytes.is_empty() {
            continue;
        }
        image.allocate(addr, bytes.len() as u32, 0x00)?;
        image.write(addr, bytes)?;
    }
    debug!(
        "loaded {} regions, {} bytes",
        image.len(),
        image.allocated_bytes()
    );

    let metadata = if rest.is_empty() {
        Metadata::default()
    } else if let Some(encoded) = rest.strip_prefix(MAGIC) {
        decode_metadata(encoded)?
    } else {
        return Err(ImgError::RegionTable(format!(
            "{} trailing bytes after the last region",
            rest.len()
        )));
    };
    Ok((image, metadata))
}

fn region_table(input: &[u8]) -> IResult<&[u8], Vec<(u32, &[u8])>> {
    let (input, (_, n)) = (tag(TABLE_MAGIC), le_u32).parse(input)?;
    count(parse_region, n as usize).parse(input)
}

/// Decode base64-encoded JSON metadata
fn decode_metadata(encoded: &[u8]) -> Result<Metadata> {
    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| ImgError::Base64Decode(e.to_string()))?;

    let json_str =
        String::from_utf8(decoded).map_err(|e| ImgError::MetadataDecode(e.to_string()))?;

    Metadata::from_json(&json_str).map_err(ImgError::MetadataJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_image() -> Image {
        let mut image = Image::new();
        image.allocate(0x0080_0000, 0x40, 0xff).unwrap();
        image.write(0x0080_0000, b"Local").unwrap();
        image.allocate(0x0250_0000, 0x10, 0x00).unwrap();
        image
    }

    #[test]
    fn test_save_load_img() -> Result<()> {
        let tempfile = NamedTempFile::new().unwrap();
        let path = tempfile.path().to_path_buf();

        let image = sample_image();
        let metadata = Metadata::new("AnyTone", "AT-D868UV");
        save_img(&path, &image, &metadata)?;

        let (loaded, loaded_metadata) = load_img(&path)?;
        assert_eq!(loaded, image);
        assert_eq!(loaded_metadata.model, "AT-D868UV");
        assert_eq!(loaded_metadata.crate_version, crate::VERSION);
        Ok(())
    }

    #[test]
    fn test_without_metadata() -> Result<()> {
        let mut tempfile = NamedTempFile::new().unwrap();
        tempfile.write_all(b"ATCP").unwrap();
        tempfile.write_all(&1u32.to_le_bytes()).unwrap();
        tempfile.write_all(&0x1000u32.to_le_bytes()).unwrap();
        tempfile.write_all(&2u32.to_le_bytes()).unwrap();
        tempfile.write_all(&[0xAA, 0xBB]).unwrap();
        tempfile.flush().unwrap();

        let (image, metadata) = load_img(tempfile.path())?;
        assert_eq!(image.get(0x1000, 2).unwrap(), &[0xAA, 0xBB]);
        assert_eq!(metadata, Metadata::default());
        Ok(())
    }

    #[test]
    fn test_metadata_from_json() -> Result<()> {
        let mut data = to_bytes(&Image::new(), &Metadata::default())?;
        data.truncate(TABLE_MAGIC.len() + 4 + MAGIC.len());
        let json = r#"{"vendor":"BTECH","model":"DMR-6X2","crate_version":"0.0.1"}"#;
        data.extend_from_slice(STANDARD.encode(json).as_bytes());

        let (image, metadata) = from_bytes(&data)?;
        assert!(image.is_empty());
        assert_eq!(metadata.vendor, "BTECH");
        assert_eq!(metadata.crate_version, "0.0.1");
        Ok(())
    }

    #[test]
    fn test_malformed_table() {
        assert!(matches!(
            from_bytes(b"CHIRP"),
            Err(ImgError::RegionTable(_))
        ));

        let mut data = to_bytes(&sample_image(), &Metadata::default()).unwrap();
        data.truncate(20);
        assert!(matches!(from_bytes(&data), Err(ImgError::RegionTable(_))));

        let mut data = to_bytes(&Image::new(), &Metadata::default()).unwrap();
        data.truncate(8);
        data.extend_from_slice(b"junk");
        assert!(matches!(from_bytes(&data), Err(ImgError::RegionTable(_))));
    }
}
