mod include;
mod error;
pub mod flags;
pub mod csum;

use std::io::Cursor;
use binrw::{BinReaderExt, BinResult, BinWrite};
use log::debug;

use crate::utils::kv::KvRecord;
pub use include::*;
pub use error::FmapError;
pub use flags::flags_to_string;

/// Offset of the first 4-byte aligned `__FMAP__` signature in `image`.
pub fn find(image: &[u8]) -> Option<usize> {
    let sig_len = FMAP_SIGNATURE.len();
    if image.len() < sig_len {
        return None
    }

    (0..=image.len() - sig_len)
        .step_by(4)
        .find(|&offset| &image[offset..offset + sig_len] == FMAP_SIGNATURE)
}

/// Parses the table at `offset`. The signature is checked again and the
/// header and every area record must lie inside `image` before anything
/// past the signature is decoded.
pub fn parse(image: &[u8], offset: usize) -> Result<Fmap, FmapError> {
    let sig_end = match offset.checked_add(FMAP_SIGNATURE.len()) {
        Some(end) if end <= image.len() => end,
        _ => return Err(FmapError::InvalidFmap(format!("offset 0x{:x} is past the end of the image", offset))),
    };
    if &image[offset..sig_end] != FMAP_SIGNATURE {
        return Err(FmapError::InvalidFmap(format!("no signature at offset 0x{:x}", offset)))
    }

    if image.len() - offset < FMAP_HEADER_SIZE {
        return Err(FmapError::InvalidFmap(format!("truncated header at offset 0x{:x}", offset)))
    }
    let mut reader = Cursor::new(&image[offset..]);
    let header: FmapHeader = reader.read_le().map_err(|e| FmapError::InvalidFmap(e.to_string()))?;

    let table_size = FMAP_HEADER_SIZE + header.nareas as usize * FMAP_AREA_SIZE;
    if image.len() - offset < table_size {
        return Err(FmapError::InvalidFmap(format!("{} areas do not fit in the image (table needs 0x{:x} bytes at 0x{:x})",
                header.nareas, table_size, offset)))
    }

    debug!("FMAP \"{}\" v{}.{} at 0x{:x}, {} areas", header.name(), header.ver_major, header.ver_minor, offset, header.nareas);

    let mut areas: Vec<FmapArea> = Vec::with_capacity(header.nareas as usize);
    for _i in 0..header.nareas {
        let area: FmapArea = reader.read_le().map_err(|e| FmapError::InvalidFmap(e.to_string()))?;
        areas.push(area);
    }

    Ok(Fmap { header, areas })
}

/// `find` followed by `parse`.
pub fn locate(image: &[u8]) -> Result<(usize, Fmap), FmapError> {
    let offset = find(image).ok_or(FmapError::NoFmapFound)?;
    let fmap = parse(image, offset)?;
    Ok((offset, fmap))
}

impl Fmap {
    /// Signature bytes read as a little-endian integer, for display.
    pub fn signature_value(&self) -> u64 {
        u64::from_le_bytes(self.header.signature)
    }

    pub fn find_area(&self, name: &str) -> Option<&FmapArea> {
        self.areas.iter().find(|area| area.name() == name)
    }

    /// Header and its areas as one contiguous block, as laid out in an image.
    pub fn to_bytes(&self) -> BinResult<Vec<u8>> {
        let mut writer = Cursor::new(Vec::with_capacity(FMAP_HEADER_SIZE + self.areas.len() * FMAP_AREA_SIZE));
        self.write_le(&mut writer)?;
        Ok(writer.into_inner())
    }
}

/// One record for the header followed by one record per area, in storage order.
pub fn describe(fmap: &Fmap) -> Vec<KvRecord> {
    let mut records = Vec::with_capacity(fmap.areas.len() + 1);

    let header = &fmap.header;
    let mut record = KvRecord::new();
    record.push("fmap_signature", format!("0x{:016x}", fmap.signature_value()));
    record.push("fmap_ver_major", header.ver_major.to_string());
    record.push("fmap_ver_minor", header.ver_minor.to_string());
    record.push("fmap_base", format!("0x{:016x}", header.base));
    record.push("fmap_size", format!("0x{:08x}", header.size));
    record.push("fmap_name", header.name());
    record.push("fmap_nareas", header.nareas.to_string());
    records.push(record);

    for area in &fmap.areas {
        let mut record = KvRecord::new();
        record.push("area_offset", format!("0x{:08x}", area.offset));
        record.push("area_size", format!("0x{:08x}", area.size));
        record.push("area_name", area.name());
        record.push("area_flags_raw", format!("0x{:02x}", area.flags));
        record.push("area_flags", flags_to_string(area.flags));
        records.push(record);
    }

    records
}
