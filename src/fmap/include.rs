use binrw::binrw;

use crate::utils::common;

pub static FMAP_SIGNATURE: &[u8; 8] = b"__FMAP__";

pub const FMAP_NAME_LEN: usize = 32;
/// signature + ver_major + ver_minor + base + size + name + nareas
pub const FMAP_HEADER_SIZE: usize = 8 + 1 + 1 + 8 + 4 + FMAP_NAME_LEN + 2;
/// offset + size + name + flags
pub const FMAP_AREA_SIZE: usize = 4 + 4 + FMAP_NAME_LEN + 2;

#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmapHeader {
    pub signature: [u8; 8], //__FMAP__
    pub ver_major: u8,
    pub ver_minor: u8,
    pub base: u64,          // address of the firmware binary
    pub size: u32,          // bytes
    pub name_bytes: [u8; FMAP_NAME_LEN],
    pub nareas: u16,
}
impl FmapHeader {
    pub fn name(&self) -> String {
        common::string_from_bytes(&self.name_bytes)
    }
}

#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmapArea {
    pub offset: u32,        // relative to base
    pub size: u32,
    pub name_bytes: [u8; FMAP_NAME_LEN],
    pub flags: u16,
}
impl FmapArea {
    pub fn name(&self) -> String {
        common::string_from_bytes(&self.name_bytes)
    }
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

/// Header plus exactly `nareas` trailing area records, in storage order.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fmap {
    pub header: FmapHeader,
    #[br(count = header.nareas as usize)]
    pub areas: Vec<FmapArea>,
}
