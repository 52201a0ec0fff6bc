use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FmapError {
    #[error("no FMAP signature found in image")]
    NoFmapFound,
    #[error("invalid FMAP: {0}")]
    InvalidFmap(String),
    #[error("area \"{name}\" (offset 0x{offset:08x}, size 0x{size:08x}) exceeds image length 0x{image_len:x}")]
    AreaOutOfBounds {
        name: String,
        offset: u32,
        size: u32,
        image_len: usize,
    },
}
