use std::ops::Range;
use log::debug;
use sha1::Digest;

use super::{Fmap, FmapError};

/// Byte ranges of every static area, in storage order. Fails on the first
/// static area that does not fit in `image_len`.
pub fn static_ranges(fmap: &Fmap, image_len: usize) -> Result<Vec<Range<usize>>, FmapError> {
    let mut ranges = Vec::new();

    for area in &fmap.areas {
        if !area.is_static() {
            debug!("Skipping non-static area {}", area.name());
            continue
        }

        if area.end() > image_len as u64 {
            return Err(FmapError::AreaOutOfBounds {
                name: area.name(),
                offset: area.offset,
                size: area.size,
                image_len,
            })
        }

        ranges.push(area.offset as usize..area.end() as usize);
    }

    Ok(ranges)
}

/// Digest over the static areas of an already parsed `fmap`.
/// All ranges are validated before the hasher sees any byte.
pub fn digest_static_regions<D: Digest>(image: &[u8], fmap: &Fmap) -> Result<Vec<u8>, FmapError> {
    let ranges = static_ranges(fmap, image.len())?;

    let mut hasher = D::new();
    for range in ranges {
        debug!("Hashing 0x{:x}..0x{:x}", range.start, range.end);
        hasher.update(&image[range]);
    }

    Ok(hasher.finalize().to_vec())
}

/// Locates the FMAP in `image` and hashes its static areas with `D`.
pub fn compute<D: Digest>(image: &[u8]) -> Result<Vec<u8>, FmapError> {
    let (_offset, fmap) = super::locate(image)?;
    digest_static_regions::<D>(image, &fmap)
}
