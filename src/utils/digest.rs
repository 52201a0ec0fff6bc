use clap::ValueEnum;
use log::warn;
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::fmap::{csum, FmapError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DigestAlgorithm {
    /// 160-bit SHA-1
    #[default]
    Sha1,
    Sha256,
}
impl DigestAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumScope {
    StaticRegions,
    FullImage,
}
impl ChecksumScope {
    pub fn name(&self) -> &'static str {
        match self {
            ChecksumScope::StaticRegions => "static_regions",
            ChecksumScope::FullImage => "full_image",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageChecksum {
    pub scope: ChecksumScope,
    pub digest: Vec<u8>,
}
impl ImageChecksum {
    pub fn hex(&self) -> String {
        hex::encode(&self.digest)
    }
}

/// Checksum of the static FMAP areas, or of the whole image when there is
/// no usable FMAP. Out of bounds static areas are still an error.
pub fn image_checksum(image: &[u8], algorithm: DigestAlgorithm) -> Result<ImageChecksum, FmapError> {
    match algorithm {
        DigestAlgorithm::Sha1 => checksum_with::<Sha1>(image),
        DigestAlgorithm::Sha256 => checksum_with::<Sha256>(image),
    }
}

fn checksum_with<D: Digest>(image: &[u8]) -> Result<ImageChecksum, FmapError> {
    match csum::compute::<D>(image) {
        Ok(digest) => Ok(ImageChecksum { scope: ChecksumScope::StaticRegions, digest }),
        Err(e @ (FmapError::NoFmapFound | FmapError::InvalidFmap(_))) => {
            warn!("{}, hashing the whole image instead", e);
            Ok(ImageChecksum { scope: ChecksumScope::FullImage, digest: D::digest(image).to_vec() })
        }
        Err(e) => Err(e),
    }
}
