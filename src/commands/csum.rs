use std::io::Write;
use std::path::Path;
use log::info;

use crate::commands::ProgramContext;
use crate::utils::common;
use crate::utils::digest::{image_checksum, DigestAlgorithm};
use crate::utils::kv::{self, KvRecord};

pub fn run_csum(ctx: &ProgramContext, out: &mut dyn Write, image_path: &Path, algorithm: DigestAlgorithm) -> Result<(), Box<dyn std::error::Error>> {
    let image = common::read_image(image_path)?;
    let checksum = image_checksum(&image, algorithm)?;
    info!("{}: {} checksum over {}", image_path.display(), algorithm.name(), checksum.scope.name());

    let mut record = KvRecord::new();
    record.push("algorithm", algorithm.name())
          .push("scope", checksum.scope.name())
          .push("checksum", checksum.hex());
    kv::render(out, &ctx.render, &record)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use sha1::{Digest, Sha1};
    use crate::fmap::test_support::*;
    use crate::utils::kv::{KvStyle, RenderConfig};

    #[test]
    fn prints_static_region_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bios.bin");
        let fmap = table("FMAP", 4096, vec![area(0, 100, "RO", 1)]);
        fs::write(&path, image_with(4096, 0, 512, &fmap)).unwrap();

        let mut out = Vec::new();
        run_csum(&ProgramContext::default(), &mut out, &path, DigestAlgorithm::Sha1).unwrap();
        let expected = format!("algorithm=\"sha1\" scope=\"static_regions\" checksum=\"{}\"\n",
                hex::encode(Sha1::digest([0u8; 100])));
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn single_key_prints_bare_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, b"no flash map in here").unwrap();

        let ctx = ProgramContext { render: RenderConfig { style: KvStyle::Pair, single_key: Some("checksum".into()) } };
        let mut out = Vec::new();
        run_csum(&ctx, &mut out, &path, DigestAlgorithm::Sha1).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", hex::encode(Sha1::digest(b"no flash map in here"))));
    }
}
