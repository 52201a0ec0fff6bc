use std::io::Write;
use std::path::PathBuf;
use log::{info, warn};

use crate::commands::ProgramContext;
use crate::fmap::{self, FmapError};
use crate::utils::common;
use crate::utils::digest::{image_checksum, DigestAlgorithm};
use crate::utils::kv::{self, KvRecord};

/// Prints the FMAP of every image. Images whose checksum matches an earlier
/// one are only reported as duplicates.
pub fn run_map(ctx: &ProgramContext, out: &mut dyn Write, images: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut seen: Vec<(String, String)> = Vec::new();
    let mut found = 0;

    for path in images {
        let image = common::read_image(path)?;
        let name = path.display().to_string();

        let (offset, fmap) = match fmap::locate(&image) {
            Ok(located) => located,
            Err(e @ (FmapError::NoFmapFound | FmapError::InvalidFmap(_))) => {
                warn!("{}: {}, skipping", name, e);
                continue
            }
            Err(e) => return Err(e.into()),
        };
        found += 1;

        let checksum = match image_checksum(&image, DigestAlgorithm::Sha1) {
            Ok(checksum) => Some(checksum.hex()),
            Err(e) => {
                warn!("{}: {}, not checking for duplicates", name, e);
                None
            }
        };

        if let Some(sum) = checksum {
            if let Some((_, first)) = seen.iter().find(|(s, _)| *s == sum) {
                info!("{} has the same checksum as {}", name, first);
                let mut record = KvRecord::new();
                record.push("image", name.as_str()).push("duplicate_of", first.as_str());
                kv::render(out, &ctx.render, &record)?;
                continue
            }
            seen.push((sum, name.clone()));
        }

        let mut record = KvRecord::new();
        record.push("image", name.as_str()).push("fmap_offset", format!("0x{:08x}", offset));
        kv::render(out, &ctx.render, &record)?;
        kv::render_all(out, &ctx.render, &fmap::describe(&fmap))?;
    }

    if found == 0 {
        return Err("No FMAP found in any input".into())
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::fmap::test_support::*;
    use crate::utils::kv::{KvStyle, RenderConfig};

    fn write_image(dir: &tempfile::TempDir, file: &str, image: &[u8]) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, image).unwrap();
        path
    }

    #[test]
    fn prints_header_and_areas() {
        let dir = tempfile::tempdir().unwrap();
        let fmap = table("FMAP", 2048, vec![area(0, 0x400, "RO_SECTION", 1), area(0x400, 0x100, "RW_NVRAM", 0)]);
        let path = write_image(&dir, "a.bin", &image_with(2048, 0xff, 0x600, &fmap));

        let mut out = Vec::new();
        run_map(&ProgramContext::default(), &mut out, &[path.clone()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], format!("image=\"{}\" fmap_offset=\"0x00000600\"", path.display()));
        assert!(lines[1].starts_with("fmap_signature=\"0x5f5f50414d465f5f\""));
        assert!(lines[1].ends_with("fmap_name=\"FMAP\" fmap_nareas=\"2\""));
        assert_eq!(lines[2], "area_offset=\"0x00000000\" area_size=\"0x00000400\" area_name=\"RO_SECTION\" area_flags_raw=\"0x01\" area_flags=\"static\"");
        assert_eq!(lines[3], "area_offset=\"0x00000400\" area_size=\"0x00000100\" area_name=\"RW_NVRAM\" area_flags_raw=\"0x00\" area_flags=\"\"");
    }

    #[test]
    fn duplicate_images_are_printed_once() {
        let dir = tempfile::tempdir().unwrap();
        let fmap = table("FMAP", 1024, vec![area(0, 0x100, "RO", 1)]);
        let image = image_with(1024, 0, 0x200, &fmap);
        let first = write_image(&dir, "first.bin", &image);
        let second = write_image(&dir, "second.bin", &image);

        let ctx = ProgramContext { render: RenderConfig { style: KvStyle::Pair, single_key: Some("duplicate_of".into()) } };
        let mut out = Vec::new();
        run_map(&ctx, &mut out, &[first.clone(), second]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", first.display()));

        let mut out = Vec::new();
        run_map(&ProgramContext::default(), &mut out, &[first.clone(), first.clone()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().filter(|l| l.starts_with("fmap_signature")).count(), 1);
    }

    #[test]
    fn skips_images_without_fmap() {
        let dir = tempfile::tempdir().unwrap();
        let blank = write_image(&dir, "blank.bin", &[0u8; 256]);
        let fmap = table("FMAP", 1024, vec![area(0, 0x10, "RO", 1)]);
        let good = write_image(&dir, "good.bin", &image_with(1024, 0, 0x100, &fmap));

        let ctx = ProgramContext { render: RenderConfig { style: KvStyle::Value, single_key: Some("image".into()) } };
        let mut out = Vec::new();
        run_map(&ctx, &mut out, &[blank.clone(), good.clone()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", good.display()));

        let mut out = Vec::new();
        assert!(run_map(&ctx, &mut out, &[blank]).is_err());
    }

    #[test]
    fn corrupt_static_area_is_still_printed() {
        let dir = tempfile::tempdir().unwrap();
        let fmap = table("FMAP", 1024, vec![area(0x300, 0x200, "RO", 1)]);
        let path = write_image(&dir, "short.bin", &image_with(1024, 0, 0x100, &fmap));

        let ctx = ProgramContext { render: RenderConfig { style: KvStyle::Pair, single_key: Some("area_name".into()) } };
        let mut out = Vec::new();
        run_map(&ctx, &mut out, &[path]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "RO\n");
    }
}
