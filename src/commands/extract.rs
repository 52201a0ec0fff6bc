use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use log::debug;

use crate::commands::ProgramContext;
use crate::fmap::{self, flags_to_string, FmapArea, FmapError};
use crate::utils::common;
use crate::utils::kv::{self, KvRecord};

pub struct ExtractOptions<'a> {
    /// Only extract the area with this name.
    pub area: Option<&'a str>,
    /// Also save the FMAP table itself as `_fmap.bin`.
    pub dump_fmap: bool,
}

fn output_name(area: &FmapArea) -> String {
    let name: String = area.name().chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    match name.as_str() {
        "" | "." | ".." => format!("area_{:08x}.bin", area.offset),
        _ => format!("{}.bin", name),
    }
}

pub fn run_extract(ctx: &ProgramContext, out: &mut dyn Write, image_path: &Path, output_folder: &Path, options: &ExtractOptions) -> Result<(), Box<dyn std::error::Error>> {
    let image = common::read_image(image_path)?;
    let (offset, fmap) = fmap::locate(&image)?;
    writeln!(out, "FMAP info:\nName: {}\nVersion: {}.{}\nOffset: 0x{:x}\nArea count: {}",
            fmap.header.name(), fmap.header.ver_major, fmap.header.ver_minor, offset, fmap.header.nareas)?;

    let selected: Vec<&FmapArea> = match options.area {
        Some(name) => vec![fmap.find_area(name).ok_or_else(|| format!("Area {} not found in FMAP", name))?],
        None => fmap.areas.iter().collect(),
    };

    fs::create_dir_all(output_folder)?;

    if options.dump_fmap {
        let output_path = output_folder.join("_fmap.bin");
        let mut out_file = OpenOptions::new().write(true).create(true).truncate(true).open(&output_path)?;
        out_file.write_all(&fmap.to_bytes()?)?;
        writeln!(out, "Saved FMAP table to {}", output_path.display())?;
    }

    let mut saved = 0;
    for (i, area) in selected.iter().enumerate() {
        writeln!(out, "\nArea {}/{} - Name: {}, Offset: 0x{:08x}, Size: 0x{:08x}, Flags: {}",
                i + 1, selected.len(), area.name(), area.offset, area.size, flags_to_string(area.flags))?;

        if area.end() > image.len() as u64 {
            return Err(FmapError::AreaOutOfBounds {
                name: area.name(),
                offset: area.offset,
                size: area.size,
                image_len: image.len(),
            }.into())
        }
        if area.size == 0 {
            writeln!(out, "- Empty area, skipping!")?;
            continue
        }

        let data = &image[area.offset as usize..area.end() as usize];
        let output_path = output_folder.join(output_name(area));
        debug!("Writing {} bytes to {}", data.len(), output_path.display());

        let mut out_file = OpenOptions::new().write(true).create(true).truncate(true).open(output_path)?;
        out_file.write_all(data)?;
        saved += 1;

        writeln!(out, "- Saved file!")?;
    }

    writeln!(out, "\nExtraction finished!")?;

    let mut record = KvRecord::new();
    record.push("extracted", saved.to_string())
          .push("output", output_folder.display().to_string());
    kv::render(out, &ctx.render, &record)?;

    Ok(())
}
