use std::fs;
use std::path::Path;
use log::debug;

pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let image = fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    debug!("Read {} bytes from {}", image.len(), path.display());
    Ok(image)
}

pub fn string_from_bytes(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).to_string()
}
