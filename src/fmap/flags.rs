use bitflags::bitflags;

use super::include::FmapArea;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AreaFlags: u16 {
        /// Contents not expected to change at runtime, included in checksums.
        const STATIC = 1 << 0;
        const COMPRESSED = 1 << 1;
    }
}

static FLAG_NAMES: &[(AreaFlags, &str)] = &[
    (AreaFlags::STATIC, "static"),
    (AreaFlags::COMPRESSED, "compressed"),
];

impl FmapArea {
    /// Flag bits as stored, unknown bits included.
    pub fn area_flags(&self) -> AreaFlags {
        AreaFlags::from_bits_retain(self.flags)
    }
    pub fn is_static(&self) -> bool {
        self.area_flags().contains(AreaFlags::STATIC)
    }
}

/// Names every set bit from low to high, comma separated.
/// Bits without a name are rendered as `bit<N>` so decoding never fails.
pub fn flags_to_string(flags: u16) -> String {
    let mut names: Vec<String> = Vec::new();

    for bit in 0..u16::BITS {
        let mask = 1u16 << bit;
        if flags & mask == 0 {
            continue
        }

        match FLAG_NAMES.iter().find(|(flag, _)| flag.bits() == mask) {
            Some((_, name)) => names.push(name.to_string()),
            None => names.push(format!("bit{}", bit)),
        }
    }

    names.join(",")
}
