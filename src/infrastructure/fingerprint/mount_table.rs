//! Resolves a device path to its mount point via `/proc/mounts` (§4.1).

use std::path::{Path, PathBuf};

/// Decodes the octal escapes `/proc/mounts` uses for spaces, tabs, newlines,
/// and backslashes in paths (`\040 \011 \012 \134`).
pub fn decode_octal_escapes(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let escape = &raw[i..i + 4];
            let decoded = match escape {
                "\\040" => Some(' '),
                "\\011" => Some('\t'),
                "\\012" => Some('\n'),
                "\\134" => Some('\\'),
                _ => None,
            };
            if let Some(c) = decoded {
                out.push(c);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i] as char);
        i += 1;
    }
    out
}

/// One entry in the process mount table.
#[derive(Debug, Clone)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: PathBuf,
}

/// Parses `/proc/mounts`-formatted text into entries.
pub fn parse_mounts(contents: &str) -> Vec<MountEntry> {
    contents
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            Some(MountEntry {
                device: decode_octal_escapes(device),
                mount_point: PathBuf::from(decode_octal_escapes(mount_point)),
            })
        })
        .collect()
}

/// Resolves a device to its mount point by exact path match, falling back to
/// basename match under `/dev/` (§4.1).
pub fn resolve_mount_point(entries: &[MountEntry], device: &str) -> Option<PathBuf> {
    if let Some(entry) = entries.iter().find(|e| e.device == device) {
        return Some(entry.mount_point.clone());
    }

    let basename = Path::new(device).file_name()?.to_str()?;
    entries
        .iter()
        .find(|e| {
            Path::new(&e.device)
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n == basename)
                .unwrap_or(false)
                && e.device.starts_with("/dev/")
        })
        .map(|e| e.mount_point.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_space_escape() {
        assert_eq!(decode_octal_escapes("/mnt/My\\040Disc"), "/mnt/My Disc");
    }

    #[test]
    fn parses_proc_mounts_format() {
        let contents = "/dev/sr0 /media/disc iso9660 ro 0 0\n/dev/sda1 / ext4 rw 0 0\n";
        let entries = parse_mounts(contents);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].device, "/dev/sr0");
        assert_eq!(entries[0].mount_point, PathBuf::from("/media/disc"));
    }

    #[test]
    fn resolves_by_basename_fallback() {
        let entries = vec![MountEntry {
            device: "/dev/sr0".to_string(),
            mount_point: PathBuf::from("/media/disc"),
        }];
        assert_eq!(
            resolve_mount_point(&entries, "disc:/dev/sr0"),
            None // not a /dev path itself, exact match only
        );
        assert_eq!(
            resolve_mount_point(&entries, "/dev/sr0"),
            Some(PathBuf::from("/media/disc"))
        );
    }
}
