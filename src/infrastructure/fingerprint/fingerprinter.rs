//! Deterministic SHA-256 fingerprint over disc structural metadata (§4.1).

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::domain::entities::Title;
use crate::domain::value_objects::{DiscFingerprint, TitleHash};
use crate::infrastructure::fingerprint::mount_table::{parse_mounts, resolve_mount_point};
use crate::interfaces::command_executor::CommandExecutor;
use crate::shared::error::FingerprintError;

const DEFAULT_FALLBACK_PREFIX_BYTES: usize = 64 * 1024;

pub struct Fingerprinter {
    fallback_prefix_bytes: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self {
            fallback_prefix_bytes: DEFAULT_FALLBACK_PREFIX_BYTES,
        }
    }
}

impl Fingerprinter {
    pub fn new(fallback_prefix_bytes: usize) -> Self {
        Self { fallback_prefix_bytes }
    }

    /// Resolves `device` to a mount point (auto-mounting if needed via the
    /// system `mount` command) and computes its fingerprint (§4.1).
    pub async fn compute(
        &self,
        device: &str,
        disc_type_hint: &str,
        executor: &dyn CommandExecutor,
    ) -> Result<DiscFingerprint, FingerprintError> {
        let base = self.resolve_mount(device, executor).await?;
        let result = self.compute_from_base(&base, disc_type_hint);

        if let Err(e) = self.unmount_best_effort(device, executor).await {
            warn!(device, error = %e, "unmount after fingerprinting failed, ignoring");
        }

        result
    }

    async fn resolve_mount(&self, device: &str, executor: &dyn CommandExecutor) -> Result<PathBuf, FingerprintError> {
        let contents = std::fs::read_to_string("/proc/mounts")?;
        let entries = parse_mounts(&contents);
        if let Some(mount_point) = resolve_mount_point(&entries, device) {
            return Ok(mount_point);
        }

        let _ = executor.run("mount", &[device], None).await;

        let contents = std::fs::read_to_string("/proc/mounts")?;
        let entries = parse_mounts(&contents);
        match resolve_mount_point(&entries, device) {
            Some(mount_point) => Ok(mount_point),
            None => {
                let _ = executor.run("umount", &[device], None).await;
                Err(FingerprintError::MountNotFound(device.to_string()))
            }
        }
    }

    async fn unmount_best_effort(&self, device: &str, executor: &dyn CommandExecutor) -> Result<(), FingerprintError> {
        executor
            .run("umount", &[device], None)
            .await
            .map(|_| ())
            .map_err(|e| FingerprintError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
    }

    /// Computes the fingerprint directly from an already-mounted base
    /// directory, without touching the mount table. Used directly by tests
    /// and by [`Self::compute`] after mount resolution.
    pub fn compute_from_base(&self, base: &Path, disc_type_hint: &str) -> Result<DiscFingerprint, FingerprintError> {
        let hint = if disc_type_hint.is_empty() {
            if base.join("BDMV").is_dir() {
                "Blu-ray"
            } else if base.join("VIDEO_TS").is_dir() {
                "DVD"
            } else {
                ""
            }
        } else {
            disc_type_hint
        };

        let files = match hint {
            "Blu-ray" => self.bluray_manifest(base)?,
            "DVD" => self.dvd_manifest(base)?,
            _ => self.fallback_manifest(base)?,
        };

        if files.is_empty() {
            return Err(FingerprintError::NoMetadata);
        }

        Ok(self.hash_manifest(base, &files, hint == ""))
    }

    fn bluray_manifest(&self, base: &Path) -> Result<Vec<PathBuf>, FingerprintError> {
        let bdmv = base.join("BDMV");
        let mut structural = Vec::new();

        for fixed in ["index.bdmv", "MovieObject.bdmv"] {
            let path = bdmv.join(fixed);
            if path.is_file() {
                structural.push(path);
            }
        }
        structural.extend(list_dir_with_ext(&bdmv.join("PLAYLIST"), "mpls"));
        structural.extend(list_dir_with_ext(&bdmv.join("CLIPINF"), "clpi"));

        if !structural.is_empty() {
            structural.sort_by_key(|p| relative_path_key(base, p));
            return Ok(structural);
        }

        let certificate = base.join("CERTIFICATE").join("id.bdmv");
        if certificate.is_file() {
            return Ok(vec![certificate]);
        }

        Ok(Vec::new())
    }

    fn dvd_manifest(&self, base: &Path) -> Result<Vec<PathBuf>, FingerprintError> {
        let mut ifos = list_dir_with_ext(&base.join("VIDEO_TS"), "ifo");
        ifos.sort_by_key(|p| relative_path_key(base, p));
        Ok(ifos)
    }

    fn fallback_manifest(&self, base: &Path) -> Result<Vec<PathBuf>, FingerprintError> {
        let mut files = Vec::new();
        walk_regular_files(base, &mut files);
        files.sort_by_key(|p| relative_path_key(base, p));
        Ok(files)
    }

    /// Canonicalization (§4.1): for each file, append relative path + NUL +
    /// decimal size + NUL + (possibly truncated) bytes + trailing NUL.
    fn hash_manifest(&self, base: &Path, files: &[PathBuf], truncate: bool) -> DiscFingerprint {
        let mut hasher = Sha256::new();

        for file in files {
            let relative = relative_path_key(base, file);
            hasher.update(relative.as_bytes());
            hasher.update([0u8]);

            let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
            hasher.update(size.to_string().as_bytes());
            hasher.update([0u8]);

            if let Ok(bytes) = std::fs::read(file) {
                let slice = if truncate && bytes.len() > self.fallback_prefix_bytes {
                    &bytes[..self.fallback_prefix_bytes]
                } else {
                    &bytes[..]
                };
                hasher.update(slice);
            }
            hasher.update([0u8]);
        }

        DiscFingerprint::from_hex(hex::encode(hasher.finalize()))
    }

    /// Deterministic hash over a Title's stable fields only (§4.1):
    /// disc-specific fields (disc fingerprint, title id) are excluded so the
    /// same episode master hashes identically across discs.
    pub fn title_hash(title: &Title) -> TitleHash {
        let mut hasher = Sha256::new();
        hasher.update(title.duration_seconds.to_string().as_bytes());
        hasher.update([0u8]);

        let mut tracks: Vec<&crate::domain::entities::Track> = title.tracks.iter().collect();
        tracks.sort_by_key(|t| (t.stream_id, t.kind));

        for track in tracks {
            hasher.update([0u8]);
            hasher.update(format!("{:?}", track.kind).as_bytes());
            hasher.update(track.codec_id.as_bytes());
            hasher.update(track.language_code.as_bytes());
            hasher.update(track.channel_count.unwrap_or(0).to_string().as_bytes());
            hasher.update(track.channel_layout.as_bytes());
            hasher.update(track.bit_rate.as_bytes());
            for (id, value) in &track.attributes {
                hasher.update(id.to_string().as_bytes());
                hasher.update(value.as_bytes());
            }
        }

        TitleHash::from_hex(hex::encode(hasher.finalize()))
    }
}

fn list_dir_with_ext(dir: &Path, ext: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case(ext)).unwrap_or(false))
        .collect()
}

fn walk_regular_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk_regular_files(&path, out);
        } else if path.is_file() {
            out.push(path);
        }
    }
}

fn relative_path_key(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn bluray_layout_produces_stable_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let bdmv = dir.path().join("BDMV");
        fs::create_dir_all(bdmv.join("PLAYLIST")).unwrap();
        fs::create_dir_all(bdmv.join("CLIPINF")).unwrap();
        fs::write(bdmv.join("index.bdmv"), b"index").unwrap();
        fs::write(bdmv.join("PLAYLIST").join("00001.mpls"), b"playlist").unwrap();
        fs::write(bdmv.join("CLIPINF").join("00001.clpi"), b"clip").unwrap();

        let fp = Fingerprinter::default();
        let first = fp.compute_from_base(dir.path(), "").unwrap();
        let second = fp.compute_from_base(dir.path(), "").unwrap();
        assert_eq!(first.as_str(), second.as_str());
        assert_eq!(first.as_str().len(), 64);
    }

    #[test]
    fn certificate_alone_used_only_when_no_structural_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("BDMV").join("CERTIFICATE")).unwrap();
        fs::write(dir.path().join("BDMV").join("CERTIFICATE").join("id.bdmv"), b"cert").unwrap();

        let fp = Fingerprinter::default();
        let result = fp.compute_from_base(dir.path(), "Blu-ray");
        assert!(result.is_ok());
    }

    #[test]
    fn different_bdmv_sets_produce_different_fingerprints_even_with_shared_certificate() {
        let fp = Fingerprinter::default();

        let dir_a = tempfile::tempdir().unwrap();
        let bdmv_a = dir_a.path().join("BDMV");
        fs::create_dir_all(bdmv_a.join("PLAYLIST")).unwrap();
        fs::write(bdmv_a.join("PLAYLIST").join("a.mpls"), b"disc-one").unwrap();
        fs::create_dir_all(dir_a.path().join("CERTIFICATE")).unwrap();
        fs::write(dir_a.path().join("CERTIFICATE").join("id.bdmv"), b"shared-cert").unwrap();

        let dir_b = tempfile::tempdir().unwrap();
        let bdmv_b = dir_b.path().join("BDMV");
        fs::create_dir_all(bdmv_b.join("PLAYLIST")).unwrap();
        fs::write(bdmv_b.join("PLAYLIST").join("a.mpls"), b"disc-two").unwrap();
        fs::create_dir_all(dir_b.path().join("CERTIFICATE")).unwrap();
        fs::write(dir_b.path().join("CERTIFICATE").join("id.bdmv"), b"shared-cert").unwrap();

        let fp_a = fp.compute_from_base(dir_a.path(), "").unwrap();
        let fp_b = fp.compute_from_base(dir_b.path(), "").unwrap();
        assert_ne!(fp_a.as_str(), fp_b.as_str());
    }

    #[test]
    fn dvd_layout_hashes_ifo_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let video_ts = dir.path().join("VIDEO_TS");
        fs::create_dir_all(&video_ts).unwrap();
        fs::write(video_ts.join("VTS_01_0.IFO"), b"ifo").unwrap();
        fs::write(video_ts.join("VTS_01_0.BUP"), b"bup").unwrap();

        let fp = Fingerprinter::default();
        let with_bup = fp.compute_from_base(dir.path(), "DVD").unwrap();

        fs::remove_file(video_ts.join("VTS_01_0.BUP")).unwrap();
        let without_bup = fp.compute_from_base(dir.path(), "DVD").unwrap();

        assert_eq!(with_bup.as_str(), without_bup.as_str());
    }

    #[test]
    fn empty_unrecognized_layout_fails_with_no_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let fp = Fingerprinter::default();
        let err = fp.compute_from_base(dir.path(), "DVD").unwrap_err();
        assert!(matches!(err, FingerprintError::NoMetadata));
    }

    #[test]
    fn title_hash_ignores_disc_specific_fields_and_track_order() {
        use crate::domain::entities::{Track, TrackKind};

        let mut title_a = Title::new(0);
        title_a.duration_seconds = 1320;
        let mut t1 = Track::new(1, 0);
        t1.kind = TrackKind::Video;
        t1.codec_id = "V_MPEG4".to_string();
        let mut t2 = Track::new(2, 1);
        t2.kind = TrackKind::Audio;
        t2.codec_id = "A_AC3".to_string();
        title_a.tracks = vec![t1.clone(), t2.clone()];

        let mut title_b = Title::new(99); // different id, same content
        title_b.duration_seconds = 1320;
        title_b.tracks = vec![t2, t1]; // reversed order

        assert_eq!(
            Fingerprinter::title_hash(&title_a).as_str(),
            Fingerprinter::title_hash(&title_b).as_str()
        );
    }
}
