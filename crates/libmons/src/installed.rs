// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{InstalledMod, Result, archive};

/// scans a mods directory, in file name order.
///
/// zip archives are hashed; unpacked directory mods are listed without a hash
/// and never considered for updates. entries without readable metadata are
/// skipped.
pub fn scan_installed(mods_dir: &Path) -> Result<Vec<InstalledMod>> {
    if !mods_dir.is_dir() {
        log::debug!(target: "scan", "no mods directory at {}", mods_dir.display());
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(mods_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() || is_zip(path))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut mods = Vec::with_capacity(paths.len());

    for path in paths {
        let Some(meta) = archive::read_mod_meta(&path) else {
            log::debug!(target: "scan", "skipping {}: no readable everest.yaml", path.display());
            continue;
        };

        let size_bytes = if path.is_file() {
            fs::metadata(&path)?.len()
        } else {
            0
        };

        mods.push(InstalledMod {
            name: meta.name,
            version: meta.version,
            content_hash: meta.content_hash,
            path,
            size_bytes,
        });
    }

    log::debug!(target: "scan", "found {} installed mod(s)", mods.len());
    Ok(mods)
}

fn is_zip(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Version,
        testing::{everest_yaml, mod_zip},
    };

    #[test]
    fn test_scan_sorted_with_hashes_and_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let zeta = mod_zip("Zeta", "2.0.0", &[("Everest", "1.0.0")]);
        let alpha = mod_zip("Alpha", "1.0.0", &[("Everest", "1.0.0")]);
        fs::write(dir.path().join("zeta.zip"), &zeta).unwrap();
        fs::write(dir.path().join("Alpha.ZIP"), &alpha).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a mod").unwrap();

        let mods = scan_installed(dir.path()).unwrap();

        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].name, "Alpha");
        assert_eq!(mods[0].size_bytes, alpha.len() as u64);
        assert_eq!(mods[1].name, "Zeta");
        assert_eq!(mods[1].version, Version::new(2, 0, 0));
        assert_eq!(mods[1].file_name(), Some("zeta.zip"));
        assert!(mods.iter().all(|m| m.content_hash.is_some()));
    }

    #[test]
    fn test_scan_lists_directory_mods_without_hash() {
        let dir = tempfile::tempdir().unwrap();
        let dev = dir.path().join("WorkInProgress");
        fs::create_dir(&dev).unwrap();
        fs::write(dev.join("everest.yaml"), everest_yaml("Wip", "0.0.1", &[])).unwrap();
        fs::create_dir(dir.path().join("Cache")).unwrap();

        let mods = scan_installed(dir.path()).unwrap();

        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].name, "Wip");
        assert_eq!(mods[0].content_hash, None);
    }

    #[test]
    fn test_scan_skips_broken_archives() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.zip"), b"truncated").unwrap();

        assert!(scan_installed(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_installed(&dir.path().join("Mods")).unwrap().is_empty());
    }
}
