// SPDX-License-Identifier: MIT OR Apache-2.0

//! writes into the mods directory.
//!
//! the game may read the directory at any time, so archives only ever appear
//! at their final path through a rename of a fully written temporary file.

use std::{
    fs::File,
    io,
    path::{Component, Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// true when `name` is a single plain path component.
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// `dir/file_name`, refusing names that would leave `dir`.
pub fn destination(dir: &Path, file_name: &str) -> Result<PathBuf> {
    if !is_plain_file_name(file_name) {
        return Err(Error::UnsafeFileName(file_name.to_string()));
    }
    Ok(dir.join(file_name))
}

/// copies `src` into a new temporary file inside `dir`.
pub fn stage_copy(src: &Path, dir: &Path) -> Result<NamedTempFile> {
    let mut temp = NamedTempFile::new_in(dir)?;
    io::copy(&mut File::open(src)?, &mut temp)?;
    Ok(temp)
}

/// moves a completed temporary file over `dest`.
///
/// the temporary file must live on the same filesystem as `dest`.
pub fn persist(temp: NamedTempFile, dest: &Path) -> Result<()> {
    temp.as_file().sync_all()?;
    temp.persist(dest).map_err(|e| Error::Io(e.error))?;
    log::debug!(target: "store", "saved {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("Foo.zip"));
        assert!(is_plain_file_name("...zip"));

        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../Foo.zip"));
        assert!(!is_plain_file_name("Maps/Foo.zip"));
        assert!(!is_plain_file_name("/tmp/Foo.zip"));
    }

    #[test]
    fn test_destination_stays_inside_dir() {
        let dir = Path::new("/games/Celeste/Mods");

        assert_eq!(
            destination(dir, "Foo.zip").unwrap(),
            dir.join("Foo.zip")
        );
        assert!(matches!(
            destination(dir, "../escaped.zip"),
            Err(Error::UnsafeFileName(name)) if name == "../escaped.zip"
        ));
        assert!(matches!(
            destination(dir, "/etc/escaped.zip"),
            Err(Error::UnsafeFileName(_))
        ));
    }

    #[test]
    fn test_persist_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("download.tmp");
        let dest = dir.path().join("Foo.zip");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        persist(stage_copy(&src, dir.path()).unwrap(), &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert_eq!(entries(dir.path()), vec!["Foo.zip", "download.tmp"]);
    }

    #[test]
    fn test_dropped_stage_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("download.tmp");
        fs::write(&src, b"archive").unwrap();
        let mods_dir = dir.path().join("Mods");
        fs::create_dir(&mods_dir).unwrap();

        drop(stage_copy(&src, &mods_dir).unwrap());

        assert!(entries(&mods_dir).is_empty());
    }

    #[test]
    fn test_stage_copy_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();

        let result = stage_copy(&dir.path().join("missing.zip"), dir.path());

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(entries(dir.path()).is_empty());
    }
}
