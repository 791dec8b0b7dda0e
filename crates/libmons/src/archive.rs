// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
};

use serde::Deserialize;
use xxhash_rust::xxh64::Xxh64;

use crate::{Dependency, Error, ModMeta, Result, Version, store};

const METADATA_FILES: &[&str] = &["everest.yaml", "everest.yml"];
const HASH_BUFFER_SIZE: usize = 8192;

#[derive(Debug, Deserialize)]
struct EverestModule {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Version")]
    version: Version,
    #[serde(rename = "Dependencies", default)]
    dependencies: Vec<Dependency>,
}

/// parses the first module declared in an everest.yaml document.
fn parse_everest_yaml(yaml: &str) -> Result<EverestModule> {
    let yaml = yaml.trim_start_matches('\u{feff}');
    let modules: Vec<EverestModule> =
        serde_yaml_ng::from_str(yaml).map_err(|e| Error::metadata_parse(e.to_string()))?;

    let module = modules
        .into_iter()
        .next()
        .ok_or_else(|| Error::metadata_parse("no module declared"))?;

    if !store::is_plain_file_name(&module.name) {
        return Err(Error::metadata_parse(format!(
            "mod name is not a valid file name: {}",
            module.name
        )));
    }

    Ok(module)
}

fn read_archive_yaml(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut archive = zip::ZipArchive::new(file).ok()?;

    METADATA_FILES.iter().find_map(|name| {
        let mut entry = archive.by_name(name).ok()?;
        let mut yaml = String::new();
        entry.read_to_string(&mut yaml).ok()?;
        Some(yaml)
    })
}

fn read_directory_yaml(path: &Path) -> Option<String> {
    METADATA_FILES
        .iter()
        .find_map(|name| fs::read_to_string(path.join(name)).ok())
}

/// reads the metadata of a mod archive (or unpacked mod directory).
///
/// returns `None` when there is no everest.yaml or it cannot be parsed.
/// archives carry their xxh64 content hash; directories have none.
pub fn read_mod_meta(path: &Path) -> Option<ModMeta> {
    let is_dir = path.is_dir();
    let yaml = if is_dir {
        read_directory_yaml(path)
    } else {
        read_archive_yaml(path)
    }?;

    let module = match parse_everest_yaml(&yaml) {
        Ok(module) => module,
        Err(e) => {
            log::debug!(target: "archive", "{}: {e}", path.display());
            return None;
        }
    };

    let content_hash = if is_dir {
        None
    } else {
        content_hash(path).ok()
    };

    Some(ModMeta {
        name: module.name,
        version: module.version,
        content_hash,
        dependencies: module.dependencies,
        archive_path: path.to_path_buf(),
    })
}

/// xxh64 of the file, formatted like the catalog's `xxHash` values.
pub fn content_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Xxh64::new(0);
    let mut buffer = [0u8; HASH_BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:016x}", hasher.digest()))
}

/// checks a downloaded file against an md5 published by the file listing.
pub fn verify_md5(path: &Path, expected: &str) -> Result<()> {
    let mut file = File::open(path)?;
    let mut hasher = md5::Context::new();
    let mut buffer = [0u8; HASH_BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.consume(&buffer[..bytes_read]);
    }

    let actual = format!("{:x}", hasher.finalize());
    if actual != expected.to_lowercase() {
        return Err(Error::checksum(expected, actual));
    }

    log::debug!(target: "checksum", "verified md5 for {}", path.display());
    Ok(())
}
