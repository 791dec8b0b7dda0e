// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Version;

/// name under which mods declare their minimum everest version.
pub const RUNTIME_NAME: &str = "Everest";

/// the latest known release of a mod in the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub version: Version,
    pub url: String,
    pub content_hash: String,
    pub catalog_id: u64,
    /// unix timestamp of the last upload.
    pub last_update: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version", default)]
    pub version: Version,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn is_runtime(&self) -> bool {
        self.name == RUNTIME_NAME
    }
}

/// metadata declared by a mod archive's everest.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModMeta {
    pub name: String,
    pub version: Version,
    pub content_hash: Option<String>,
    pub dependencies: Vec<Dependency>,
    #[serde(with = "pathbuf_serde")]
    pub archive_path: PathBuf,
}

impl ModMeta {
    /// the everest floor declared by this mod, if any.
    pub fn runtime_dependency(&self) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.is_runtime())
    }

    /// file name the archive is saved under in the mods directory.
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledMod {
    pub name: String,
    pub version: Version,
    pub content_hash: Option<String>,
    #[serde(with = "pathbuf_serde")]
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl InstalledMod {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateCandidate {
    pub old: InstalledMod,
    pub new_version: Version,
    pub url: String,
}

/// an update candidate with its measured download size.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedUpdate {
    pub candidate: UpdateCandidate,
    pub remote_size: Option<u64>,
    /// remote size minus the installed file size; zero when the remote size is unknown.
    pub delta: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePlan {
    pub updates: Vec<PlannedUpdate>,
    pub total_delta: i64,
}

impl UpdatePlan {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn disk_usage(&self) -> DiskUsage {
        DiskUsage::from_delta(self.total_delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskUsage {
    Additional(u64),
    Freed(u64),
}

impl DiskUsage {
    pub fn from_delta(delta: i64) -> Self {
        if delta >= 0 {
            Self::Additional(delta.unsigned_abs())
        } else {
            Self::Freed(delta.unsigned_abs())
        }
    }
}

/// one downloadable file listed for a catalog-site item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFile {
    pub file_name: String,
    pub description: String,
    pub download_url: String,
    pub size: Option<u64>,
    pub md5: Option<String>,
}

/// where the archive for a requested mod comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModSource {
    LocalFile(PathBuf),
    DirectUrl(String),
    Catalog(CatalogEntry),
    RemoteFile(RemoteFile),
}

/// result of turning a user identifier into a mod source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ModSource),
    NotFound,
    Aborted,
}

/// result of an operation the user may decline part-way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Completed(T),
    Aborted,
}

impl<T> Outcome<T> {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Aborted => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RuntimeStatus {
    Satisfied {
        installed: Version,
        required: Version,
    },
    Outdated {
        installed: Version,
        required: Version,
        upgrade_requested: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub installed: Vec<ModMeta>,
    pub unresolved: Vec<Dependency>,
    /// dependencies whose archive had no readable everest.yaml.
    pub skipped: Vec<String>,
    pub runtime: RuntimeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddReport {
    #[serde(with = "pathbuf_serde")]
    pub saved_as: PathBuf,
    pub meta: Option<ModMeta>,
    /// absent when the archive had no readable metadata.
    pub dependencies: Option<Outcome<DependencyReport>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(AddReport),
    NotFound,
    Aborted,
}

/// result of matching one search hit against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub catalog_id: u64,
    pub names: Vec<String>,
}

/// mods replaced by an update run, in the order they were replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub updated: Vec<String>,
}

impl UpdateSummary {
    pub fn len(&self) -> usize {
        self.updated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updated.is_empty()
    }
}

/// envelope for `--json` output.
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

mod pathbuf_serde {
    use std::path::Path;

    use serde::Serializer;

    pub fn serialize<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&path.to_string_lossy())
    }
}
