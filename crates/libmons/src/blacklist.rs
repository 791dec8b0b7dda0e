// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{collections::HashSet, fs, io, path::Path};

use crate::{InstalledMod, Result};

/// installed archive file names excluded from updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    file_names: HashSet<String>,
}

impl Blacklist {
    /// reads one file name per line; blank lines and `#` comments are ignored.
    /// a missing file is an empty blacklist.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(content: &str) -> Self {
        let file_names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        Self { file_names }
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.file_names.contains(file_name)
    }

    pub fn is_blacklisted(&self, installed: &InstalledMod) -> bool {
        installed.file_name().is_some_and(|name| self.contains(name))
    }

    pub fn len(&self) -> usize {
        self.file_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_names.is_empty()
    }
}
