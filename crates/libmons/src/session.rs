// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

use crate::{ApiClient, Blacklist, CatalogIndex, Config, Result, Version};

/// one celeste install managed by mons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Install {
    pub name: String,
    pub root: PathBuf,
    /// installed everest build, when known.
    pub everest_build: Option<u32>,
}

impl Install {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            everest_build: None,
        }
    }

    pub fn with_everest_build(mut self, build: u32) -> Self {
        self.everest_build = Some(build);
        self
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.root.join("Mods")
    }

    /// installed everest as `1.<build>.0`; an unknown build counts as 0.
    pub fn runtime_version(&self) -> Version {
        Version::runtime(u64::from(self.everest_build.unwrap_or(0)))
    }
}

/// state shared by every operation of one invocation.
///
/// the catalog is fetched once and only read afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub install: Install,
    pub catalog: CatalogIndex,
}

impl Session {
    /// downloads the catalog and binds it to `install`.
    pub fn open(config: Config, install: Install, client: &ApiClient) -> Result<Self> {
        let catalog = client.fetch_catalog()?;
        Ok(Self::with_catalog(config, install, catalog))
    }

    pub fn with_catalog(config: Config, install: Install, catalog: CatalogIndex) -> Self {
        Self {
            config,
            install,
            catalog,
        }
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.install.mods_dir()
    }

    pub fn blacklist_path(&self) -> PathBuf {
        self.mods_dir().join(&self.config.blacklist_file)
    }

    pub fn load_blacklist(&self) -> Result<Blacklist> {
        Blacklist::load(&self.blacklist_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_paths_and_runtime() {
        let install = Install::new("main", "/games/Celeste");
        assert_eq!(install.mods_dir(), PathBuf::from("/games/Celeste/Mods"));
        assert_eq!(install.runtime_version(), Version::new(1, 0, 0));

        let install = install.with_everest_build(4465);
        assert_eq!(install.runtime_version(), Version::new(1, 4465, 0));
    }

    #[test]
    fn test_session_blacklist_path_follows_config() {
        let session = Session::with_catalog(
            Config::new().with_blacklist_file("skip.txt"),
            Install::new("main", "/games/Celeste"),
            CatalogIndex::default(),
        );

        assert_eq!(
            session.blacklist_path(),
            PathBuf::from("/games/Celeste/Mods/skip.txt")
        );
    }
}
