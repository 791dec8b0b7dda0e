// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use libmons::{Config, Error, Install, Result, Version};
use serde::Deserialize;

use crate::output::Verbosity;

const APP_DIR_NAME: &str = "mons";
const CONFIG_FILE_NAME: &str = "mons.toml";
const CACHE_FILE_NAME: &str = "cache.toml";

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join(APP_DIR_NAME).join(CACHE_FILE_NAME))
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    installs: BTreeMap<String, PathBuf>,
    default_install: Option<String>,
    verbosity: Option<String>,
    assume_yes: bool,
    runtime_install_command: Vec<String>,
    catalog_url: Option<String>,
    search_url: Option<String>,
    file_api_url: Option<String>,
    search_display_limit: Option<usize>,
}

/// per-install state recorded by the everest installer.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
struct InstallCache {
    #[serde(rename = "EverestBuild")]
    everest_build: Option<u32>,
}

/// cli configuration wrapper that combines toml file parsing with the library's config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub inner: Config,
    pub installs: BTreeMap<String, PathBuf>,
    pub default_install: Option<String>,
    pub verbosity: Verbosity,
    pub assume_yes: bool,
    /// program and arguments run to upgrade everest; supports `{install}`,
    /// `{path}` and `{version}` placeholders.
    pub runtime_install_command: Vec<String>,
    cache: BTreeMap<String, InstallCache>,
}

impl std::ops::Deref for CliConfig {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl CliConfig {
    pub fn load() -> Result<Self> {
        let config = match config_path() {
            Some(path) if path.exists() => read_file(&path)?,
            _ => String::new(),
        };
        let cache = match cache_path() {
            Some(path) if path.exists() => read_file(&path)?,
            _ => String::new(),
        };

        Self::parse(&config, &cache)
    }

    pub(crate) fn parse(config: &str, cache: &str) -> Result<Self> {
        let toml_config: TomlConfig = toml::from_str(config)
            .map_err(|e| Error::config(format!("failed to parse {CONFIG_FILE_NAME}: {e}")))?;
        let cache: BTreeMap<String, InstallCache> = toml::from_str(cache)
            .map_err(|e| Error::config(format!("failed to parse {CACHE_FILE_NAME}: {e}")))?;

        let mut inner = Config::new();
        if let Some(url) = toml_config.catalog_url {
            inner = inner.with_catalog_url(url);
        }
        if let Some(url) = toml_config.search_url {
            inner = inner.with_search_url(url);
        }
        if let Some(url) = toml_config.file_api_url {
            inner = inner.with_file_api_url(url);
        }
        if let Some(limit) = toml_config.search_display_limit {
            inner = inner.with_search_display_limit(limit);
        }

        Ok(Self {
            inner,
            installs: toml_config.installs,
            default_install: toml_config.default_install,
            verbosity: Verbosity::parse(toml_config.verbosity.as_deref()),
            assume_yes: toml_config.assume_yes,
            runtime_install_command: toml_config.runtime_install_command,
            cache,
        })
    }

    /// picks the named install, the configured default, or the only one configured.
    pub fn install(&self, name: Option<&str>) -> Result<Install> {
        let name = match name.or(self.default_install.as_deref()) {
            Some(name) => name.to_string(),
            None if self.installs.len() == 1 => self.installs.keys().next().cloned().unwrap_or_default(),
            None if self.installs.is_empty() => {
                return Err(Error::config(format!(
                    "no installs configured, add one under [installs] in {CONFIG_FILE_NAME}"
                )));
            }
            None => {
                return Err(Error::config(
                    "several installs configured, pick one with --install or set default_install",
                ));
            }
        };

        let path = self
            .installs
            .get(&name)
            .ok_or_else(|| Error::config(format!("unknown install: {name}")))?;

        // installs may point at the game executable
        let root = if path.is_file() {
            path.parent().map(Path::to_path_buf).unwrap_or_else(|| path.clone())
        } else {
            path.clone()
        };

        let mut install = Install::new(name.clone(), root);
        if let Some(build) = self.cache.get(&name).and_then(|c| c.everest_build) {
            install = install.with_everest_build(build);
        }

        Ok(install)
    }

    /// the configured everest upgrade command with placeholders filled in.
    pub fn runtime_install_command(&self, install: &Install, version: &Version) -> Option<Vec<String>> {
        if self.runtime_install_command.is_empty() {
            return None;
        }

        let path = install.root.to_string_lossy();
        let build = version.minor.to_string();

        Some(
            self.runtime_install_command
                .iter()
                .map(|arg| {
                    arg.replace("{install}", &install.name)
                        .replace("{path}", &path)
                        .replace("{version}", &build)
                })
                .collect(),
        )
    }

    pub fn edit_config() -> Result<()> {
        let Some(path) = config_path() else {
            return Err(Error::config("could not determine config directory"));
        };

        if !path.exists() {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(|e| {
                    Error::config(format!(
                        "failed to create config directory {}: {e}",
                        dir.display()
                    ))
                })?;
            }

            let default_content = r#"# mons configuration
# default_install = "main"
# verbosity = "normal"  # quiet, normal, verbose
# assume_yes = false
# runtime_install_command = ["everest-installer", "--install", "{path}", "--build", "{version}"]
# search_display_limit = 9

[installs]
# main = "/path/to/Celeste"
"#;
            fs::write(&path, default_content).map_err(|e| {
                Error::config(format!(
                    "failed to create config file {}: {e}",
                    path.display()
                ))
            })?;
        }

        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());
        std::process::Command::new(&editor)
            .arg(&path)
            .status()
            .map_err(|e| Error::other(format!("failed to open editor {editor}: {e}")))?;

        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))
}
