// SPDX-License-Identifier: MIT OR Apache-2.0

/// everest update database, one entry per mod name.
pub const DEFAULT_CATALOG_URL: &str = "https://maddie480.ovh/celeste/everest_update.yaml";
/// gamebanana search proxy returning `[{itemtype, itemid}]`.
pub const DEFAULT_SEARCH_URL: &str = "https://maddie480.ovh/celeste/gamebanana-search";
pub const DEFAULT_FILE_API_URL: &str = "https://gamebanana.com/apiv5";
pub const DEFAULT_BLACKLIST_FILE: &str = "updaterblacklist.txt";
pub const DEFAULT_SEARCH_DISPLAY_LIMIT: usize = 9;

/// configuration for libmons operations.
///
/// this struct contains all configuration options used by the library.
/// consumers can construct this directly without needing config file parsing.
#[derive(Debug, Clone)]
pub struct Config {
    /// url of the everest update database (yaml).
    pub catalog_url: String,

    /// url of the fuzzy search service.
    pub search_url: String,

    /// base url of the gamebanana api used to list an item's files.
    pub file_api_url: String,

    /// file in the mods directory listing archives excluded from updates.
    pub blacklist_file: String,

    /// maximum number of candidates shown for a fuzzy search.
    pub search_display_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            file_api_url: DEFAULT_FILE_API_URL.to_string(),
            blacklist_file: DEFAULT_BLACKLIST_FILE.to_string(),
            search_display_limit: DEFAULT_SEARCH_DISPLAY_LIMIT,
        }
    }
}

impl Config {
    /// creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    pub fn with_file_api_url(mut self, url: impl Into<String>) -> Self {
        self.file_api_url = url.into();
        self
    }

    pub fn with_blacklist_file(mut self, name: impl Into<String>) -> Self {
        self.blacklist_file = name.into();
        self
    }

    /// sets how many fuzzy search candidates are offered. zero is treated as one.
    pub fn with_search_display_limit(mut self, limit: usize) -> Self {
        self.search_display_limit = limit.max(1);
        self
    }
}
