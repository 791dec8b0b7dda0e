// SPDX-License-Identifier: MIT OR Apache-2.0

//! capabilities the core needs from the outside world.
//!
//! [`crate::ApiClient`] implements all of them over http; tests substitute
//! in-memory fakes.

use std::path::Path;

use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::{RemoteFile, Result};

/// blocking download of arbitrary URLs.
pub trait Fetch: Send + Sync {
    /// downloads `url` into a temporary file created inside `dir`.
    ///
    /// keeping the temporary file on the destination's filesystem lets callers
    /// move it into place with a rename.
    fn download(&self, url: &str, dir: &Path) -> Result<NamedTempFile>;

    /// size of the resource as reported by the server, without downloading it.
    fn content_length(&self, url: &str) -> Result<Option<u64>>;
}

/// receives byte counts while a transfer runs.
///
/// `start` and `finish` bracket every transfer, including failed ones.
pub trait Progress: Send + Sync {
    fn start(&self, label: &str, total: Option<u64>);

    fn advance(&self, bytes: u64);

    fn finish(&self);
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "itemtype", default)]
    pub item_type: String,
    #[serde(rename = "itemid")]
    pub item_id: u64,
}

/// fuzzy search over the catalog site.
pub trait ModSearch {
    fn search(&self, term: &str) -> Result<Vec<SearchHit>>;
}

/// per-file download listing of a catalog-site item.
pub trait FileListing {
    fn list_files(&self, catalog_id: u64) -> Result<Vec<RemoteFile>>;
}
