// SPDX-License-Identifier: MIT OR Apache-2.0

//! in-memory stand-ins for the network and the terminal.

use std::{
    collections::{HashMap, VecDeque},
    io::{Cursor, Write},
    path::Path,
};

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::{
    CatalogEntry, Error, RemoteFile, Result, Version,
    prompt::Prompter,
    remote::{Fetch, FileListing, ModSearch, SearchHit},
};

pub(crate) fn entry(name: &str, catalog_id: u64, last_update: i64) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        version: Version::new(1, 0, 0),
        url: format!("https://mods.test/{name}.zip"),
        content_hash: format!("hash-{}", name.to_lowercase()),
        catalog_id,
        last_update,
    }
}

pub(crate) fn zip_with(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, data) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

pub(crate) fn everest_yaml(name: &str, version: &str, deps: &[(&str, &str)]) -> String {
    let mut yaml = format!("- Name: {name}\n  Version: {version}\n");
    if !deps.is_empty() {
        yaml.push_str("  Dependencies:\n");
        for (dep, dep_version) in deps {
            yaml.push_str(&format!("    - Name: {dep}\n      Version: {dep_version}\n"));
        }
    }
    yaml
}

pub(crate) fn mod_zip(name: &str, version: &str, deps: &[(&str, &str)]) -> Vec<u8> {
    let yaml = everest_yaml(name, version, deps);
    zip_with(&[
        ("everest.yaml", yaml.as_bytes()),
        ("Dialog/English.txt", b"placeholder"),
    ])
}

#[derive(Default)]
pub(crate) struct FakeRemote {
    files: HashMap<String, Vec<u8>>,
    sizes: HashMap<String, u64>,
    searches: HashMap<String, Vec<u64>>,
    listings: HashMap<u64, Vec<RemoteFile>>,
    downloads: Mutex<Vec<String>>,
    size_queries: Mutex<Vec<String>>,
}

impl FakeRemote {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(mut self, url: &str, data: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), data);
        self
    }

    pub(crate) fn with_size(mut self, url: &str, size: u64) -> Self {
        self.sizes.insert(url.to_string(), size);
        self
    }

    pub(crate) fn with_search(mut self, term: &str, ids: &[u64]) -> Self {
        self.searches.insert(term.to_string(), ids.to_vec());
        self
    }

    pub(crate) fn with_listing(mut self, catalog_id: u64, files: Vec<RemoteFile>) -> Self {
        self.listings.insert(catalog_id, files);
        self
    }

    pub(crate) fn downloads(&self) -> Vec<String> {
        self.downloads.lock().clone()
    }

    pub(crate) fn size_queries(&self) -> Vec<String> {
        self.size_queries.lock().clone()
    }
}

impl Fetch for FakeRemote {
    fn download(&self, url: &str, dir: &Path) -> Result<NamedTempFile> {
        self.downloads.lock().push(url.to_string());

        let data = self
            .files
            .get(url)
            .ok_or_else(|| Error::download(format!("connection refused: {url}")))?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(data)?;
        Ok(file)
    }

    fn content_length(&self, url: &str) -> Result<Option<u64>> {
        self.size_queries.lock().push(url.to_string());

        if let Some(size) = self.sizes.get(url) {
            return Ok(Some(*size));
        }
        Ok(self.files.get(url).map(|data| data.len() as u64))
    }
}

impl ModSearch for FakeRemote {
    fn search(&self, term: &str) -> Result<Vec<SearchHit>> {
        Ok(self
            .searches
            .get(term)
            .into_iter()
            .flatten()
            .map(|&item_id| SearchHit {
                item_type: "Mod".to_string(),
                item_id,
            })
            .collect())
    }
}

impl FileListing for FakeRemote {
    fn list_files(&self, catalog_id: u64) -> Result<Vec<RemoteFile>> {
        Ok(self.listings.get(&catalog_id).cloned().unwrap_or_default())
    }
}

/// replays queued answers and records every question asked.
#[derive(Default)]
pub(crate) struct ScriptedPrompter {
    selections: Mutex<VecDeque<usize>>,
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedPrompter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn selecting(self, choice: usize) -> Self {
        self.selections.lock().push_back(choice);
        self
    }

    pub(crate) fn confirming(self, answer: bool) -> Self {
        self.confirms.lock().push_back(answer);
        self
    }

    pub(crate) fn answering(self, answer: &str) -> Self {
        self.inputs.lock().push_back(answer.to_string());
        self
    }

    pub(crate) fn asked(&self) -> Vec<(String, Vec<String>)> {
        self.asked.lock().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, title: &str, options: &[String]) -> usize {
        self.asked
            .lock()
            .push((title.to_string(), options.to_vec()));
        self.selections
            .lock()
            .pop_front()
            .expect("unexpected selection prompt")
    }

    fn confirm(&self, question: &str, _default: bool) -> bool {
        self.asked.lock().push((question.to_string(), Vec::new()));
        self.confirms
            .lock()
            .pop_front()
            .expect("unexpected confirmation prompt")
    }

    fn input(&self, question: &str) -> Option<String> {
        self.asked.lock().push((question.to_string(), Vec::new()));
        self.inputs.lock().pop_front()
    }
}
