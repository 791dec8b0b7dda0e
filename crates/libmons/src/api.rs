// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::Path,
    sync::Arc,
    time::Duration,
};

use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::{
    CatalogIndex, Config, Error, RemoteFile, Result,
    remote::{Fetch, FileListing, ModSearch, Progress, SearchHit},
};

const USER_AGENT: &str = concat!("mons/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 10;
const BUFFER_SIZE: usize = 8192;

/// http client for the catalog, the search service and downloads.
///
/// requests are not retried; a failure is returned to the caller.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::blocking::Client,
    catalog_url: String,
    search_url: String,
    file_api_url: String,
    progress: Option<Arc<dyn Progress>>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            catalog_url: config.catalog_url.clone(),
            search_url: config.search_url.clone(),
            file_api_url: config.file_api_url.trim_end_matches('/').to_string(),
            progress: None,
        })
    }

    /// reports every catalog and archive transfer to `progress`.
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// downloads and parses the whole mod catalog.
    pub fn fetch_catalog(&self) -> Result<CatalogIndex> {
        log::debug!(target: "catalog", "fetching {}", self.catalog_url);
        let mut response = self.get(&self.catalog_url)?;
        let total = response.content_length();

        let mut body = Vec::new();
        self.stream_into("mod catalog", total, &mut response, &mut body)?;

        let yaml = String::from_utf8(body).map_err(|e| Error::catalog_parse(e.to_string()))?;
        CatalogIndex::parse(&yaml)
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::download(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::download(format!(
                "http status {} for {url}",
                response.status()
            )));
        }

        Ok(response)
    }
}

fn local_path(url: &str) -> Option<&Path> {
    url.strip_prefix("file://").map(Path::new)
}

fn copy_chunks(
    reader: &mut dyn Read,
    out: &mut dyn Write,
    progress: Option<&dyn Progress>,
) -> Result<u64> {
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| Error::download(format!("read error: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        out.write_all(&buffer[..bytes_read])?;
        written += bytes_read as u64;
        if let Some(progress) = progress {
            progress.advance(bytes_read as u64);
        }
    }

    out.flush()?;
    Ok(written)
}

impl ApiClient {
    fn stream_into(
        &self,
        label: &str,
        total: Option<u64>,
        reader: &mut dyn Read,
        out: &mut dyn Write,
    ) -> Result<u64> {
        let progress = self.progress.as_deref();
        if let Some(progress) = progress {
            progress.start(label, total);
        }

        let result = copy_chunks(reader, out, progress);

        if let Some(progress) = progress {
            progress.finish();
        }
        result
    }
}

fn download_label(url: &str) -> &str {
    url.rsplit('/').find(|part| !part.is_empty()).unwrap_or(url)
}

impl Fetch for ApiClient {
    fn download(&self, url: &str, dir: &Path) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new_in(dir)?;
        let label = download_label(url);

        let written = match local_path(url) {
            Some(path) => {
                let mut src = File::open(path)?;
                let total = src.metadata().ok().map(|meta| meta.len());
                self.stream_into(label, total, &mut src, &mut file)?
            }
            None => {
                let mut response = self.get(url)?;
                let total = response.content_length();
                self.stream_into(label, total, &mut response, &mut file)?
            }
        };

        log::debug!(target: "download", "{url}: {written} bytes");
        Ok(file)
    }

    fn content_length(&self, url: &str) -> Result<Option<u64>> {
        if let Some(path) = local_path(url) {
            return match fs::metadata(path) {
                Ok(meta) => Ok(Some(meta.len())),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            };
        }

        let response = self.client.head(url).send()?;
        if !response.status().is_success() {
            return Err(Error::download(format!(
                "http status {} for {url}",
                response.status()
            )));
        }

        Ok(response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok()))
    }
}

impl ModSearch for ApiClient {
    fn search(&self, term: &str) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", term)])
            .send()?;

        if !response.status().is_success() {
            return Err(Error::other(format!(
                "search failed with http status {}",
                response.status()
            )));
        }

        Ok(serde_json::from_str(&response.text()?)?)
    }
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(rename = "_aFiles")]
    files: Vec<FileJson>,
}

#[derive(Debug, Deserialize)]
struct FileJson {
    #[serde(rename = "_sFile")]
    file_name: String,
    #[serde(rename = "_sDescription", default)]
    description: String,
    #[serde(rename = "_sDownloadUrl")]
    download_url: String,
    #[serde(rename = "_nFilesize", default)]
    size: Option<u64>,
    #[serde(rename = "_sMd5Checksum", default)]
    md5: Option<String>,
}

impl From<FileJson> for RemoteFile {
    fn from(file: FileJson) -> Self {
        Self {
            file_name: file.file_name,
            description: file.description,
            download_url: file.download_url,
            size: file.size,
            md5: file.md5.filter(|m| !m.is_empty()),
        }
    }
}

fn parse_file_listing(json: &str) -> Result<Vec<RemoteFile>> {
    let response: FileListResponse = serde_json::from_str(json)?;
    Ok(response.files.into_iter().map(RemoteFile::from).collect())
}

impl FileListing for ApiClient {
    fn list_files(&self, catalog_id: u64) -> Result<Vec<RemoteFile>> {
        let url = format!(
            "{}/Mod/{catalog_id}?_csvProperties=_aFiles",
            self.file_api_url
        );
        let json = self.get(&url)?.text()?;
        parse_file_listing(&json)
    }
}
