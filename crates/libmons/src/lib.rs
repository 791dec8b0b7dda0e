// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Catalog, search and file-listing endpoints are the ones used by the Everest
// mod updater and the mons installer.

pub mod api;
pub mod archive;
pub mod blacklist;
pub mod catalog;
pub mod config;
pub mod dependency;
pub mod error;
pub mod installed;
pub mod planner;
pub mod prompt;
pub mod remote;
pub mod resolver;
pub mod session;
pub mod store;
pub mod types;
pub mod version;

#[cfg(test)]
mod testing;

use std::{fs, path::Path};

use tempfile::NamedTempFile;

pub use api::ApiClient;
pub use archive::{content_hash, read_mod_meta};
pub use blacklist::Blacklist;
pub use catalog::CatalogIndex;
pub use config::{
    Config, DEFAULT_BLACKLIST_FILE, DEFAULT_CATALOG_URL, DEFAULT_FILE_API_URL,
    DEFAULT_SEARCH_DISPLAY_LIMIT, DEFAULT_SEARCH_URL,
};
pub use dependency::{RuntimeRequirement, resolve_dependencies};
pub use error::{Error, Result};
pub use installed::scan_installed;
pub use planner::{apply_updates, measure, plan_updates};
pub use prompt::{Prompter, Unattended};
pub use remote::{Fetch, FileListing, ModSearch, Progress, SearchHit};
pub use resolver::{ResolveContext, disambiguate, resolve};
pub use session::{Install, Session};
pub use types::{
    AddOutcome, AddReport, CatalogEntry, Dependency, DependencyReport, DiskUsage, InstalledMod,
    JsonOutput, ModMeta, ModSource, Outcome, PlannedUpdate, RUNTIME_NAME, RemoteFile, Resolution,
    RuntimeStatus, SearchMatch, UpdateCandidate, UpdatePlan, UpdateSummary,
};
pub use version::Version;

const SAVE_AS_PROMPT: &str = "Save As";
const MISSING_METADATA_PROMPT: &str = "everest.yaml is missing or malformed. Install anyways?";

/// resolves `identifier`, saves the archive into the mods directory and
/// fetches its dependencies.
///
/// with `force_search` the identifier is always treated as a search term.
pub fn add_mod<R>(
    session: &Session,
    identifier: &str,
    remote: &R,
    prompter: &dyn Prompter,
    force_search: bool,
) -> Result<AddOutcome>
where
    R: Fetch + ModSearch + FileListing,
{
    let ctx = ResolveContext::new(&session.catalog, remote, remote, prompter)
        .with_search_display_limit(session.config.search_display_limit)
        .with_force_search(force_search);

    let source = match resolve(identifier, &ctx)? {
        Resolution::Found(source) => source,
        Resolution::NotFound => return Ok(AddOutcome::NotFound),
        Resolution::Aborted => return Ok(AddOutcome::Aborted),
    };

    let mods_dir = session.mods_dir();
    fs::create_dir_all(&mods_dir)?;

    let temp = fetch_source(&source, &mods_dir, remote)?;
    let meta = read_mod_meta(temp.path());

    let file_name = match &meta {
        Some(meta) => {
            log::info!(target: "add", "downloaded mod: {} {}", meta.name, meta.version);
            meta.archive_file_name()
        }
        None => {
            if !prompter.confirm(MISSING_METADATA_PROMPT, false) {
                return Ok(AddOutcome::Aborted);
            }
            let Some(name) = prompter
                .input(SAVE_AS_PROMPT)
                .filter(|name| !name.trim().is_empty())
                .or_else(|| default_file_name(&source))
            else {
                return Ok(AddOutcome::Aborted);
            };
            with_zip_extension(name.trim())
        }
    };

    let saved_as = store::destination(&mods_dir, &file_name)?;
    store::persist(temp, &saved_as)?;

    let Some(mut meta) = meta else {
        return Ok(AddOutcome::Added(AddReport {
            saved_as,
            meta: None,
            dependencies: None,
        }));
    };
    meta.archive_path = saved_as.clone();

    let dependencies = resolve_dependencies(session, &meta, remote, prompter)?;

    Ok(AddOutcome::Added(AddReport {
        saved_as,
        meta: Some(meta),
        dependencies: Some(dependencies),
    }))
}

fn fetch_source(source: &ModSource, mods_dir: &Path, fetch: &dyn Fetch) -> Result<NamedTempFile> {
    match source {
        ModSource::LocalFile(path) => store::stage_copy(path, mods_dir),
        ModSource::DirectUrl(url) => fetch.download(url, mods_dir),
        ModSource::Catalog(entry) => {
            log::info!(target: "add", "mod found: {} {}", entry.name, entry.version);
            fetch.download(&entry.url, mods_dir)
        }
        ModSource::RemoteFile(file) => {
            log::info!(target: "add", "selected file: {}", file.file_name);
            let temp = fetch.download(&file.download_url, mods_dir)?;
            if let Some(md5) = &file.md5 {
                archive::verify_md5(temp.path(), md5)?;
            }
            Ok(temp)
        }
    }
}

fn default_file_name(source: &ModSource) -> Option<String> {
    let name: &str = match source {
        ModSource::LocalFile(path) => path.file_name()?.to_str()?,
        ModSource::RemoteFile(file) => file.file_name.as_str(),
        ModSource::DirectUrl(url) => url.rsplit('/').next()?,
        ModSource::Catalog(entry) => entry.name.as_str(),
    };
    (!name.is_empty()).then(|| name.to_string())
}

fn with_zip_extension(name: &str) -> String {
    if name.ends_with(".zip") {
        name.to_string()
    } else {
        format!("{name}.zip")
    }
}

/// scans the mods directory and measures every available update.
pub fn check_updates(session: &Session, fetch: &dyn Fetch) -> Result<UpdatePlan> {
    let installed = scan_installed(&session.mods_dir())?;
    let blacklist = session.load_blacklist()?;

    if !blacklist.is_empty() {
        log::debug!(target: "update", "{} blacklisted file(s)", blacklist.len());
    }

    let candidates = plan_updates(&installed, &session.catalog, &blacklist);
    measure(candidates, fetch)
}

/// maps each search hit onto the catalog names published under its id.
pub fn search_catalog(
    session: &Session,
    term: &str,
    search: &dyn ModSearch,
) -> Result<Vec<SearchMatch>> {
    session.catalog.search_matches(term, search)
}

pub fn list_installed(session: &Session) -> Result<Vec<InstalledMod>> {
    scan_installed(&session.mods_dir())
}
