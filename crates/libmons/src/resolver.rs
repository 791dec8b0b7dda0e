// SPDX-License-Identifier: MIT OR Apache-2.0

//! turns whatever the user typed into a concrete archive source.

use std::path::Path;

use crate::{
    CatalogEntry, CatalogIndex, DEFAULT_SEARCH_DISPLAY_LIMIT, ModSource, Resolution, Result,
    prompt::Prompter,
    remote::{FileListing, ModSearch},
};

const SITE_MOD_PREFIXES: &[&str] = &["https://gamebanana.com/mods/", "http://gamebanana.com/mods/"];
const DIRECT_URL_SCHEMES: &[&str] = &["http://", "https://", "file://"];

/// everything candidate resolution reads from.
pub struct ResolveContext<'a> {
    pub catalog: &'a CatalogIndex,
    pub search: &'a dyn ModSearch,
    pub files: &'a dyn FileListing,
    pub prompter: &'a dyn Prompter,
    /// candidates offered for a fuzzy search; id lookups are not capped.
    pub search_display_limit: usize,
    /// skip straight to fuzzy search.
    pub force_search: bool,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        catalog: &'a CatalogIndex,
        search: &'a dyn ModSearch,
        files: &'a dyn FileListing,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            catalog,
            search,
            files,
            prompter,
            search_display_limit: DEFAULT_SEARCH_DISPLAY_LIMIT,
            force_search: false,
        }
    }

    pub fn with_search_display_limit(mut self, limit: usize) -> Self {
        self.search_display_limit = limit.max(1);
        self
    }

    pub fn with_force_search(mut self, force_search: bool) -> Self {
        self.force_search = force_search;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Identifier<'a> {
    LocalFile(&'a Path),
    DirectUrl(&'a str),
    Name(&'a str),
    SiteUrl(u64),
    CatalogId(u64),
    Term(&'a str),
}

fn classify<'a>(identifier: &'a str, catalog: &CatalogIndex) -> Identifier<'a> {
    let path = Path::new(identifier);
    if path.is_file() {
        return Identifier::LocalFile(path);
    }

    if identifier.ends_with(".zip")
        && DIRECT_URL_SCHEMES
            .iter()
            .any(|scheme| identifier.starts_with(scheme))
    {
        return Identifier::DirectUrl(identifier);
    }

    if catalog.contains(identifier) {
        return Identifier::Name(identifier);
    }

    if let Some(id) = site_mod_id(identifier) {
        return Identifier::SiteUrl(id);
    }

    if let Some(id) = parse_id(identifier) {
        return Identifier::CatalogId(id);
    }

    Identifier::Term(identifier)
}

fn parse_id(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn site_mod_id(url: &str) -> Option<u64> {
    let rest = SITE_MOD_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))?;
    parse_id(rest.rsplit('/').next()?)
}

/// resolves `identifier` in this order: local file, direct archive url, exact
/// catalog name, catalog-site url, numeric catalog id, fuzzy search.
///
/// not finding anything is [`Resolution::NotFound`], not an error.
pub fn resolve(identifier: &str, ctx: &ResolveContext<'_>) -> Result<Resolution> {
    let identifier = identifier.trim();

    let classified = if ctx.force_search {
        Identifier::Term(identifier)
    } else {
        classify(identifier, ctx.catalog)
    };
    log::debug!(target: "resolve", "{identifier} -> {classified:?}");

    match classified {
        Identifier::LocalFile(path) => Ok(Resolution::Found(ModSource::LocalFile(path.to_path_buf()))),
        Identifier::DirectUrl(url) => Ok(Resolution::Found(ModSource::DirectUrl(url.to_string()))),
        Identifier::Name(name) => Ok(ctx
            .catalog
            .lookup(name)
            .map(|entry| Resolution::Found(ModSource::Catalog(entry.clone())))
            .unwrap_or(Resolution::NotFound)),
        Identifier::SiteUrl(id) | Identifier::CatalogId(id) => resolve_id(id, ctx),
        Identifier::Term(term) => {
            let matches = ctx.catalog.search(term, ctx.search)?;
            Ok(disambiguate(
                matches,
                Some(ctx.search_display_limit),
                ctx.prompter,
            ))
        }
    }
}

fn resolve_id(id: u64, ctx: &ResolveContext<'_>) -> Result<Resolution> {
    let matches = ctx.catalog.find_by_id(id);
    if !matches.is_empty() {
        return Ok(disambiguate(matches, None, ctx.prompter));
    }

    log::info!(target: "resolve", "mod {id} is not in the catalog, listing its files");
    let files = ctx.files.list_files(id)?;
    if files.is_empty() {
        return Ok(Resolution::NotFound);
    }

    let options: Vec<String> = files
        .iter()
        .map(|f| format!("{} {}", f.file_name, f.description).trim_end().to_string())
        .collect();

    let choice = ctx.prompter.select("Select file to download", &options);
    Ok(match choice.checked_sub(1).and_then(|i| files.get(i)) {
        Some(file) => Resolution::Found(ModSource::RemoteFile(file.clone())),
        None => Resolution::Aborted,
    })
}

/// picks one of several catalog entries, newest upload first.
///
/// a single entry is returned without asking. when `cap` is set only that many
/// entries are offered. a selection of 0 or outside the offered range aborts.
pub fn disambiguate(
    mut entries: Vec<&CatalogEntry>,
    cap: Option<usize>,
    prompter: &dyn Prompter,
) -> Resolution {
    match entries.len() {
        0 => return Resolution::NotFound,
        1 => return Resolution::Found(ModSource::Catalog(entries[0].clone())),
        _ => {}
    }

    entries.sort_by(|a, b| b.last_update.cmp(&a.last_update));
    if let Some(cap) = cap {
        entries.truncate(cap.max(1));
    }

    let options: Vec<String> = entries
        .iter()
        .map(|e| format!("{} {}", e.name, e.version))
        .collect();

    let choice = prompter.select("Select mod to add", &options);
    match choice.checked_sub(1).and_then(|i| entries.get(i)) {
        Some(entry) => Resolution::Found(ModSource::Catalog((*entry).clone())),
        None => Resolution::Aborted,
    }
}
