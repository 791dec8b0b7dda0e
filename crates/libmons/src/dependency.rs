// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;

use crate::{
    Dependency, DependencyReport, Error, ModMeta, Outcome, Result, RuntimeStatus, Session,
    Version, archive,
    prompt::Prompter,
    remote::Fetch,
    store,
};

/// the minimum everest version a set of mods needs.
///
/// folded by maximum, so adding a mod never lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeRequirement(Version);

impl RuntimeRequirement {
    pub fn new(floor: Version) -> Self {
        Self(floor.as_runtime())
    }

    pub fn fold(&mut self, floor: Version) {
        let floor = floor.as_runtime();
        if floor > self.0 {
            self.0 = floor;
        }
    }

    pub fn version(&self) -> Version {
        self.0
    }

    pub fn is_satisfied_by(&self, installed: &Version) -> bool {
        installed.satisfies(&self.0)
    }
}

/// fetches the direct dependencies of `meta` into the mods directory and
/// checks the installed everest against the combined floor.
///
/// only one level is walked: dependencies of dependencies contribute their
/// everest floor but are not fetched. declining to continue past an
/// unresolved dependency returns [`Outcome::Aborted`] before anything is
/// downloaded.
pub fn resolve_dependencies(
    session: &Session,
    meta: &ModMeta,
    fetch: &dyn Fetch,
    prompter: &dyn Prompter,
) -> Result<Outcome<DependencyReport>> {
    let runtime = meta
        .runtime_dependency()
        .ok_or_else(|| Error::MissingRuntimeDependency(meta.name.clone()))?;
    let mut requirement = RuntimeRequirement::new(runtime.version);

    let mut resolved: Vec<&Dependency> = Vec::new();
    let mut unresolved: Vec<Dependency> = Vec::new();

    for dep in meta.dependencies.iter().filter(|d| !d.is_runtime()) {
        if session.catalog.contains(&dep.name) {
            resolved.push(dep);
            continue;
        }

        let question = format!("Dependency {} could not be resolved. Continue?", dep.name);
        if !prompter.confirm(&question, false) {
            log::info!(target: "deps", "aborted at unresolved dependency {}", dep.name);
            return Ok(Outcome::Aborted);
        }
        unresolved.push(dep.clone());
    }

    let mods_dir = session.mods_dir();
    if !resolved.is_empty() {
        fs::create_dir_all(&mods_dir)?;
    }

    let mut installed = Vec::new();
    let mut skipped = Vec::new();

    for dep in resolved {
        let Some(entry) = session.catalog.lookup(&dep.name) else {
            continue;
        };
        log::info!(target: "deps", "dependency: {} {}", dep.name, dep.version);

        let temp = fetch.download(&entry.url, &mods_dir)?;
        let Some(mut dep_meta) = archive::read_mod_meta(temp.path()) else {
            log::warn!(target: "deps", "{}: downloaded archive has no readable everest.yaml", dep.name);
            skipped.push(dep.name.clone());
            continue;
        };

        if let Some(floor) = dep_meta.runtime_dependency() {
            requirement.fold(floor.version);
        }

        let dest = store::destination(&mods_dir, &dep_meta.archive_file_name())?;
        store::persist(temp, &dest)?;
        dep_meta.archive_path = dest;
        installed.push(dep_meta);
    }

    let current = session.install.runtime_version();
    let required = requirement.version();
    let runtime = if requirement.is_satisfied_by(&current) {
        RuntimeStatus::Satisfied {
            installed: current,
            required,
        }
    } else {
        log::warn!(
            target: "deps",
            "installed everest ({current}) does not satisfy minimum requirement ({required})"
        );
        RuntimeStatus::Outdated {
            installed: current,
            required,
            upgrade_requested: prompter.confirm("Update Everest?", false),
        }
    };

    Ok(Outcome::Completed(DependencyReport {
        installed,
        unresolved,
        skipped,
        runtime,
    }))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{
        CatalogIndex, Config, Install,
        testing::{FakeRemote, ScriptedPrompter, entry, mod_zip, zip_with},
    };

    fn session(root: &Path, build: u32) -> Session {
        Session::with_catalog(
            Config::new(),
            Install::new("main", root).with_everest_build(build),
            CatalogIndex::from_entries([entry("Bar", 1, 1), entry("Baz", 2, 1)]),
        )
    }

    fn root_meta(deps: &[(&str, &str)]) -> ModMeta {
        ModMeta {
            name: "Foo".to_string(),
            version: Version::new(1, 0, 0),
            content_hash: None,
            dependencies: deps
                .iter()
                .map(|(name, version)| Dependency::new(*name, version.parse().unwrap()))
                .collect(),
            archive_path: "Foo.zip".into(),
        }
    }

    fn mod_files(root: &Path) -> Vec<String> {
        match fs::read_dir(root.join("Mods")) {
            Ok(entries) => entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_floor_folds_by_maximum() {
        let mut requirement = RuntimeRequirement::new(Version::new(1, 2, 0));
        requirement.fold(Version::new(1, 5, 0));
        requirement.fold(Version::new(1, 3, 0));
        assert_eq!(requirement.version(), Version::new(1, 5, 0));
    }

    #[test]
    fn test_floor_reads_build_only_form() {
        let mut requirement = RuntimeRequirement::new(Version::new(1, 0, 3000));
        assert_eq!(requirement.version(), Version::new(1, 3000, 0));

        requirement.fold(Version::new(1, 2500, 0));
        assert_eq!(requirement.version(), Version::new(1, 3000, 0));
        assert!(requirement.is_satisfied_by(&Version::runtime(3000)));
        assert!(!requirement.is_satisfied_by(&Version::runtime(2999)));
    }

    #[test]
    fn test_missing_runtime_dependency_fails_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let remote = FakeRemote::new();

        let result = resolve_dependencies(
            &session(dir.path(), 4000),
            &root_meta(&[("Bar", "1.0.0")]),
            &remote,
            &ScriptedPrompter::new(),
        );

        assert!(matches!(result, Err(Error::MissingRuntimeDependency(name)) if name == "Foo"));
        assert!(remote.downloads().is_empty());
    }

    #[test]
    fn test_declined_unresolved_dependency_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let remote =
            FakeRemote::new().with_file("https://mods.test/Bar.zip", mod_zip("Bar", "1.0.0", &[]));
        let prompter = ScriptedPrompter::new().confirming(false);

        let outcome = resolve_dependencies(
            &session(dir.path(), 4000),
            &root_meta(&[("Everest", "1.0.0"), ("Bar", "1.0.0"), ("Other", "1.0.0")]),
            &remote,
            &prompter,
        )
        .unwrap();

        assert!(outcome.is_aborted());
        assert_eq!(
            prompter.asked()[0].0,
            "Dependency Other could not be resolved. Continue?"
        );
        assert!(remote.downloads().is_empty());
        assert!(mod_files(dir.path()).is_empty());
    }

    #[test]
    fn test_fetches_dependencies_and_folds_their_floor() {
        let dir = tempfile::tempdir().unwrap();
        let remote = FakeRemote::new()
            .with_file(
                "https://mods.test/Bar.zip",
                mod_zip("Bar", "2.0.0", &[("Everest", "1.3000.0")]),
            )
            .with_file(
                "https://mods.test/Baz.zip",
                mod_zip("Baz", "0.3.0", &[("Everest", "1.2500.0")]),
            );
        let prompter = ScriptedPrompter::new();

        let report = resolve_dependencies(
            &session(dir.path(), 4000),
            &root_meta(&[("Everest", "1.2000.0"), ("Bar", "1.0.0"), ("Baz", "0.1.0")]),
            &remote,
            &prompter,
        )
        .unwrap()
        .completed()
        .unwrap();

        assert_eq!(
            remote.downloads(),
            vec!["https://mods.test/Bar.zip", "https://mods.test/Baz.zip"]
        );
        assert_eq!(report.installed.len(), 2);
        assert_eq!(report.installed[0].archive_path, dir.path().join("Mods/Bar.zip"));
        assert!(dir.path().join("Mods/Baz.zip").is_file());
        assert_eq!(
            report.runtime,
            RuntimeStatus::Satisfied {
                installed: Version::runtime(4000),
                required: Version::new(1, 3000, 0),
            }
        );
        assert!(prompter.asked().is_empty());

        let mut files = mod_files(dir.path());
        files.sort();
        assert_eq!(files, vec!["Bar.zip", "Baz.zip"]);
    }

    #[test]
    fn test_outdated_runtime_asks_for_upgrade() {
        let dir = tempfile::tempdir().unwrap();
        let remote = FakeRemote::new().with_file(
            "https://mods.test/Bar.zip",
            mod_zip("Bar", "2.0.0", &[("Everest", "1.3000.0")]),
        );
        let prompter = ScriptedPrompter::new().confirming(true);

        let report = resolve_dependencies(
            &session(dir.path(), 1000),
            &root_meta(&[("Everest", "1.0.0"), ("Bar", "1.0.0")]),
            &remote,
            &prompter,
        )
        .unwrap()
        .completed()
        .unwrap();

        assert_eq!(
            report.runtime,
            RuntimeStatus::Outdated {
                installed: Version::runtime(1000),
                required: Version::new(1, 3000, 0),
                upgrade_requested: true,
            }
        );
        assert_eq!(prompter.asked()[0].0, "Update Everest?");
    }

    #[test]
    fn test_confirmed_unresolved_and_unreadable_dependencies_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let remote = FakeRemote::new().with_file(
            "https://mods.test/Bar.zip",
            zip_with(&[("readme.txt", b"no metadata".as_slice())]),
        );
        let prompter = ScriptedPrompter::new().confirming(true);

        let report = resolve_dependencies(
            &session(dir.path(), 4000),
            &root_meta(&[("Everest", "1.0.0"), ("Other", "1.0.0"), ("Bar", "1.0.0")]),
            &remote,
            &prompter,
        )
        .unwrap()
        .completed()
        .unwrap();

        assert_eq!(
            report.unresolved,
            vec![Dependency::new("Other", Version::new(1, 0, 0))]
        );
        assert_eq!(report.skipped, vec!["Bar"]);
        assert!(report.installed.is_empty());
        assert!(mod_files(dir.path()).is_empty());
    }

    #[test]
    fn test_dependency_named_outside_mods_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let remote = FakeRemote::new().with_file(
            "https://mods.test/Bar.zip",
            mod_zip("../escaped", "1.0.0", &[("Everest", "1.0.0")]),
        );

        let report = resolve_dependencies(
            &session(dir.path(), 4000),
            &root_meta(&[("Everest", "1.0.0"), ("Bar", "1.0.0")]),
            &remote,
            &ScriptedPrompter::new(),
        )
        .unwrap()
        .completed()
        .unwrap();

        assert_eq!(report.skipped, vec!["Bar"]);
        assert!(report.installed.is_empty());
        assert!(!dir.path().join("escaped.zip").exists());
        assert!(mod_files(dir.path()).is_empty());
    }

    #[test]
    fn test_transport_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();

        let result = resolve_dependencies(
            &session(dir.path(), 4000),
            &root_meta(&[("Everest", "1.0.0"), ("Bar", "1.0.0")]),
            &FakeRemote::new(),
            &ScriptedPrompter::new(),
        );

        assert!(matches!(result, Err(Error::DownloadFailed(_))));
    }
}
