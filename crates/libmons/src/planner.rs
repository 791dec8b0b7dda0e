// SPDX-License-Identifier: MIT OR Apache-2.0

use rayon::prelude::*;

use crate::{
    Blacklist, CatalogIndex, Error, InstalledMod, PlannedUpdate, Result, UpdateCandidate,
    UpdatePlan, UpdateSummary, remote::Fetch, store,
};

/// installed archives whose content differs from the catalog's latest upload.
///
/// mods missing from the catalog, blacklisted by file name, or without a
/// content hash (unpacked directories) are left alone.
pub fn plan_updates(
    installed: &[InstalledMod],
    catalog: &CatalogIndex,
    blacklist: &Blacklist,
) -> Vec<UpdateCandidate> {
    installed
        .iter()
        .filter_map(|installed_mod| {
            let entry = catalog.lookup(&installed_mod.name)?;

            if blacklist.is_blacklisted(installed_mod) {
                log::debug!(target: "update", "{} is blacklisted", installed_mod.name);
                return None;
            }

            let hash = installed_mod.content_hash.as_deref()?;
            if hash.eq_ignore_ascii_case(&entry.content_hash) {
                return None;
            }

            log::debug!(
                target: "update",
                "{}: {} -> {}",
                installed_mod.name,
                installed_mod.version,
                entry.version
            );

            Some(UpdateCandidate {
                old: installed_mod.clone(),
                new_version: entry.version,
                url: entry.url.clone(),
            })
        })
        .collect()
}

/// asks the server for each candidate's download size and totals the change
/// in disk usage. sizes are queried in parallel; the plan keeps input order.
pub fn measure(candidates: Vec<UpdateCandidate>, fetch: &dyn Fetch) -> Result<UpdatePlan> {
    let sizes: Vec<Result<Option<u64>>> = candidates
        .par_iter()
        .map(|candidate| fetch.content_length(&candidate.url))
        .collect();

    let mut plan = UpdatePlan::default();

    for (candidate, size) in candidates.into_iter().zip(sizes) {
        let remote_size = size?;
        let delta = match remote_size {
            Some(size) => size as i64 - candidate.old.size_bytes as i64,
            None => {
                log::debug!(target: "update", "no size reported for {}", candidate.url);
                0
            }
        };

        plan.total_delta += delta;
        plan.updates.push(PlannedUpdate {
            candidate,
            remote_size,
            delta,
        });
    }

    Ok(plan)
}

/// downloads every planned update over the installed file, one at a time.
///
/// each replacement is a rename of a fully downloaded file. the first failure
/// stops the batch; mods replaced before it stay replaced.
pub fn apply_updates(plan: &UpdatePlan, fetch: &dyn Fetch) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary::default();

    for update in &plan.updates {
        let old = &update.candidate.old;
        let dir = old
            .path
            .parent()
            .ok_or_else(|| Error::other(format!("{} has no parent directory", old.path.display())))?;

        let temp = fetch.download(&update.candidate.url, dir)?;
        store::persist(temp, &old.path)?;

        log::info!(
            target: "update",
            "updated {} to {}",
            old.name,
            update.candidate.new_version
        );
        summary.updated.push(old.name.clone());
    }

    Ok(summary)
}
