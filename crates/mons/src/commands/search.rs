// SPDX-License-Identifier: MIT OR Apache-2.0

use libmons::search_catalog;

use crate::commands::Context;
use crate::exit_code::ExitCode;
use crate::output::{output_json, print_info};

pub fn execute(ctx: &Context, term: &str) -> Result<ExitCode, libmons::Error> {
    let (session, client) = ctx.open_session()?;

    if let Some(entry) = session.catalog.lookup(term) {
        if ctx.json {
            return output_json(entry);
        }
        println!("{}", entry.catalog_id);
        return Ok(ExitCode::Success);
    }

    let matches = search_catalog(&session, term, &client)?;

    if ctx.json {
        return output_json(&matches);
    }

    if matches.is_empty() {
        print_info(ctx.verbosity, "no results found");
        return Ok(ExitCode::Success);
    }

    for found in &matches {
        if found.names.is_empty() {
            println!("entry not found: {}", found.catalog_id);
        }
        for name in &found.names {
            println!("{name}");
        }
    }

    Ok(ExitCode::Success)
}
