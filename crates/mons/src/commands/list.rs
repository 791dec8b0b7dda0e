// SPDX-License-Identifier: MIT OR Apache-2.0

use libmons::list_installed;

use crate::commands::Context;
use crate::exit_code::ExitCode;
use crate::output::{Verbosity, output_json, print_info, print_installed_table};

pub fn execute(ctx: &Context) -> Result<ExitCode, libmons::Error> {
    let session = ctx.local_session()?;
    let mods = list_installed(&session)?;

    if ctx.json {
        return output_json(&mods);
    }

    if mods.is_empty() {
        print_info(ctx.verbosity, "no mods installed");
        return Ok(ExitCode::Success);
    }

    if ctx.verbosity == Verbosity::Quiet {
        println!("{}", mods.len());
    } else {
        print_installed_table(&mods, ctx.verbosity);
    }

    Ok(ExitCode::Success)
}
