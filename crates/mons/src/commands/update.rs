// SPDX-License-Identifier: MIT OR Apache-2.0

use libmons::{UpdateSummary, apply_updates, check_updates};

use crate::commands::Context;
use crate::exit_code::ExitCode;
use crate::output::{Verbosity, output_error, output_json, print_info, print_plan};

pub fn execute(ctx: &Context, all: bool) -> Result<ExitCode, libmons::Error> {
    if !all {
        output_error(
            ctx.json,
            "this command can currently only be used with the --all option",
        );
        return Ok(ExitCode::FatalError);
    }

    let (session, client) = ctx.open_session()?;
    let plan = check_updates(&session, &client)?;

    if plan.is_empty() {
        if ctx.json {
            return output_json(UpdateSummary::default());
        }
        print_info(ctx.verbosity, "all mods up to date");
        return Ok(ExitCode::Success);
    }

    if !ctx.json {
        print_plan(&plan, ctx.verbosity);
    }

    if !ctx.prompter().confirm("Continue?", true) {
        if ctx.json {
            output_error(true, "aborted");
        } else {
            print_info(ctx.verbosity, "aborted");
        }
        return Ok(ExitCode::Success);
    }

    let summary = apply_updates(&plan, &client)?;

    if ctx.json {
        return output_json(&summary);
    }

    if ctx.verbosity != Verbosity::Quiet {
        for name in &summary.updated {
            println!("updated: {name}");
        }
    }
    print_info(ctx.verbosity, &format!("{} mod(s) updated", summary.len()));

    Ok(ExitCode::Success)
}
