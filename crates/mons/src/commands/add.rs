// SPDX-License-Identifier: MIT OR Apache-2.0

use std::process::Command;

use libmons::{
    AddOutcome, AddReport, DependencyReport, Error, Install, Outcome, RuntimeStatus, Version,
    add_mod,
};

use crate::commands::Context;
use crate::exit_code::ExitCode;
use crate::output::{Verbosity, output_error, output_json, print_info, print_warning};

pub fn execute(ctx: &Context, identifier: &str, search: bool) -> Result<ExitCode, libmons::Error> {
    let (session, client) = ctx.open_session()?;
    let prompter = ctx.prompter();

    let outcome = add_mod(&session, identifier, &client, prompter.as_ref(), search)?;
    let report = match added(ctx, identifier, outcome) {
        Ok(report) => report,
        Err(code) => return Ok(code),
    };

    if ctx.json {
        return output_json(&report);
    }

    print_report(&report, ctx.verbosity);

    if let Some(Outcome::Completed(deps)) = &report.dependencies {
        print_dependencies(deps, ctx.verbosity);

        if let RuntimeStatus::Outdated {
            required,
            upgrade_requested: true,
            ..
        } = deps.runtime
        {
            install_runtime(ctx, &session.install, &required)?;
        }
    }

    Ok(ExitCode::Success)
}

/// the report of a saved mod, or the exit code when nothing was saved.
///
/// not finding a mod and declining a prompt both end the command cleanly.
fn added(ctx: &Context, identifier: &str, outcome: AddOutcome) -> Result<AddReport, ExitCode> {
    match outcome {
        AddOutcome::Added(report) => Ok(report),
        AddOutcome::NotFound => {
            output_error(ctx.json, &format!("no results found for {identifier}"));
            Err(ExitCode::Success)
        }
        AddOutcome::Aborted => {
            if ctx.json {
                output_error(true, "aborted");
            } else {
                print_info(ctx.verbosity, "aborted");
            }
            Err(ExitCode::Success)
        }
    }
}

fn print_report(report: &AddReport, verbosity: Verbosity) {
    let file_name = report
        .saved_as
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match &report.meta {
        Some(meta) => print_info(
            verbosity,
            &format!("saved {} {} as {file_name}", meta.name, meta.version),
        ),
        None => print_info(
            verbosity,
            &format!("saved {file_name} without metadata, dependencies were not checked"),
        ),
    }

    if let Some(Outcome::Aborted) = &report.dependencies {
        print_info(verbosity, "aborted while resolving dependencies");
    }
}

fn print_dependencies(deps: &DependencyReport, verbosity: Verbosity) {
    for meta in &deps.installed {
        print_info(
            verbosity,
            &format!("dependency saved: {} {}", meta.name, meta.version),
        );
    }

    for dep in &deps.unresolved {
        print_warning(&format!("unresolved dependency skipped: {} {}", dep.name, dep.version));
    }

    for name in &deps.skipped {
        print_warning(&format!(
            "dependency {name} has no readable everest.yaml and was not saved"
        ));
    }

    if let RuntimeStatus::Outdated {
        installed,
        required,
        upgrade_requested: false,
    } = &deps.runtime
    {
        print_warning(&format!(
            "installed everest ({installed}) does not satisfy minimum requirement ({required})"
        ));
    }
}

fn install_runtime(ctx: &Context, install: &Install, required: &Version) -> Result<(), Error> {
    let Some(command) = ctx.config.runtime_install_command(install, required) else {
        print_info(
            ctx.verbosity,
            &format!(
                "no runtime_install_command configured, install everest build {} or newer manually",
                required.minor
            ),
        );
        return Ok(());
    };

    let Some((program, args)) = command.split_first() else {
        return Ok(());
    };

    print_info(ctx.verbosity, &format!("running {}", command.join(" ")));
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| Error::other(format!("failed to run {program}: {e}")))?;

    if !status.success() {
        return Err(Error::other(format!("{program} exited with {status}")));
    }

    Ok(())
}
