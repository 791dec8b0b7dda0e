// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Serialize;

use libmons::{DiskUsage, InstalledMod, JsonOutput, UpdatePlan};

use crate::exit_code::ExitCode;

/// verbosity level for cli output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("quiet") => Self::Quiet,
            Some("verbose") => Self::Verbose,
            _ => Self::Normal,
        }
    }

    pub fn log_level(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Error,
            Self::Normal => log::LevelFilter::Warn,
            Self::Verbose => log::LevelFilter::Debug,
        }
    }
}

pub mod ansi {
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";

    #[inline]
    pub fn bold(s: &str) -> String {
        format!("{BOLD}{s}{RESET}")
    }
}

pub fn output_error(json: bool, msg: &str) {
    if json {
        let output: JsonOutput<()> = JsonOutput::err(msg);
        match serde_json::to_string(&output) {
            Ok(line) => println!("{line}"),
            Err(_) => eprintln!("error: {msg}"),
        }
    } else {
        eprintln!("{} {msg}", ansi::bold("error:"));
    }
}

pub fn output_json<T: Serialize>(data: T) -> Result<ExitCode, libmons::Error> {
    let output = JsonOutput::ok(&data);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::Success)
}

pub fn print_info(verbosity: Verbosity, msg: &str) {
    if verbosity != Verbosity::Quiet {
        println!("{} {}", ansi::bold("info:"), msg);
    }
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", ansi::bold("warn:"), msg);
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0}K", bytes as f64 / KB as f64)
    } else {
        format!("{bytes}B")
    }
}

pub fn disk_usage_message(usage: DiskUsage) -> String {
    match usage {
        DiskUsage::Additional(bytes) => format!(
            "after this operation, an additional {} of disk space will be used",
            format_size(bytes)
        ),
        DiskUsage::Freed(bytes) => format!(
            "after this operation, {} of disk space will be freed",
            format_size(bytes)
        ),
    }
}

fn name_width<T>(items: &[T], name: impl Fn(&T) -> &str) -> usize {
    items
        .iter()
        .map(|i| name(i).len())
        .max()
        .unwrap_or(10)
        .max(10)
}

pub fn print_plan(plan: &UpdatePlan, verbosity: Verbosity) {
    let plural = if plan.len() == 1 { "" } else { "s" };
    println!(
        "{} {} update{plural} available:",
        ansi::bold("info:"),
        plan.len()
    );

    for update in &plan.updates {
        let old = &update.candidate.old;
        if verbosity == Verbosity::Verbose {
            let size = update
                .remote_size
                .map(format_size)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {}: {} -> {} ({size})",
                old.name, old.version, update.candidate.new_version
            );
        } else {
            println!(
                "  {}: {} -> {}",
                old.name, old.version, update.candidate.new_version
            );
        }
    }

    println!();
    println!("{}", disk_usage_message(plan.disk_usage()));
}

pub fn print_installed_table(mods: &[InstalledMod], verbosity: Verbosity) {
    let name_width = name_width(mods, |m| &m.name);

    if verbosity == Verbosity::Verbose {
        println!("{:<name_width$}  {:>10}  {:>8}  FILE", "NAME", "VERSION", "SIZE");
        println!("{}", "-".repeat(name_width + 40));

        for m in mods {
            println!(
                "{:<name_width$}  {:>10}  {:>8}  {}",
                m.name,
                m.version.to_string(),
                format_size(m.size_bytes),
                m.file_name().unwrap_or("-")
            );
        }
    } else {
        println!("{:<name_width$}  {:>10}  FILE", "NAME", "VERSION");
        println!("{}", "-".repeat(name_width + 30));

        for m in mods {
            println!(
                "{:<name_width$}  {:>10}  {}",
                m.name,
                m.version.to_string(),
                m.file_name().unwrap_or("-")
            );
        }
    }
}
