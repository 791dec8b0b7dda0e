// SPDX-License-Identifier: MIT OR Apache-2.0

mod cli_config;
mod commands;
mod exit_code;
mod output;
mod progress;
mod prompt;

use clap::{CommandFactory, Parser, Subcommand};

use cli_config::CliConfig;
use commands::Context;
use exit_code::ExitCode;
use output::{Verbosity, output_error};

#[derive(Parser)]
#[command(name = "mons")]
#[command(about = "install and update celeste mods loaded by everest")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, global = true, help = "name of the install to operate on")]
    install: Option<String>,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "quiet",
        help = "enable verbose output"
    )]
    verbose: bool,

    #[arg(short, long, global = true, help = "only print errors")]
    quiet: bool,

    #[arg(long, global = true, help = "output results as json")]
    json: bool,

    #[arg(short = 'y', long, global = true, help = "answer yes to every prompt")]
    yes: bool,

    #[arg(long, help = "open configuration file in editor")]
    edit_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "download a mod and its dependencies")]
    Add {
        #[arg(
            value_name = "MOD",
            help = "mod name, gamebanana id or url, archive url, local archive, or search term"
        )]
        identifier: String,
        #[arg(long, help = "always treat MOD as a search term")]
        search: bool,
    },
    #[command(about = "update installed mods")]
    Update {
        #[arg(long, help = "update all installed mods")]
        all: bool,
    },
    #[command(about = "search the mod catalog")]
    Search {
        #[arg(help = "search term or exact mod name")]
        term: String,
    },
    #[command(about = "list installed mods")]
    List,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = run(&cli).unwrap_or_else(|e| {
        output_error(cli.json, &e.to_string());
        ExitCode::FatalError
    });

    std::process::exit(exit_code.into());
}

fn init_logging(verbosity: Verbosity) {
    env_logger::Builder::new()
        .filter_level(verbosity.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode, libmons::Error> {
    if cli.edit_config {
        CliConfig::edit_config()?;
        return Ok(ExitCode::Success);
    }

    let config = CliConfig::load()?;

    let verbosity = if cli.verbose {
        Verbosity::Verbose
    } else if cli.quiet {
        Verbosity::Quiet
    } else {
        config.verbosity
    };
    init_logging(verbosity);

    let ctx = Context {
        config: &config,
        install: cli.install.as_deref(),
        json: cli.json,
        verbosity,
        assume_yes: cli.yes || config.assume_yes,
    };

    match &cli.command {
        Some(Commands::Add { identifier, search }) => {
            commands::add::execute(&ctx, identifier, *search)
        }
        Some(Commands::Update { all }) => commands::update::execute(&ctx, *all),
        Some(Commands::Search { term }) => commands::search::execute(&ctx, term),
        Some(Commands::List) => commands::list::execute(&ctx),
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| libmons::Error::other(e.to_string()))?;
            Ok(ExitCode::Success)
        }
    }
}
