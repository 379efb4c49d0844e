// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolwerk — raw label printing through the OS print spooler.
//
// Entry point. Parses arguments, initialises logging, loads configuration and
// runs the chosen subcommand.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use spoolwerk_core::SpoolConfig;
use spoolwerk_core::error::Result;
use spoolwerk_core::human_errors::humanize_error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::PrintOptions;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            let human = humanize_error(&e);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            eprintln!("  ({e})");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SpoolConfig::load_or_default(cli.config.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::List { json } => commands::list(&config, json, &mut stdout),
        Command::Print {
            device,
            file,
            text,
            dry_run,
            no_validate,
        } => {
            let opts = PrintOptions {
                device: &device,
                file: &file,
                text,
                dry_run,
                no_validate,
            };
            commands::print(&config, &opts, &mut stdout).map(|_| ())
        }
    }
}
