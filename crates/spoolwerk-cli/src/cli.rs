// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definition.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "spoolwerk",
    version,
    about = "Send raw label jobs to printers through the OS print spooler"
)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List printers that look like label printers
    List {
        /// Print descriptors as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Send a file to a printer as one raw job
    Print {
        /// Printer, e.g. "local://Brother QL-500" or a bare spooler name
        device: OsString,

        /// File to send, or "-" for stdin
        file: PathBuf,

        /// Treat the input as text and encode it one byte per character
        #[arg(long)]
        text: bool,

        /// Send to an in-memory printer instead of the spooler
        #[arg(long)]
        dry_run: bool,

        /// Do not check the printer is reachable before sending
        #[arg(long)]
        no_validate: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_print_with_flags() {
        let cli = Cli::try_parse_from([
            "spoolwerk",
            "--config",
            "spool.json",
            "print",
            "local://Brother QL-500",
            "label.bin",
            "--dry-run",
        ])
        .expect("parse");

        assert_eq!(cli.config, Some(PathBuf::from("spool.json")));
        match cli.command {
            Command::Print {
                device,
                file,
                text,
                dry_run,
                no_validate,
            } => {
                assert_eq!(device, OsString::from("local://Brother QL-500"));
                assert_eq!(file, PathBuf::from("label.bin"));
                assert!(dry_run);
                assert!(!text);
                assert!(!no_validate);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_accepts_global_verbose() {
        let cli = Cli::try_parse_from(["spoolwerk", "list", "--json", "-v"]).expect("parse");
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::List { json: true }));
    }
}
