//! CLI parse tests, split by subcommand group.

use super::{Cli, CliCommand, SearchArgs};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

pub(super) fn search_args(args: &[&str]) -> SearchArgs {
    match parse(args) {
        CliCommand::Download(a) | CliCommand::Query(a) => a,
        other => panic!("expected a search command, got {:?}", other),
    }
}

mod rest;
