//! Tests for polygons, history and checksum subcommands.

use super::parse;
use crate::cli::{CliCommand, PolygonsCommand};

#[test]
fn cli_parse_polygons_add() {
    match parse(&[
        "satfetch",
        "polygons",
        "add",
        "Veluwe",
        "POLYGON ((5.6 52.3, 6.1 52.3, 6.1 52.0, 5.6 52.0, 5.6 52.3))",
    ]) {
        CliCommand::Polygons {
            action: PolygonsCommand::Add { name, wkt },
            database,
        } => {
            assert_eq!(name, "Veluwe");
            assert!(wkt.starts_with("POLYGON"));
            assert!(database.is_none());
        }
        _ => panic!("expected Polygons Add"),
    }
}

#[test]
fn cli_parse_polygons_list_with_database() {
    match parse(&["satfetch", "polygons", "list", "--database", "/tmp/c.db"]) {
        CliCommand::Polygons {
            action: PolygonsCommand::List,
            database,
        } => assert_eq!(database.as_deref(), Some(std::path::Path::new("/tmp/c.db"))),
        _ => panic!("expected Polygons List"),
    }
}

#[test]
fn cli_parse_history() {
    match parse(&["satfetch", "history"]) {
        CliCommand::History { polygon, database } => {
            assert!(polygon.is_none());
            assert!(database.is_none());
        }
        _ => panic!("expected History"),
    }
    match parse(&["satfetch", "history", "--polygon", "Majadas EC"]) {
        CliCommand::History { polygon, .. } => assert_eq!(polygon.as_deref(), Some("Majadas EC")),
        _ => panic!("expected History with polygon"),
    }
}

#[test]
fn cli_parse_checksum() {
    match parse(&["satfetch", "checksum", "/path/to/loaded"]) {
        CliCommand::Checksum { path } => assert_eq!(path, "/path/to/loaded"),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn catalog_help_names_the_state_dir() {
    use clap::CommandFactory;
    let cmd = crate::cli::Cli::command();
    for sub in ["polygons", "history"] {
        let help = cmd
            .find_subcommand(sub)
            .unwrap()
            .get_arguments()
            .find(|a| a.get_id() == "database")
            .and_then(|a| a.get_help())
            .map(|h| h.to_string())
            .unwrap();
        assert!(help.contains("XDG_STATE_HOME"), "{sub}: {help}");
    }
}
