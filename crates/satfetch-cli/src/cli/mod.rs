//! CLI for the satfetch product retriever.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use satfetch_core::config;
use std::path::{Path, PathBuf};

use commands::{
    open_catalog, run_checksum, run_download, run_history, run_polygons_add, run_polygons_list,
    run_query,
};

/// Top-level CLI for satfetch.
#[derive(Debug, Parser)]
#[command(name = "satfetch")]
#[command(about = "satfetch: search and download satellite products from Copernicus hubs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by `download` and `query`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Platform key (Sentinel-1, Sentinel-2, Sentinel-3, Sentinel-3_pre, Sentinel-5).
    #[arg(long, default_value = "Sentinel-3")]
    pub platform: String,

    /// Directory holding the in-flight payload.
    #[arg(long, default_value = "./")]
    pub tmp_dir: PathBuf,

    /// Where verified products are placed.
    #[arg(long, default_value = "./")]
    pub output_dir: PathBuf,

    /// Processed outputs; products found here are not downloaded again.
    #[arg(long, default_value = "./cropped")]
    pub cropped_dir: PathBuf,

    /// Start date, optionally followed by an end date (YYYY-MM-DD).
    #[arg(long, num_args = 1..=2, value_names = ["START", "END"], default_value = "2018-04-01")]
    pub dates: Vec<String>,

    /// Stored polygon name, or a WKT geometry.
    #[arg(long, default_value = "Nederland 2deg")]
    pub polygon: String,

    /// Product type (e.g. OL_1_EFR___) or a full `key:value` filter.
    #[arg(long)]
    pub product_type: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Skip products whose name contains PATTERN (repeatable).
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Override the configured overcast threshold (percent).
    #[arg(long)]
    pub max_cloud_cover: Option<f64>,

    /// Use the persistent catalog shared with `polygons` and `history`
    /// ($XDG_STATE_HOME/satfetch/satfetch.db), or the file given. Without
    /// this flag the catalog lives in memory for this run only.
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub database: Option<Option<PathBuf>>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Search, then download, verify and unpack every eligible product.
    Download(SearchArgs),

    /// Search only and list the hits.
    Query(SearchArgs),

    /// Manage stored search polygons.
    Polygons {
        #[command(subcommand)]
        action: PolygonsCommand,

        /// Catalog file (defaults to $XDG_STATE_HOME/satfetch/satfetch.db).
        #[arg(long, global = true)]
        database: Option<PathBuf>,
    },

    /// List products logged by earlier searches.
    History {
        /// Only rows for this polygon (name or WKT).
        #[arg(long)]
        polygon: Option<String>,

        /// Catalog file (defaults to $XDG_STATE_HOME/satfetch/satfetch.db).
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Compute MD5 of a local file.
    Checksum {
        /// Path to the file.
        path: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PolygonsCommand {
    /// Store a named polygon.
    Add {
        name: String,
        /// WKT geometry, e.g. "POLYGON ((3 54, 7 54, 7 50, 3 50, 3 54))".
        wkt: String,
    },
    /// List stored polygons.
    List,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download(args) => run_download(&cfg, &args).await?,
            CliCommand::Query(args) => run_query(&cfg, &args).await?,
            CliCommand::Polygons { action, database } => {
                let db = open_catalog(database.as_deref(), true).await?;
                match action {
                    PolygonsCommand::Add { name, wkt } => run_polygons_add(&db, &name, &wkt).await?,
                    PolygonsCommand::List => run_polygons_list(&db).await?,
                }
            }
            CliCommand::History { polygon, database } => {
                let db = open_catalog(database.as_deref(), true).await?;
                run_history(&db, polygon.as_deref()).await?;
            }
            CliCommand::Checksum { path } => run_checksum(Path::new(&path)).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
