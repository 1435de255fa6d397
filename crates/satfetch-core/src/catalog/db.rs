//! SQLite-backed catalog implementation.
//!
//! Handles connection and migrations. Polygon and query-log operations live in
//! `polygons` and `query`.

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Areas available by name on every fresh catalog.
pub const KNOWN_POLYGONS: &[(&str, &str)] = &[
    (
        "Majadas EC",
        "POLYGON ((-5.780806639544274 39.94849220488383, \
         -5.765431071920511 39.94680338547788, \
         -5.767758852013342 39.934209156869166, \
         -5.783131547812546 39.93589853110727, \
         -5.780806639544274 39.94849220488383))",
    ),
    (
        "Nederland 2deg",
        "POLYGON ((3.0 54.0, 7.0 54.0, 7.0 50.0, 3.0 50.0, 3.0 54.0))",
    ),
];

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the SQLite-backed catalog.
///
/// The persistent database file is stored under the XDG state directory:
/// `~/.local/state/satfetch/satfetch.db` on Debian.
#[derive(Clone)]
pub struct CatalogDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl CatalogDb {
    /// Open (or create) the default catalog file and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("satfetch")?;
        let state_dir = xdg_dirs.get_state_home().join("satfetch");
        Self::open_at(state_dir.join("satfetch.db")).await
    }

    /// Open (or create) the catalog at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await
            .with_context(|| format!("open catalog {}", path.display()))?;
        let db = CatalogDb { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Open a catalog that lives only as long as this handle (no disk I/O).
    pub async fn open_memory() -> Result<Self> {
        // One connection: every connection to `:memory:` is a separate database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let db = CatalogDb { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS polygons (
                pol_id INTEGER PRIMARY KEY,
                polygon_name TEXT,
                wkt TEXT UNIQUE,
                CONSTRAINT unq UNIQUE (polygon_name, wkt)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS query (
                id INTEGER PRIMARY KEY,
                platformname TEXT,
                level_or_type TEXT,
                date TEXT,
                uuid TEXT,
                full_name TEXT,
                size TEXT,
                clouds REAL,
                pol_id INT REFERENCES polygons (pol_id),
                CONSTRAINT unq UNIQUE (pol_id, uuid)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        for (name, wkt) in KNOWN_POLYGONS {
            self.insert_polygon(wkt, name).await?;
        }
        Ok(())
    }
}
