use anyhow::Result;
use satfetch_core::catalog::CatalogDb;
use std::path::Path;

/// Open the catalog at `path`. Without a path, `persistent` picks the XDG
/// default file over a throwaway in-memory catalog.
pub async fn open_catalog(path: Option<&Path>, persistent: bool) -> Result<CatalogDb> {
    match path {
        Some(p) => CatalogDb::open_at(p).await,
        None if persistent => CatalogDb::open_default().await,
        None => CatalogDb::open_memory().await,
    }
}
