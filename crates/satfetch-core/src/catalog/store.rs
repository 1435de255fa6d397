//! Store abstraction used by the search engine.
//!
//! The engine only needs four operations; `CatalogDb` provides them for both
//! file-backed and in-memory catalogs.

use anyhow::Result;

use super::db::CatalogDb;
use super::types::{PolygonId, QueryRow};

#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    async fn insert_polygon(&self, wkt: &str, name: &str) -> Result<()>;
    async fn get_pol_id(&self, wkt: &str) -> Result<Option<PolygonId>>;
    async fn get_wkt_from_name(&self, name: &str) -> Result<Option<String>>;
    /// Idempotent on `(pol_id, uuid)`; returns the number of new rows.
    async fn insert_query_results(&self, rows: &[QueryRow]) -> Result<u64>;
}

impl CatalogStore for CatalogDb {
    async fn insert_polygon(&self, wkt: &str, name: &str) -> Result<()> {
        CatalogDb::insert_polygon(self, wkt, name).await
    }

    async fn get_pol_id(&self, wkt: &str) -> Result<Option<PolygonId>> {
        CatalogDb::get_pol_id(self, wkt).await
    }

    async fn get_wkt_from_name(&self, name: &str) -> Result<Option<String>> {
        CatalogDb::get_wkt_from_name(self, name).await
    }

    async fn insert_query_results(&self, rows: &[QueryRow]) -> Result<u64> {
        CatalogDb::insert_query_results(self, rows).await
    }
}
