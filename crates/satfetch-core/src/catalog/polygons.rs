//! Polygon operations: insert, resolve by WKT or name, list.

use anyhow::Result;
use sqlx::Row;

use super::db::CatalogDb;
use super::types::{Polygon, PolygonId};

impl CatalogDb {
    /// Insert a polygon; a WKT already present (under any name) is left untouched.
    pub async fn insert_polygon(&self, wkt: &str, name: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO polygons (wkt, polygon_name)
            VALUES (?1, ?2)
            "#,
        )
        .bind(wkt)
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_pol_id(&self, wkt: &str) -> Result<Option<PolygonId>> {
        let row = sqlx::query("SELECT pol_id FROM polygons WHERE wkt = ?1")
            .bind(wkt)
            .fetch_optional(&self.pool)
            .await?;
        if row.is_none() {
            tracing::debug!("polygon {} was not found in polygons table", wkt);
        }
        Ok(row.map(|r| r.get::<i64, _>("pol_id")))
    }

    pub async fn get_wkt_from_name(&self, name: &str) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT wkt FROM polygons
            WHERE polygon_name = ?1
            ORDER BY pol_id ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        if row.is_none() {
            tracing::debug!("polygon named `{}` was not found in polygons table", name);
        }
        Ok(row.map(|r| r.get::<String, _>("wkt")))
    }

    /// All polygons, oldest first.
    pub async fn list_polygons(&self) -> Result<Vec<Polygon>> {
        let rows = sqlx::query(
            r#"
            SELECT pol_id, polygon_name, wkt
            FROM polygons
            ORDER BY pol_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Polygon {
                id: r.get("pol_id"),
                name: r.get::<Option<String>, _>("polygon_name").unwrap_or_default(),
                wkt: r.get("wkt"),
            })
            .collect())
    }
}
