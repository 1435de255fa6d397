//! Query-log operations: idempotent batch insert and listing.

use anyhow::Result;
use sqlx::Row;

use super::db::CatalogDb;
use super::types::{PolygonId, QueryRow};

impl CatalogDb {
    /// Insert search results in one transaction. Rows whose `(pol_id, uuid)`
    /// is already logged are skipped. Returns the number of new rows.
    pub async fn insert_query_results(&self, rows: &[QueryRow]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;
        for row in rows {
            inserted += sqlx::query(
                r#"
                INSERT OR IGNORE INTO query (
                    platformname, level_or_type, date, uuid,
                    full_name, size, pol_id, clouds
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&row.platform_name)
            .bind(&row.level_or_type)
            .bind(&row.date)
            .bind(&row.uuid)
            .bind(&row.full_name)
            .bind(&row.size)
            .bind(row.pol_id)
            .bind(row.clouds)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        tracing::debug!(
            total = rows.len(),
            inserted,
            "query results written to catalog"
        );
        Ok(inserted)
    }

    /// Logged results in insertion order, optionally restricted to one polygon.
    pub async fn list_query_results(&self, pol_id: Option<PolygonId>) -> Result<Vec<QueryRow>> {
        let rows = sqlx::query(
            r#"
            SELECT platformname, level_or_type, date, uuid,
                   full_name, size, clouds, pol_id
            FROM query
            WHERE ?1 IS NULL OR pol_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(pol_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| QueryRow {
                platform_name: r.get("platformname"),
                level_or_type: r.get("level_or_type"),
                date: r.get("date"),
                uuid: r.get("uuid"),
                full_name: r.get("full_name"),
                size: r.get("size"),
                clouds: r.get("clouds"),
                pol_id: r.get("pol_id"),
            })
            .collect())
    }
}
