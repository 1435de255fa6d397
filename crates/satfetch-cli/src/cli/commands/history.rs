//! `satfetch history` – products logged by earlier searches.

use anyhow::{Context, Result};
use satfetch_core::catalog::CatalogDb;
use satfetch_core::search::{self, PolygonSpec};

pub async fn run_history(db: &CatalogDb, polygon: Option<&str>) -> Result<()> {
    let pol_id = match polygon {
        Some(p) => {
            let spec = PolygonSpec::parse(p);
            let wkt = match &spec {
                PolygonSpec::Wkt(wkt) => wkt.clone(),
                PolygonSpec::Name(_) => search::resolve_polygon(db, &spec).await?,
            };
            let id = db
                .get_pol_id(&wkt)
                .await?
                .with_context(|| format!("polygon not in catalog: {}", p))?;
            Some(id)
        }
        None => None,
    };

    let rows = db.list_query_results(pol_id).await?;
    if rows.is_empty() {
        println!("No products in catalog.");
        return Ok(());
    }
    println!(
        "{:<25} {:<12} {:<8} {:<10} {}",
        "DATE", "PLATFORM", "CLOUDS", "SIZE", "NAME"
    );
    for r in rows {
        let clouds = r
            .clouds
            .map(|c| format!("{c:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<25} {:<12} {:<8} {:<10} {}",
            r.date, r.platform_name, clouds, r.size, r.full_name
        );
    }
    Ok(())
}
