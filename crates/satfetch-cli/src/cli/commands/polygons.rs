//! `satfetch polygons` – store and list search polygons.

use anyhow::{bail, Result};
use satfetch_core::catalog::CatalogDb;

pub async fn run_polygons_add(db: &CatalogDb, name: &str, wkt: &str) -> Result<()> {
    if !wkt.contains('(') {
        bail!("`{}` does not look like a WKT geometry", wkt);
    }
    db.insert_polygon(wkt, name).await?;
    match db.get_pol_id(wkt).await? {
        Some(id) => println!("polygon {} stored as `{}`", id, name),
        None => bail!("polygon was not stored"),
    }
    Ok(())
}

pub async fn run_polygons_list(db: &CatalogDb) -> Result<()> {
    let polygons = db.list_polygons().await?;
    if polygons.is_empty() {
        println!("No polygons in catalog.");
        return Ok(());
    }
    println!("{:<6} {:<20} {}", "ID", "NAME", "WKT");
    for p in polygons {
        let name = if p.name.is_empty() { "-" } else { p.name.as_str() };
        println!("{:<6} {:<20} {}", p.id, name, p.wkt);
    }
    Ok(())
}
