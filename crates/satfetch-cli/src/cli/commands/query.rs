//! `satfetch query` – search only and list the hits.

use anyhow::{bail, Result};
use satfetch_core::config::SatfetchConfig;

use super::session::Session;
use crate::cli::SearchArgs;

pub async fn run_query(cfg: &SatfetchConfig, args: &SearchArgs) -> Result<()> {
    let session = Session::open(cfg, args).await?;
    let results = match session.loader().query(&session.request).await {
        Ok(r) => r,
        Err(e) if e.is_transient() => bail!("{}; try again later", e),
        Err(e) => return Err(e.into()),
    };

    if results.is_empty() {
        println!("No products found.");
        return Ok(());
    }
    println!("{:<25} {:<8} {:<10} {}", "DATE", "CLOUDS", "SIZE", "NAME");
    for i in 0..results.len() {
        let clouds = match results.cloud_covers[i] {
            Some(c) if results.overcast_indices.contains(&i) => format!("{c:.1}*"),
            Some(c) => format!("{c:.1}"),
            None => "-".to_string(),
        };
        println!(
            "{:<25} {:<8} {:<10} {}",
            results.dates[i], clouds, results.sizes[i], results.names[i]
        );
    }
    println!(
        "{} products ({} overcast, marked *)",
        results.len(),
        results.overcast_indices.len()
    );
    Ok(())
}
