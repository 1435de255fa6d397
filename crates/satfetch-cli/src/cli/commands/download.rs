//! `satfetch download` – search, then fetch every eligible product.

use anyhow::Result;
use satfetch_core::config::SatfetchConfig;

use super::session::Session;
use crate::cli::SearchArgs;

pub async fn run_download(cfg: &SatfetchConfig, args: &SearchArgs) -> Result<()> {
    let session = Session::open(cfg, args).await?;
    let report = session.loader().download(&session.request).await?;

    println!(
        "{}: {} found, {} saved, {} already present, {} overcast, {} excluded, {} failed",
        session.platform.key,
        report.found,
        report.saved,
        report.already_present,
        report.overcast,
        report.excluded,
        report.failed
    );
    Ok(())
}
