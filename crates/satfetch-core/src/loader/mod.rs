//! Download orchestration.
//!
//! Runs a search, then walks the candidates one at a time: skip what is
//! overcast, excluded or already on disk, otherwise download to the staging
//! file, verify the MD5 and place the product in the output directory.
//! A candidate is either skipped, fully placed, or left untouched for a later run.

mod outcome;
mod process;

pub use outcome::{DownloadReport, ProcessOutcome};

use std::path::PathBuf;

use crate::catalog::CatalogStore;
use crate::detect::DetectRules;
use crate::fetch::Fetcher;
use crate::platform::PlatformConfig;
use crate::search::{self, SearchError, SearchRequest, SearchResults, SearchSettings};

/// File name of the in-flight payload inside the temp directory.
pub const STAGING_FILE_NAME: &str = "loaded";

#[derive(Debug, Clone)]
pub struct LoaderPaths {
    /// Holds the staging file for the product being downloaded.
    pub tmp_dir: PathBuf,
    /// Raw downloads land here.
    pub output_dir: PathBuf,
    /// Processed outputs; only inspected, never written.
    pub cropped_dir: PathBuf,
}

impl LoaderPaths {
    pub fn staging_file(&self) -> PathBuf {
        self.tmp_dir.join(STAGING_FILE_NAME)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    pub search: SearchSettings,
    pub detect: DetectRules,
    /// Candidates whose name contains any of these substrings are skipped.
    pub excluded_patterns: Vec<String>,
}

pub struct Loader<'a, S, F> {
    platform: &'a PlatformConfig,
    store: &'a S,
    fetcher: &'a F,
    paths: LoaderPaths,
    options: LoaderOptions,
}

impl<'a, S, F> Loader<'a, S, F>
where
    S: CatalogStore,
    F: Fetcher,
{
    pub fn new(
        platform: &'a PlatformConfig,
        store: &'a S,
        fetcher: &'a F,
        paths: LoaderPaths,
        options: LoaderOptions,
    ) -> Self {
        Self {
            platform,
            store,
            fetcher,
            paths,
            options,
        }
    }

    /// Search only; results are still logged in the catalog.
    pub async fn query(&self, req: &SearchRequest) -> Result<SearchResults, SearchError> {
        search::search(self.store, self.fetcher, self.platform, req, &self.options.search).await
    }

    /// Search, then process every eligible candidate in order.
    /// An unreachable hub yields an empty report; input errors are returned.
    pub async fn download(&self, req: &SearchRequest) -> Result<DownloadReport, SearchError> {
        let results = match self.query(req).await {
            Ok(r) => r,
            Err(e) if e.is_transient() => {
                tracing::error!("search failed, nothing downloaded: {}", e);
                return Ok(DownloadReport::default());
            }
            Err(e) => return Err(e),
        };

        let mut report = DownloadReport {
            found: results.len(),
            ..DownloadReport::default()
        };
        for candidate in results.candidates() {
            if candidate.overcast {
                tracing::warn!("too clouded - {}. skipping", candidate.full_name);
                report.overcast += 1;
                continue;
            }
            if let Some(pattern) = self.exclusion_for(&candidate.full_name) {
                tracing::info!("skipped {} (matches exclusion `{}`)", candidate.full_name, pattern);
                report.excluded += 1;
                continue;
            }
            let outcome = self
                .process(&candidate.product_id, &candidate.full_name)
                .await;
            report.record(&outcome);
        }
        tracing::info!(
            found = report.found,
            saved = report.saved,
            present = report.already_present,
            failed = report.failed,
            "download run finished"
        );
        Ok(report)
    }

    fn exclusion_for(&self, full_name: &str) -> Option<&str> {
        self.options
            .excluded_patterns
            .iter()
            .map(String::as_str)
            .find(|p| !p.is_empty() && full_name.contains(p))
    }
}
