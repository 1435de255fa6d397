//! One candidate: dedup, download, verify, place.

use std::io;
use std::path::{Path, PathBuf};

use super::{Loader, ProcessOutcome};
use crate::catalog::CatalogStore;
use crate::checksum;
use crate::detect::{self, MatchMode};
use crate::fetch::Fetcher;
use crate::platform::OutputFormat;
use crate::unpack;

impl<'a, S, F> Loader<'a, S, F>
where
    S: CatalogStore,
    F: Fetcher,
{
    /// True when either the processed-output folder or the raw-download
    /// folder already holds this product.
    pub fn already_present(&self, full_name: &str) -> Option<ProcessOutcome> {
        let rules = &self.options.detect;
        if detect::is_present(&self.paths.cropped_dir, full_name, MatchMode::Cropped, rules) {
            return Some(ProcessOutcome::AlreadyProcessed);
        }
        if detect::is_present(&self.paths.output_dir, full_name, MatchMode::Exact, rules) {
            return Some(ProcessOutcome::AlreadyDownloaded);
        }
        None
    }

    /// Bring one product into the output directory unless it is already there.
    pub async fn process(&self, product_id: &str, full_name: &str) -> ProcessOutcome {
        if let Some(skip) = self.already_present(full_name) {
            return skip;
        }

        let staging = self.paths.staging_file();
        let outcome = self.fetch_and_place(product_id, full_name, &staging).await;
        match std::fs::remove_file(&staging) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("could not remove staging file {}: {}", staging.display(), e),
        }
        outcome
    }

    async fn fetch_and_place(&self, product_id: &str, full_name: &str, staging: &Path) -> ProcessOutcome {
        tracing::info!(product_id, "started downloading {}", full_name);
        let url = self.platform.download_url(product_id);
        if self.fetcher.download_to(&url, staging).await.is_none() {
            tracing::error!(
                product_id,
                "was not able to download {}; will retry on a later run",
                full_name
            );
            return ProcessOutcome::Unavailable;
        }

        if !self.verify(staging, product_id).await {
            return ProcessOutcome::ChecksumFailed;
        }
        tracing::info!(product_id, "successfully downloaded, MD5 sums were equal");

        match self.place(staging, product_id, full_name).await {
            Ok(name) => {
                tracing::info!(
                    "saved {} in {}",
                    name,
                    self.paths.output_dir.display()
                );
                ProcessOutcome::Saved { name }
            }
            Err(e) => {
                tracing::error!(product_id, "could not place {}: {:#}", full_name, e);
                ProcessOutcome::UnpackFailed
            }
        }
    }

    /// Compare the payload's MD5 with the digest the hub publishes for `product_id`.
    /// Failing to fetch the expected digest counts as a mismatch.
    pub async fn verify(&self, payload: &Path, product_id: &str) -> bool {
        let url = self.platform.checksum_url(product_id);
        let Some(body) = self.fetcher.get(&url, "md5").await else {
            tracing::error!(product_id, "MD5 sum could not be fetched");
            return false;
        };
        let expected = String::from_utf8_lossy(&body).into_owned();

        let path = payload.to_path_buf();
        let actual = match tokio::task::spawn_blocking(move || checksum::md5_path(&path)).await {
            Ok(Ok(d)) => d,
            Ok(Err(e)) => {
                tracing::error!(product_id, "hashing payload failed: {:#}", e);
                return false;
            }
            Err(e) => {
                tracing::error!("hash task join: {}", e);
                return false;
            }
        };

        if !checksum::digests_match(&actual, &expected) {
            tracing::error!(
                product_id,
                expected = expected.trim(),
                actual = %actual,
                "MD5 sums were not equal"
            );
            return false;
        }
        true
    }

    /// Copy or extract the verified payload; returns the name now in the output directory.
    async fn place(&self, staging: &Path, product_id: &str, full_name: &str) -> anyhow::Result<String> {
        let staging: PathBuf = staging.to_path_buf();
        let output_dir = self.paths.output_dir.clone();
        let full_name = full_name.to_string();
        let tag = product_id.to_string();
        let format = self.platform.output;

        tokio::task::spawn_blocking(move || match format {
            OutputFormat::SingleFile => {
                let dest = unpack::copy_single(&staging, &output_dir, &full_name)?;
                Ok(dest
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(full_name))
            }
            OutputFormat::Archive => unpack::extract_archive(&staging, &output_dir, &tag),
        })
        .await?
    }
}
