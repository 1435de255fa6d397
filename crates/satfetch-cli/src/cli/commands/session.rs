//! Wiring shared by `download` and `query`: config + flags into a loader.

use anyhow::Result;
use satfetch_core::catalog::CatalogDb;
use satfetch_core::config::SatfetchConfig;
use satfetch_core::detect::DetectRules;
use satfetch_core::fetch::{CurlFetcher, FetchOptions};
use satfetch_core::loader::{Loader, LoaderOptions, LoaderPaths};
use satfetch_core::platform::{self, Credentials, PlatformConfig};
use satfetch_core::search::{Period, PolygonSpec, SearchRequest, SearchSettings};
use std::time::Duration;

use super::open_catalog;
use crate::cli::SearchArgs;

pub struct Session {
    pub platform: &'static PlatformConfig,
    pub db: CatalogDb,
    pub fetcher: CurlFetcher,
    pub paths: LoaderPaths,
    pub options: LoaderOptions,
    pub request: SearchRequest,
}

impl Session {
    pub async fn open(cfg: &SatfetchConfig, args: &SearchArgs) -> Result<Self> {
        let platform = platform::lookup(&args.platform)?;
        let request = SearchRequest {
            polygon: PolygonSpec::parse(&args.polygon),
            period: Period::from_dates(args.dates.as_slice())?,
            product_type: args.product_type.clone(),
        };

        let retry = cfg.retry_or_default();
        let fetch_opts = FetchOptions {
            request_timeout: Duration::from_secs(retry.request_timeout_secs),
            download_timeout: Duration::from_secs(retry.download_timeout_secs),
        };
        let fetcher = CurlFetcher::new(credentials(cfg, platform, args), retry.policy(), fetch_opts);
        let db = match &args.database {
            Some(path) => open_catalog(path.as_deref(), true).await?,
            None => open_catalog(None, false).await?,
        };

        Ok(Self {
            platform,
            db,
            fetcher,
            paths: LoaderPaths {
                tmp_dir: args.tmp_dir.clone(),
                output_dir: args.output_dir.clone(),
                cropped_dir: args.cropped_dir.clone(),
            },
            options: loader_options(cfg, args),
            request,
        })
    }

    pub fn loader(&self) -> Loader<'_, CatalogDb, CurlFetcher> {
        Loader::new(
            self.platform,
            &self.db,
            &self.fetcher,
            self.paths.clone(),
            self.options.clone(),
        )
    }
}

/// Flags beat the config file, which beats the platform's guest account.
pub fn credentials(cfg: &SatfetchConfig, platform: &PlatformConfig, args: &SearchArgs) -> Credentials {
    if let Some(user) = &args.user {
        return Credentials::new(user.clone(), args.password.clone().unwrap_or_default());
    }
    match cfg.credentials.get(platform.key) {
        Some(c) => Credentials::new(c.username.clone(), c.password.clone()),
        None => platform.default_credentials(),
    }
}

pub fn loader_options(cfg: &SatfetchConfig, args: &SearchArgs) -> LoaderOptions {
    let mut excluded_patterns = cfg.excluded_patterns.clone();
    excluded_patterns.extend(args.exclude.iter().cloned());
    LoaderOptions {
        search: SearchSettings {
            page_size: cfg.page_size,
            max_cloud_cover: args.max_cloud_cover.unwrap_or(cfg.max_cloud_cover),
        },
        detect: DetectRules {
            cropped_prefix_len: cfg.cropped_prefix_len,
            dual_output_marker: cfg.dual_output_marker.clone(),
        },
        excluded_patterns,
    }
}
