//! Remote request client.
//!
//! Authenticated GETs with bounded retries: small bodies (search pages,
//! checksums) are returned in memory, product payloads are streamed to a
//! staging file under a wall-clock cap. Exhausted retries come back as
//! `None`, meaning "temporarily unavailable", never as a hard error.

mod curl;

pub use self::curl::CurlFetcher;

use std::path::Path;
use std::time::Duration;

/// Timeouts applied to every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Connect timeout, and the longest a transfer may stall without data.
    pub request_timeout: Duration,
    /// Hard cap on the whole transfer of one product payload.
    pub download_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            download_timeout: Duration::from_secs(900),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// GET a small body. `label` names the request in logs ("query", "md5").
    async fn get(&self, url: &str, label: &str) -> Option<Vec<u8>>;

    /// GET a payload into `dest` (truncated on every attempt).
    /// Returns the number of bytes written.
    async fn download_to(&self, url: &str, dest: &Path) -> Option<u64>;
}

#[cfg(test)]
pub(crate) mod mock;
