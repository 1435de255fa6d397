//! libcurl-backed `Fetcher`.
//!
//! Each attempt is a fresh `Easy` handle; the retry loop runs on the blocking
//! pool so the async catalog side never stalls on network I/O.

use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use curl::easy::{Auth, Easy};

use super::{FetchOptions, Fetcher};
use crate::platform::Credentials;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};

#[derive(Debug, Clone)]
pub struct CurlFetcher {
    credentials: Credentials,
    policy: RetryPolicy,
    options: FetchOptions,
}

impl CurlFetcher {
    pub fn new(credentials: Credentials, policy: RetryPolicy, options: FetchOptions) -> Self {
        Self {
            credentials,
            policy,
            options,
        }
    }
}

fn prepare(easy: &mut Easy, url: &str, creds: &Credentials, stall: Duration) -> Result<(), FetchError> {
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(stall)?;
    // Abort when fewer than 1 byte/s arrives for `stall`.
    easy.low_speed_limit(1)?;
    easy.low_speed_time(stall.max(Duration::from_secs(1)))?;
    if !creds.is_empty() {
        let mut auth = Auth::new();
        auth.basic(true);
        easy.http_auth(&auth)?;
        easy.username(&creds.username)?;
        easy.password(&creds.password)?;
    }
    Ok(())
}

fn check_status(easy: &mut Easy) -> Result<(), FetchError> {
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(())
}

/// One GET attempt collecting the body in memory.
fn get_once(url: &str, creds: &Credentials, opts: FetchOptions) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    let mut easy = Easy::new();
    prepare(&mut easy, url, creds, opts.request_timeout)?;
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    check_status(&mut easy)?;
    Ok(body)
}

/// One GET attempt streaming the body to `dest`, aborted past the wall-clock cap.
fn download_once(url: &str, creds: &Credentials, opts: FetchOptions, dest: &Path) -> Result<u64, FetchError> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(FetchError::Storage)?;
        }
    }
    let mut file = File::create(dest).map_err(FetchError::Storage)?;

    let started = Instant::now();
    let cap = opts.download_timeout;
    let written = Cell::new(0u64);
    let over_cap = Cell::new(false);
    let write_err: RefCell<Option<std::io::Error>> = RefCell::new(None);

    let mut easy = Easy::new();
    prepare(&mut easy, url, creds, opts.request_timeout)?;
    easy.progress(true)?;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if started.elapsed() > cap {
                over_cap.set(true);
                return Ok(0);
            }
            match file.write_all(data) {
                Ok(()) => {
                    written.set(written.get() + data.len() as u64);
                    Ok(data.len())
                }
                Err(e) => {
                    *write_err.borrow_mut() = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.progress_function(|_, _, _, _| {
            if started.elapsed() > cap {
                over_cap.set(true);
                return false;
            }
            true
        })?;
        transfer.perform()
    };

    if over_cap.get() {
        tracing::warn!(url, cap_secs = cap.as_secs(), "download exceeded wall-clock cap");
        return Err(FetchError::WallClock(cap));
    }
    if let Some(e) = write_err.into_inner() {
        return Err(FetchError::Storage(e));
    }
    performed?;
    check_status(&mut easy)?;
    file.flush().map_err(FetchError::Storage)?;
    Ok(written.get())
}

impl Fetcher for CurlFetcher {
    async fn get(&self, url: &str, label: &str) -> Option<Vec<u8>> {
        let url = url.to_string();
        let label = label.to_string();
        let creds = self.credentials.clone();
        let policy = self.policy;
        let opts = self.options;

        let joined = tokio::task::spawn_blocking(move || {
            run_with_retry(&policy, &label, |_| get_once(&url, &creds, opts))
                .map_err(|(e, attempts)| (e, attempts, label, url))
        })
        .await;

        match joined {
            Ok(Ok(body)) => Some(body),
            Ok(Err((e, attempts, label, url))) => {
                tracing::error!(attempts, "{} {} failed: {}", label, url, e);
                None
            }
            Err(e) => {
                tracing::error!("request task join: {}", e);
                None
            }
        }
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Option<u64> {
        let url = url.to_string();
        let dest: PathBuf = dest.to_path_buf();
        let creds = self.credentials.clone();
        let policy = self.policy;
        let opts = self.options;
        let started = Instant::now();

        let joined = tokio::task::spawn_blocking(move || {
            run_with_retry(&policy, "download", |_| download_once(&url, &creds, opts, &dest))
                .map_err(|(e, attempts)| (e, attempts, url, dest))
        })
        .await;

        match joined {
            Ok(Ok(bytes)) => {
                tracing::debug!(
                    bytes,
                    elapsed_secs = started.elapsed().as_secs(),
                    "download finished"
                );
                Some(bytes)
            }
            Ok(Err((e, attempts, url, dest))) => {
                let partial = fs::metadata(&dest).map(|m| m.len()).unwrap_or(0);
                tracing::error!(
                    attempts,
                    partial_bytes = partial,
                    elapsed_secs = started.elapsed().as_secs(),
                    "download {} failed: {}",
                    url,
                    e
                );
                None
            }
            Err(e) => {
                tracing::error!("download task join: {}", e);
                None
            }
        }
    }
}
