//! Error type for a single request attempt.

use std::fmt;
use std::time::Duration;

/// Error returned by one attempt against a remote endpoint.
/// Classified before the retry decision; converted to a log line once attempts run out.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Transfer ran past the wall-clock cap and was aborted.
    WallClock(Duration),
    /// Writing the body to local storage failed. Not retried.
    Storage(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::WallClock(cap) => {
                write!(f, "transfer exceeded {} s wall-clock cap", cap.as_secs())
            }
            FetchError::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Storage(e) => Some(e),
            FetchError::Http(_) | FetchError::WallClock(_) => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}
