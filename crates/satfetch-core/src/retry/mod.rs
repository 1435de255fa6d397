//! Retry policy for remote requests.
//!
//! Classifies failures (transport errors, non-success statuses, the download
//! wall-clock cap) and decides whether and when to try again, so the search
//! engine, checksum fetch and product download share one policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
