//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` (given the 1-based attempt number) until it succeeds or the
/// policy says to stop. Sleeps the calling thread between attempts.
/// On failure returns the last error together with the number of attempts made.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, label: &str, mut f: F) -> Result<T, (FetchError, u32)>
where
    F: FnMut(u32) -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        tracing::debug!(attempt, "{}: connecting", label);
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        tracing::warn!(attempt, "{}: giving up: {}", label, e);
                        return Err((e, attempt));
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(
                            attempt,
                            wait_secs = d.as_secs(),
                            "{}: attempt failed: {}",
                            label,
                            e
                        );
                        if !d.is_zero() {
                            std::thread::sleep(d);
                        }
                        attempt += 1;
                    }
                }
            }
        }
    }
}
