use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/idle, or the download wall-clock cap).
    Timeout,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// The provider answered with a non-success status.
    Status(u16),
    /// Local write failure; retrying the network will not help.
    Storage,
    /// Any other transport error.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay (zero means immediately).
    RetryAfter(Duration),
}

/// Bounded-attempt policy with a cooldown after provider refusals.
///
/// Transport failures are retried immediately; a non-success status waits
/// `cooldown` first, since it usually means rate limiting or maintenance.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Wait after a non-success status.
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            cooldown: Duration::from_secs(1800),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based (1 = first attempt). Returns `RetryDecision::NoRetry`
    /// when we should stop retrying.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Storage => RetryDecision::NoRetry,
            ErrorKind::Status(_) => RetryDecision::RetryAfter(self.cooldown),
            ErrorKind::Timeout | ErrorKind::Connection | ErrorKind::Other => {
                RetryDecision::RetryAfter(Duration::ZERO)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_waits_for_cooldown() {
        let p = RetryPolicy::default();
        assert_eq!(
            p.decide(1, ErrorKind::Status(503)),
            RetryDecision::RetryAfter(Duration::from_secs(1800))
        );
    }

    #[test]
    fn transport_errors_retry_immediately() {
        let p = RetryPolicy::default();
        for kind in [ErrorKind::Timeout, ErrorKind::Connection, ErrorKind::Other] {
            assert_eq!(p.decide(1, kind), RetryDecision::RetryAfter(Duration::ZERO));
        }
    }

    #[test]
    fn storage_never_retried() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Storage), RetryDecision::NoRetry);
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryPolicy {
            max_attempts: 3,
            cooldown: Duration::ZERO,
        };
        assert!(matches!(
            p.decide(1, ErrorKind::Timeout),
            RetryDecision::RetryAfter(_)
        ));
        assert!(matches!(
            p.decide(2, ErrorKind::Status(500)),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(p.decide(3, ErrorKind::Timeout), RetryDecision::NoRetry);
    }
}
