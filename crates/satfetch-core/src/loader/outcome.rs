//! Per-product results and the run summary.

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// A processed output already exists; nothing fetched.
    AlreadyProcessed,
    /// The raw product is already in the output directory; nothing fetched.
    AlreadyDownloaded,
    /// Download retries exhausted; eligible again next run.
    Unavailable,
    /// Checksum could not be fetched or did not match; payload discarded.
    ChecksumFailed,
    /// Payload verified but could not be placed; nothing left in the output directory.
    UnpackFailed,
    /// Product placed in the output directory under `name`.
    Saved { name: String },
}

impl ProcessOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            ProcessOutcome::AlreadyProcessed | ProcessOutcome::AlreadyDownloaded
        )
    }
}

/// Counts for one `download` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub found: usize,
    pub overcast: usize,
    pub excluded: usize,
    pub already_present: usize,
    pub saved: usize,
    pub failed: usize,
}

impl DownloadReport {
    pub fn record(&mut self, outcome: &ProcessOutcome) {
        match outcome {
            o if o.is_skip() => self.already_present += 1,
            ProcessOutcome::Saved { .. } => self.saved += 1,
            _ => self.failed += 1,
        }
    }
}
