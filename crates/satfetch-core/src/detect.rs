//! Duplicate detection against local folders.
//!
//! A product counts as present only when the folder holds exactly the expected
//! number of entries starting with the match prefix; fewer or more is treated
//! as absent so a partial name collision never suppresses a download.

use std::fs;
use std::path::Path;

use crate::unpack::TEMP_SUFFIX;

/// Which folder is being inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Raw downloads: entries start with the full product name.
    Exact,
    /// Processed outputs: entries start with a fixed-length prefix of the name.
    Cropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectRules {
    /// Characters of the product name kept by the processing step.
    pub cropped_prefix_len: usize,
    /// Products containing this marker yield two processed outputs
    /// (e.g. SLSTR at two resolutions).
    pub dual_output_marker: String,
}

impl Default for DetectRules {
    fn default() -> Self {
        Self {
            cropped_prefix_len: 31,
            dual_output_marker: "_SL_".to_string(),
        }
    }
}

impl DetectRules {
    /// Prefix to match and the number of matching entries required.
    pub fn pattern<'a>(&self, full_name: &'a str, mode: MatchMode) -> (&'a str, usize) {
        match mode {
            MatchMode::Exact => (full_name, 1),
            MatchMode::Cropped => {
                let prefix = char_prefix(full_name, self.cropped_prefix_len);
                let required = if !self.dual_output_marker.is_empty()
                    && full_name.contains(&self.dual_output_marker)
                {
                    2
                } else {
                    1
                };
                (prefix, required)
            }
        }
    }
}

fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// True when `folder` holds exactly the required number of entries for `full_name`.
/// A missing or unreadable folder means "not present".
pub fn is_present(folder: &Path, full_name: &str, mode: MatchMode, rules: &DetectRules) -> bool {
    let (prefix, required) = rules.pattern(full_name, mode);
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("cannot list {}: {}", folder.display(), e);
            return false;
        }
    };

    // `.part` files are unfinished placements, never a finished product.
    let matches = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(prefix) && !name.ends_with(TEMP_SUFFIX)
        })
        .count();

    if matches == required {
        match mode {
            MatchMode::Cropped => tracing::info!(
                "processed version of {} is already in {}",
                full_name,
                folder.display()
            ),
            MatchMode::Exact => tracing::info!(
                "product {} was already downloaded to {}",
                full_name,
                folder.display()
            ),
        }
        return true;
    }
    if matches > 0 {
        tracing::warn!(
            matches,
            required,
            "ambiguous matches for {} in {}; treating as not present",
            full_name,
            folder.display()
        );
    }
    false
}
