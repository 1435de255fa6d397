//! MD5 digests for payload verification.
//!
//! Providers publish an MD5 per product; the payload is hashed from the
//! staged file in chunks so large archives never sit in memory.

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// MD5 of an in-memory buffer as lowercase hex.
pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

/// Compute MD5 of a file and return the digest as lowercase hex.
pub fn md5_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compare a computed digest with the provider's answer (trimmed, case-insensitive).
pub fn digests_match(actual: &str, expected: &str) -> bool {
    let expected = expected.trim();
    !expected.is_empty() && actual.trim().eq_ignore_ascii_case(expected)
}
