//! Moving a verified payload into the output directory.
//!
//! Nothing appears under its final name until it is complete: single files
//! go through a `.part` sibling and a rename, archives are extracted into a
//! hidden staging directory whose top-level entries are then renamed into place.

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `x.nc` → `x.nc.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Copy a single-file product to `{output_dir}/{full_name}.nc`.
pub fn copy_single(src: &Path, output_dir: &Path, full_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let dest = output_dir.join(format!("{full_name}.nc"));
    let part = temp_path(&dest);
    let placed = fs::copy(src, &part)
        .with_context(|| format!("copy {} to {}", src.display(), part.display()))
        .and_then(|_| {
            fs::rename(&part, &dest).with_context(|| format!("rename to {}", dest.display()))
        });
    if let Err(e) = placed {
        discard(&part);
        return Err(e);
    }
    Ok(dest)
}

fn discard(path: &Path) {
    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match removed {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("could not remove {}: {}", path.display(), e),
    }
}

/// Extract a zip archive into `output_dir` and return the name of its
/// top-level entry (the product folder, without trailing separator).
pub fn extract_archive(archive: &Path, output_dir: &Path, staging_tag: &str) -> Result<String> {
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).context("read zip archive")?;
    if zip.len() == 0 {
        bail!("archive {} is empty", archive.display());
    }
    let top = top_level_name(zip.by_index(0)?.name());

    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let staging = output_dir.join(format!(".satfetch-unpack-{staging_tag}"));
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    let result = extract_into(&mut zip, &staging).and_then(|()| promote(&staging, output_dir));
    if let Err(e) = fs::remove_dir_all(&staging) {
        tracing::warn!("could not remove staging dir {}: {}", staging.display(), e);
    }
    result?;
    Ok(top)
}

fn top_level_name(entry_name: &str) -> String {
    entry_name
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn extract_into<R: io::Read + io::Seek>(zip: &mut ZipArchive<R>, staging: &Path) -> Result<()> {
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(rel) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            bail!("refusing archive entry outside target: {}", entry.name());
        };
        let out = staging.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut f = File::create(&out).with_context(|| format!("create {}", out.display()))?;
        io::copy(&mut entry, &mut f).with_context(|| format!("write {}", out.display()))?;
    }
    Ok(())
}

/// Rename each top-level entry of `staging` into `output_dir`, replacing stale copies.
/// On failure every entry already promoted by this call is removed again.
fn promote(staging: &Path, output_dir: &Path) -> Result<()> {
    let mut promoted: Vec<PathBuf> = Vec::new();
    let result = promote_each(staging, output_dir, &mut promoted);
    if result.is_err() {
        for dest in &promoted {
            discard(dest);
        }
    }
    result
}

fn promote_each(staging: &Path, output_dir: &Path, promoted: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(staging)? {
        let entry = entry?;
        let dest = output_dir.join(entry.file_name());
        discard(&dest);
        fs::rename(entry.path(), &dest)
            .with_context(|| format!("rename to {}", dest.display()))?;
        promoted.push(dest);
    }
    Ok(())
}
