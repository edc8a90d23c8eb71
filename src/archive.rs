//! Container extraction. Jar, war, ear and aar files are all zip archives.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "war", "ear", "aar"];

/// True for an existing, non-empty file with a recognized container
/// extension.
pub fn is_archive_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    if fs::metadata(path).map(|m| m.len()).unwrap_or(0) == 0 {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            ARCHIVE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Unpack an archive into `dest_dir`.
///
/// An invalid or empty archive is logged and skipped rather than failing the
/// whole run. Per-entry write failures are logged and skipped too; entry
/// paths that would escape `dest_dir` are refused.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let len = fs::metadata(archive_path).map(|m| m.len()).unwrap_or(0);
    if len == 0 {
        warn!("archive invalid or empty: {}", archive_path.display());
        return Ok(());
    }

    debug!(
        "extracting {} into {}",
        archive_path.display(),
        dest_dir.display()
    );
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create directory {}", dest_dir.display()))?;

    let file = fs::File::open(archive_path)
        .with_context(|| format!("failed to open archive {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("not a valid archive: {}", archive_path.display()))?;

    let mut extracted = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("failed to read entry {index} of {}", archive_path.display()))?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("skipping entry with unsafe path: {}", entry.name());
            continue;
        };
        let out_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        match fs::File::create(&out_path) {
            Ok(mut out) => match io::copy(&mut entry, &mut out) {
                Ok(_) => extracted += 1,
                Err(e) => warn!("failed to extract {}: {e}", entry.name()),
            },
            Err(e) => warn!("failed to create {}: {e}", out_path.display()),
        }
    }

    debug!(
        "extracted {extracted} files from {}",
        archive_path.display()
    );
    Ok(())
}
