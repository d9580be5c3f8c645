use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{trace, warn};
use walkdir::WalkDir;

const ROM_PATTERN: &str = "*.nes";

/// ROM files under `dir`: `*.nes` directly inside it, or at any depth when
/// `recursive`. Directories that happen to match are skipped, and symlinked
/// directories are never descended into.
pub fn candidates(dir: &Path, recursive: bool) -> anyhow::Result<impl Iterator<Item = PathBuf>> {
    let pattern = glob::Pattern::new(ROM_PATTERN)
        .with_context(|| format!("invalid search pattern {}", ROM_PATTERN))?;

    let walk = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .follow_links(false)
        .sort_by_file_name();

    Ok(walk.into_iter().filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("{}, skipping", e);
                return None;
            },
        };
        if !pattern.matches(&entry.file_name().to_string_lossy()) {
            return None;
        }
        // symlinked ROMs count, symlinked directories don't
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            trace!("{}: not a file, skipping", entry.path().display());
            return None;
        }
        Some(entry.into_path())
    }))
}
