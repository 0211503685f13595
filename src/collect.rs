//! File discovery.
//!
//! Walks a tree with `jwalk` and returns regular files in a stable order:
//! depth-first, each directory's entries sorted by filename. The order decides
//! basket composition, so it must not depend on the walker's thread scheduling.

use crate::common::file_name_of;
use crate::error::{ArchiverError, Result};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// True if the base filename exactly matches an exclusion (case-sensitive).
pub fn is_excluded(path: &Path, exclusions: &BTreeSet<String>) -> bool {
    exclusions.contains(&file_name_of(path))
}

/// True for a symlink that resolves to a regular file. Dangling links are false.
fn symlink_targets_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(e) => {
            debug!("Skipping dangling link {}: {e}", path.display());
            false
        }
    }
}

/// Recursively lists every regular file under `root`, minus excluded filenames.
///
/// A symlink counts as a file when its target is a regular file; symlinked
/// directories are not descended into. Hidden files are kept; only the
/// exclusion set filters names.
/// A `root` that is itself a regular file yields just that file.
pub fn collect_files(root: &Path, exclusions: &BTreeSet<String>) -> Result<Vec<PathBuf>> {
    let root_meta = fs::metadata(root).map_err(|e| ArchiverError::InputNotFound {
        source: e,
        path: root.to_path_buf(),
    })?;

    if root_meta.is_file() {
        if is_excluded(root, exclusions) {
            debug!("Excluding {}", root.display());
            return Ok(Vec::new());
        }
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = jwalk::WalkDir::new(root)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false);

    for entry in walker {
        let entry = entry.map_err(|e| ArchiverError::Walk {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            message: e.to_string(),
        })?;
        let path = entry.path();
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            if !symlink_targets_file(&path) {
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }
        if is_excluded(&path, exclusions) {
            debug!("Excluding {}", path.display());
            continue;
        }
        files.push(path);
    }

    Ok(files)
}
