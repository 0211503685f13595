//! # Extraction Module
//!
//! Restores the members of a basket archive. The archive is decompressed in one
//! go, split on the separator token, and matched piece by piece against the
//! sibling manifest. The token is not escaped inside member bodies. A member that
//! happens to contain it changes the piece count and is reported as a mismatch.
//! A collision that leaves the count intact cannot be detected this way.

use crate::archive::{read_manifest, BasketPaths, Manifest};
use crate::codec::Codec;
use crate::compress::CompressOptions;
use crate::error::{ArchiverError, Result};

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Splits `data` on every non-overlapping occurrence of `separator`, left to right.
pub fn split_members<'a>(data: &'a [u8], separator: &[u8]) -> Vec<&'a [u8]> {
    let mut pieces = Vec::new();
    if separator.is_empty() {
        pieces.push(data);
        return pieces;
    }
    let mut start = 0;
    let mut i = 0;
    while i + separator.len() <= data.len() {
        if &data[i..i + separator.len()] == separator {
            pieces.push(&data[start..i]);
            i += separator.len();
            start = i;
        } else {
            i += 1;
        }
    }
    pieces.push(&data[start..]);
    pieces
}

/// Resolves the manifest for an archive path, or accepts a manifest path as-is.
pub fn manifest_path_for(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|e| e == "txt") {
        path.to_path_buf()
    } else {
        BasketPaths::manifest_for(path)
    }
}

/// Reads the manifest belonging to an archive (or a manifest path directly).
pub fn list_basket(path: &Path) -> Result<Manifest> {
    read_manifest(&manifest_path_for(path))
}

fn check_member_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ArchiverError::InvalidMemberName(name.to_string())),
    }
}

/// Output filenames for a manifest, all distinct.
///
/// A repeated name becomes `{name}.{n}` with the smallest `n` that neither
/// another generated name nor any real manifest name already uses.
fn target_names(manifest: &Manifest) -> Vec<String> {
    let reserved: HashSet<&str> = manifest.names.iter().map(String::as_str).collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(manifest.len());

    for name in &manifest.names {
        let chosen = if taken.contains(name) {
            let mut n = 1;
            loop {
                let candidate = format!("{name}.{n}");
                if !taken.contains(&candidate) && !reserved.contains(candidate.as_str()) {
                    break candidate;
                }
                n += 1;
            }
        } else {
            name.clone()
        };
        taken.insert(chosen.clone());
        out.push(chosen);
    }
    out
}

/// Restores every member of `archive_path` into `out_dir` and returns the written paths.
///
/// Nothing is written unless the blob splits into exactly as many pieces as the
/// manifest lists and every manifest name is a plain filename.
pub fn restore_basket(
    archive_path: &Path,
    out_dir: &Path,
    options: &CompressOptions,
    codec: &dyn Codec,
) -> Result<Vec<PathBuf>> {
    let manifest = read_manifest(&BasketPaths::manifest_for(archive_path))?;
    for name in &manifest.names {
        check_member_name(name)?;
    }

    let packed = fs::read(archive_path).map_err(|e| ArchiverError::InputNotFound {
        source: e,
        path: archive_path.to_path_buf(),
    })?;
    let blob = codec.decompress(&packed)?;

    let pieces = if manifest.is_empty() && blob.is_empty() {
        Vec::new()
    } else {
        split_members(&blob, &options.separator)
    };
    if pieces.len() != manifest.len() {
        return Err(ArchiverError::SeparatorMismatch {
            expected: manifest.len(),
            found: pieces.len(),
        });
    }

    fs::create_dir_all(out_dir).map_err(|e| ArchiverError::OutputWrite {
        source: e,
        path: out_dir.to_path_buf(),
    })?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(pieces.len());
    for (name, body) in target_names(&manifest).iter().zip(pieces) {
        let target = out_dir.join(name);
        if written.contains(&target) {
            return Err(ArchiverError::InvalidMemberName(name.clone()));
        }
        fs::write(&target, body).map_err(|e| ArchiverError::OutputWrite {
            source: e,
            path: target.clone(),
        })?;
        debug!("Restored {} ({} bytes)", target.display(), body.len());
        written.push(target);
    }
    info!("Restored {} files from {}", written.len(), archive_path.display());
    Ok(written)
}
