//! Common utilities and types module.
// Shared structs, constants and small path helpers.

use crate::error::{ArchiverError, Result};

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Filenames that never enter a basket (filesystem metadata artifacts).
pub const DEFAULT_EXCLUSIONS: &[&str] = &[".DS_Store"];

/// Files per basket when grouping by count.
pub const DEFAULT_BASKET_SIZE: usize = 100;

/// Zstandard level for the archival write-once workload.
pub const DEFAULT_LEVEL: i32 = 20;

/// Token inserted literally between consecutive member bodies.
pub const DEFAULT_SEPARATOR: &[u8] = b"-----FILE_SEPARATOR-----";

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Stem prefix used by directory runs.
pub const DEFAULT_PREFIX: &str = "100basket";

/// Joins a non-empty prefix to an archive name.
pub const PREFIX_DELIMITER: &str = "____";

/// Joins the parent directory name to the filename for single-file outputs.
pub const PARENT_DELIMITER: &str = "__";

/// An ordered group of files compressed as one unit. Order decides the
/// concatenation order and the manifest order.
pub type Basket = Vec<PathBuf>;

/// Byte counts for one archived basket (or one single-file archive).
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasketSizes {
    pub compressed: u64,
    pub original: u64,
    /// Members whose bytes were actually concatenated.
    pub members: usize,
}

impl BasketSizes {
    /// Bytes saved by compression. Negative when the output grew.
    pub fn saved(&self) -> i64 {
        self.original as i64 - self.compressed as i64
    }
}

/// Base filename as a string, or an empty string for paths like `/` or `..`.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Base filename exactly as recorded in a manifest.
///
/// Names that are not valid UTF-8 are rejected rather than rewritten, so the
/// manifest never lists a name that differs from the file on disk.
pub fn member_name_of(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .ok_or_else(|| ArchiverError::InvalidMemberName(path.display().to_string()))?;
    name.to_str()
        .map(str::to_string)
        .ok_or_else(|| ArchiverError::InvalidMemberName(name.to_string_lossy().into_owned()))
}

/// Name of the immediate containing directory, or an empty name.
pub fn parent_name_of(path: &Path) -> OsString {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_os_string())
        .unwrap_or_default()
}

/// Stem shared by a basket's archive and manifest.
pub fn archive_stem(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{PREFIX_DELIMITER}{name}")
    }
}
