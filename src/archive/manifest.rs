//! Basket manifest: member filenames in concatenation order, one per line.
//!
//! The on-disk form is `names.join("\n")` with no trailing newline. It records
//! names only, not lengths; restore relies on the separator to find boundaries.

use crate::error::{ArchiverError, Result};

use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub names: Vec<String>,
}

impl Manifest {
    /// Builds a manifest, rejecting names that would break the line format.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if let Some(bad) = names.iter().find(|n| n.contains('\n') || n.contains('\r')) {
            return Err(ArchiverError::InvalidMemberName(bad.clone()));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn to_text(&self) -> String {
        self.names.join("\n")
    }

    /// Parses manifest text. An empty document is an empty manifest.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let names = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { names }
    }
}

/// Reads a manifest file from disk.
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let text = fs::read_to_string(path).map_err(|e| ArchiverError::InputNotFound {
        source: e,
        path: path.to_path_buf(),
    })?;
    Ok(Manifest::parse(&text))
}
