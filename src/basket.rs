//! Basketing strategies.
//!
//! Both strategies are pure functions over an ordered path list. They never
//! reorder paths, so the collector's ordering carries straight into the manifests.

use crate::common::{parent_name_of, Basket};
use crate::error::{ArchiverError, Result};

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// How a directory run splits its files into baskets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasketStrategy {
    /// N consecutive files per basket; the last one may be shorter.
    Count(usize),
    /// One basket per distinct parent-directory name.
    ParentName,
}

impl BasketStrategy {
    /// Rejects a zero basket size before any I/O is attempted.
    pub fn validate(&self) -> Result<()> {
        match self {
            BasketStrategy::Count(0) => Err(ArchiverError::Configuration(
                "basket size must be at least 1".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn apply(&self, paths: &[PathBuf]) -> Result<Vec<Basket>> {
        match *self {
            BasketStrategy::Count(size) => by_count(paths, size),
            BasketStrategy::ParentName => Ok(by_parent_name(paths)),
        }
    }
}

/// Splits `paths` into `ceil(len / basket_size)` consecutive slices.
pub fn by_count(paths: &[PathBuf], basket_size: usize) -> Result<Vec<Basket>> {
    BasketStrategy::Count(basket_size).validate()?;
    Ok(paths.chunks(basket_size).map(<[PathBuf]>::to_vec).collect())
}

/// Groups paths by the name of their immediate parent directory.
///
/// Keys appear in first-seen order; within a group paths keep their input order.
/// Different directories that share a leaf name end up in the same basket.
pub fn by_parent_name(paths: &[PathBuf]) -> Vec<Basket> {
    let mut slots: HashMap<OsString, usize> = HashMap::new();
    let mut baskets: Vec<Basket> = Vec::new();

    for path in paths {
        let key = parent_name_of(path);
        let slot = *slots.entry(key).or_insert_with(|| {
            baskets.push(Vec::new());
            baskets.len() - 1
        });
        baskets[slot].push(path.clone());
    }

    baskets
}
