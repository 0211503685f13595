//! Size accounting for directory runs.
//!
//! A [`SizeReport`] is threaded through the run by value and returned at the end;
//! there is no process-wide counter. Each archived basket also produces a
//! [`BasketProgress`] snapshot for logging and for an optional callback.

use crate::common::BasketSizes;

use serde::Serialize;
use std::fmt;

const MIB: f64 = 1024.0 * 1024.0;

/// A basket that was skipped under the continue-on-error policy.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BasketFailure {
    pub index: usize,
    pub members: usize,
    pub error: String,
}

/// Accumulated byte counters for one run.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeReport {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub baskets_written: usize,
    pub files_archived: usize,
    pub failed_baskets: Vec<BasketFailure>,
}

impl SizeReport {
    /// Adds one archived basket. Empty results (everything excluded) only count bytes.
    pub fn record(&mut self, sizes: &BasketSizes) {
        self.original_bytes += sizes.original;
        self.compressed_bytes += sizes.compressed;
        self.files_archived += sizes.members;
        if sizes.members > 0 {
            self.baskets_written += 1;
        }
    }

    pub fn record_failure(&mut self, failure: BasketFailure) {
        self.failed_baskets.push(failure);
    }

    pub fn saved_bytes(&self) -> i64 {
        self.original_bytes as i64 - self.compressed_bytes as i64
    }

    /// Compressed size over original size; 1.0 for an empty run.
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            1.0
        } else {
            self.compressed_bytes as f64 / self.original_bytes as f64
        }
    }
}

/// `"1 basket"`, `"2 baskets"`.
fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {}: {:.2}MB -> {:.2}MB ({:.2}MB saved, ratio {:.3})",
            counted(self.files_archived, "file"),
            counted(self.baskets_written, "basket"),
            self.original_bytes as f64 / MIB,
            self.compressed_bytes as f64 / MIB,
            self.saved_bytes() as f64 / MIB,
            self.ratio(),
        )?;
        if !self.failed_baskets.is_empty() {
            write!(f, ", {} failed", counted(self.failed_baskets.len(), "basket"))?;
        }
        Ok(())
    }
}

/// Snapshot emitted after each archived basket.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketProgress {
    pub index: usize,
    pub total_baskets: usize,
    pub basket: BasketSizes,
    pub total_original: u64,
    pub total_compressed: u64,
}

impl BasketProgress {
    pub fn saved(&self) -> i64 {
        self.basket.saved()
    }

    /// Bytes saved in this basket divided by its member count.
    pub fn saved_per_file(&self) -> f64 {
        if self.basket.members == 0 {
            0.0
        } else {
            self.saved() as f64 / self.basket.members as f64
        }
    }
}

impl fmt::Display for BasketProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}MB -> {:.2}MB ({:.2}MB saved, {:.2}MB per file)",
            self.total_original as f64 / MIB,
            self.total_compressed as f64 / MIB,
            self.saved() as f64 / MIB,
            self.saved_per_file() / MIB,
        )
    }
}

/// Progress callback function type
pub type ProgressCallback<'a> = dyn FnMut(&BasketProgress) + 'a;
