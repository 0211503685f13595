//! # Compression Pipeline
//!
//! This module drives basket compression for `zbasket`.
//!
//! ## Key Features:
//! - **Directory runs**: collect every file under a root, split the list into
//!   baskets, archive each basket under its index, and report the savings.
//! - **Explicit baskets**: archive a caller-chosen list of files under one name.
//! - **Single files**: compress one file on its own, named after its parent directory.

use crate::archive::{archive_basket, write_atomic};
use crate::basket::BasketStrategy;
use crate::codec::Codec;
use crate::collect::collect_files;
use crate::common::{
    parent_name_of, BasketSizes, DEFAULT_BASKET_SIZE, DEFAULT_EXCLUSIONS,
    DEFAULT_LEVEL, DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX, DEFAULT_SEPARATOR, PARENT_DELIMITER,
};
use crate::error::{ArchiverError, Result};
use crate::progress::{BasketFailure, BasketProgress, ProgressCallback, SizeReport};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a directory run does when one basket fails on its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Log the failure, leave the basket's bytes out of the totals and go on.
    /// Output write failures still end the run.
    Continue,
}

/// Holds all configuration options for a compression operation.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// The compression level. Archival runs favour ratio over speed.
    pub level: i32,
    /// How files are split into baskets.
    ///
    /// Basket size is a tuning knob. Measured on four photo sets, 25 files per
    /// basket saved more per file than 100 or a single unbounded basket.
    pub strategy: BasketStrategy,
    /// Exact filenames that never enter a basket.
    pub exclusions: BTreeSet<String>,
    /// Token inserted between consecutive member bodies.
    pub separator: Vec<u8>,
    /// Directory that receives archives and manifests. Must exist.
    pub output_dir: PathBuf,
    /// Stem prefix for directory runs; empty means no prefix.
    pub prefix: String,
    pub on_basket_error: FailurePolicy,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            strategy: BasketStrategy::Count(DEFAULT_BASKET_SIZE),
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            separator: DEFAULT_SEPARATOR.to_vec(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            on_basket_error: FailurePolicy::Abort,
        }
    }
}

impl CompressOptions {
    /// Checks every tuning value without touching the filesystem.
    pub fn validate(&self, codec: &dyn Codec) -> Result<()> {
        self.strategy.validate()?;
        let range = codec.level_range();
        if !range.contains(&self.level) {
            return Err(ArchiverError::Configuration(format!(
                "compression level {} outside {}..={}",
                self.level,
                range.start(),
                range.end()
            )));
        }
        if self.separator.is_empty() {
            return Err(ArchiverError::Configuration("separator must not be empty".into()));
        }
        Ok(())
    }
}

/// Compresses one file to `{output_dir}/{parent}__{filename}.{ext}`.
pub fn compress_file(path: &Path, options: &CompressOptions, codec: &dyn Codec) -> Result<BasketSizes> {
    options.validate(codec)?;
    let data = fs::read(path).map_err(|e| ArchiverError::InputNotFound {
        source: e,
        path: path.to_path_buf(),
    })?;
    let compressed = codec.compress(&data, options.level)?;

    let mut target_name = parent_name_of(path);
    target_name.push(PARENT_DELIMITER);
    target_name.push(path.file_name().unwrap_or_default());
    target_name.push(".");
    target_name.push(codec.extension());
    let target = options.output_dir.join(target_name);
    write_atomic(&target, &compressed)?;
    info!(
        "{} -> {} ({} -> {} bytes)",
        path.display(),
        target.display(),
        data.len(),
        compressed.len()
    );

    Ok(BasketSizes {
        compressed: compressed.len() as u64,
        original: data.len() as u64,
        members: 1,
    })
}

/// Archives an explicit list of files as one basket named `name`.
pub fn compress_basket_files(
    files: &[PathBuf],
    name: &str,
    prefix: &str,
    options: &CompressOptions,
    codec: &dyn Codec,
) -> Result<BasketSizes> {
    options.validate(codec)?;
    let sizes = archive_basket(files, name, prefix, options, codec)?;
    info!(
        "Basket {} ({} files): {} -> {} bytes",
        name, sizes.members, sizes.original, sizes.compressed
    );
    Ok(sizes)
}

/// Compresses a whole tree basket by basket and returns the accumulated sizes.
///
/// Baskets are named by their index (`0`, `1`, ...) under `options.prefix`. The
/// strategy is validated before the tree is walked. After each basket the running
/// totals are logged and handed to `progress`, if given.
pub fn compress_directory(
    root: &Path,
    options: &CompressOptions,
    codec: &dyn Codec,
    mut progress: Option<&mut ProgressCallback<'_>>,
) -> Result<SizeReport> {
    options.validate(codec)?;

    let files = collect_files(root, &options.exclusions)?;
    let baskets = options.strategy.apply(&files)?;
    info!(
        "Collected {} files under {} into {} baskets",
        files.len(),
        root.display(),
        baskets.len()
    );

    let mut report = SizeReport::default();
    for (index, basket) in baskets.iter().enumerate() {
        let name = index.to_string();
        let sizes = match archive_basket(basket, &name, &options.prefix, options, codec) {
            Ok(sizes) => sizes,
            Err(e) if options.on_basket_error == FailurePolicy::Continue && e.is_basket_local() => {
                warn!("Skipping basket {index} ({} files): {e}", basket.len());
                report.record_failure(BasketFailure {
                    index,
                    members: basket.len(),
                    error: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };
        report.record(&sizes);

        let snapshot = BasketProgress {
            index,
            total_baskets: baskets.len(),
            basket: sizes,
            total_original: report.original_bytes,
            total_compressed: report.compressed_bytes,
        };
        info!("{snapshot}");
        if let Some(cb) = progress.as_deref_mut() {
            cb(&snapshot);
        }
    }

    Ok(report)
}
