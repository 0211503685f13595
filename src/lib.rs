//! # zbasket Core Library
//!
//! This crate groups files into baskets and compresses each basket as a single
//! zstd frame. Similar files (photos from one collection, say) compress better
//! together than one at a time.
//!
//! It is designed to be used by the `zbasket` command-line application, but its public API
//! can also be used to programmatically compress trees and restore baskets.
//!
//! ## Key Modules
//!
//! - [`collect`]: Stable-ordered discovery of regular files, minus excluded names.
//! - [`basket`]: Fixed-count and parent-directory basketing strategies.
//! - [`archive`]: Writes one basket as a `.zst` archive plus a `.txt` manifest.
//! - [`compress`]: Directory runs, explicit baskets and single-file compression.
//! - [`extract`]: Restores basket members from an archive and its manifest.
//! - [`progress`]: Size accounting returned from directory runs.
//!
//! ## Examples
//!
//! ```no_run
//! use zbasket::codec::ZstdCodec;
//! use zbasket::compress::{compress_directory, CompressOptions};
//! use zbasket::basket::BasketStrategy;
//!
//! let options = CompressOptions {
//!     strategy: BasketStrategy::Count(25),
//!     ..CompressOptions::default()
//! };
//! std::fs::create_dir_all(&options.output_dir)?;
//! let report = compress_directory("photos".as_ref(), &options, &ZstdCodec, None)?;
//! println!("{report}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod basket;
pub mod cli;
pub mod cli_runner;
pub mod codec;
pub mod collect;
pub mod common;
pub mod compress;
pub mod error;
pub mod extract;
pub mod progress;

pub use error::{ArchiverError, Result};
