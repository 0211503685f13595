//! # Basket Archives
//!
//! A basket archive is a pair of files sharing one stem inside the output directory:
//!
//! - `{stem}.zst`: one compressed frame holding every member's bytes, joined by
//!   the separator token;
//! - `{stem}.txt`: the [`Manifest`], member filenames in the same order.
//!
//! The pair is written through temporary files in the output directory and only
//! renamed into place once both are complete, so a failed basket never leaves a
//! manifest that names bytes the archive does not hold.

pub mod manifest;

pub use manifest::{read_manifest, Manifest};

use crate::codec::Codec;
use crate::collect::is_excluded;
use crate::common::{archive_stem, member_name_of, BasketSizes};
use crate::compress::CompressOptions;
use crate::error::{ArchiverError, Result};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Final locations of one basket's archive and manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketPaths {
    pub archive: PathBuf,
    pub manifest: PathBuf,
}

impl BasketPaths {
    pub fn new(output_dir: &Path, prefix: &str, name: &str, extension: &str) -> Self {
        let stem = archive_stem(prefix, name);
        Self {
            archive: output_dir.join(format!("{stem}.{extension}")),
            manifest: output_dir.join(format!("{stem}.txt")),
        }
    }

    /// Manifest that sits next to a given archive file.
    pub fn manifest_for(archive: &Path) -> PathBuf {
        archive.with_extension("txt")
    }
}

/// Joins member bodies with `separator` between consecutive members.
pub fn concatenate(bodies: &[Vec<u8>], separator: &[u8]) -> Vec<u8> {
    let total = bodies.iter().map(Vec::len).sum::<usize>()
        + separator.len() * bodies.len().saturating_sub(1);
    let mut out = Vec::with_capacity(total);
    for (i, body) in bodies.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(separator);
        }
        out.extend_from_slice(body);
    }
    out
}

/// Archives one basket under `{prefix}____{name}` (or just `{name}` without a prefix).
///
/// Every member is read before anything is written; one unreadable member fails
/// the whole basket with no output. Members whose filename is excluded are dropped
/// from both the archive and the manifest. A basket left empty by exclusions writes
/// nothing and reports zero sizes.
pub fn archive_basket(
    basket: &[PathBuf],
    name: &str,
    prefix: &str,
    options: &CompressOptions,
    codec: &dyn Codec,
) -> Result<BasketSizes> {
    let members: Vec<&PathBuf> = basket
        .iter()
        .filter(|p| {
            let excluded = is_excluded(p, &options.exclusions);
            if excluded {
                debug!("Dropping excluded member {}", p.display());
            }
            !excluded
        })
        .collect();

    if members.is_empty() {
        debug!("Basket {} has no members left, nothing written", archive_stem(prefix, name));
        return Ok(BasketSizes::default());
    }

    let names = members
        .iter()
        .map(|p| member_name_of(p))
        .collect::<Result<Vec<_>>>()?;
    let manifest = Manifest::new(names)?;

    let mut bodies = Vec::with_capacity(members.len());
    for path in &members {
        let data = fs::read(path).map_err(|e| ArchiverError::InputNotFound {
            source: e,
            path: path.to_path_buf(),
        })?;
        bodies.push(data);
    }
    let original: u64 = bodies.iter().map(|b| b.len() as u64).sum();

    let combined = concatenate(&bodies, &options.separator);
    drop(bodies);
    let compressed = codec.compress(&combined, options.level)?;

    let paths = BasketPaths::new(&options.output_dir, prefix, name, codec.extension());
    write_pair(&paths, &compressed, manifest.to_text().as_bytes())?;
    debug!(
        "Wrote {} ({} members, {} -> {} bytes)",
        paths.archive.display(),
        manifest.len(),
        original,
        compressed.len()
    );

    Ok(BasketSizes {
        compressed: compressed.len() as u64,
        original,
        members: manifest.len(),
    })
}

/// Writes `data` to `target` through a temporary file in the same directory.
pub(crate) fn write_atomic(target: &Path, data: &[u8]) -> Result<()> {
    let tmp = stage(target, data)?;
    tmp.persist(target).map_err(|e| ArchiverError::OutputWrite {
        source: e.error,
        path: target.to_path_buf(),
    })?;
    Ok(())
}

fn stage(target: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let out_err = |e| ArchiverError::OutputWrite { source: e, path: target.to_path_buf() };
    let mut tmp = NamedTempFile::new_in(dir).map_err(out_err)?;
    tmp.write_all(data).map_err(out_err)?;
    tmp.as_file().sync_all().map_err(out_err)?;
    Ok(tmp)
}

/// Stages both files, then renames them into place. If the second rename fails
/// the new archive and any manifest left by an earlier run are both removed, so
/// the output never holds one half of a pair.
fn write_pair(paths: &BasketPaths, archive: &[u8], manifest: &[u8]) -> Result<()> {
    let archive_tmp = stage(&paths.archive, archive)?;
    let manifest_tmp = stage(&paths.manifest, manifest)?;

    archive_tmp.persist(&paths.archive).map_err(|e| ArchiverError::OutputWrite {
        source: e.error,
        path: paths.archive.clone(),
    })?;
    if let Err(e) = manifest_tmp.persist(&paths.manifest) {
        warn!("Manifest rename failed, removing {}", paths.archive.display());
        let _ = fs::remove_file(&paths.archive);
        if paths.manifest.is_file() {
            let _ = fs::remove_file(&paths.manifest);
        }
        return Err(ArchiverError::OutputWrite {
            source: e.error,
            path: paths.manifest.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ZstdCodec;
    use tempfile::tempdir;

    fn options_into(out: &Path) -> CompressOptions {
        CompressOptions {
            output_dir: out.to_path_buf(),
            level: 3,
            ..CompressOptions::default()
        }
    }

    #[test]
    fn concatenate_puts_separator_between_members_only() {
        let joined = concatenate(&[b"ab".to_vec(), b"".to_vec(), b"c".to_vec()], b"|");
        assert_eq!(joined, b"ab||c");
        assert_eq!(concatenate(&[b"solo".to_vec()], b"|"), b"solo");
        assert!(concatenate(&[], b"|").is_empty());
    }

    #[test]
    fn paths_follow_naming_rule() {
        let p = BasketPaths::new(Path::new("output"), "100basket", "0", "zst");
        assert_eq!(p.archive, Path::new("output/100basket____0.zst"));
        assert_eq!(p.manifest, Path::new("output/100basket____0.txt"));
        let p = BasketPaths::new(Path::new("output"), "", "3", "zst");
        assert_eq!(p.archive, Path::new("output/3.zst"));
        assert_eq!(BasketPaths::manifest_for(&p.archive), Path::new("output/3.txt"));
    }

    #[test]
    fn archive_writes_pair_and_counts_bytes() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let a = src.path().join("a.bin");
        let b = src.path().join("b.bin");
        fs::write(&a, vec![7u8; 1000]).unwrap();
        fs::write(&b, vec![9u8; 500]).unwrap();

        let sizes = archive_basket(&[a, b], "0", "test", &options_into(out.path()), &ZstdCodec).unwrap();
        assert_eq!(sizes.original, 1500);
        assert_eq!(sizes.members, 2);

        let archive = out.path().join("test____0.zst");
        assert_eq!(fs::metadata(&archive).unwrap().len(), sizes.compressed);
        assert_eq!(fs::read_to_string(out.path().join("test____0.txt")).unwrap(), "a.bin\nb.bin");

        let blob = ZstdCodec.decompress(&fs::read(&archive).unwrap()).unwrap();
        let mut expected = vec![7u8; 1000];
        expected.extend_from_slice(crate::common::DEFAULT_SEPARATOR);
        expected.extend_from_slice(&[9u8; 500]);
        assert_eq!(blob, expected);
    }

    #[test]
    fn excluded_member_is_left_out_everywhere() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let a = src.path().join("a.jpg");
        let junk = src.path().join(".DS_Store");
        fs::write(&a, b"photo").unwrap();
        fs::write(&junk, vec![0u8; 6148]).unwrap();

        let sizes = archive_basket(&[a, junk], "1", "", &options_into(out.path()), &ZstdCodec).unwrap();
        assert_eq!(sizes.original, 5);
        assert_eq!(sizes.members, 1);
        assert_eq!(fs::read_to_string(out.path().join("1.txt")).unwrap(), "a.jpg");
    }

    #[test]
    fn missing_member_writes_nothing() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let a = src.path().join("a.jpg");
        fs::write(&a, b"photo").unwrap();
        let gone = src.path().join("gone.jpg");

        let err = archive_basket(&[a, gone], "0", "p", &options_into(out.path()), &ZstdCodec).unwrap_err();
        assert!(matches!(err, ArchiverError::InputNotFound { .. }));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_output_dir_is_output_write() {
        let src = tempdir().unwrap();
        let a = src.path().join("a.jpg");
        fs::write(&a, b"photo").unwrap();
        let opts = options_into(&src.path().join("no_such_dir"));

        let err = archive_basket(&[a], "0", "", &opts, &ZstdCodec).unwrap_err();
        assert!(matches!(err, ArchiverError::OutputWrite { .. }));
    }

    #[test]
    fn rerun_overwrites_same_pair() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let a = src.path().join("a.txt");
        let b = src.path().join("b.txt");
        fs::write(&a, b"first").unwrap();
        fs::write(&b, b"second").unwrap();
        let opts = options_into(out.path());

        archive_basket(&[a.clone(), b], "0", "x", &opts, &ZstdCodec).unwrap();
        archive_basket(&[a], "0", "x", &opts, &ZstdCodec).unwrap();

        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 2);
        assert_eq!(fs::read_to_string(out.path().join("x____0.txt")).unwrap(), "a.txt");
    }

    #[cfg(unix)]
    #[test]
    fn failed_manifest_rename_leaves_no_half_pair() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let a = src.path().join("a.txt");
        fs::write(&a, b"first").unwrap();
        let opts = options_into(out.path());

        archive_basket(&[a.clone()], "0", "x", &opts, &ZstdCodec).unwrap();
        // A non-empty directory where the manifest goes makes the rename fail.
        let manifest = out.path().join("x____0.txt");
        fs::remove_file(&manifest).unwrap();
        fs::create_dir(&manifest).unwrap();
        fs::write(manifest.join("keep"), b"k").unwrap();

        let err = archive_basket(&[a], "0", "x", &opts, &ZstdCodec).unwrap_err();
        assert!(matches!(err, ArchiverError::OutputWrite { ref path, .. } if *path == manifest));
        assert!(!out.path().join("x____0.zst").exists());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_member_is_invalid_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let out = tempdir().unwrap();
        let odd = PathBuf::from(OsStr::from_bytes(b"/photos/caf\xE9.jpg"));
        let err = archive_basket(&[odd], "0", "", &options_into(out.path()), &ZstdCodec).unwrap_err();
        assert!(matches!(err, ArchiverError::InvalidMemberName(_)));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn all_excluded_basket_writes_nothing() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let junk = src.path().join(".DS_Store");
        fs::write(&junk, b"x").unwrap();

        let sizes = archive_basket(&[junk], "0", "", &options_into(out.path()), &ZstdCodec).unwrap();
        assert_eq!(sizes, BasketSizes::default());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
