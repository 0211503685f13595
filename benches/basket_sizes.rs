// benches/basket_sizes.rs
//
// Compares total savings for several basket sizes on a synthetic "photo set":
// files in the same album share most of their bytes, albums differ from each other.
// Point ZBASKET_BENCH_DATASET at a real directory to measure that instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tempfile::tempdir;
use zbasket::basket::BasketStrategy;
use zbasket::codec::ZstdCodec;
use zbasket::compress::{compress_directory, CompressOptions};

const ALBUMS: usize = 8;
const PHOTOS_PER_ALBUM: usize = 30;
const PHOTO_SIZE: usize = 64 * 1024;
const LEVEL: i32 = 9;

struct BenchResult {
    label: String,
    original: u64,
    compressed: u64,
    files: usize,
    elapsed: Duration,
}

fn build_dataset(root: &Path) -> io::Result<()> {
    let mut rng = StdRng::seed_from_u64(25);
    for album in 0..ALBUMS {
        let dir = root.join(format!("album_{album:02}"));
        fs::create_dir_all(&dir)?;
        let mut base = vec![0u8; PHOTO_SIZE];
        rng.fill(&mut base[..]);
        for photo in 0..PHOTOS_PER_ALBUM {
            let mut data = base.clone();
            // Perturb ~5% of the bytes so photos are similar, not identical.
            for _ in 0..PHOTO_SIZE / 20 {
                let at = rng.gen_range(0..PHOTO_SIZE);
                data[at] = rng.gen();
            }
            fs::write(dir.join(format!("IMG_{photo:04}.raw")), data)?;
        }
    }
    Ok(())
}

fn run(root: &Path, label: &str, strategy: BasketStrategy) -> Result<BenchResult, Box<dyn std::error::Error>> {
    let out = tempdir()?;
    let options = CompressOptions {
        level: LEVEL,
        strategy,
        output_dir: out.path().to_path_buf(),
        ..CompressOptions::default()
    };
    let start = Instant::now();
    let report = compress_directory(root, &options, &ZstdCodec, None)?;
    Ok(BenchResult {
        label: label.to_string(),
        original: report.original_bytes,
        compressed: report.compressed_bytes,
        files: report.files_archived,
        elapsed: start.elapsed(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Basket size comparison ---");

    let synthetic = tempdir()?;
    let root: PathBuf = match std::env::var_os("ZBASKET_BENCH_DATASET") {
        Some(p) => p.into(),
        None => {
            build_dataset(synthetic.path())?;
            synthetic.path().to_path_buf()
        }
    };
    println!("Source dataset: {}\n", root.display());

    let profiles = [
        ("1 per basket", BasketStrategy::Count(1)),
        ("10 per basket", BasketStrategy::Count(10)),
        ("25 per basket", BasketStrategy::Count(25)),
        ("100 per basket", BasketStrategy::Count(100)),
        ("by parent dir", BasketStrategy::ParentName),
    ];

    let mut results = Vec::new();
    for (label, strategy) in profiles {
        results.push(run(&root, label, strategy)?);
    }

    println!(
        "{:<16} | {:>12} | {:>12} | {:>14} | {:>8}",
        "Profile", "Original", "Compressed", "Saved/file KB", "Time"
    );
    println!("{}", "-".repeat(74));
    for r in results {
        let saved_per_file = if r.files == 0 {
            0.0
        } else {
            (r.original as f64 - r.compressed as f64) / r.files as f64 / 1024.0
        };
        println!(
            "{:<16} | {:>12} | {:>12} | {:>14.2} | {:>7.2}s",
            r.label,
            r.original,
            r.compressed,
            saved_per_file,
            r.elapsed.as_secs_f64()
        );
    }
    Ok(())
}
