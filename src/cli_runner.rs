//! CLI runner shared by the `zbasket` binary and the integration tests.
//!
//! Maps parsed arguments onto [`CompressOptions`] and calls into the library.

use crate::cli::{self, Args, Commands};
use crate::codec::ZstdCodec;
use crate::compress::{self, CompressOptions, FailurePolicy};
use crate::extract;

use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::Level;

/// Public entry for running CLI logic.
pub fn run_cli_app() -> anyhow::Result<()> {
    let args = cli::run();
    init_logging(args.verbose);
    execute(args)
}

/// Installs the stderr fmt subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Validates `options`, then creates their output directory. Nothing touches
/// the filesystem until every tuning value has been accepted.
fn prepare_output(options: &CompressOptions, codec: &ZstdCodec) -> anyhow::Result<()> {
    options.validate(codec)?;
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("cannot create output directory {}", options.output_dir.display()))?;
    Ok(())
}

/// Runs one parsed command.
pub fn execute(args: Args) -> anyhow::Result<()> {
    let codec = ZstdCodec;

    match args.command {
        Commands::File { file, output, level } => {
            let options = CompressOptions {
                level,
                output_dir: cli::get_output_dir_from_opt_or_env(output),
                ..CompressOptions::default()
            };
            prepare_output(&options, &codec)?;
            let sizes = compress::compress_file(&file, &options, &codec)?;
            println!("{} -> {} bytes", sizes.original, sizes.compressed);
        }
        Commands::Basket { files, name, prefix, output, level } => {
            let options = CompressOptions {
                level,
                output_dir: cli::get_output_dir_from_opt_or_env(output),
                prefix: prefix.clone(),
                ..CompressOptions::default()
            };
            prepare_output(&options, &codec)?;
            let sizes = compress::compress_basket_files(&files, &name, &prefix, &options, &codec)?;
            println!("{} files: {} -> {} bytes", sizes.members, sizes.original, sizes.compressed);
        }
        Commands::Dir { root, basket_size, strategy, prefix, output, level, keep_going, json } => {
            let options = CompressOptions {
                level,
                strategy: strategy.to_strategy(basket_size),
                prefix,
                output_dir: cli::get_output_dir_from_opt_or_env(output),
                on_basket_error: if keep_going { FailurePolicy::Continue } else { FailurePolicy::Abort },
                ..CompressOptions::default()
            };
            prepare_output(&options, &codec)?;
            let report = compress::compress_directory(&root, &options, &codec, None)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        Commands::Restore { archive, to } => {
            let out_dir = to.unwrap_or_else(|| Path::new(".").to_path_buf());
            let written = extract::restore_basket(&archive, &out_dir, &CompressOptions::default(), &codec)?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Commands::List { archive } => {
            let manifest = extract::list_basket(&archive)?;
            println!("Basket ({} files):", manifest.len());
            for name in manifest.names {
                println!("- {name}");
            }
        }
    }

    Ok(())
}
