use crate::basket::BasketStrategy;
use crate::common::{DEFAULT_BASKET_SIZE, DEFAULT_LEVEL, DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Environment variable consulted when `--output` is not given.
pub const OUTPUT_ENV: &str = "ZBASKET_OUTPUT";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log per-file details (debug level).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compress a single file to `{parent}__{filename}.zst`.
    #[command(alias = "f")]
    File {
        /// The file to compress.
        #[arg(required = true)]
        file: PathBuf,

        /// Output directory. Falls back to $ZBASKET_OUTPUT, then `output`.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Zstandard compression level (1-22).
        #[arg(long, default_value_t = DEFAULT_LEVEL)]
        level: i32,
    },

    /// Compress an explicit list of files into one basket.
    #[command(alias = "b")]
    Basket {
        /// Files to concatenate, in this order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Archive name; outputs are `{prefix}____{name}.zst` and `.txt`.
        #[arg(long)]
        name: String,

        /// Optional stem prefix.
        #[arg(long, default_value = "")]
        prefix: String,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_LEVEL)]
        level: i32,
    },

    /// Compress a whole directory tree basket by basket.
    #[command(alias = "d")]
    Dir {
        /// Root of the tree to compress.
        #[arg(required = true)]
        root: PathBuf,

        /// Files per basket with `--strategy count`. 25 has done better than 100 on photo sets.
        #[arg(long, default_value_t = DEFAULT_BASKET_SIZE)]
        basket_size: usize,

        /// How files are grouped into baskets.
        #[arg(long, value_enum, default_value_t = StrategyArg::Count)]
        strategy: StrategyArg,

        /// Stem prefix for every basket of the run.
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_LEVEL)]
        level: i32,

        /// Skip baskets with unreadable members instead of aborting the run.
        #[arg(long)]
        keep_going: bool,

        /// Print the final size report as JSON on stdout.
        #[arg(long)]
        json: bool,
    },

    /// Restore the members of a basket archive next to each other.
    #[command(alias = "x")]
    Restore {
        /// The `.zst` basket archive; its `.txt` manifest must sit next to it.
        #[arg(required = true)]
        archive: PathBuf,

        /// Target directory. Defaults to the current directory.
        #[arg(long = "to")]
        to: Option<PathBuf>,
    },

    /// List the member filenames of a basket archive.
    #[command(alias = "l")]
    List {
        /// The `.zst` archive or its `.txt` manifest.
        #[arg(required = true)]
        archive: PathBuf,
    },
}

/// Basket grouping selectable from the command line.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    /// Fixed number of consecutive files per basket.
    Count,
    /// One basket per parent-directory name.
    Parent,
}

impl StrategyArg {
    pub fn to_strategy(self, basket_size: usize) -> BasketStrategy {
        match self {
            StrategyArg::Count => BasketStrategy::Count(basket_size),
            StrategyArg::Parent => BasketStrategy::ParentName,
        }
    }
}

/// Gets the output directory from the command-line option, the `ZBASKET_OUTPUT`
/// environment variable, or the default `output`, in that order.
pub fn get_output_dir_from_opt_or_env(output_opt: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = output_opt {
        return dir;
    }
    match std::env::var_os(OUTPUT_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_OUTPUT_DIR),
    }
}

/// Parses command-line arguments using `clap`.
pub fn run() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn dir_defaults() {
        let args = Args::try_parse_from(["zbasket", "dir", "photos"]).unwrap();
        match args.command {
            Commands::Dir { basket_size, strategy, prefix, level, keep_going, .. } => {
                assert_eq!(basket_size, 100);
                assert_eq!(strategy, StrategyArg::Count);
                assert_eq!(prefix, "100basket");
                assert_eq!(level, 20);
                assert!(!keep_going);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn basket_requires_name() {
        assert!(Args::try_parse_from(["zbasket", "basket", "a.jpg"]).is_err());
        let args = Args::try_parse_from(["zbasket", "basket", "a.jpg", "b.jpg", "--name", "7"]).unwrap();
        assert!(matches!(args.command, Commands::Basket { ref files, .. } if files.len() == 2));
    }

    #[test]
    fn explicit_output_wins() {
        let dir = get_output_dir_from_opt_or_env(Some(PathBuf::from("elsewhere")));
        assert_eq!(dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn strategy_mapping() {
        assert_eq!(StrategyArg::Count.to_strategy(25), BasketStrategy::Count(25));
        assert_eq!(StrategyArg::Parent.to_strategy(25), BasketStrategy::ParentName);
    }
}
