use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{loads::LoadFamily, runner::RunMode};

#[derive(Debug, Parser)]
#[command(
    name = "cogload",
    version,
    about = "Cognitive-load robustness evaluation for chat-completion models"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate every configured model over every configured question set
    Run {
        /// Path to the JSONC config
        #[arg(short, long, default_value = "cogload.jsonc")]
        config: PathBuf,

        /// Override `run.mode` from the config
        #[arg(long, value_enum)]
        mode: Option<RunMode>,
    },

    /// Write load-variant datasets for one family
    Generate {
        /// Source question set (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Load family to apply
        #[arg(short, long, value_enum)]
        family: LoadFamily,

        /// Levels to write (comma-separated)
        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = [1u8, 2, 3, 4],
            value_parser = clap::value_parser!(u8).range(0..=4)
        )]
        levels: Vec<u8>,

        /// Seed for the seeded families; defaults to `loads.seed` or the clock
        #[arg(long)]
        seed: Option<u64>,

        /// Defaults to the input file's directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Optional config providing `loads.seed` and logging settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
