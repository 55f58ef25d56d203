//! sheetgrader CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sheetgrader", version, about = "Answer-sheet scoring and reordering")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score student responses against answer keys
    Score {
        /// CSV of student responses
        #[arg(long)]
        responses: PathBuf,

        /// CSV of answer keys, one row per test form
        #[arg(long)]
        keys: PathBuf,

        /// CSV of question arrangements; also writes a reordered copy
        #[arg(long)]
        arrangement: Option<PathBuf>,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output formats: csv, json, html, all (default: from config)
        #[arg(long)]
        format: Option<String>,

        /// Add a "Total Points" column
        #[arg(long)]
        points: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Reorder a scored CSV according to an arrangement file
    Reorder {
        /// Scored results CSV
        #[arg(long)]
        scored: PathBuf,

        /// CSV of question arrangements
        #[arg(long)]
        arrangement: PathBuf,

        /// Path of the reordered CSV to write
        #[arg(long)]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check an input CSV for layout problems
    Validate {
        /// CSV file to check
        #[arg(long)]
        file: PathBuf,

        /// Table kind: responses, keys, arrangement, scored
        #[arg(long, default_value = "responses")]
        kind: String,
    },

    /// Create a starter config file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sheetgrader=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            responses,
            keys,
            arrangement,
            output,
            format,
            points,
            config,
        } => commands::score::execute(
            responses,
            keys,
            arrangement,
            output,
            format,
            points,
            config,
        ),
        Commands::Reorder {
            scored,
            arrangement,
            output,
            config,
        } => commands::reorder::execute(scored, arrangement, output, config),
        Commands::Validate { file, kind } => commands::validate::execute(file, kind),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
