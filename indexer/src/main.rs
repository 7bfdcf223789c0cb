use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indexer::{build_grid, build_one, stopword_list};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use trec_core::{AnalyzerSettings, Stemming};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build inverted indexes over a TREC collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one index with the given analyzer settings
    Build {
        /// Collection file or directory of collection files
        #[arg(long)]
        collection: PathBuf,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
        /// Stemming: none, porter or krovetz
        #[arg(long, default_value = "none")]
        stemming: String,
        /// Enable stop filtering
        #[arg(long, default_value_t = false)]
        stopwords: bool,
        /// Stopword file, one per line; the built-in English list is used if omitted
        #[arg(long)]
        stopword_file: Option<PathBuf>,
    },
    /// Build the index of every (stemming, stopwords) combination under one root
    Grid {
        #[arg(long)]
        collection: PathBuf,
        /// Directory receiving one AP_index_<Stemming>_<Stopwords> directory per combination
        #[arg(long)]
        output_root: PathBuf,
        #[arg(long)]
        stopword_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { collection, output, stemming, stopwords, stopword_file } => {
            let stemming: Stemming = stemming.parse().context("invalid --stemming")?;
            let stop = stopword_list(stopword_file.as_deref())?;
            build_one(&collection, &output, AnalyzerSettings { stopwords, stemming }, &stop)?;
            Ok(())
        }
        Commands::Grid { collection, output_root, stopword_file } => {
            let stop = stopword_list(stopword_file.as_deref())?;
            let failed = build_grid(&collection, &output_root, &stop)?;
            if failed > 0 {
                bail!("{failed} index builds failed");
            }
            Ok(())
        }
    }
}
