use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use evaluator::{run_experiment, run_grid};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use trec_core::persist::{load_index, IndexPaths};
use trec_core::topics::read_topics;
use trec_core::{AnalyzerSettings, Configuration, ModelParameters};

#[derive(Parser)]
#[command(name = "evaluator")]
#[command(about = "Rank TREC topics against persisted indexes and write run files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ParamArgs {
    /// JSON file with bm25_k1, bm25_b, lm_mu and top_k; flags below override it
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long)]
    bm25_k1: Option<f64>,
    #[arg(long)]
    bm25_b: Option<f64>,
    #[arg(long)]
    lm_mu: Option<f64>,
    /// Documents kept per query
    #[arg(long)]
    top_k: Option<usize>,
}

impl ParamArgs {
    fn resolve(&self) -> Result<ModelParameters> {
        let mut p = match &self.params {
            Some(path) => ModelParameters::from_json_file(path).with_context(|| format!("reading {}", path.display()))?,
            None => ModelParameters::default(),
        };
        if let Some(v) = self.bm25_k1 { p.bm25_k1 = v; }
        if let Some(v) = self.bm25_b { p.bm25_b = v; }
        if let Some(v) = self.lm_mu { p.lm_mu = v; }
        if let Some(v) = self.top_k { p.top_k = v; }
        Ok(p)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one index with one ranking model
    Run {
        /// Index directory written by the indexer
        #[arg(long)]
        index: PathBuf,
        /// TREC topics file
        #[arg(long)]
        topics: PathBuf,
        /// vector_space, bm25 or language_model
        #[arg(long, default_value = "bm25")]
        model: String,
        /// Directory receiving the run file
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Evaluate every (stemming, stopwords, model) combination
    Grid {
        /// Directory holding the AP_index_* directories
        #[arg(long)]
        index_root: PathBuf,
        #[arg(long)]
        topics: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { index, topics, model, output, params } => {
            let parameters = params.resolve()?;
            let topics = read_topics(&topics).with_context(|| format!("reading {}", topics.display()))?;
            let (idx, analyzer, meta) = load_index(&IndexPaths::new(&index))
                .with_context(|| format!("loading index {}", index.display()))?;
            let settings = AnalyzerSettings { stopwords: meta.stopwords, stemming: meta.stemming };
            let config = Configuration::new(settings, &model, parameters).context("invalid --model or parameters")?;
            let report = run_experiment(&idx, &analyzer, &config, &topics, &output)?;
            tracing::info!(run = %report.run_tag, lines = report.lines, failed = report.failed_queries, "run written");
            if report.failed_queries > 0 {
                bail!("{} queries failed", report.failed_queries);
            }
            Ok(())
        }
        Commands::Grid { index_root, topics, output, params } => {
            let parameters = params.resolve()?;
            let topics = read_topics(&topics).with_context(|| format!("reading {}", topics.display()))?;
            let mut failed = 0;
            for (config, result) in run_grid(&index_root, &topics, &output, parameters) {
                match result {
                    Ok(report) if report.failed_queries == 0 => {
                        tracing::info!(run = %report.run_tag, lines = report.lines, "run written");
                    }
                    Ok(report) => {
                        failed += 1;
                        tracing::warn!(run = %report.run_tag, failed = report.failed_queries, "run written with failed queries");
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::error!(run = %config.run_tag(), error = %format!("{e:#}"), "run failed");
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} runs did not complete cleanly");
            }
            Ok(())
        }
    }
}
