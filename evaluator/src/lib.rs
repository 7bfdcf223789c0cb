use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use trec_core::persist::{load_index, IndexPaths};
use trec_core::run::write_run;
use trec_core::{AnalyzerSettings, Configuration, InvertedIndex, ModelParameters, QueryEvaluator, RankingModelKind, TextAnalyzer};

/// Outcome of one (analyzer, model) run.
#[derive(Debug)]
pub struct RunReport {
    pub run_tag: String,
    pub output: PathBuf,
    pub queries: usize,
    pub failed_queries: usize,
    pub lines: usize,
}

/// Evaluate every topic with `config` and write the run file into `out_dir`.
///
/// A query that fails is logged and left out of the run file; the other queries still run.
pub fn run_experiment(
    index: &InvertedIndex,
    analyzer: &TextAnalyzer,
    config: &Configuration,
    topics: &BTreeMap<String, String>,
    out_dir: &Path,
) -> Result<RunReport> {
    let model = config.model()?;
    let run_tag = config.run_tag();
    let output = out_dir.join(config.run_file_name());
    tracing::info!(run = %run_tag, output = %output.display(), "running experiment");

    let evaluator = QueryEvaluator::new(analyzer, index, model);
    let results = evaluator.evaluate_batch(topics, config.top_k());

    fs::create_dir_all(out_dir)?;
    let mut out = BufWriter::new(File::create(&output).with_context(|| format!("creating {}", output.display()))?);
    let mut report = RunReport { run_tag, output, queries: topics.len(), failed_queries: 0, lines: 0 };
    for (qid, result) in results {
        match result {
            Ok(hits) => {
                write_run(&mut out, &qid, &hits, &report.run_tag)?;
                report.lines += hits.len();
            }
            Err(e) => {
                report.failed_queries += 1;
                tracing::error!(run = %report.run_tag, query = %qid, error = %e, "query failed");
            }
        }
    }
    out.flush()?;
    Ok(report)
}

fn run_analyzer_group(
    index_root: &Path,
    settings: AnalyzerSettings,
    topics: &BTreeMap<String, String>,
    out_dir: &Path,
    parameters: ModelParameters,
) -> Vec<(Configuration, Result<RunReport>)> {
    let configs: Vec<Configuration> = RankingModelKind::ALL
        .into_iter()
        .map(|ranking_model| Configuration { analyzer: settings, ranking_model, parameters })
        .collect();

    let paths = IndexPaths::new(index_root.join(settings.index_dir_name()));
    if !paths.exists() {
        let msg = format!("no index at {}", paths.root.display());
        return configs.into_iter().map(|c| (c, Err(anyhow::anyhow!(msg.clone())))).collect();
    }
    let (index, analyzer, _meta) = match load_index(&paths) {
        Ok(loaded) => loaded,
        Err(e) => {
            let msg = format!("loading index {}: {e}", paths.root.display());
            return configs.into_iter().map(|c| (c, Err(anyhow::anyhow!(msg.clone())))).collect();
        }
    };

    configs
        .into_par_iter()
        .map(|config| {
            let report = run_experiment(&index, &analyzer, &config, topics, out_dir);
            (config, report)
        })
        .collect()
}

/// Run all 18 experiments; indexes are expected under `index_root/AP_index_<label>`.
///
/// Experiments run in parallel and independently: a missing index or a bad parameter only
/// fails the runs that depend on it.
pub fn run_grid(
    index_root: &Path,
    topics: &BTreeMap<String, String>,
    out_dir: &Path,
    parameters: ModelParameters,
) -> Vec<(Configuration, Result<RunReport>)> {
    AnalyzerSettings::grid()
        .into_par_iter()
        .flat_map_iter(|settings| run_analyzer_group(index_root, settings, topics, out_dir, parameters))
        .collect()
}
