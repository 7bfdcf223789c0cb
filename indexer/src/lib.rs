use anyhow::{Context, Result};
use std::path::Path;
use trec_core::persist::{save_index, IndexPaths, MetaFile};
use trec_core::{build_index, load_stopwords, read_collection, AnalyzerSettings, Document, ENGLISH_STOPWORDS};

/// Stop list from `path`, or the built-in English list.
pub fn stopword_list(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(p) => load_stopwords(p).with_context(|| format!("reading stopwords from {}", p.display())),
        None => Ok(ENGLISH_STOPWORDS.iter().map(|s| s.to_string()).collect()),
    }
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into())
}

/// Analyze `docs` under `settings`, build the index and persist it to `output`.
pub fn index_documents(docs: &[Document], output: &Path, settings: AnalyzerSettings, stopwords: &[String]) -> Result<MetaFile> {
    let analyzer = settings.analyzer(stopwords);
    tracing::info!(label = %settings.label(), num_docs = docs.len(), "building index");
    let index = build_index(docs, &analyzer).with_context(|| format!("building {}", settings.label()))?;
    let meta = save_index(&IndexPaths::new(output), &index, &analyzer, settings, &now_rfc3339())
        .with_context(|| format!("saving index to {}", output.display()))?;
    Ok(meta)
}

pub fn build_one(collection: &Path, output: &Path, settings: AnalyzerSettings, stopwords: &[String]) -> Result<MetaFile> {
    let docs = read_collection(collection).with_context(|| format!("reading {}", collection.display()))?;
    index_documents(&docs, output, settings, stopwords)
}

/// Build all six analyzer configurations from one parse of the collection.
///
/// A failing configuration is logged and skipped; the number of failures is returned.
pub fn build_grid(collection: &Path, output_root: &Path, stopwords: &[String]) -> Result<usize> {
    let docs = read_collection(collection).with_context(|| format!("reading {}", collection.display()))?;
    let mut failed = 0;
    for settings in AnalyzerSettings::grid() {
        let output = output_root.join(settings.index_dir_name());
        match index_documents(&docs, &output, settings, stopwords) {
            Ok(meta) => tracing::info!(label = %settings.label(), num_terms = meta.num_terms, "index complete"),
            Err(e) => {
                failed += 1;
                tracing::error!(label = %settings.label(), error = %format!("{e:#}"), "index build failed");
            }
        }
    }
    Ok(failed)
}
