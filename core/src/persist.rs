use crate::analyzer::TextAnalyzer;
use crate::config::AnalyzerSettings;
use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::stem::Stemming;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: usize,
    pub total_terms: u64,
    pub stemming: Stemming,
    pub stopwords: bool,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn index(&self) -> PathBuf { self.root.join("index.bin") }
    fn analyzer(&self) -> PathBuf { self.root.join("analyzer.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    pub fn exists(&self) -> bool {
        self.meta().is_file() && self.index().is_file() && self.analyzer().is_file()
    }
}

fn save_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut f, value)?;
    f.flush()?;
    Ok(())
}

fn load_bincode<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let f = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(f)?)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = BufWriter::new(File::create(paths.meta())?);
    serde_json::to_writer_pretty(&mut f, meta)?;
    f.flush()?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let f = BufReader::new(File::open(paths.meta())?);
    Ok(serde_json::from_reader(f)?)
}

/// Persist a finalized index together with the analyzer that built it.
///
/// The analyzer is stored so queries can later be analyzed exactly like the documents.
/// `settings` names the configuration the index was built for; it is recorded as given,
/// so a stopword index built from an empty stop list still reads back as a stopword index.
pub fn save_index(
    paths: &IndexPaths,
    index: &InvertedIndex,
    analyzer: &TextAnalyzer,
    settings: AnalyzerSettings,
    created_at: &str,
) -> Result<MetaFile> {
    let stats = index.statistics()?;
    create_dir_all(&paths.root)?;
    save_bincode(&paths.index(), index)?;
    save_bincode(&paths.analyzer(), analyzer)?;
    let meta = MetaFile {
        num_docs: stats.document_count,
        num_terms: index.num_terms(),
        total_terms: stats.total_term_count,
        stemming: settings.stemming,
        stopwords: settings.stopwords,
        created_at: created_at.to_string(),
        version: INDEX_FORMAT_VERSION,
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "index saved");
    Ok(meta)
}

/// Load an index written by [`save_index`]. Rejects other format versions and unfinalized indexes.
pub fn load_index(paths: &IndexPaths) -> Result<(InvertedIndex, TextAnalyzer, MetaFile)> {
    let meta = load_meta(paths)?;
    if meta.version != INDEX_FORMAT_VERSION {
        return Err(Error::Persist(format!(
            "{} has format version {}, expected {}",
            paths.root.display(),
            meta.version,
            INDEX_FORMAT_VERSION
        )));
    }
    let index: InvertedIndex = load_bincode(&paths.index())?;
    if !index.is_finalized() {
        return Err(Error::Persist(format!("{} holds an unfinalized index", paths.root.display())));
    }
    let analyzer: TextAnalyzer = load_bincode(&paths.analyzer())?;
    if analyzer.stemming() != meta.stemming {
        return Err(Error::Persist(format!(
            "{} analyzer stems with {} but meta.json records {}",
            paths.root.display(),
            analyzer.stemming(),
            meta.stemming
        )));
    }
    tracing::debug!(root = %paths.root.display(), num_docs = meta.num_docs, "index loaded");
    Ok((index, analyzer, meta))
}
