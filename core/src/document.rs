use crate::analyzer::{Term, TextAnalyzer};
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref DOC_RE: Regex = Regex::new(r"(?s)<DOC>(.*?)</DOC>").expect("valid regex");
    static ref DOCNO_RE: Regex = Regex::new(r"(?s)<DOCNO>(.*?)</DOCNO>").expect("valid regex");
    static ref TEXT_RE: Regex = Regex::new(r"(?s)<TEXT>(.*?)</TEXT>").expect("valid regex");
}

/// One record of a TREC collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// The `DOCNO`, reported in run files.
    pub external_id: String,
    pub raw_text: String,
    /// Filled by [`Document::analyze`]; empty straight out of the parser.
    pub analyzed_terms: Vec<Term>,
}

impl Document {
    pub fn new(external_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self { external_id: external_id.into(), raw_text: raw_text.into(), analyzed_terms: Vec::new() }
    }

    /// Copy of this document with its body analyzed by `analyzer`.
    pub fn analyze(&self, analyzer: &TextAnalyzer) -> Document {
        Document {
            external_id: self.external_id.clone(),
            raw_text: self.raw_text.clone(),
            analyzed_terms: analyzer.analyze(&self.raw_text),
        }
    }
}

fn tag_value(re: &Regex, region: &str) -> String {
    re.captures(region)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Split raw collection text into documents. Regions missing `DOCNO` or `TEXT` get empty fields.
pub fn parse_collection(raw: &str) -> Vec<Document> {
    DOC_RE
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|region| {
            let region = region.as_str();
            let doc = Document::new(tag_value(&DOCNO_RE, region), tag_value(&TEXT_RE, region));
            if doc.external_id.is_empty() || doc.raw_text.is_empty() {
                tracing::debug!(docno = %doc.external_id, "document region missing DOCNO or TEXT");
            }
            doc
        })
        .collect()
}

/// Parse a collection file, or every regular file below a directory in path order.
pub fn read_collection<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    } else {
        files.push(path.to_path_buf());
    }

    let mut docs = Vec::new();
    for file in files {
        let bytes = fs::read(&file)?;
        let parsed = parse_collection(&String::from_utf8_lossy(&bytes));
        tracing::debug!(file = %file.display(), docs = parsed.len(), "parsed collection file");
        docs.extend(parsed);
    }
    tracing::info!(path = %path.display(), num_docs = docs.len(), "read collection");
    Ok(docs)
}
