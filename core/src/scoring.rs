//! Ranking models.
//!
//! Every model scores one candidate document against a bag of query terms using only
//! statistics exposed by a finalized [`InvertedIndex`]. Duplicate query terms contribute
//! once per occurrence.

use crate::analyzer::Term;
use crate::error::{Error, Result};
use crate::index::{DocId, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BM25_K1: f64 = 1.2;
pub const DEFAULT_BM25_B: f64 = 0.75;
pub const DEFAULT_LM_MU: f64 = 2000.0;

/// Log-probability charged for a query term whose smoothed probability is zero.
pub const UNSEEN_TERM_LOG_PROB: f64 = -1000.0;

/// Which ranking model to run, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingModelKind {
    VectorSpace,
    Bm25,
    LanguageModel,
}

impl RankingModelKind {
    pub const ALL: [RankingModelKind; 3] =
        [RankingModelKind::VectorSpace, RankingModelKind::Bm25, RankingModelKind::LanguageModel];

    /// Short label used in run tags and run file names.
    pub fn display_name(self) -> &'static str {
        match self {
            RankingModelKind::VectorSpace => "VSM",
            RankingModelKind::Bm25 => "BM25",
            RankingModelKind::LanguageModel => "LM",
        }
    }
}

impl fmt::Display for RankingModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for RankingModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "vector_space" | "vsm" | "tfidf" => Ok(RankingModelKind::VectorSpace),
            "bm25" => Ok(RankingModelKind::Bm25),
            "language_model" | "lm" | "dirichlet" => Ok(RankingModelKind::LanguageModel),
            other => Err(Error::configuration(format!("unsupported ranking model: {other:?}"))),
        }
    }
}

/// A ranking model with its fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RankingModel {
    /// Classic tf-idf: `(1 + ln tf) * (ln(N / df) + 1)` per query term.
    VectorSpace,
    Bm25 { k1: f64, b: f64 },
    /// Query likelihood with Dirichlet smoothing.
    LanguageModel { mu: f64 },
}

impl RankingModel {
    pub fn bm25(k1: f64, b: f64) -> Result<Self> {
        if !k1.is_finite() || k1 < 0.0 {
            return Err(Error::configuration(format!("bm25 k1 must be a non-negative number, got {k1}")));
        }
        if !(0.0..=1.0).contains(&b) {
            return Err(Error::configuration(format!("bm25 b must lie in [0, 1], got {b}")));
        }
        Ok(RankingModel::Bm25 { k1, b })
    }

    pub fn language_model(mu: f64) -> Result<Self> {
        if !mu.is_finite() || mu < 0.0 {
            return Err(Error::configuration(format!("dirichlet mu must be a non-negative number, got {mu}")));
        }
        Ok(RankingModel::LanguageModel { mu })
    }

    pub fn kind(&self) -> RankingModelKind {
        match self {
            RankingModel::VectorSpace => RankingModelKind::VectorSpace,
            RankingModel::Bm25 { .. } => RankingModelKind::Bm25,
            RankingModel::LanguageModel { .. } => RankingModelKind::LanguageModel,
        }
    }

    pub fn score(&self, query_terms: &[Term], doc_id: DocId, index: &InvertedIndex) -> Result<f64> {
        match *self {
            RankingModel::VectorSpace => vector_space(query_terms, doc_id, index),
            RankingModel::Bm25 { k1, b } => bm25(query_terms, doc_id, index, k1, b),
            RankingModel::LanguageModel { mu } => dirichlet(query_terms, doc_id, index, mu),
        }
    }
}

impl Default for RankingModel {
    fn default() -> Self {
        RankingModel::Bm25 { k1: DEFAULT_BM25_K1, b: DEFAULT_BM25_B }
    }
}

fn vector_space(query_terms: &[Term], doc_id: DocId, index: &InvertedIndex) -> Result<f64> {
    let n = f64::from(index.statistics()?.document_count);
    let mut score = 0.0;
    for term in query_terms {
        let Some(pl) = index.postings_list(term)? else { continue };
        let tf = pl.term_frequency(doc_id);
        let df = pl.document_frequency();
        if tf == 0 || df == 0 {
            continue;
        }
        let idf = (n / f64::from(df)).ln() + 1.0;
        score += (1.0 + f64::from(tf).ln()) * idf;
    }
    Ok(score)
}

/// `ln(1 + (N - df + 0.5) / (df + 0.5))`, always positive.
pub fn bm25_idf(document_count: u32, document_frequency: u32) -> f64 {
    let n = f64::from(document_count);
    let df = f64::from(document_frequency);
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}

fn bm25(query_terms: &[Term], doc_id: DocId, index: &InvertedIndex, k1: f64, b: f64) -> Result<f64> {
    let stats = index.statistics()?;
    let doc_len = f64::from(index.document_length(doc_id)?);
    let length_ratio = if stats.average_document_length > 0.0 {
        doc_len / stats.average_document_length
    } else {
        1.0
    };
    let norm = k1 * (1.0 - b + b * length_ratio);

    let mut score = 0.0;
    for term in query_terms {
        let Some(pl) = index.postings_list(term)? else { continue };
        let tf = f64::from(pl.term_frequency(doc_id));
        if tf == 0.0 {
            continue;
        }
        let idf = bm25_idf(stats.document_count, pl.document_frequency());
        score += idf * (tf * (k1 + 1.0)) / (tf + norm);
    }
    Ok(score)
}

fn dirichlet(query_terms: &[Term], doc_id: DocId, index: &InvertedIndex, mu: f64) -> Result<f64> {
    let stats = index.statistics()?;
    let doc_len = f64::from(index.document_length(doc_id)?);
    let total = stats.total_term_count as f64;
    let denom = doc_len + mu;

    let mut score = 0.0;
    for term in query_terms {
        let (tf, cf) = match index.postings_list(term)? {
            Some(pl) => (f64::from(pl.term_frequency(doc_id)), pl.collection_frequency() as f64),
            None => (0.0, 0.0),
        };
        let p_coll = if total > 0.0 { cf / total } else { 0.0 };
        let p = if denom > 0.0 { (tf + mu * p_coll) / denom } else { 0.0 };
        score += if p > 0.0 { p.ln() } else { UNSEEN_TERM_LOG_PROB };
    }
    Ok(score)
}
