use crate::analyzer::TextAnalyzer;
use crate::error::Result;
use crate::index::{DocId, InvertedIndex};
use crate::scoring::RankingModel;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedDocument {
    /// 1-based position after sorting.
    pub rank: usize,
    pub doc_id: DocId,
    pub external_id: String,
    pub score: f64,
}

/// Runs queries against one finalized index with one ranking model.
///
/// The analyzer must be configured like the one that built the index; this is not checked.
pub struct QueryEvaluator<'a> {
    analyzer: &'a TextAnalyzer,
    index: &'a InvertedIndex,
    model: RankingModel,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(analyzer: &'a TextAnalyzer, index: &'a InvertedIndex, model: RankingModel) -> Self {
        Self { analyzer, index, model }
    }

    /// Documents containing at least one query term.
    fn candidates(&self, query_terms: &[String]) -> Result<BTreeSet<DocId>> {
        let mut docs = BTreeSet::new();
        for term in query_terms {
            docs.extend(self.index.postings(term)?.iter().map(|p| p.doc_id));
        }
        Ok(docs)
    }

    /// Score all candidates, sort by descending score then ascending doc id, keep `top_k`.
    pub fn evaluate(&self, query_text: &str, top_k: usize) -> Result<Vec<RankedDocument>> {
        let query_terms = self.analyzer.analyze(query_text);
        let candidates = self.candidates(&query_terms)?;

        let mut scored: Vec<(DocId, f64)> = Vec::with_capacity(candidates.len());
        for doc_id in candidates {
            scored.push((doc_id, self.model.score(&query_terms, doc_id, self.index)?));
        }
        scored.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            ord => ord,
        });
        tracing::trace!(query = query_text, hits = scored.len(), "scored candidates");

        scored
            .into_iter()
            .take(top_k)
            .enumerate()
            .map(|(i, (doc_id, score))| {
                Ok(RankedDocument {
                    rank: i + 1,
                    doc_id,
                    external_id: self.index.external_id(doc_id)?.to_string(),
                    score,
                })
            })
            .collect()
    }

    /// Evaluate many queries in parallel. Each query keeps its own outcome.
    pub fn evaluate_batch(
        &self,
        queries: &BTreeMap<String, String>,
        top_k: usize,
    ) -> BTreeMap<String, Result<Vec<RankedDocument>>> {
        queries
            .par_iter()
            .map(|(qid, text)| (qid.clone(), self.evaluate(text, top_k)))
            .collect()
    }
}
