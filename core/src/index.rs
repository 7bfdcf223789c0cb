use crate::analyzer::{Term, TextAnalyzer};
use crate::document::Document;
use crate::error::{Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub external_id: String,
    /// Number of analyzed terms.
    pub length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

/// All postings of one term, sorted by `doc_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingsList {
    postings: Vec<Posting>,
    collection_frequency: u64,
}

impl PostingsList {
    fn push(&mut self, doc_id: DocId, term_frequency: u32) {
        debug_assert!(term_frequency > 0);
        debug_assert!(self.postings.last().map_or(true, |p| p.doc_id < doc_id));
        self.postings.push(Posting { doc_id, term_frequency });
        self.collection_frequency += u64::from(term_frequency);
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn document_frequency(&self) -> u32 {
        self.postings.len() as u32
    }

    /// Occurrences of the term across the whole collection.
    pub fn collection_frequency(&self) -> u64 {
        self.collection_frequency
    }

    pub fn term_frequency(&self, doc_id: DocId) -> u32 {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .map(|i| self.postings[i].term_frequency)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionStatistics {
    pub document_count: u32,
    /// Sum of all document lengths.
    pub total_term_count: u64,
    pub average_document_length: f64,
}

/// In-memory inverted index over analyzed documents.
///
/// Built in one pass: [`add`](Self::add) every document, then [`finalize`](Self::finalize).
/// Readers are only valid after finalize and `add` is rejected from then on; both misuses
/// surface as [`Error::State`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    dictionary: HashMap<Term, TermId>,
    postings: Vec<PostingsList>, // indexed by term id
    docs: Vec<DocMeta>,          // indexed by doc id
    total_term_count: u64,
    statistics: Option<CollectionStatistics>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Append an analyzed document and return its internal id.
    pub fn add(&mut self, document: Document) -> Result<DocId> {
        self.add_terms(&document.external_id, &document.analyzed_terms)
    }

    fn add_terms(&mut self, external_id: &str, terms: &[Term]) -> Result<DocId> {
        if self.statistics.is_some() {
            return Err(Error::state("add called on a finalized index"));
        }
        let doc_id = DocId::try_from(self.docs.len())
            .map_err(|_| Error::state("document id space exhausted"))?;
        let length = u32::try_from(terms.len())
            .map_err(|_| Error::state(format!("document {external_id} is too long")))?;

        // first-occurrence order keeps term id assignment reproducible
        let mut tf_counts: HashMap<&str, u32> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for term in terms {
            let count = tf_counts.entry(term.as_str()).or_insert(0);
            if *count == 0 {
                order.push(term.as_str());
            }
            *count += 1;
        }

        for term in order {
            let next_id = self.postings.len() as TermId;
            let tid = *self.dictionary.entry(term.to_string()).or_insert(next_id);
            if tid == next_id {
                self.postings.push(PostingsList::default());
            }
            self.postings[tid as usize].push(doc_id, tf_counts[term]);
        }

        self.docs.push(DocMeta { external_id: external_id.to_string(), length });
        self.total_term_count += u64::from(length);
        Ok(doc_id)
    }

    /// Compute collection statistics and freeze the index.
    pub fn finalize(&mut self) -> Result<()> {
        if self.statistics.is_some() {
            return Err(Error::state("index already finalized"));
        }
        let document_count = self.docs.len() as u32;
        let average_document_length = if document_count > 0 {
            self.total_term_count as f64 / f64::from(document_count)
        } else {
            0.0
        };
        let stats = CollectionStatistics {
            document_count,
            total_term_count: self.total_term_count,
            average_document_length,
        };
        tracing::info!(
            num_docs = stats.document_count,
            num_terms = self.dictionary.len(),
            total_terms = stats.total_term_count,
            avg_doc_len = stats.average_document_length,
            "index finalized"
        );
        self.statistics = Some(stats);
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.statistics.is_some()
    }

    fn ensure_finalized(&self) -> Result<&CollectionStatistics> {
        self.statistics
            .as_ref()
            .ok_or_else(|| Error::state("index read before finalize"))
    }

    pub fn statistics(&self) -> Result<CollectionStatistics> {
        self.ensure_finalized().copied()
    }

    pub fn postings_list(&self, term: &str) -> Result<Option<&PostingsList>> {
        self.ensure_finalized()?;
        Ok(self.dictionary.get(term).map(|&tid| &self.postings[tid as usize]))
    }

    /// Postings of `term`; empty when the term was never indexed.
    pub fn postings(&self, term: &str) -> Result<&[Posting]> {
        Ok(self.postings_list(term)?.map_or(&[][..], PostingsList::postings))
    }

    pub fn document_frequency(&self, term: &str) -> Result<u32> {
        Ok(self.postings_list(term)?.map_or(0, PostingsList::document_frequency))
    }

    pub fn collection_frequency(&self, term: &str) -> Result<u64> {
        Ok(self.postings_list(term)?.map_or(0, PostingsList::collection_frequency))
    }

    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> Result<u32> {
        Ok(self.postings_list(term)?.map_or(0, |pl| pl.term_frequency(doc_id)))
    }

    fn doc(&self, doc_id: DocId) -> Result<&DocMeta> {
        self.ensure_finalized()?;
        self.docs.get(doc_id as usize).ok_or(Error::UnknownDocument(doc_id))
    }

    pub fn document_length(&self, doc_id: DocId) -> Result<u32> {
        Ok(self.doc(doc_id)?.length)
    }

    pub fn external_id(&self, doc_id: DocId) -> Result<&str> {
        Ok(self.doc(doc_id)?.external_id.as_str())
    }

    /// Vocabulary size.
    pub fn num_terms(&self) -> usize {
        self.dictionary.len()
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }
}

/// Analyze `documents` in parallel, add them in input order and finalize.
///
/// Ids follow input order. If any add fails the partial index is dropped, never finalized.
pub fn build_index(documents: &[Document], analyzer: &TextAnalyzer) -> Result<InvertedIndex> {
    let analyzed: Vec<Vec<Term>> = documents
        .par_iter()
        .map(|d| analyzer.analyze(&d.raw_text))
        .collect();

    let mut index = InvertedIndex::new();
    for (doc, terms) in documents.iter().zip(&analyzed) {
        index.add_terms(&doc.external_id, terms)?;
    }
    index.finalize()?;
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, terms: &[&str]) -> Document {
        Document {
            external_id: id.to_string(),
            raw_text: terms.join(" "),
            analyzed_terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn assigns_sequential_ids() {
        let mut index = InvertedIndex::new();
        assert_eq!(index.add(doc("a", &["x"])).unwrap(), 0);
        assert_eq!(index.add(doc("b", &["y"])).unwrap(), 1);
        assert_eq!(index.add(doc("c", &[])).unwrap(), 2);
        index.finalize().unwrap();
        assert_eq!(index.external_id(1).unwrap(), "b");
        assert_eq!(index.document_length(2).unwrap(), 0);
        assert!(matches!(index.external_id(3), Err(Error::UnknownDocument(3))));
    }

    #[test]
    fn counts_term_frequency_per_document() {
        let mut index = InvertedIndex::new();
        index.add(doc("a", &["x", "y", "x"])).unwrap();
        index.add(doc("b", &["x"])).unwrap();
        index.finalize().unwrap();

        assert_eq!(
            index.postings("x").unwrap(),
            &[Posting { doc_id: 0, term_frequency: 2 }, Posting { doc_id: 1, term_frequency: 1 }]
        );
        assert_eq!(index.document_frequency("x").unwrap(), 2);
        assert_eq!(index.collection_frequency("x").unwrap(), 3);
        assert_eq!(index.term_frequency("y", 0).unwrap(), 1);
        assert_eq!(index.term_frequency("y", 1).unwrap(), 0);
        assert_eq!(index.document_frequency("zzz").unwrap(), 0);
        assert!(index.postings("zzz").unwrap().is_empty());
    }

    #[test]
    fn statistics_after_finalize() {
        let mut index = InvertedIndex::new();
        index.add(doc("a", &["x", "y", "x"])).unwrap();
        index.add(doc("b", &["x"])).unwrap();
        index.finalize().unwrap();
        let stats = index.statistics().unwrap();
        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.total_term_count, 4);
        assert_eq!(stats.average_document_length, 2.0);
    }

    #[test]
    fn reads_before_finalize_are_state_errors() {
        let mut index = InvertedIndex::new();
        index.add(doc("a", &["x"])).unwrap();
        assert!(matches!(index.statistics(), Err(Error::State(_))));
        assert!(matches!(index.postings("x"), Err(Error::State(_))));
        assert!(matches!(index.document_frequency("x"), Err(Error::State(_))));
        assert!(matches!(index.document_length(0), Err(Error::State(_))));
        assert!(matches!(index.external_id(0), Err(Error::State(_))));
    }

    #[test]
    fn writes_after_finalize_are_state_errors() {
        let mut index = InvertedIndex::new();
        index.finalize().unwrap();
        assert!(matches!(index.add(doc("a", &["x"])), Err(Error::State(_))));
        assert!(matches!(index.finalize(), Err(Error::State(_))));
        assert_eq!(index.num_docs(), 0);
    }

    #[test]
    fn empty_index_is_queryable() {
        let mut index = InvertedIndex::new();
        index.finalize().unwrap();
        let stats = index.statistics().unwrap();
        assert_eq!(stats.document_count, 0);
        assert_eq!(stats.average_document_length, 0.0);
        assert!(index.postings("anything").unwrap().is_empty());
    }

    #[test]
    fn build_index_analyzes_in_input_order() {
        let analyzer = TextAnalyzer::new(["the"], crate::Stemming::None);
        let docs = vec![Document::new("d1", "The cat"), Document::new("d2", "the dog the cat")];
        let index = build_index(&docs, &analyzer).unwrap();
        assert_eq!(index.external_id(0).unwrap(), "d1");
        assert_eq!(index.document_length(1).unwrap(), 2);
        assert_eq!(index.document_frequency("cat").unwrap(), 2);
        assert_eq!(index.document_frequency("the").unwrap(), 0);
    }
}
