pub mod analyzer;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod persist;
pub mod porter;
pub mod run;
pub mod scoring;
pub mod search;
pub mod stem;
pub mod topics;

pub use analyzer::{load_stopwords, Term, TextAnalyzer, ENGLISH_STOPWORDS};
pub use config::{AnalyzerSettings, Configuration, ModelParameters};
pub use document::{parse_collection, read_collection, Document};
pub use error::{Error, Result};
pub use index::{build_index, CollectionStatistics, DocId, InvertedIndex, Posting, PostingsList, TermId};
pub use scoring::{RankingModel, RankingModelKind};
pub use search::{QueryEvaluator, RankedDocument};
pub use stem::Stemming;
