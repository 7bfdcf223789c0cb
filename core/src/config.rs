use crate::analyzer::TextAnalyzer;
use crate::error::Result;
use crate::scoring::{RankingModel, RankingModelKind, DEFAULT_BM25_B, DEFAULT_BM25_K1, DEFAULT_LM_MU};
use crate::stem::Stemming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TOP_K: usize = 1000;

/// The analysis half of a configuration; one index exists per distinct value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    pub stopwords: bool,
    pub stemming: Stemming,
}

impl AnalyzerSettings {
    /// Every stemming mode with and without stop filtering.
    pub fn grid() -> Vec<AnalyzerSettings> {
        Stemming::ALL
            .iter()
            .flat_map(|&stemming| {
                [false, true].into_iter().map(move |stopwords| AnalyzerSettings { stopwords, stemming })
            })
            .collect()
    }

    pub fn stopwords_display(self) -> &'static str {
        if self.stopwords { "Stopwords" } else { "No_stopwords" }
    }

    /// e.g. `Porter_stemming_Stopwords`
    pub fn label(self) -> String {
        format!("{}_{}", self.stemming.display_name(), self.stopwords_display())
    }

    /// Directory name of the index built with these settings.
    pub fn index_dir_name(self) -> String {
        format!("AP_index_{}", self.label())
    }

    /// `stopword_list` is only consulted when stop filtering is enabled.
    pub fn analyzer<S: AsRef<str>>(self, stopword_list: &[S]) -> TextAnalyzer {
        if self.stopwords {
            TextAnalyzer::new(stopword_list.iter().map(|s| s.as_ref()), self.stemming)
        } else {
            TextAnalyzer::new(std::iter::empty::<&str>(), self.stemming)
        }
    }
}

/// Parameters of the ranking models, shared by every run of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub bm25_k1: f64,
    pub bm25_b: f64,
    pub lm_mu: f64,
    pub top_k: usize,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self { bm25_k1: DEFAULT_BM25_K1, bm25_b: DEFAULT_BM25_B, lm_mu: DEFAULT_LM_MU, top_k: DEFAULT_TOP_K }
    }
}

impl ModelParameters {
    /// Read parameters from a JSON file; absent keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Instantiate `kind`, validating its parameters.
    pub fn model(&self, kind: RankingModelKind) -> Result<RankingModel> {
        match kind {
            RankingModelKind::VectorSpace => Ok(RankingModel::VectorSpace),
            RankingModelKind::Bm25 => RankingModel::bm25(self.bm25_k1, self.bm25_b),
            RankingModelKind::LanguageModel => RankingModel::language_model(self.lm_mu),
        }
    }
}

/// One experiment: how documents and queries are analyzed and how they are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub analyzer: AnalyzerSettings,
    pub ranking_model: RankingModelKind,
    #[serde(default)]
    pub parameters: ModelParameters,
}

impl Configuration {
    /// Configuration for a textual model name; unknown names and invalid parameters fail here.
    pub fn new(analyzer: AnalyzerSettings, ranking_model: &str, parameters: ModelParameters) -> Result<Self> {
        let config = Self { analyzer, ranking_model: ranking_model.parse()?, parameters };
        config.model()?;
        Ok(config)
    }

    pub fn model(&self) -> Result<RankingModel> {
        self.parameters.model(self.ranking_model)
    }

    pub fn top_k(&self) -> usize {
        self.parameters.top_k
    }

    /// Opaque label written in the last column of run files.
    pub fn run_tag(&self) -> String {
        format!(
            "[{}][{}][{}]",
            self.analyzer.stemming.display_name(),
            self.analyzer.stopwords_display(),
            self.ranking_model.display_name()
        )
    }

    /// e.g. `No_stemming_Stopwords_BM25.txt`
    pub fn run_file_name(&self) -> String {
        format!("{}_{}.txt", self.analyzer.label(), self.ranking_model.display_name())
    }
}
