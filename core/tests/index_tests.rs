use std::collections::{HashMap, HashSet};
use trec_core::persist::{load_index, save_index, IndexPaths};
use trec_core::{
    build_index, AnalyzerSettings, parse_collection, QueryEvaluator, RankingModel, RankingModelKind, Stemming, TextAnalyzer,
};

const COLLECTION: &str = "
<DOC>
<DOCNO> AP-001 </DOCNO>
<TEXT>
The oil prices rose sharply as oil exports fell.
</TEXT>
</DOC>
<DOC>
<DOCNO> AP-002 </DOCNO>
<TEXT>
European governments discussed Airbus subsidies.
</TEXT>
</DOC>
<DOC>
<DOCNO> AP-003 </DOCNO>
<TEXT>
Oil companies and the governments of oil exporting countries met.
</TEXT>
</DOC>
<DOC>
<DOCNO> AP-004 </DOCNO>
</DOC>
";

fn analyzers() -> Vec<TextAnalyzer> {
    let stop = ["the", "and", "of", "by", "as", "were"];
    let mut out = Vec::new();
    for stemming in Stemming::ALL {
        out.push(TextAnalyzer::new(Vec::<String>::new(), stemming));
        out.push(TextAnalyzer::new(stop, stemming));
    }
    out
}

#[test]
fn document_lengths_match_term_frequencies() {
    let docs = parse_collection(COLLECTION);
    assert_eq!(docs.len(), 4);
    for analyzer in analyzers() {
        let index = build_index(&docs, &analyzer).unwrap();
        let mut tf_sum: HashMap<u32, u64> = HashMap::new();
        let mut vocab = HashSet::new();
        for (doc_id, doc) in docs.iter().enumerate() {
            let terms = analyzer.analyze(&doc.raw_text);
            assert_eq!(index.document_length(doc_id as u32).unwrap() as usize, terms.len());
            vocab.extend(terms);
        }
        for term in &vocab {
            let postings = index.postings(term).unwrap();
            assert_eq!(index.document_frequency(term).unwrap() as usize, postings.len());
            assert!(postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id));
            for p in postings {
                assert!(p.term_frequency >= 1);
                *tf_sum.entry(p.doc_id).or_default() += u64::from(p.term_frequency);
            }
        }
        for doc_id in 0..docs.len() as u32 {
            let len = u64::from(index.document_length(doc_id).unwrap());
            assert_eq!(tf_sum.get(&doc_id).copied().unwrap_or(0), len);
        }
        let stats = index.statistics().unwrap();
        assert_eq!(stats.document_count, 4);
        assert_eq!(stats.total_term_count, tf_sum.values().sum::<u64>());
    }
}

#[test]
fn evaluation_is_deterministic() {
    let docs = parse_collection(COLLECTION);
    let analyzer = TextAnalyzer::new(["the"], Stemming::Porter);
    let index = build_index(&docs, &analyzer).unwrap();
    for kind in RankingModelKind::ALL {
        let model = trec_core::ModelParameters::default().model(kind).unwrap();
        let eval = QueryEvaluator::new(&analyzer, &index, model);
        let first = eval.evaluate("oil governments", 1000).unwrap();
        let second = eval.evaluate("oil governments", 1000).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].external_id, "AP-003", "{kind}");
    }
}

#[test]
fn empty_collection_answers_queries() {
    let analyzer = TextAnalyzer::new(Vec::<String>::new(), Stemming::None);
    let index = build_index(&[], &analyzer).unwrap();
    assert_eq!(index.statistics().unwrap().document_count, 0);
    assert!(index.postings("oil").unwrap().is_empty());
    let eval = QueryEvaluator::new(&analyzer, &index, RankingModel::default());
    assert!(eval.evaluate("oil", 10).unwrap().is_empty());
}

#[test]
fn persisted_index_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("idx"));
    let docs = parse_collection(COLLECTION);
    let analyzer = TextAnalyzer::new(["the", "and"], Stemming::Krovetz);
    let index = build_index(&docs, &analyzer).unwrap();
    let settings = AnalyzerSettings { stopwords: true, stemming: Stemming::Krovetz };
    let meta = save_index(&paths, &index, &analyzer, settings, "2024-01-01T00:00:00Z").unwrap();
    assert_eq!(meta.num_docs, 4);
    assert!(meta.stopwords);
    assert!(paths.exists());

    let (loaded, loaded_analyzer, loaded_meta) = load_index(&paths).unwrap();
    assert_eq!(loaded_meta, meta);
    assert_eq!(loaded_analyzer, analyzer);
    assert_eq!(loaded.statistics().unwrap(), index.statistics().unwrap());

    let before = QueryEvaluator::new(&analyzer, &index, RankingModel::VectorSpace).evaluate("oil exports", 10).unwrap();
    let after = QueryEvaluator::new(&loaded_analyzer, &loaded, RankingModel::VectorSpace).evaluate("oil exports", 10).unwrap();
    assert_eq!(before, after);
}

#[test]
fn unfinalized_index_cannot_be_saved() {
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let analyzer = TextAnalyzer::new(Vec::<String>::new(), Stemming::None);
    let index = trec_core::InvertedIndex::new();
    let settings = AnalyzerSettings { stopwords: false, stemming: Stemming::None };
    assert!(matches!(save_index(&paths, &index, &analyzer, settings, ""), Err(trec_core::Error::State(_))));
    assert!(!paths.exists());
}

#[test]
fn manual_build_matches_build_index() {
    let docs = parse_collection(COLLECTION);
    let analyzer = TextAnalyzer::new(["the"], Stemming::Porter);
    let mut manual = trec_core::InvertedIndex::new();
    for (expected_id, doc) in docs.iter().enumerate() {
        let id = manual.add(doc.analyze(&analyzer)).unwrap();
        assert_eq!(id as usize, expected_id);
    }
    manual.finalize().unwrap();
    let built = build_index(&docs, &analyzer).unwrap();
    assert_eq!(manual.statistics().unwrap(), built.statistics().unwrap());
    assert_eq!(manual.postings("oil").unwrap(), built.postings("oil").unwrap());
}

#[test]
fn stopword_setting_is_recorded_even_with_empty_stop_list() {
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("AP_index_No_stemming_Stopwords"));
    let settings = AnalyzerSettings { stopwords: true, stemming: Stemming::None };
    let analyzer = settings.analyzer(&Vec::<String>::new());
    let index = build_index(&parse_collection(COLLECTION), &analyzer).unwrap();
    save_index(&paths, &index, &analyzer, settings, "").unwrap();

    let (_, _, meta) = load_index(&paths).unwrap();
    assert!(meta.stopwords);
    let recorded = AnalyzerSettings { stopwords: meta.stopwords, stemming: meta.stemming };
    let config = trec_core::Configuration::new(recorded, "bm25", trec_core::ModelParameters::default()).unwrap();
    assert_eq!(config.run_tag(), "[No_stemming][Stopwords][BM25]");
}

#[test]
fn long_tokens_index_under_every_stemmer() {
    let text = "y".repeat(400_000) + "ing short";
    let docs = vec![trec_core::Document::new("AP-LONG", text)];
    for analyzer in analyzers() {
        let index = build_index(&docs, &analyzer).unwrap();
        assert_eq!(index.document_length(0).unwrap(), 2);
        assert_eq!(index.num_terms(), 2);
    }
}
