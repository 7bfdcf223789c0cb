use trec_core::{Stemming, TextAnalyzer};

fn no_stop(stemming: Stemming) -> TextAnalyzer {
    TextAnalyzer::new(Vec::<String>::new(), stemming)
}

#[test]
fn it_lowercases_and_keeps_punctuation() {
    let terms = no_stop(Stemming::None).analyze("The Cat sat.");
    assert_eq!(terms, vec!["the", "cat", "sat."]);
}

#[test]
fn it_filters_stopwords_in_order() {
    let a = TextAnalyzer::new(["the"], Stemming::None);
    assert_eq!(a.analyze("The Cat sat."), vec!["cat", "sat."]);
}

#[test]
fn it_applies_stemming_after_stop_filtering() {
    let a = TextAnalyzer::new(["running"], Stemming::Porter);
    assert_eq!(a.analyze("Running runners run"), vec!["runner", "run"]);

    let k = TextAnalyzer::new(Vec::<String>::new(), Stemming::Krovetz);
    assert_eq!(k.analyze("Ponies jumped over fences"), vec!["pony", "jump", "over", "fence"]);
}

#[test]
fn it_lowercases_non_ascii_without_locale_rules() {
    let terms = no_stop(Stemming::None).analyze("İSTANBUL ÉCOLE");
    assert_eq!(terms, vec!["i\u{307}stanbul", "école"]);
}

#[test]
fn it_is_deterministic() {
    let a = TextAnalyzer::new(["a", "of"], Stemming::Krovetz);
    let text = "A history of the Boxes and the Foxes\nof Europe";
    assert_eq!(a.analyze(text), a.analyze(text));
    assert!(a.analyze(text).iter().all(|t| !t.is_empty()));
}

#[test]
fn it_loads_stopword_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stop.txt");
    std::fs::write(&path, "the\n\n  And \nof\n").unwrap();
    let words = trec_core::load_stopwords(&path).unwrap();
    assert_eq!(words, vec!["the", "And", "of"]);
    let a = TextAnalyzer::new(&words, Stemming::None);
    assert_eq!(a.analyze("Cats and dogs"), vec!["cats", "dogs"]);

    assert!(trec_core::load_stopwords(dir.path().join("missing.txt")).unwrap().is_empty());
}
