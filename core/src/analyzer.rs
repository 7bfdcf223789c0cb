use crate::error::Result;
use crate::stem::Stemming;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// A normalized token, the key of the inverted index.
pub type Term = String;

/// Built-in English stop list, used when no stopword file is supplied.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","down","during",
    "each","few","for","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
    "let's","me","more","most","mustn't","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
    "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","very",
    "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
    "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
];

/// Whitespace tokenizer, lowercase filter, optional stop filter and optional stemmer,
/// applied in that order.
///
/// The analyzer holds no state besides its configuration, so one instance can be shared
/// by indexing and every ranking model searching the resulting index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnalyzer {
    stopwords: BTreeSet<String>,
    stemming: Stemming,
}

impl TextAnalyzer {
    pub fn new<I, S>(stopwords: I, stemming: Stemming) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { stopwords, stemming }
    }

    pub fn stemming(&self) -> Stemming {
        self.stemming
    }

    /// Turn raw text into terms, preserving token order.
    pub fn analyze(&self, text: &str) -> Vec<Term> {
        text.split_whitespace()
            .map(str::to_lowercase)
            .filter(|token| !self.stopwords.contains(token))
            .map(|token| self.stemming.stem(&token).into_owned())
            .collect()
    }
}

/// Read a stop list: one token per line, blank lines ignored. A missing file is an empty list.
pub fn load_stopwords<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let text = match fs::read_to_string(path.as_ref()) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.as_ref().display(), "stopword file not found, stop filtering disabled");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
