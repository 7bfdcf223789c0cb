use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref TOP_RE: Regex = Regex::new(r"(?s)<top>(.*?)</top>").expect("valid regex");
    static ref NUM_RE: Regex = Regex::new(r"<num>\s*(?:Number:)?\s*(\S+)").expect("valid regex");
    static ref TITLE_RE: Regex = Regex::new(r"(?s)<title>(.*?)(?:<|\z)").expect("valid regex");
}

/// Parse a TREC topics file into `query id -> title`.
///
/// The title runs from `<title>` to the next tag; a leading `Topic:` label is dropped and
/// inner whitespace collapsed. Topics without a number or title are skipped.
pub fn parse_topics(raw: &str) -> BTreeMap<String, String> {
    let mut topics = BTreeMap::new();
    for cap in TOP_RE.captures_iter(raw) {
        let body = &cap[1];
        let num = NUM_RE.captures(body).map(|c| c[1].to_string());
        let title = TITLE_RE.captures(body).map(|c| {
            let t = c[1].trim();
            let t = t.strip_prefix("Topic:").unwrap_or(t);
            t.split_whitespace().collect::<Vec<_>>().join(" ")
        });
        match (num, title) {
            (Some(num), Some(title)) if !title.is_empty() => {
                topics.insert(num, title);
            }
            (num, _) => tracing::warn!(?num, "skipping topic without number or title"),
        }
    }
    topics
}

pub fn read_topics<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>> {
    let bytes = fs::read(path.as_ref())?;
    let topics = parse_topics(&String::from_utf8_lossy(&bytes));
    tracing::info!(path = %path.as_ref().display(), num_topics = topics.len(), "read topics");
    Ok(topics)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<top>
<head> Tipster Topic Description
<num> Number: 051
<dom> Domain: International Economics
<title> Topic: Airbus Subsidies

<desc> Description:
Document will discuss government assistance to Airbus Industrie.
</top>

<top>
<num> Number: 052
<title> Topic: South African
  Sanctions
<desc> Description:
</top>
";

    #[test]
    fn extracts_number_and_title() {
        let topics = parse_topics(SAMPLE);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics["051"], "Airbus Subsidies");
        assert_eq!(topics["052"], "South African Sanctions");
    }

    #[test]
    fn skips_incomplete_topics() {
        let topics = parse_topics("<top><num> Number: 7 </top><top><title> Topic: x </top>");
        assert!(topics.is_empty());
    }
}
