use crate::error::{Error, Result};
use crate::porter::porter_stem;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    /// Words whose suffix is part of the word, or which KStem's dictionary keeps as is.
    static ref PROTECTED: HashSet<&'static str> = {
        let words: &[&str] = &[
            "during","nothing","something","anything","everything","morning","evening","ceiling",
            "wedding","sibling","herring","pudding","spring","string","thing","king","ring","wing",
            "hundred","naked","wicked","sacred","hatred","rugged","kindred",
            "was","has","is","this","does","news","series","species","always","perhaps","bias","atlas",
            "lens","canvas","politics","economics","physics","ethics","mathematics",
        ];
        words.iter().copied().collect()
    };
}

/// Stemming mode of an analyzer. Closed set, chosen once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stemming {
    None,
    Porter,
    Krovetz,
}

impl Stemming {
    pub const ALL: [Stemming; 3] = [Stemming::None, Stemming::Porter, Stemming::Krovetz];

    /// Label used in run tags and index directory names.
    pub fn display_name(self) -> &'static str {
        match self {
            Stemming::None => "No_stemming",
            Stemming::Porter => "Porter_stemming",
            Stemming::Krovetz => "Krovetz_stemming",
        }
    }

    /// Stem a lowercased token. Never returns an empty string for a non-empty token.
    pub fn stem<'a>(self, token: &'a str) -> Cow<'a, str> {
        let stemmed = match self {
            Stemming::None => return Cow::Borrowed(token),
            Stemming::Porter => porter_stem(token),
            Stemming::Krovetz => krovetz_stem(token),
        };
        if stemmed.is_empty() {
            Cow::Borrowed(token)
        } else {
            stemmed
        }
    }
}

impl fmt::Display for Stemming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stemming::None => "none",
            Stemming::Porter => "porter",
            Stemming::Krovetz => "krovetz",
        };
        f.write_str(name)
    }
}

impl FromStr for Stemming {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "no stemming" | "no_stemming" => Ok(Stemming::None),
            "porter" => Ok(Stemming::Porter),
            "krovetz" | "kstem" => Ok(Stemming::Krovetz),
            other => Err(Error::configuration(format!("unsupported stemming option: {other:?}"))),
        }
    }
}

const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("men", "man"),
    ("mice", "mouse"),
    ("teeth", "tooth"),
    ("women", "woman"),
    ("goes", "go"),
];

/// Krovetz-style light stemmer.
///
/// Mostly inflectional: plurals, `-ed` and `-ing` are conflated to the base form, and a
/// few transparent derivational suffixes (`-ly`, `-ness`, `-ment`) are removed. Unlike
/// Porter the result is meant to stay a readable word. Tokens containing anything other
/// than ASCII lowercase letters are left alone, and so are protected words such as
/// `during` or `morning` whose ending only looks like a suffix.
pub fn krovetz_stem(word: &str) -> Cow<'_, str> {
    if word.len() < 3 || !word.bytes().all(|b| b.is_ascii_lowercase()) || PROTECTED.contains(word) {
        return Cow::Borrowed(word);
    }
    if let Some((_, base)) = IRREGULAR.iter().find(|(w, _)| *w == word) {
        return Cow::Owned((*base).to_string());
    }

    let mut stem = word.to_string();
    strip_plural(&mut stem);
    if !PROTECTED.contains(stem.as_str()) {
        if !strip_past(&mut stem) {
            strip_progressive(&mut stem);
        }
        strip_derivational(&mut stem);
    }

    if stem == word {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(stem)
    }
}

fn is_aeiou(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// `y` is a vowel after a consonant, so inside a run of `y`s the role alternates,
/// starting from the letter in front of the run.
fn is_vowel(b: &[u8], i: usize) -> bool {
    match b[i] {
        c if is_aeiou(c) => true,
        b'y' => {
            let run_start = b[..i].iter().rposition(|&c| c != b'y').map_or(0, |p| p + 1);
            let first_is_vowel = run_start > 0 && !is_aeiou(b[run_start - 1]);
            first_is_vowel == ((i - run_start) % 2 == 0)
        }
        _ => false,
    }
}

/// The first vowel of a word is either a, e, i, o, u or a `y` after a consonant.
fn has_vowel(s: &str) -> bool {
    s.bytes().enumerate().any(|(i, c)| is_aeiou(c) || (c == b'y' && i > 0))
}

/// consonant-vowel-consonant ending, last consonant not w/x/y
fn ends_cvc(s: &str) -> bool {
    let b = s.as_bytes();
    let n = b.len();
    n >= 3
        && !is_vowel(b, n - 3)
        && is_vowel(b, n - 2)
        && !is_vowel(b, n - 1)
        && !matches!(b[n - 1], b'w' | b'x' | b'y')
}

fn ends_double_consonant(s: &str) -> bool {
    let b = s.as_bytes();
    let n = b.len();
    n >= 2 && b[n - 1] == b[n - 2] && !is_vowel(b, n - 1)
}

fn strip_plural(stem: &mut String) {
    let n = stem.len();
    if stem.ends_with("ies") && n > 4 {
        stem.truncate(n - 3);
        stem.push('y');
    } else if stem.ends_with("sses") {
        stem.truncate(n - 2);
    } else if stem.ends_with("es")
        && n > 4
        && ["s", "x", "z", "ch", "sh"].iter().any(|suf| stem[..n - 2].ends_with(suf))
    {
        stem.truncate(n - 2);
    } else if stem.ends_with('s')
        && n > 3
        && !stem.ends_with("ss")
        && !stem.ends_with("us")
        && !stem.ends_with("is")
    {
        stem.truncate(n - 1);
    }
}

/// Restore the base form after an inflectional suffix was cut off.
fn repair_base(base: &str) -> String {
    if base.ends_with("at") || base.ends_with("bl") || base.ends_with("iz") {
        return format!("{base}e");
    }
    if ends_double_consonant(base) && !matches!(base.as_bytes()[base.len() - 1], b'l' | b's' | b'z') {
        return base[..base.len() - 1].to_string();
    }
    let b = base.as_bytes();
    let short_vc = b.len() == 2 && is_vowel(b, 0) && !is_vowel(b, 1);
    if (base.len() == 3 && ends_cvc(base)) || short_vc {
        return format!("{base}e");
    }
    base.to_string()
}

fn strip_past(stem: &mut String) -> bool {
    let n = stem.len();
    if !stem.ends_with("ed") || n < 4 || stem.ends_with("eed") {
        return false;
    }
    if stem.ends_with("ied") && n > 4 {
        stem.truncate(n - 3);
        stem.push('y');
        return true;
    }
    let base = &stem[..n - 2];
    if !has_vowel(base) {
        return false;
    }
    *stem = repair_base(base);
    true
}

fn strip_progressive(stem: &mut String) -> bool {
    let n = stem.len();
    if !stem.ends_with("ing") || n < 5 {
        return false;
    }
    let base = &stem[..n - 3];
    if !has_vowel(base) {
        return false;
    }
    *stem = repair_base(base);
    true
}

fn strip_derivational(stem: &mut String) {
    let n = stem.len();
    if stem.ends_with("ily") && n > 5 {
        stem.truncate(n - 3);
        stem.push('y');
    } else if stem.ends_with("ly") && n > 5 {
        stem.truncate(n - 2);
    } else if stem.ends_with("iness") && n > 7 {
        stem.truncate(n - 5);
        stem.push('y');
    } else if stem.ends_with("ness") && n > 6 {
        stem.truncate(n - 4);
    } else if stem.ends_with("ment") && n > 8 {
        stem.truncate(n - 4);
    }
}
