//! Porter (1980) suffix stripper, in the revision Martin Porter distributes as the
//! reference C implementation (`-bli` → `-ble`, `-logi` → `-log`). This is the
//! algorithm behind Lucene's `PorterStemFilter`, not the later Snowball "Porter2".

use std::borrow::Cow;

const STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou", "ism", "ate",
    "iti", "ous", "ive", "ize",
];

/// Stem one lowercased token. Tokens of one or two characters are returned unchanged.
pub fn porter_stem(word: &str) -> Cow<'_, str> {
    if word.chars().nth(2).is_none() {
        return Cow::Borrowed(word);
    }
    let mut w = Word::new(word);
    w.step1ab();
    w.step1c();
    w.step2();
    w.step3();
    w.step4();
    w.step5();

    let stemmed: String = w.b[..w.end].iter().collect();
    if stemmed == word {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(stemmed)
    }
}

/// Working buffer. `b[..end]` is the current word and `b[..stem]` the part in front of
/// the suffix matched last. `cons[i]` caches whether `b[i]` is a consonant.
struct Word {
    b: Vec<char>,
    cons: Vec<bool>,
    end: usize,
    stem: usize,
}

impl Word {
    fn new(word: &str) -> Self {
        let b: Vec<char> = word.chars().collect();
        let end = b.len();
        let mut w = Word { b, cons: Vec::with_capacity(end), end, stem: end };
        w.refresh(0);
        w
    }

    /// Recompute consonant flags from `from` on. `y` is a consonant at the start of a
    /// word or after a vowel.
    fn refresh(&mut self, from: usize) {
        self.cons.truncate(from);
        for i in from..self.b.len() {
            let c = match self.b[i] {
                'a' | 'e' | 'i' | 'o' | 'u' => false,
                'y' => i == 0 || !self.cons[i - 1],
                _ => true,
            };
            self.cons.push(c);
        }
    }

    /// Number of vowel-consonant sequences in `b[..stem]`, the `m` of `[C](VC)^m[V]`.
    fn measure(&self) -> usize {
        let cons = &self.cons[..self.stem];
        let mut i = 0;
        let mut n = 0;
        while i < cons.len() && cons[i] {
            i += 1;
        }
        loop {
            while i < cons.len() && !cons[i] {
                i += 1;
            }
            if i == cons.len() {
                return n;
            }
            while i < cons.len() && cons[i] {
                i += 1;
            }
            n += 1;
            if i == cons.len() {
                return n;
            }
        }
    }

    fn vowel_in_stem(&self) -> bool {
        self.cons[..self.stem].iter().any(|&c| !c)
    }

    fn double_consonant(&self, i: usize) -> bool {
        i >= 1 && self.b[i] == self.b[i - 1] && self.cons[i]
    }

    /// consonant-vowel-consonant ending at `i`, the last consonant not w, x or y
    fn cvc(&self, i: usize) -> bool {
        i >= 2
            && self.cons[i]
            && !self.cons[i - 1]
            && self.cons[i - 2]
            && !matches!(self.b[i], 'w' | 'x' | 'y')
    }

    /// Whether the word ends with `suffix`; on a match `stem` marks where it begins.
    fn ends(&mut self, suffix: &str) -> bool {
        let len = suffix.len();
        if len > self.end || !self.b[self.end - len..self.end].iter().copied().eq(suffix.chars()) {
            return false;
        }
        self.stem = self.end - len;
        true
    }

    /// Replace everything after `stem` with `s`.
    fn set_to(&mut self, s: &str) {
        self.b.truncate(self.stem);
        self.b.extend(s.chars());
        self.end = self.b.len();
        self.refresh(self.stem);
    }

    fn replace_if_measured(&mut self, s: &str) {
        if self.measure() > 0 {
            self.set_to(s);
        }
    }

    /// Plurals, `-ed` and `-ing`.
    fn step1ab(&mut self) {
        if self.b[self.end - 1] == 's' {
            if self.ends("sses") {
                self.end -= 2;
            } else if self.ends("ies") {
                self.set_to("i");
            } else if self.b[self.end - 2] != 's' {
                self.end -= 1;
            }
        }
        if self.ends("eed") {
            if self.measure() > 0 {
                self.end -= 1;
            }
        } else if (self.ends("ed") || self.ends("ing")) && self.vowel_in_stem() {
            self.end = self.stem;
            if self.ends("at") {
                self.set_to("ate");
            } else if self.ends("bl") {
                self.set_to("ble");
            } else if self.ends("iz") {
                self.set_to("ize");
            } else if self.double_consonant(self.end - 1) {
                if !matches!(self.b[self.end - 1], 'l' | 's' | 'z') {
                    self.end -= 1;
                }
            } else if self.measure() == 1 && self.cvc(self.end - 1) {
                self.set_to("e");
            }
        }
    }

    /// Terminal `y` to `i` when the stem has a vowel.
    fn step1c(&mut self) {
        if self.ends("y") && self.vowel_in_stem() {
            let last = self.end - 1;
            self.b[last] = 'i';
            self.refresh(last);
        }
    }

    fn step2(&mut self) {
        if self.end < 2 {
            return;
        }
        if let Some((_, to)) = STEP2.iter().find(|(from, _)| self.ends(from)) {
            self.replace_if_measured(to);
        }
    }

    fn step3(&mut self) {
        if let Some((_, to)) = STEP3.iter().find(|(from, _)| self.ends(from)) {
            self.replace_if_measured(to);
        }
    }

    fn step4(&mut self) {
        if self.end < 2 {
            return;
        }
        let Some(&suffix) = STEP4.iter().find(|s| self.ends(s)) else {
            return;
        };
        if suffix == "ion" && !(self.stem > 0 && matches!(self.b[self.stem - 1], 's' | 't')) {
            return;
        }
        if self.measure() > 1 {
            self.end = self.stem;
        }
    }

    /// Final `-e` and `-ll`. `measure` still counts the `e` dropped here.
    fn step5(&mut self) {
        self.stem = self.end;
        if self.b[self.end - 1] == 'e' {
            let m = self.measure();
            if m > 1 || (m == 1 && !(self.end >= 2 && self.cvc(self.end - 2))) {
                self.end -= 1;
            }
        }
        if self.b[self.end - 1] == 'l' && self.double_consonant(self.end - 1) && self.measure() > 1 {
            self.end -= 1;
        }
    }
}
