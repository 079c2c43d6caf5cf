//! Pattern-indexed word store with layered (primary/fallback) sources.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::language::normalize;

/// Capability set shared by every lexicon tier: `words`, `match`, `contains`,
/// `add`, `by_length`. The lexicon never fails; an empty result set is valid.
pub trait Lexicon {
    fn words(&self) -> Vec<String>;
    fn matching(&self, pattern: &str) -> Vec<String>;
    fn contains(&self, word: &str) -> bool;
    fn add_words(&mut self, words: &[String]);
    fn words_by_length(&self, length: usize) -> Vec<String> {
        self.words().into_iter().filter(|w| w.chars().count() == length).collect()
    }
}

/// Build the case-sensitive regex a pattern like `H.L..` compiles to. `.` in
/// the pattern is already the regex wildcard, so this just anchors it.
fn compile_pattern(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("^{pattern}$")).ok()
}

/// In-memory lexicon with pattern matching and a per-instance match cache.
///
/// Two internal maps: the set of normalised words, and a length -> words map,
/// as `spec.md` §4.1 requires. The pattern cache is invalidated on insertion.
#[derive(Debug, Default, Clone)]
pub struct MemoryLexicon {
    words: HashSet<String>,
    by_length: HashMap<usize, Vec<String>>,
    // Interior mutability: `match` takes `&self` per the Lexicon trait, but the
    // cache still needs to record misses/hits.
    cache: RefCell<HashMap<String, Vec<String>>>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        MemoryLexicon::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lex = MemoryLexicon::new();
        let owned: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
        lex.add_words(&owned);
        lex
    }

    fn insert_normalized(&mut self, normalized: String) {
        if self.words.insert(normalized.clone()) {
            let length = normalized.chars().count();
            self.by_length.entry(length).or_default().push(normalized);
        }
    }
}

impl Lexicon for MemoryLexicon {
    fn words(&self) -> Vec<String> {
        self.words.iter().cloned().collect()
    }

    fn matching(&self, pattern: &str) -> Vec<String> {
        if let Some(cached) = self.cache.borrow().get(pattern) {
            return cached.clone();
        }

        let length = pattern.chars().count();
        let candidates = match self.by_length.get(&length) {
            Some(c) => c,
            None => return Vec::new(),
        };

        let matches = match compile_pattern(pattern) {
            Some(regex) => candidates
                .iter()
                .filter(|w| regex.is_match(w))
                .cloned()
                .collect::<Vec<_>>(),
            None => Vec::new(),
        };

        self.cache.borrow_mut().insert(pattern.to_string(), matches.clone());
        matches
    }

    fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize(word))
    }

    fn add_words(&mut self, words: &[String]) {
        for word in words {
            let normalized = normalize(word);
            if normalized.chars().count() >= 2 {
                self.insert_normalized(normalized);
            }
        }
        self.cache.borrow_mut().clear();
    }
}

/// Two-tier lexicon: a settable-as-a-whole primary tier (task-specific
/// candidates) and a fallback tier (static gap-fill vocabulary). `matching`
/// returns primary matches first, then fallback matches not already seen.
#[derive(Debug)]
pub struct HybridLexicon {
    primary: MemoryLexicon,
    fallback: MemoryLexicon,
}

impl HybridLexicon {
    pub fn new(fallback_words: &[String]) -> Self {
        HybridLexicon {
            primary: MemoryLexicon::new(),
            fallback: MemoryLexicon::from_words(fallback_words),
        }
    }

    /// Build with an already-indexed fallback tier, skipping the re-hash
    /// `new` would otherwise do.
    pub fn with_fallback(fallback: MemoryLexicon) -> Self {
        HybridLexicon {
            primary: MemoryLexicon::new(),
            fallback,
        }
    }

    /// Replace the whole primary tier atomically.
    pub fn set_primary_words(&mut self, words: &[String]) {
        self.primary = MemoryLexicon::from_words(words);
    }

    pub fn add_fallback_words(&mut self, words: &[String]) {
        self.fallback.add_words(words);
    }

    pub fn primary_words(&self) -> Vec<String> {
        self.primary.words()
    }

    pub fn fallback_words(&self) -> Vec<String> {
        self.fallback.words()
    }
}

impl Lexicon for HybridLexicon {
    fn words(&self) -> Vec<String> {
        let mut seen: HashSet<String> = self.primary.words().into_iter().collect();
        let mut all: Vec<String> = seen.iter().cloned().collect();
        for word in self.fallback.words() {
            if seen.insert(word.clone()) {
                all.push(word);
            }
        }
        all
    }

    fn matching(&self, pattern: &str) -> Vec<String> {
        let primary_matches = self.primary.matching(pattern);
        let mut seen: HashSet<String> = primary_matches.iter().cloned().collect();
        let mut result = primary_matches;
        for word in self.fallback.matching(pattern) {
            if seen.insert(word.clone()) {
                result.push(word);
            }
        }
        result
    }

    fn contains(&self, word: &str) -> bool {
        self.primary.contains(word) || self.fallback.contains(word)
    }

    fn add_words(&mut self, words: &[String]) {
        self.primary.add_words(words);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_lexicon_matches_pattern() {
        // S2: MemoryLexicon(["HELLO","HELPS","WORLD"]).match("HEL..") -> {HELLO, HELPS}
        let lex = MemoryLexicon::from_words(["HELLO", "HELPS", "WORLD"]);
        let mut matches = lex.matching("HEL..");
        matches.sort();
        assert_eq!(matches, vec!["HELLO".to_string(), "HELPS".to_string()]);
    }

    #[test]
    fn memory_lexicon_rejects_short_words() {
        let mut lex = MemoryLexicon::new();
        lex.add_words(&["A".to_string(), "OK".to_string()]);
        assert!(!lex.contains("A"));
        assert!(lex.contains("OK"));
    }

    #[test]
    fn memory_lexicon_cache_is_invalidated_on_insert() {
        let mut lex = MemoryLexicon::from_words(["CHAT"]);
        assert_eq!(lex.matching("CH.T"), vec!["CHAT".to_string()]);
        lex.add_words(&["CHIT".to_string()]);
        let mut matches = lex.matching("CH.T");
        matches.sort();
        assert_eq!(matches, vec!["CHAT".to_string(), "CHIT".to_string()]);
    }

    #[test]
    fn hybrid_lexicon_prefers_primary_and_dedups() {
        // S4: HybridLexicon(primary=["TEST","BEST"], fallback=["TEST"]).match("TEST")
        let mut lex = HybridLexicon::new(&["TEST".to_string()]);
        lex.set_primary_words(&["TEST".to_string(), "BEST".to_string()]);
        let matches = lex.matching("TEST");
        assert_eq!(matches.first(), Some(&"TEST".to_string()));
        assert_eq!(matches.iter().filter(|w| *w == "TEST").count(), 1);
    }

    #[test]
    fn hybrid_lexicon_contains_checks_both_tiers() {
        let mut lex = HybridLexicon::new(&["SCENE".to_string()]);
        lex.set_primary_words(&["CINEMA".to_string()]);
        assert!(lex.contains("cinema"));
        assert!(lex.contains("scene"));
        assert!(!lex.contains("absent"));
    }
}
