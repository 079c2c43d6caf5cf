//! French-style text normalisation shared by the lexicon and grid builder.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalise a string for crossword use:
/// decompose accented characters (NFD), discard combining marks, keep only
/// alphabetic characters, and upper-case the result.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_punctuation() {
        // S3: normalize("Café Résumé") -> "CAFERESUME"
        assert_eq!(normalize("Café Résumé"), "CAFERESUME");
    }

    #[test]
    fn keeps_only_letters() {
        assert_eq!(normalize("Élève, 1ère!"), "ELEVEERE");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("123 --"), "");
    }
}
