//! Canonical key normalization for question text

use unicode_normalization::UnicodeNormalization;

/// Literal substitutions applied after accent stripping, in order
const SUBSTITUTIONS: &[(&str, &str)] = &[("+", " plus"), ("(", ""), (")", ""), (",", "")];

/// Turn raw question text into its canonical matching key
///
/// Lowercases, drops the final character, strips accents down to ASCII and
/// applies the literal substitutions. The final character is dropped
/// whether or not it is a `?`, so the transform is not idempotent: normalize
/// raw text exactly once.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_lowercase();
    text.pop();

    let mut key = strip_accents(&text);
    for (from, to) in SUBSTITUTIONS {
        key = key.replace(from, to);
    }

    key
}

/// Decompose to NFKD and keep only ASCII characters
#[must_use]
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_and_plus() {
        assert_eq!(normalize("Qué es el número 5+3?"), "que es el numero 5 plus3");
    }

    #[test]
    fn test_parentheses_and_commas_deleted() {
        assert_eq!(
            normalize("What is (roughly), the answer?"),
            "what is roughly the answer"
        );
    }

    #[test]
    fn test_trailing_character_dropped_without_question_mark() {
        // Last character goes even when it is part of a word
        assert_eq!(normalize("How old are you"), "how old are yo");
    }

    #[test]
    fn test_not_idempotent() {
        let once = normalize("Who are you?");
        assert_eq!(once, "who are you");
        assert_eq!(normalize(&once), "who are yo");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?"), "");
    }

    #[test]
    fn test_strip_accents_drops_non_ascii() {
        assert_eq!(strip_accents("¿mañana?"), "manana?");
        assert_eq!(strip_accents("ÉLAN"), "ELAN");
    }

    #[test]
    fn test_deterministic() {
        let input = "¿Cuál es tu nombre, (robot)?";
        assert_eq!(normalize(input), normalize(input));
        assert_eq!(normalize(input), "cual es tu nombre robot");
    }
}
