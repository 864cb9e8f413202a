//! Question bank
//!
//! Loads the curated question→answer corpus, keys every question by its
//! normalized form and resolves utterances against it.

pub mod matcher;
mod normalize;
mod source;

use std::path::Path;

use indexmap::IndexMap;

pub use matcher::{MatchOutcome, levenshtein, resolve};
pub use normalize::{normalize, strip_accents};
pub use source::{SourceFormat, SourceRecord, parse_records};

use crate::{Error, Result};

/// A known question with its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionEntry {
    /// Normalized matching key
    pub canonical_key: String,
    /// Question exactly as written in the source document
    pub original_text: String,
    pub answer: String,
}

/// Question bank keyed by canonical key
///
/// Iteration follows insertion order. A duplicate key replaces the earlier
/// entry's content but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    entries: IndexMap<String, QuestionEntry>,
}

impl QuestionBank {
    /// Load a bank from a source document, picking the format by extension
    ///
    /// # Errors
    ///
    /// Returns `MalformedSource` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let format = SourceFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::MalformedSource(format!("failed to read {}: {e}", path.display()))
        })?;

        let bank = Self::parse(&text, format)?;
        tracing::info!(
            path = %path.display(),
            questions = bank.len(),
            "loaded question bank"
        );
        Ok(bank)
    }

    /// Parse a bank from document text
    ///
    /// # Errors
    ///
    /// Returns `MalformedSource` if the text does not parse, a record is
    /// missing a field, or a record normalizes to an empty key or answer
    pub fn parse(text: &str, format: SourceFormat) -> Result<Self> {
        let records = parse_records(text, format)?;
        Self::from_records(records)
    }

    /// Build a bank from records, normalizing each question
    ///
    /// # Errors
    ///
    /// Returns `MalformedSource` if a record has an empty key or answer
    pub fn from_records(records: impl IntoIterator<Item = SourceRecord>) -> Result<Self> {
        let mut bank = Self::default();

        for record in records {
            let canonical_key = normalize(&record.question);
            if canonical_key.is_empty() {
                return Err(Error::MalformedSource(format!(
                    "question {:?} normalizes to an empty key",
                    record.question
                )));
            }
            if record.answer.is_empty() {
                return Err(Error::MalformedSource(format!(
                    "question {:?} has an empty answer",
                    record.question
                )));
            }

            bank.insert(QuestionEntry {
                canonical_key,
                original_text: record.question,
                answer: record.answer,
            });
        }

        Ok(bank)
    }

    fn insert(&mut self, entry: QuestionEntry) {
        if let Some(previous) = self.entries.insert(entry.canonical_key.clone(), entry) {
            tracing::debug!(
                key = %previous.canonical_key,
                replaced = %previous.original_text,
                "duplicate question key, later entry wins"
            );
        }
    }

    /// Look up an entry by exact canonical key
    #[must_use]
    pub fn lookup_exact(&self, key: &str) -> Option<&QuestionEntry> {
        self.entries.get(key)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &QuestionEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(q: &str, a: &str) -> SourceRecord {
        SourceRecord {
            question: q.to_string(),
            answer: a.to_string(),
        }
    }

    #[test]
    fn test_keys_are_normalized() {
        let bank = QuestionBank::from_records([record("¿Cómo te llamas?", "Theta")]).unwrap();

        let entry = bank.lookup_exact("como te llamas").unwrap();
        assert_eq!(entry.original_text, "¿Cómo te llamas?");
        assert_eq!(entry.answer, "Theta");
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let bank = QuestionBank::from_records([
            record("What is your name?", "First"),
            record("How old are you?", "Two"),
            record("WHAT IS YOUR NAME?", "Second"),
        ])
        .unwrap();

        assert_eq!(bank.len(), 2);
        let entry = bank.lookup_exact("what is your name").unwrap();
        assert_eq!(entry.answer, "Second");
        assert_eq!(entry.original_text, "WHAT IS YOUR NAME?");

        // Position of the first insertion is kept
        let keys: Vec<&str> = bank.iter().map(|e| e.canonical_key.as_str()).collect();
        assert_eq!(keys, vec!["what is your name", "how old are you"]);
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = QuestionBank::from_records([record("?", "Nothing")]).unwrap_err();
        assert!(matches!(err, Error::MalformedSource(_)));
    }

    #[test]
    fn test_empty_answer_rejected() {
        let err = QuestionBank::from_records([record("Who are you?", "")]).unwrap_err();
        assert!(matches!(err, Error::MalformedSource(_)));
    }

    #[test]
    fn test_lookup_missing() {
        let bank = QuestionBank::from_records([record("Who are you?", "Theta")]).unwrap();
        assert!(bank.lookup_exact("who are yo").is_none());
        assert!(!bank.is_empty());
    }
}
