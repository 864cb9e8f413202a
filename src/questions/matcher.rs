//! Closest-question resolution
//!
//! Exact key lookup first, then a full Levenshtein scan of the bank.

use super::{QuestionBank, QuestionEntry};
use crate::session_log::SessionLog;
use crate::{Error, Result};

/// Result of resolving a key against the bank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub entry: QuestionEntry,
    /// Edit distance between the query key and the entry's key
    pub distance: usize,
    /// Whether the key was found verbatim
    pub exact: bool,
}

/// Resolve a canonical key to the closest known question
///
/// On a miss every candidate is compared in insertion order and its distance
/// written to the session log. The first entry with the smallest distance
/// wins.
///
/// # Errors
///
/// Returns `EmptyBank` if the bank has no entries
pub fn resolve(key: &str, bank: &QuestionBank, log: &SessionLog) -> Result<MatchOutcome> {
    if bank.is_empty() {
        return Err(Error::EmptyBank);
    }

    if let Some(entry) = bank.lookup_exact(key) {
        tracing::debug!(key, "exact question match");
        return Ok(MatchOutcome {
            entry: entry.clone(),
            distance: 0,
            exact: true,
        });
    }

    log.log_plain("\tLD\tQuestion");

    let mut best: Option<(usize, &QuestionEntry)> = None;
    for candidate in bank.iter() {
        let distance = levenshtein(key, &candidate.canonical_key);
        tracing::trace!(distance, candidate = %candidate.canonical_key, "compared");
        log.log_plain(&format!("\t{distance}\t{}", candidate.canonical_key));

        if best.is_none_or(|(min, _)| distance < min) {
            best = Some((distance, candidate));
        }
    }

    let (distance, entry) =
        best.ok_or_else(|| Error::LookupFailure(format!("no candidate for key {key:?}")))?;
    tracing::debug!(key, matched = %entry.canonical_key, distance, "nearest question match");

    Ok(MatchOutcome {
        entry: entry.clone(),
        distance,
        exact: false,
    })
}

/// Levenshtein edit distance with unit insert, delete and substitute costs
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row over `b`
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1)
                .min(row[j] + 1)
                .min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b.len()]
}
