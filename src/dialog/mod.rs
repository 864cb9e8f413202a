//! Turn dispatch
//!
//! A session-scoped turn counter decides, per utterance, whether the answer
//! comes from the question bank or from the open answering service, and
//! whether listening is re-armed afterwards.
//!
//! ```text
//! hotword ─► prompt ─► SpeechToText ─► route ─┬─► Predefined (bank + matcher)
//!                                             └─► Open (OpenAnswer)
//!                      SpeechOutput ◄─ answer ◄┘
//!                      ListenTrigger ◄─ advance (until relisten limit)
//! ```

mod router;

use async_trait::async_trait;

pub use router::{DialogPorts, DialogRouter};

use crate::Result;
use crate::questions::MatchOutcome;

/// Turns answered from the question bank before switching to open answers
pub const DEFAULT_PREDEFINED_LIMIT: u32 = 2;

/// Turns after which listening is no longer re-armed
pub const DEFAULT_RELISTEN_LIMIT: u32 = 6;

/// Counter thresholds for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLimits {
    /// Turns below this count use the predefined answer path
    pub predefined_limit: u32,
    /// Turns below this count advance the counter and re-arm listening
    pub relisten_limit: u32,
}

impl Default for DialogLimits {
    fn default() -> Self {
        Self {
            predefined_limit: DEFAULT_PREDEFINED_LIMIT,
            relisten_limit: DEFAULT_RELISTEN_LIMIT,
        }
    }
}

/// Answer path for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Answer from the question bank
    Predefined,
    /// Forward to the open answering service
    Open,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Predefined => write!(f, "predefined"),
            Self::Open => write!(f, "open"),
        }
    }
}

/// Per-session dialog state
///
/// Only [`DialogState::advance`] mutates the counter, once per completed
/// turn; it never exceeds the relisten limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogState {
    turn_count: u32,
}

impl DialogState {
    #[must_use]
    pub const fn new() -> Self {
        Self { turn_count: 0 }
    }

    /// Completed turns that advanced the counter
    #[must_use]
    pub const fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Pick the answer path for the next utterance
    #[must_use]
    pub const fn route(&self, limits: &DialogLimits) -> Route {
        if self.turn_count < limits.predefined_limit {
            Route::Predefined
        } else {
            Route::Open
        }
    }

    /// Record a completed turn
    ///
    /// Returns `true` if the counter advanced and listening should be
    /// re-armed.
    pub const fn advance(&mut self, limits: &DialogLimits) -> bool {
        if self.turn_count < limits.relisten_limit {
            self.turn_count += 1;
            true
        } else {
            false
        }
    }
}

/// Result of a completed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub route: Route,
    /// Recognized text as received
    pub utterance: String,
    /// Bank match, on the predefined path
    pub matched: Option<MatchOutcome>,
    pub answer: String,
    /// Whether listening was re-armed after this turn
    pub rearmed: bool,
}

/// Speech-to-text collaborator
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Recognize the current utterance
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorUnavailable` if recognition fails
    async fn transcribe(&self) -> Result<String>;
}

/// Open-domain answering collaborator
#[async_trait]
pub trait OpenAnswer: Send + Sync {
    /// Answer a free-form question
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorUnavailable` if the service cannot answer
    async fn ask(&self, question: &str) -> Result<String>;
}

/// Speech output sink
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Speak the given text
    ///
    /// # Errors
    ///
    /// Returns error if the text could not be handed to the output
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Upstream wake-word gate
#[async_trait]
pub trait ListenTrigger: Send + Sync {
    /// Let the gate accept another utterance
    ///
    /// # Errors
    ///
    /// Returns error if the signal could not be delivered
    async fn rearm(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_boundary() {
        let limits = DialogLimits::default();
        let mut state = DialogState::new();

        assert_eq!(state.route(&limits), Route::Predefined);
        assert!(state.advance(&limits));
        assert_eq!(state.route(&limits), Route::Predefined);
        assert!(state.advance(&limits));
        assert_eq!(state.turn_count(), 2);
        assert_eq!(state.route(&limits), Route::Open);
    }

    #[test]
    fn test_advance_caps_at_relisten_limit() {
        let limits = DialogLimits::default();
        let mut state = DialogState::new();

        for _ in 0..6 {
            assert!(state.advance(&limits));
        }
        assert_eq!(state.turn_count(), 6);

        assert!(!state.advance(&limits));
        assert!(!state.advance(&limits));
        assert_eq!(state.turn_count(), 6);
        assert_eq!(state.route(&limits), Route::Open);
    }

    #[test]
    fn test_custom_limits() {
        let limits = DialogLimits {
            predefined_limit: 0,
            relisten_limit: 1,
        };
        let mut state = DialogState::new();

        assert_eq!(state.route(&limits), Route::Open);
        assert!(state.advance(&limits));
        assert!(!state.advance(&limits));
    }
}
