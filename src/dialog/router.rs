//! Dialog router - runs one turn at a time against the session state

use std::sync::Arc;
use std::time::Duration;

use super::{
    DialogLimits, DialogState, ListenTrigger, OpenAnswer, Route, SpeechOutput, SpeechToText,
    TurnOutcome,
};
use crate::questions::{self, MatchOutcome, QuestionBank};
use crate::session_log::SessionLog;
use crate::Result;

/// Collaborators the router calls out to
#[derive(Clone)]
pub struct DialogPorts {
    pub stt: Arc<dyn SpeechToText>,
    pub open_answer: Arc<dyn OpenAnswer>,
    pub output: Arc<dyn SpeechOutput>,
    pub trigger: Arc<dyn ListenTrigger>,
}

/// Routes utterances to the predefined or open answer path
///
/// The router holds no turn state of its own: the session's [`DialogState`]
/// is passed in on every call and only advanced after a turn completes.
pub struct DialogRouter {
    bank: Arc<QuestionBank>,
    limits: DialogLimits,
    log: Arc<SessionLog>,
    ports: DialogPorts,
    prompt: Option<String>,
    prompt_delay: Duration,
}

impl DialogRouter {
    /// Create a router without an opening prompt
    #[must_use]
    pub fn new(
        bank: Arc<QuestionBank>,
        limits: DialogLimits,
        log: Arc<SessionLog>,
        ports: DialogPorts,
    ) -> Self {
        Self {
            bank,
            limits,
            log,
            ports,
            prompt: None,
            prompt_delay: Duration::ZERO,
        }
    }

    /// Speak `prompt` and wait `delay` before each transcription
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>, delay: Duration) -> Self {
        self.prompt = Some(prompt.into());
        self.prompt_delay = delay;
        self
    }

    #[must_use]
    pub const fn limits(&self) -> &DialogLimits {
        &self.limits
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Run a full turn: prompt, transcribe, answer, speak, re-arm
    ///
    /// # Errors
    ///
    /// Returns error if transcription or answering fails. The state is left
    /// untouched and listening is not re-armed.
    pub async fn run_turn(&self, state: &mut DialogState) -> Result<TurnOutcome> {
        if let Some(prompt) = &self.prompt {
            self.speak(prompt).await;
            if !self.prompt_delay.is_zero() {
                tokio::time::sleep(self.prompt_delay).await;
            }
        }

        tracing::info!("waiting for a question");
        let utterance = self.ports.stt.transcribe().await?;
        tracing::info!(utterance = %utterance, "recognized");

        self.complete_turn(state, &utterance).await
    }

    /// Answer an already recognized utterance, speak it and advance the state
    ///
    /// # Errors
    ///
    /// Returns error if answering fails. The state is left untouched and
    /// listening is not re-armed.
    pub async fn complete_turn(
        &self,
        state: &mut DialogState,
        utterance: &str,
    ) -> Result<TurnOutcome> {
        let (route, matched, answer) = self.handle_utterance(state, utterance).await?;

        self.speak(&answer).await;

        let rearmed = state.advance(&self.limits);
        if rearmed {
            if let Err(e) = self.ports.trigger.rearm().await {
                tracing::warn!(error = %e, "failed to re-arm listening");
            }
        } else {
            tracing::info!(
                turns = state.turn_count(),
                "turn limit reached, listening not re-armed"
            );
        }

        tracing::info!(
            %route,
            turns = state.turn_count(),
            rearmed,
            "turn complete"
        );

        Ok(TurnOutcome {
            route,
            utterance: utterance.to_string(),
            matched,
            answer,
            rearmed,
        })
    }

    /// Compute the answer for an utterance without side effects on the
    /// state or output ports
    ///
    /// # Errors
    ///
    /// Returns `EmptyBank` on the predefined path with an empty bank, or
    /// `CollaboratorUnavailable` if the open answering service fails
    pub async fn handle_utterance(
        &self,
        state: &DialogState,
        utterance: &str,
    ) -> Result<(Route, Option<MatchOutcome>, String)> {
        let route = state.route(&self.limits);
        tracing::debug!(%route, turns = state.turn_count(), "routing utterance");

        self.log.log(&format!("Understood: {utterance}"));

        match route {
            Route::Predefined => {
                let outcome = self.predefined_answer(utterance)?;
                let answer = outcome.entry.answer.clone();
                Ok((route, Some(outcome), answer))
            }
            Route::Open => {
                let answer = self.ports.open_answer.ask(utterance).await?;
                self.log.log(&format!("Answer: {answer}"));
                Ok((route, None, answer))
            }
        }
    }

    /// Resolve an utterance against the question bank
    ///
    /// # Errors
    ///
    /// Returns `EmptyBank` if the bank has no entries
    pub fn predefined_answer(&self, utterance: &str) -> Result<MatchOutcome> {
        let key = questions::normalize(utterance);

        if self.bank.lookup_exact(&key).is_none() {
            self.log.log("Looking for similar questions...");
        }

        let outcome = questions::resolve(&key, &self.bank, &self.log)?;

        self.log
            .log(&format!("Question: {}", outcome.entry.original_text));
        self.log.log(&format!("Answer: {}", outcome.entry.answer));

        Ok(outcome)
    }

    /// Hand text to the speech output; failures are logged, not returned
    async fn speak(&self, text: &str) {
        tracing::debug!(text, "speaking");
        if let Err(e) = self.ports.output.speak(text).await {
            tracing::warn!(error = %e, "speech output failed");
        }
    }
}
