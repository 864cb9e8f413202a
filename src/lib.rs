//! theta-speech - spoken question answering over a curated question bank
//!
//! This library provides the dialog core of a question-answering robot:
//! - Question bank loading and canonical key normalization
//! - Closest-question matching under edit distance
//! - Turn dispatch between predefined answers and an open answering service
//! - HTTP and terminal adapters for the speech collaborators
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │          Wake word gate  │  STT  │  TTS  │  Q&A      │
//! └────────────────────┬────────────────────────────────┘
//!                      │ hotword / HTTP
//! ┌────────────────────▼────────────────────────────────┐
//! │                 theta-speech                         │
//! │   Daemon  │  DialogRouter  │  Session log            │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │        QuestionBank  │  Normalizer  │  Matcher       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod daemon;
pub mod dialog;
pub mod error;
pub mod questions;
pub mod session_log;
pub mod voice;

pub use config::{Config, ConfigOverrides};
pub use daemon::Daemon;
pub use dialog::{
    DialogLimits, DialogPorts, DialogRouter, DialogState, ListenTrigger, OpenAnswer, Route,
    SpeechOutput, SpeechToText, TurnOutcome,
};
pub use error::{Error, Result};
pub use questions::{MatchOutcome, QuestionBank, QuestionEntry, SourceFormat, normalize};
pub use session_log::SessionLog;
