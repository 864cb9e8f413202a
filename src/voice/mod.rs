//! Collaborator adapters
//!
//! HTTP adapters for the speech-to-text, open answering, speech output and
//! wake-word services, plus terminal adapters for driving a session by hand.

mod answer;
mod client;
pub mod console;
mod hotword;
mod stt;
mod tts;

use async_trait::async_trait;

pub use answer::HttpOpenAnswer;
pub use client::ServiceClient;
pub use console::{ConsoleInput, ConsoleOutput, RearmFlag};
pub use hotword::{HttpListenTrigger, LogOnlyTrigger};
pub use stt::HttpSpeechToText;
pub use tts::{HttpSpeechOutput, LogOnlyOutput};

use crate::dialog::{OpenAnswer, SpeechToText};
use crate::{Error, Result};

/// Stand-in for a service that is not configured
///
/// Every call fails with `CollaboratorUnavailable`, so a turn that needs the
/// service aborts instead of answering silently.
pub struct Unconfigured {
    service: &'static str,
}

impl Unconfigured {
    #[must_use]
    pub const fn new(service: &'static str) -> Self {
        Self { service }
    }

    fn error(&self) -> Error {
        Error::CollaboratorUnavailable(format!("no {} service configured", self.service))
    }
}

#[async_trait]
impl OpenAnswer for Unconfigured {
    async fn ask(&self, _question: &str) -> Result<String> {
        Err(self.error())
    }
}

#[async_trait]
impl SpeechToText for Unconfigured {
    async fn transcribe(&self) -> Result<String> {
        Err(self.error())
    }
}
