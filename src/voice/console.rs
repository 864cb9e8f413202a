//! Terminal adapters: stdin as speech-to-text, stdout as speech output

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::dialog::{ListenTrigger, SpeechOutput, SpeechToText};
use crate::{Error, Result};

/// Reads one utterance per input line
pub struct ConsoleInput<R> {
    lines: Mutex<Lines<R>>,
}

impl ConsoleInput<BufReader<Stdin>> {
    /// Read utterances from stdin
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleInput<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SpeechToText for ConsoleInput<R> {
    async fn transcribe(&self) -> Result<String> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(Error::CollaboratorUnavailable("console input closed".to_string())),
        }
    }
}

/// Prints spoken text to stdout
pub struct ConsoleOutput;

#[async_trait]
impl SpeechOutput for ConsoleOutput {
    async fn speak(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

/// Records re-arm signals so a console loop knows whether to keep reading
#[derive(Debug, Default)]
pub struct RearmFlag {
    armed: AtomicBool,
}

impl RearmFlag {
    /// Create a flag that starts armed, so the first turn runs
    #[must_use]
    pub const fn armed() -> Self {
        Self {
            armed: AtomicBool::new(true),
        }
    }

    /// Consume the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }
}

#[async_trait]
impl ListenTrigger for RearmFlag {
    async fn rearm(&self) -> Result<()> {
        self.armed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
