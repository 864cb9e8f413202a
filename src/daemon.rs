//! Daemon - the main dialog service
//!
//! Loads the question bank, opens the session log, and runs one dialog turn
//! per wake-word event until interrupted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::{ApiServer, ApiState, HotwordEvent};
use crate::config::ServicesConfig;
use crate::dialog::{DialogPorts, DialogRouter, DialogState};
use crate::questions::QuestionBank;
use crate::session_log::SessionLog;
use crate::voice::{
    ConsoleInput, ConsoleOutput, HttpListenTrigger, HttpOpenAnswer, HttpSpeechOutput,
    HttpSpeechToText, LogOnlyOutput, LogOnlyTrigger, RearmFlag, ServiceClient, Unconfigured,
};
use crate::{Config, Result};

/// Pending wake-word events held while a turn runs
const HOTWORD_QUEUE: usize = 16;

/// The dialog daemon - one session per process
pub struct Daemon {
    config: Config,
    bank: Arc<QuestionBank>,
    log: Arc<SessionLog>,
}

impl Daemon {
    /// Start a session: load the question bank and open the session log
    ///
    /// # Errors
    ///
    /// Returns `MalformedSource` if the bank cannot be loaded, or an IO
    /// error if the log cannot be created
    pub fn new(config: Config) -> Result<Self> {
        let log = SessionLog::create(&config.log_dir)?;
        log.log("Starting Speech Recognition");

        let bank = QuestionBank::load(&config.questions_path)?;
        if bank.is_empty() {
            tracing::warn!(
                path = %config.questions_path.display(),
                "question bank is empty, predefined turns will fail"
            );
        }

        if let Some(path) = log.path() {
            tracing::info!(path = %path.display(), "session log created");
        }

        Ok(Self {
            config,
            bank: Arc::new(bank),
            log: Arc::new(log),
        })
    }

    /// Loaded question bank
    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Run the HTTP-driven session until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if the service adapters cannot be built or the API
    /// server fails
    pub async fn run(self) -> Result<()> {
        let ports = build_ports(&self.config.services)?;
        let router = self.router(ports, self.config.dialog.prompt_delay);

        let (hotword_tx, mut hotword_rx) = mpsc::channel(HOTWORD_QUEUE);
        let turns = Arc::new(AtomicU32::new(0));

        let state = Arc::new(ApiState {
            hotword_tx,
            questions: self.bank.len(),
            turns: Arc::clone(&turns),
            limits: self.config.dialog.limits,
        });
        let mut server = ApiServer::new(state, self.config.port).spawn();

        tracing::info!(
            port = self.config.port,
            questions = self.bank.len(),
            predefined_limit = self.config.dialog.limits.predefined_limit,
            relisten_limit = self.config.dialog.limits.relisten_limit,
            "daemon running, waiting for hotword"
        );

        // Set up shutdown signal
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        let mut session = DialogState::new();

        tokio::select! {
            () = process_hotwords(&router, &mut session, &mut hotword_rx, &mut shutdown_rx, &turns) => {}
            result = &mut server => {
                match result {
                    Ok(Ok(())) => tracing::info!("API server stopped"),
                    Ok(Err(e)) => return Err(e),
                    Err(e) => return Err(crate::Error::Config(format!("API server task failed: {e}"))),
                }
            }
        }

        server.abort();
        tracing::info!(turns = session.turn_count(), "session ended");
        Ok(())
    }

    /// Run a session on the terminal: stdin lines are utterances, answers
    /// are printed
    ///
    /// The session ends when a turn does not re-arm listening, either
    /// because the turn limit was reached or because the turn failed.
    ///
    /// # Errors
    ///
    /// Returns error if the open answering adapter cannot be built
    pub async fn run_console(self) -> Result<()> {
        let rearm = Arc::new(RearmFlag::armed());
        let ports = DialogPorts {
            stt: Arc::new(ConsoleInput::stdin()),
            open_answer: open_answer_port(&self.config.services)?,
            output: Arc::new(ConsoleOutput),
            trigger: rearm.clone(),
        };
        let router = self.router(ports, Duration::ZERO);

        let mut session = DialogState::new();
        while rearm.take() {
            if let Err(e) = router.run_turn(&mut session).await {
                report_failed_turn(&e, &session);
            }
        }

        tracing::info!(turns = session.turn_count(), "console session ended");
        Ok(())
    }

    fn router(&self, ports: DialogPorts, prompt_delay: Duration) -> DialogRouter {
        let router = DialogRouter::new(
            Arc::clone(&self.bank),
            self.config.dialog.limits,
            Arc::clone(&self.log),
            ports,
        );

        match &self.config.dialog.prompt {
            Some(prompt) => router.with_prompt(prompt.clone(), prompt_delay),
            None => router,
        }
    }
}

/// Run one turn per queued hotword event until the queue closes or shutdown
/// is requested
///
/// A failed turn is reported and skipped; the loop keeps running. Shutdown
/// is only observed between turns, so a turn in progress always finishes.
pub async fn process_hotwords(
    router: &DialogRouter,
    session: &mut DialogState,
    hotword_rx: &mut mpsc::Receiver<HotwordEvent>,
    shutdown_rx: &mut mpsc::Receiver<()>,
    turns: &AtomicU32,
) {
    loop {
        tokio::select! {
            biased;

            Some(()) = shutdown_rx.recv() => {
                tracing::info!("shutdown requested");
                break;
            }
            event = hotword_rx.recv() => {
                if event.is_none() {
                    tracing::info!("hotword queue closed");
                    break;
                }
            }
        }

        tracing::debug!(turns = session.turn_count(), "hotword received");

        match router.run_turn(session).await {
            Ok(outcome) => {
                tracing::debug!(route = %outcome.route, rearmed = outcome.rearmed, "turn answered");
            }
            Err(e) => report_failed_turn(&e, session),
        }

        turns.store(session.turn_count(), Ordering::SeqCst);
    }
}

/// A failed turn produces no answer and does not re-arm listening
fn report_failed_turn(error: &crate::Error, session: &DialogState) {
    tracing::error!(
        error = %error,
        turns = session.turn_count(),
        "turn aborted: no answer spoken, listening not re-armed"
    );
}

/// Build collaborator ports from configured service URLs
///
/// Unset URLs fall back to stand-ins: transcription and open answering fail
/// the turn, speech output and re-arm only log.
///
/// # Errors
///
/// Returns `Config` if an HTTP client cannot be built
pub fn build_ports(services: &ServicesConfig) -> Result<DialogPorts> {
    let stt: Arc<dyn crate::dialog::SpeechToText> = match &services.stt_url {
        Some(url) => Arc::new(HttpSpeechToText::new(ServiceClient::new(
            "speech-to-text",
            url,
            services.timeout,
        )?)),
        None => {
            tracing::warn!("no speech-to-text service configured");
            Arc::new(Unconfigured::new("speech-to-text"))
        }
    };

    let output: Arc<dyn crate::dialog::SpeechOutput> = match &services.tts_url {
        Some(url) => Arc::new(HttpSpeechOutput::new(ServiceClient::new(
            "text-to-speech",
            url,
            services.timeout,
        )?)),
        None => Arc::new(LogOnlyOutput),
    };

    let trigger: Arc<dyn crate::dialog::ListenTrigger> = match &services.hotword_url {
        Some(url) => Arc::new(HttpListenTrigger::new(ServiceClient::new(
            "hotword gate",
            url,
            services.timeout,
        )?)),
        None => Arc::new(LogOnlyTrigger),
    };

    Ok(DialogPorts {
        stt,
        open_answer: open_answer_port(services)?,
        output,
        trigger,
    })
}

fn open_answer_port(services: &ServicesConfig) -> Result<Arc<dyn crate::dialog::OpenAnswer>> {
    let port: Arc<dyn crate::dialog::OpenAnswer> = match &services.qa_url {
        Some(url) => Arc::new(HttpOpenAnswer::new(ServiceClient::new(
            "question answering",
            url,
            services.timeout,
        )?)),
        None => {
            tracing::warn!("no open answering service configured, open turns will fail");
            Arc::new(Unconfigured::new("question answering"))
        }
    };
    Ok(port)
}
