//! Shared test utilities

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use theta_speech::{
    DialogLimits, DialogPorts, DialogRouter, Error, ListenTrigger, OpenAnswer, QuestionBank,
    Result, SessionLog, SourceFormat, SpeechOutput, SpeechToText,
};

/// Question bank in the original XML layout
pub const SAMPLE_XML: &str = r"<questions>
    <question><q>What is your name?</q><a>Theta</a></question>
    <question><q>How old are you?</q><a>Two years old</a></question>
    <question><q>¿Qué es el número 5+3?</q><a>Ocho</a></question>
    <question><q>Who made you (and where)?</q><a>A robotics lab</a></question>
</questions>";

/// Parse the sample question bank
#[must_use]
pub fn sample_bank() -> QuestionBank {
    QuestionBank::parse(SAMPLE_XML, SourceFormat::Xml).expect("failed to parse sample bank")
}

/// Speech-to-text returning scripted utterances, then failing
#[derive(Default)]
pub struct ScriptedStt {
    utterances: Mutex<VecDeque<String>>,
}

impl ScriptedStt {
    pub fn new(utterances: &[&str]) -> Self {
        Self {
            utterances: Mutex::new(utterances.iter().map(ToString::to_string).collect()),
        }
    }
}

#[async_trait]
impl SpeechToText for ScriptedStt {
    async fn transcribe(&self) -> Result<String> {
        self.utterances
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::CollaboratorUnavailable("no more utterances".to_string()))
    }
}

/// Open answering double; `None` behaves as an unreachable service
pub struct FakeOpenAnswer {
    answer: Option<String>,
    pub asked: Mutex<Vec<String>>,
}

impl FakeOpenAnswer {
    pub fn new(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(ToString::to_string),
            asked: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OpenAnswer for FakeOpenAnswer {
    async fn ask(&self, question: &str) -> Result<String> {
        self.asked.lock().unwrap().push(question.to_string());
        self.answer
            .clone()
            .ok_or_else(|| Error::CollaboratorUnavailable("qa service down".to_string()))
    }
}

/// Speech output recording everything spoken
#[derive(Default)]
pub struct RecordingOutput {
    pub spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechOutput for RecordingOutput {
    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Listen trigger counting re-arm signals
#[derive(Default)]
pub struct CountingTrigger {
    count: AtomicUsize,
}

impl CountingTrigger {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListenTrigger for CountingTrigger {
    async fn rearm(&self) -> Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A router wired to inspectable doubles
pub struct Harness {
    pub router: DialogRouter,
    pub log: Arc<SessionLog>,
    pub open_answer: Arc<FakeOpenAnswer>,
    pub output: Arc<RecordingOutput>,
    pub trigger: Arc<CountingTrigger>,
}

impl Harness {
    pub fn spoken(&self) -> Vec<String> {
        self.output.spoken.lock().unwrap().clone()
    }

    pub fn asked(&self) -> Vec<String> {
        self.open_answer.asked.lock().unwrap().clone()
    }
}

/// Build a harness with default limits and no opening prompt
pub fn harness(bank: QuestionBank, utterances: &[&str], open_answer: Option<&str>) -> Harness {
    let log = Arc::new(SessionLog::in_memory());
    let open = Arc::new(FakeOpenAnswer::new(open_answer));
    let output = Arc::new(RecordingOutput::default());
    let trigger = Arc::new(CountingTrigger::default());

    let ports = DialogPorts {
        stt: Arc::new(ScriptedStt::new(utterances)),
        open_answer: open.clone(),
        output: output.clone(),
        trigger: trigger.clone(),
    };

    let router = DialogRouter::new(Arc::new(bank), DialogLimits::default(), log.clone(), ports);

    Harness {
        router,
        log,
        open_answer: open,
        output,
        trigger,
    }
}

/// Speech output that always fails
pub struct FailingOutput;

#[async_trait]
impl SpeechOutput for FailingOutput {
    async fn speak(&self, _text: &str) -> Result<()> {
        Err(Error::CollaboratorUnavailable("tts service down".to_string()))
    }
}

/// Listen trigger that always fails
pub struct FailingTrigger;

#[async_trait]
impl ListenTrigger for FailingTrigger {
    async fn rearm(&self) -> Result<()> {
        Err(Error::CollaboratorUnavailable("hotword gate down".to_string()))
    }
}
