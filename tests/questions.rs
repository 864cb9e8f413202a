//! Question bank and matcher integration tests

use std::io::Write;

use theta_speech::questions::{SourceRecord, levenshtein, resolve};
use theta_speech::{Error, QuestionBank, SessionLog, SourceFormat, normalize};

mod common;
use common::{SAMPLE_XML, sample_bank};

/// Write `content` to a temp file with the given extension
fn source_file(content: &str, extension: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn bank_of(questions: &[&str]) -> QuestionBank {
    QuestionBank::from_records(questions.iter().enumerate().map(|(i, q)| SourceRecord {
        question: (*q).to_string(),
        answer: format!("answer {i}"),
    }))
    .unwrap()
}

#[test]
fn test_normalization_example() {
    assert_eq!(normalize("Qué es el número 5+3?"), "que es el numero 5 plus3");
}

#[test]
fn test_normalization_is_deterministic() {
    for input in ["What is your name?", "¿Cómo estás?", "(1+1), 2?", "", "x"] {
        assert_eq!(normalize(input), normalize(input));
    }
}

#[test]
fn test_trailing_word_character_is_dropped() {
    // Questions not ending in `?` lose their last letter
    assert_eq!(normalize("Tell me a joke"), "tell me a jok");
    assert_eq!(normalize("Tell me a joke?"), "tell me a joke");
}

#[test]
fn test_load_xml_file() {
    let file = source_file(SAMPLE_XML, "xml");
    let bank = QuestionBank::load(file.path()).unwrap();

    assert_eq!(bank.len(), 4);
    let entry = bank.lookup_exact("que es el numero 5 plus3").unwrap();
    assert_eq!(entry.original_text, "¿Qué es el número 5+3?");
    assert_eq!(entry.answer, "Ocho");
}

#[test]
fn test_load_toml_yaml_json_files() {
    let toml = "[[question]]\nq = \"How old are you?\"\na = \"Two\"\n";
    let yaml = "question:\n  - q: How old are you?\n    a: Two\n";
    let json = r#"{"question": [{"q": "How old are you?", "a": "Two"}]}"#;

    for (content, ext) in [(toml, "toml"), (yaml, "yaml"), (json, "json")] {
        let file = source_file(content, ext);
        let bank = QuestionBank::load(file.path()).unwrap();
        assert_eq!(bank.lookup_exact("how old are you").unwrap().answer, "Two", "{ext}");
    }
}

#[test]
fn test_load_missing_file() {
    let err = QuestionBank::load(std::path::Path::new("/nonexistent/Questions.xml")).unwrap_err();
    assert!(matches!(err, Error::MalformedSource(_)));
}

#[test]
fn test_load_unsupported_extension() {
    let file = source_file(SAMPLE_XML, "txt");
    let err = QuestionBank::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::MalformedSource(_)));
}

#[test]
fn test_load_record_without_answer() {
    let xml = "<questions><question><q>Who are you?</q></question></questions>";
    let file = source_file(xml, "xml");
    let err = QuestionBank::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::MalformedSource(_)));
}

#[test]
fn test_duplicate_questions_overwrite() {
    let xml = "<questions>
        <question><q>What is your name?</q><a>Theta</a></question>
        <question><q>what is your name?</q><a>Still Theta</a></question>
    </questions>";
    let file = source_file(xml, "xml");
    let bank = QuestionBank::load(file.path()).unwrap();

    assert_eq!(bank.len(), 1);
    let entry = bank.lookup_exact("what is your name").unwrap();
    assert_eq!(entry.answer, "Still Theta");
    assert_eq!(entry.original_text, "what is your name?");
}

#[test]
fn test_xml_text_is_trimmed() {
    let xml = "<questions>
        <question>
            <q>
                What is your name?
            </q>
            <a>
                Theta
            </a>
        </question>
    </questions>";
    let bank = QuestionBank::parse(xml, SourceFormat::Xml).unwrap();

    let entry = bank.lookup_exact("what is your name").unwrap();
    assert_eq!(entry.original_text, "What is your name?");
    assert_eq!(entry.answer, "Theta");
}

#[test]
fn test_exact_match_has_priority() {
    // "ab" is an exact key even though "abc" comes first and is one edit away
    let bank = bank_of(&["abc?", "ab?"]);
    let log = SessionLog::in_memory();

    let outcome = resolve("ab", &bank, &log).unwrap();
    assert!(outcome.exact);
    assert_eq!(outcome.entry.canonical_key, "ab");
    assert!(log.lines().is_empty());
}

#[test]
fn test_nearest_match() {
    let bank = bank_of(&["What is your name?", "How old are you?"]);
    let outcome = resolve("what is your nam", &bank, &SessionLog::in_memory()).unwrap();

    assert_eq!(outcome.entry.canonical_key, "what is your name");
    assert_eq!(outcome.distance, 1);
}

#[test]
fn test_nearest_match_minimizes_distance() {
    let bank = sample_bank();
    let query = "who made you and were";

    let outcome = resolve(query, &bank, &SessionLog::in_memory()).unwrap();
    let best = bank
        .iter()
        .map(|e| levenshtein(query, &e.canonical_key))
        .min()
        .unwrap();

    assert_eq!(outcome.distance, best);
    assert_eq!(outcome.entry.answer, "A robotics lab");
}

#[test]
fn test_tie_break_first_inserted() {
    let bank = bank_of(&["cat?", "bat?", "hat?"]);

    for _ in 0..5 {
        let outcome = resolve("rat", &bank, &SessionLog::in_memory()).unwrap();
        assert_eq!(outcome.distance, 1);
        assert_eq!(outcome.entry.canonical_key, "cat");
    }
}

#[test]
fn test_empty_bank() {
    let err = resolve("hello", &QuestionBank::default(), &SessionLog::in_memory()).unwrap_err();
    assert!(matches!(err, Error::EmptyBank));
}
