//! Question source document parsing
//!
//! Every format carries the same shape: a list of `question` records, each
//! with a `q` (question text) and an `a` (answer text).
//!
//! ```text
//! XML   <questions><question><q>…</q><a>…</a></question></questions>
//! TOML  [[question]]  q = "…"  a = "…"
//! YAML  question: [{ q: …, a: … }]
//! JSON  { "question": [{ "q": …, "a": … }] }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// Question source document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Xml,
    Toml,
    Yaml,
    Json,
}

impl SourceFormat {
    /// Pick the format from a file extension
    ///
    /// # Errors
    ///
    /// Returns `MalformedSource` if the extension is missing or unknown
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xml" => Ok(Self::Xml),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(Error::MalformedSource(format!(
                "unsupported question source format: {}",
                path.display()
            ))),
        }
    }
}

/// One question/answer record as written in the source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    question: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    q: Option<String>,
    a: Option<String>,
}

/// Parse a source document into records, in document order
///
/// # Errors
///
/// Returns `MalformedSource` if the document does not parse or a record is
/// missing its question or answer
pub fn parse_records(text: &str, format: SourceFormat) -> Result<Vec<SourceRecord>> {
    let doc: RawDocument = match format {
        SourceFormat::Xml => quick_xml::de::from_str(text).map_err(malformed)?,
        SourceFormat::Toml => toml::from_str(text).map_err(malformed)?,
        SourceFormat::Yaml => serde_yaml::from_str(text).map_err(malformed)?,
        SourceFormat::Json => serde_json::from_str(text).map_err(malformed)?,
    };

    doc.question
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let question = raw.q.ok_or_else(|| {
                Error::MalformedSource(format!("record {index} has no question"))
            })?;
            let answer = raw.a.ok_or_else(|| {
                Error::MalformedSource(format!("record {index} has no answer"))
            })?;
            Ok(SourceRecord { question, answer })
        })
        .collect()
}

fn malformed(e: impl std::fmt::Display) -> Error {
    Error::MalformedSource(e.to_string())
}
