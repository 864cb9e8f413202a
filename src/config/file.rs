//! TOML configuration file loading
//!
//! Supports `~/.config/theta/speech/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ThetaConfigFile {
    /// Question bank document (XML, TOML, YAML or JSON)
    pub questions_path: Option<String>,

    /// Directory for per-session logs
    pub log_dir: Option<String>,

    /// Turn routing configuration
    #[serde(default)]
    pub dialog: DialogFileConfig,

    /// Collaborator service endpoints
    #[serde(default)]
    pub services: ServicesFileConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// Turn routing configuration
#[derive(Debug, Default, Deserialize)]
pub struct DialogFileConfig {
    /// Turns answered from the question bank
    pub predefined_limit: Option<u32>,

    /// Turns after which listening is no longer re-armed
    pub relisten_limit: Option<u32>,

    /// Text spoken before each transcription
    pub prompt: Option<String>,

    /// Seconds to wait after the prompt
    pub prompt_delay_secs: Option<u64>,
}

/// Collaborator service endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ServicesFileConfig {
    pub stt_url: Option<String>,
    pub qa_url: Option<String>,
    pub tts_url: Option<String>,
    pub hotword_url: Option<String>,

    /// Per-request timeout applied by the HTTP adapters
    pub timeout_secs: Option<u64>,
}

/// Server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// HTTP port for the hotword and health endpoints
    pub port: Option<u16>,
}

/// Parse config file contents
///
/// # Errors
///
/// Returns error if the TOML is invalid
pub fn parse_config_file(content: &str) -> Result<ThetaConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Load the TOML config file from the standard path
///
/// Returns `ThetaConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ThetaConfigFile {
    let Some(path) = config_file_path() else {
        return ThetaConfigFile::default();
    };

    if !path.exists() {
        return ThetaConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ThetaConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ThetaConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/theta/speech/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| {
        d.config_dir()
            .join("theta")
            .join("speech")
            .join("config.toml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let fc = parse_config_file(
            r#"
            questions_path = "/srv/theta/Questions.xml"

            [dialog]
            relisten_limit = 10

            [services]
            qa_url = "http://localhost:5000/qa"
            "#,
        )
        .unwrap();

        assert_eq!(fc.questions_path.as_deref(), Some("/srv/theta/Questions.xml"));
        assert_eq!(fc.dialog.relisten_limit, Some(10));
        assert_eq!(fc.dialog.predefined_limit, None);
        assert_eq!(fc.services.qa_url.as_deref(), Some("http://localhost:5000/qa"));
        assert_eq!(fc.server.port, None);
    }

    #[test]
    fn test_invalid_file() {
        assert!(parse_config_file("dialog = 3 = 4").is_err());
    }
}
