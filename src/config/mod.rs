//! Configuration management for theta-speech

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use self::file::ThetaConfigFile;
use crate::dialog::DialogLimits;
use crate::{Error, Result};

/// Default HTTP port for the hotword and health endpoints
pub const DEFAULT_PORT: u16 = 18800;

/// Default text spoken before each transcription
pub const DEFAULT_PROMPT: &str = "what is your question?";

/// Default wait after the prompt, in seconds
pub const DEFAULT_PROMPT_DELAY_SECS: u64 = 5;

/// theta-speech configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Question bank document
    pub questions_path: PathBuf,

    /// Directory for per-session logs
    pub log_dir: PathBuf,

    /// Turn routing configuration
    pub dialog: DialogConfig,

    /// Collaborator service endpoints
    pub services: ServicesConfig,

    /// HTTP server port
    pub port: u16,
}

/// Turn routing configuration
#[derive(Debug, Clone)]
pub struct DialogConfig {
    pub limits: DialogLimits,

    /// Spoken before each transcription; `None` or empty disables it
    pub prompt: Option<String>,

    pub prompt_delay: Duration,
}

/// Collaborator service endpoints; `None` means not configured
#[derive(Debug, Clone, Default)]
pub struct ServicesConfig {
    pub stt_url: Option<String>,
    pub qa_url: Option<String>,
    pub tts_url: Option<String>,
    pub hotword_url: Option<String>,
    pub timeout: Option<Duration>,
}

/// Values given on the command line, taking precedence over everything else
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub questions_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration (cli > env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if a limit or number is invalid
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let fc = file::load_config_file();
        Self::resolve(fc, overrides, |key| std::env::var(key).ok())
    }

    /// Merge a config file, overrides and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns `Config` if an env value does not parse or the limits are
    /// inconsistent
    pub fn resolve(
        fc: ThetaConfigFile,
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let questions_path = overrides
            .questions_path
            .clone()
            .or_else(|| env("THETA_QUESTIONS").map(PathBuf::from))
            .or_else(|| fc.questions_path.map(PathBuf::from))
            .unwrap_or_else(|| data_dir().join("questions").join("Questions.xml"));

        let log_dir = overrides
            .log_dir
            .clone()
            .or_else(|| env("THETA_LOG_DIR").map(PathBuf::from))
            .or_else(|| fc.log_dir.map(PathBuf::from))
            .unwrap_or_else(|| data_dir().join("logs"));

        // Dialog (env > toml > default)
        let limits = DialogLimits {
            predefined_limit: parse_env(&env, "THETA_PREDEFINED_LIMIT")?
                .or(fc.dialog.predefined_limit)
                .unwrap_or(crate::dialog::DEFAULT_PREDEFINED_LIMIT),
            relisten_limit: parse_env(&env, "THETA_RELISTEN_LIMIT")?
                .or(fc.dialog.relisten_limit)
                .unwrap_or(crate::dialog::DEFAULT_RELISTEN_LIMIT),
        };
        if limits.predefined_limit > limits.relisten_limit {
            tracing::warn!(
                predefined = limits.predefined_limit,
                relisten = limits.relisten_limit,
                "predefined limit above relisten limit, open answers are unreachable"
            );
        }

        let prompt = env("THETA_PROMPT")
            .or(fc.dialog.prompt)
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());
        let prompt_delay_secs = parse_env(&env, "THETA_PROMPT_DELAY_SECS")?
            .or(fc.dialog.prompt_delay_secs)
            .unwrap_or(DEFAULT_PROMPT_DELAY_SECS);

        let dialog = DialogConfig {
            limits,
            prompt: Some(prompt).filter(|p| !p.trim().is_empty()),
            prompt_delay: Duration::from_secs(prompt_delay_secs),
        };

        // Services (env > toml > unset)
        let services = ServicesConfig {
            stt_url: env("THETA_STT_URL").or(fc.services.stt_url),
            qa_url: env("THETA_QA_URL").or(fc.services.qa_url),
            tts_url: env("THETA_TTS_URL").or(fc.services.tts_url),
            hotword_url: env("THETA_HOTWORD_URL").or(fc.services.hotword_url),
            timeout: fc.services.timeout_secs.map(Duration::from_secs),
        };

        let port = match overrides.port {
            Some(port) => port,
            None => parse_env(&env, "THETA_PORT")?
                .or(fc.server.port)
                .unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            questions_path,
            log_dir,
            dialog,
            services,
            port,
        })
    }
}

/// Parse an optional env value, failing on garbage rather than ignoring it
fn parse_env<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    env(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid value for {key}: {raw:?}")))
        })
        .transpose()
}

/// Data directory: `~/.local/share/theta/speech` on Linux
fn data_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".local/share/theta/speech"),
        |d| d.data_dir().join("theta").join("speech"),
    )
}
