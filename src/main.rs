use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use theta_speech::questions::{self, QuestionBank};
use theta_speech::{Config, ConfigOverrides, Daemon, SessionLog};

/// theta-speech - Spoken question answering over a curated question bank
#[derive(Parser)]
#[command(name = "theta-speech", version, about)]
struct Cli {
    /// Question bank document (XML, TOML, YAML or JSON)
    #[arg(short, long, env = "THETA_QUESTIONS", global = true)]
    questions: Option<PathBuf>,

    /// Directory for per-session logs
    #[arg(long, env = "THETA_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Port for the hotword and health endpoints
    #[arg(long, env = "THETA_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the dialog service, one turn per hotword event (default)
    Serve,
    /// Run a session on the terminal, one utterance per input line
    Console,
    /// Resolve a question against the bank and show the distance table
    Match {
        /// Question text as it would be recognized
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,theta_speech=info",
        1 => "info,theta_speech=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        questions_path: cli.questions,
        log_dir: cli.log_dir,
        port: cli.port,
    };
    let config = Config::load(&overrides)?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(questions = %config.questions_path.display(), "starting theta-speech");
            Daemon::new(config)?.run().await?;
        }
        Command::Console => {
            Daemon::new(config)?.run_console().await?;
        }
        Command::Match { text } => match_question(&config, &text)?,
    }

    Ok(())
}

/// Resolve one question offline and print how it matched
fn match_question(config: &Config, text: &str) -> anyhow::Result<()> {
    let bank = QuestionBank::load(&config.questions_path)?;
    let log = SessionLog::in_memory();

    let key = questions::normalize(text);
    let outcome = questions::resolve(&key, &bank, &log)?;

    println!("Key:      {key}");
    println!("Question: {}", outcome.entry.original_text);
    println!("Answer:   {}", outcome.entry.answer);
    if outcome.exact {
        println!("Match:    exact");
    } else {
        println!("Match:    nearest (distance {})", outcome.distance);
        println!("---");
        for line in log.lines() {
            println!("{line}");
        }
    }

    Ok(())
}
