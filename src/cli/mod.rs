use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::{DEFAULT_ENV_FILE, DEFAULT_LINKS_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "llm_call",
    version,
    about = "Send one completion request to an LLM provider configured in .env/.links files"
)]
pub struct Args {
    /// Service to call (openai, mistral, gemini, claude)
    #[arg(conflicts_with = "all")]
    pub service: Option<String>,

    /// Sampling temperature, 0.0 to 2.0 [default: 0.7]
    #[arg(value_parser = parse_temperature, conflicts_with = "temperature_opt")]
    pub temperature: Option<f64>,

    /// Call every service that has both an API key and a URL
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Temperature as a flag, for use with --all
    #[arg(short = 't', long = "temperature", value_parser = parse_temperature)]
    pub temperature_opt: Option<f64>,

    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    #[arg(long, default_value = DEFAULT_LINKS_FILE)]
    pub links_file: PathBuf,

    /// User message
    #[arg(long)]
    pub prompt: Option<String>,

    /// System message (chat-completions services only)
    #[arg(long)]
    pub system: Option<String>,

    /// Build and print requests without sending them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Save request bodies and responses under this directory
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Single(String),
    All,
}

impl Args {
    /// `None` when neither a service nor `--all` was given.
    pub fn target(&self) -> Option<Target> {
        match (&self.service, self.all) {
            (Some(s), _) => Some(Target::Single(s.clone())),
            (None, true) => Some(Target::All),
            (None, false) => None,
        }
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature.or(self.temperature_opt)
    }

    pub fn progress(&self) -> bool {
        !self.no_progress && !self.debug && std::io::stderr().is_terminal()
    }
}

pub fn usage() -> String {
    Args::command().render_usage().to_string()
}

fn parse_temperature(s: &str) -> Result<f64, String> {
    let t: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !(0.0..=2.0).contains(&t) {
        return Err(format!("{t} is outside 0.0..=2.0"));
    }
    Ok(t)
}
