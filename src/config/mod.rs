use anyhow::{Context, Result};
use fs_err as fs;
use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::provider::RequestParameters;

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_LINKS_FILE: &str = ".links";

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub env_file: PathBuf,
    pub links_file: PathBuf,
    pub params: RequestParameters,
    pub dry_run: bool,
    pub save_dir: Option<PathBuf>,
    pub progress: bool,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env_file: DEFAULT_ENV_FILE.into(),
            links_file: DEFAULT_LINKS_FILE.into(),
            params: RequestParameters::default(),
            dry_run: false,
            save_dir: None,
            progress: false,
            debug: false,
        }
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Self {
        let mut cfg = Settings::default();
        cfg.env_file = args.env_file.clone();
        cfg.links_file = args.links_file.clone();
        if let Some(t) = args.temperature() {
            cfg.params.temperature = t;
        }
        if let Some(p) = &args.prompt {
            cfg.params.user_prompt = p.clone();
        }
        if let Some(s) = &args.system {
            cfg.params.system_prompt = s.clone();
        }
        cfg.dry_run = args.dry_run;
        cfg.save_dir = args.save_dir.clone();
        cfg.progress = args.progress();
        cfg.debug = args.debug;
        cfg
    }
}

/// Parse `key=value` lines.
///
/// Blank lines and lines starting with `#` are skipped, as are lines without
/// an `=`. The first `=` splits key from value and nothing is trimmed, so
/// `a = b` yields the key `"a "` and the value `" b"`.
pub fn parse_assignments(text: &str) -> Vec<(String, String)> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn load_assignments(path: &Path) -> Result<Vec<(String, String)>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to load config file {}", path.display()))?;
    Ok(parse_assignments(&text))
}
