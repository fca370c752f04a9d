use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::{to_string_pretty, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::provider::{Headers, RequestSpec};
use crate::transport::HttpReply;

const REDACTED: &str = "***";

fn is_query_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~%+".contains(c)
}

/// Mask `key=<secret>` query parameters in `text` (a URL or an error message
/// quoting one). Other text is left alone, however short the secret.
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    let needle = format!("key={secret}");
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (i, _) in text.match_indices(&needle) {
        let end = i + needle.len();
        let starts_param = i > 0 && matches!(text.as_bytes()[i - 1], b'?' | b'&');
        let ends_param = text[end..].chars().next().map_or(true, |c| !is_query_char(c));
        if starts_param && ends_param {
            out.push_str(&text[last..i]);
            out.push_str("key=");
            out.push_str(REDACTED);
            last = end;
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Mask a header value that is the secret, or an auth scheme followed by it
/// (`Bearer <secret>`).
fn redact_header_value(value: &str, secret: &str) -> String {
    if secret.is_empty() {
        return value.to_string();
    }
    if value == secret {
        return REDACTED.to_string();
    }
    match value.strip_suffix(secret) {
        Some(scheme) if scheme.ends_with(' ') && !scheme.trim().contains(' ') => {
            format!("{scheme}{REDACTED}")
        }
        _ => value.to_string(),
    }
}

pub fn redact_headers(headers: &Headers, secret: &str) -> Headers {
    headers
        .iter()
        .map(|(k, v)| (k.clone(), redact_header_value(v, secret)))
        .collect()
}

/// Per-run artifact directory: `<root>/<run id>/`.
pub struct RunArtifacts {
    pub run_id: Uuid,
    pub dir: PathBuf,
}

#[derive(Serialize)]
struct Manifest<'a> {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    services: &'a [&'a str],
}

#[derive(Serialize)]
struct SavedReply<'a> {
    status: u16,
    body: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<&'a str>,
}

impl RunArtifacts {
    pub fn create(root: &Path, services: &[&str]) -> Result<Self> {
        let run_id = Uuid::new_v4();
        let dir = root.join(run_id.to_string());
        fs::create_dir_all(&dir)?;
        let manifest = Manifest { run_id, started_at: Utc::now(), services };
        fs::write(dir.join("run.json"), to_string_pretty(&manifest)?)?;
        Ok(Self { run_id, dir })
    }

    /// Only the body is written; headers hold the credential.
    pub fn save_request(&self, service: &str, spec: &RequestSpec) -> Result<PathBuf> {
        let p = self.dir.join(format!("{service}.request.json"));
        fs::write(&p, to_string_pretty(&spec.body)?)
            .with_context(|| format!("failed to save request for {service}"))?;
        Ok(p)
    }

    /// JSON bodies are stored parsed; anything else is kept verbatim under `raw`.
    pub fn save_response(&self, service: &str, reply: &HttpReply) -> Result<PathBuf> {
        let p = self.dir.join(format!("{service}.response.json"));
        let saved = match serde_json::from_str::<Value>(&reply.body) {
            Ok(body) => SavedReply { status: reply.status, body, raw: None },
            Err(_) => SavedReply { status: reply.status, body: Value::Null, raw: Some(&reply.body) },
        };
        fs::write(&p, to_string_pretty(&saved)?)
            .with_context(|| format!("failed to save response for {service}"))?;
        Ok(p)
    }
}

pub fn print_request_debug(service: &str, url: &str, spec: &RequestSpec) -> Result<()> {
    eprintln!("debug[{service}]: POST {url}");
    for (k, v) in &spec.headers {
        eprintln!("debug[{service}]: header {k}: {v}");
    }
    eprintln!("debug[{service}]: body:\n{}", to_string_pretty(&spec.body)?);
    std::io::stderr().flush().ok();
    Ok(())
}

pub fn print_reply_debug(service: &str, reply: &HttpReply) {
    eprintln!("debug[{service}]: raw status: {}", reply.status);
    eprintln!("debug[{service}]: raw response:\n{}", reply.body);
    std::io::stderr().flush().ok();
}

pub fn print_saved_path(service: &str, path: &Path) {
    eprintln!("debug[{service}]: saved {}", path.display());
}
