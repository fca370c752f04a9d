use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::dispatch::{BatchReport, Outcome};
use crate::errors::DispatchError;
use crate::provider;

/// Spinner on stderr while a request is in flight.
pub fn spinner(service: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("waiting for {service}..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn warn(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// What a delivered outcome writes to stdout: the raw body of a 200 reply
/// and nothing else, so output can be piped.
pub fn stdout_body(outcome: &Outcome) -> Option<&str> {
    match outcome {
        Outcome::Delivered { reply, .. } if reply.is_ok() => Some(&reply.body),
        _ => None,
    }
}

pub fn print_outcome(outcome: &Outcome) {
    match (outcome, stdout_body(outcome)) {
        (Outcome::Delivered { service, .. }, Some(body)) => {
            eprintln!("{} {}", format!("[{service}]").green().bold(), "200 OK".green());
            println!("{body}");
        }
        (Outcome::Delivered { service, reply }, None) => {
            eprintln!(
                "{} HTTP {}",
                format!("[{service}]").red().bold(),
                reply.status.to_string().red()
            );
            eprintln!("{}", reply.body);
        }
        (Outcome::DryRun { service, url, spec }, _) => {
            println!("{} {} {}", format!("[{service}]").cyan().bold(), "dry-run POST".cyan(), url);
            for (k, v) in &spec.headers {
                println!("  {k}: {v}");
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&spec.body).unwrap_or_else(|_| spec.body.to_string())
            );
        }
    }
}

pub fn print_error(err: &DispatchError) {
    eprintln!("{} {}", "error:".red().bold(), err);
    if let DispatchError::UnsupportedService(_) = err {
        eprintln!("supported services: {}", provider::supported_services().join(", "));
    }
}

/// Services that were never sent read as warnings; sent-but-failed as errors.
pub fn print_batch_result(res: &Result<Outcome, DispatchError>) {
    match res {
        Ok(o) => print_outcome(o),
        Err(e) if e.is_transport() => print_error(e),
        Err(e) => warn(&format!("skipping {}: {e}", e.service())),
    }
}

pub fn print_batch_summary(report: &BatchReport) {
    eprintln!(
        "\n{}: {}   {}: {}   {}: {}   {}: {}",
        "Delivered".green().bold(),
        report.delivered(),
        "Upstream errors".yellow().bold(),
        report.upstream_errors(),
        "Failed".red().bold(),
        report.failed(),
        "Skipped".bold(),
        report.skipped()
    );
}
