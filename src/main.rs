use clap::Parser;
use std::process::ExitCode;

mod cli;
mod config;
mod dispatch;
mod errors;
mod log;
mod provider;
mod registry;
mod transport;
mod ux;

use cli::Target;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::Args::try_parse() {
        Ok(a) => a,
        Err(e) => {
            // --help and --version land here too.
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::Args) -> anyhow::Result<ExitCode> {
    let Some(target) = args.target() else {
        eprintln!("{}", cli::usage());
        eprintln!("a service name (or --all) is required");
        return Ok(ExitCode::FAILURE);
    };

    let cfg = config::Settings::from_args(&args);
    let registry = registry::ServiceRegistry::load(&cfg.env_file, &cfg.links_file)?;
    let transport = transport::ReqwestTransport::new()?;

    let selected: Vec<&str> = match &target {
        Target::Single(s) => vec![s.as_str()],
        Target::All => registry.eligible_services(),
    };
    let artifacts = match &cfg.save_dir {
        Some(dir) if !cfg.dry_run => Some(log::RunArtifacts::create(dir, &selected)?),
        _ => None,
    };
    if cfg.debug {
        if let Some(run) = &artifacts {
            eprintln!("debug: run {} artifacts in {}", run.run_id, run.dir.display());
        }
    }

    let dispatcher = dispatch::Dispatcher::new(&registry, &cfg.params, &transport)
        .dry_run(cfg.dry_run)
        .debug(cfg.debug)
        .progress(cfg.progress)
        .artifacts(artifacts.as_ref());

    match &target {
        Target::Single(service) => {
            let res = dispatcher.run_single(service).await;
            match &res {
                Ok(outcome) => ux::print_outcome(outcome),
                Err(e) => ux::print_error(e),
            }
            Ok(ExitCode::from(dispatch::exit_status(&res)))
        }
        Target::All => {
            if selected.is_empty() {
                ux::warn("no service has both an API key and a URL");
                return Ok(ExitCode::SUCCESS);
            }
            let report = dispatcher.run_batch(ux::print_batch_result).await;
            ux::print_batch_summary(&report);
            Ok(ExitCode::SUCCESS)
        }
    }
}
