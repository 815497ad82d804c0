//! hostscope entry point.
//!
//! Loads settings and the registry snapshot, runs the optional one-shot scan,
//! then hands stdin/stdout to the shell.

use anyhow::{Context, Result};
use clap::Parser;
use hostscope::cli::Args;
use hostscope::config::{Paths, Settings};
use hostscope::output;
use hostscope::shell::Shell;
use hostscope::storage::{JsonFileStore, Registry};
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let args = Args::parse();
    hostscope::logging::init(args.verbose);

    let paths = Paths::discover().context("failed to locate configuration directories")?;
    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(&paths),
    }
    .context("failed to load settings")?;

    if let Some(snapshot) = args.snapshot {
        settings.snapshot_path = Some(snapshot);
    }
    if let Some(timeout) = args.timeout {
        settings.scan_timeout_secs = Some(timeout);
    }

    let store = JsonFileStore::new(settings.snapshot_path(&paths));
    let registry = Registry::load(&store);
    info!(hosts = registry.len(), snapshot = %store.path().display(), "registry ready");

    let mut shell = Shell::new(registry, settings.scanner(), store)
        .with_policy(settings.on_scan_error);

    if let Some(e) = shell.startup_scan(&args.targets).await {
        output::print_error(&format!("initial scan failed: {}", e));
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    match shell.run(stdin, &mut stdout).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            output::print_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}
