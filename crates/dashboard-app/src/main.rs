use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dashboard_app::{run, Cli, InstanceLock};
use dashboard_layout::{DashboardPaths, DashboardSettings};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let paths = match &cli.config_dir {
        Some(dir) => DashboardPaths::new(dir),
        None => DashboardPaths::user_default().context("failed to resolve configuration root")?,
    };
    let settings = DashboardSettings::load(&paths.settings_file());
    init_logging(&settings, cli.verbose);

    let Some(_lock) = InstanceLock::try_acquire(&paths.lock_file())
        .with_context(|| format!("failed to open {}", paths.lock_file().display()))?
    else {
        warn!(
            root = %paths.root().display(),
            "another dashboard is already running with this configuration"
        );
        return Ok(ExitCode::FAILURE);
    };

    let stdout = io::stdout();
    run(&cli, &paths, &settings, &mut stdout.lock())?;
    Ok(ExitCode::SUCCESS)
}

fn init_logging(settings: &DashboardSettings, verbose: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        settings.log_filter.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}
