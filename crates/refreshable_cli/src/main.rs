//! Refreshable CLI
//!
//! Runs headless pull-to-refresh scenarios and scaffolds `refreshable.toml`.

mod project;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use refreshable_app::{run_loaded_scenario, HeadlessScenario, LoggingConfig, RefreshableConfig};
use refreshable_core::{RefreshConfig, RefreshMode};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "refreshable", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to refreshable.toml or the directory holding it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log everything at debug level, ignoring RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless scenario and print its JSON report
    Run {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Refresh mode used when the scenario does not name one
        #[arg(short, long)]
        mode: Option<String>,

        /// Also write the report to this relative path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Create refreshable.toml and a starter scenario
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Refresh mode preset written to the config
        #[arg(short, long, default_value = "normal")]
        mode: String,

        /// Overwrite an existing refreshable.toml
        #[arg(long)]
        force: bool,
    },
    /// List refresh mode presets
    Modes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            mode,
            report,
        } => {
            let config = load_config(cli.config.as_deref())?;
            init_logging(&config.logging, cli.verbose);
            let passed = cmd_run(&config, &scenario, mode.as_deref(), report.as_deref())?;
            if !passed {
                std::process::exit(1);
            }
        }
        Commands::Init { path, mode, force } => {
            init_logging(&LoggingConfig::default(), cli.verbose);
            cmd_init(&path, &mode, force)?;
        }
        Commands::Modes => {
            init_logging(&LoggingConfig::default(), cli.verbose);
            cmd_modes()?;
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RefreshableConfig> {
    match path {
        Some(path) => RefreshableConfig::load_from_dir(path),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            RefreshableConfig::load_or_default(&cwd)
        }
    }
}

fn cmd_run(
    config: &RefreshableConfig,
    scenario_path: &Path,
    mode: Option<&str>,
    report_path: Option<&Path>,
) -> Result<bool> {
    let scenario = HeadlessScenario::from_path(scenario_path)?;
    let default_mode = match mode {
        Some(mode) => mode.parse::<RefreshMode>()?,
        None => config.refresh.mode,
    };
    debug!(scenario = %scenario_path.display(), mode = %default_mode, "loaded scenario");

    let outcome = run_loaded_scenario(&scenario, default_mode, config.headless)?;
    let report = outcome.report();

    let mut stdout = std::io::stdout().lock();
    report.write_to_writer(&mut stdout)?;

    if let Some(path) = report_path {
        report
            .write_to_path(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(!outcome.is_failed())
}

fn cmd_init(path: &Path, mode: &str, force: bool) -> Result<()> {
    let mode = mode.parse::<RefreshMode>()?;
    let written = project::init_project(path, mode, force)?;
    for file in &written {
        info!("Created {}", file.display());
    }
    Ok(())
}

fn cmd_modes() -> Result<()> {
    println!(
        "{:<24} {:>8} {:>16} {:>8}",
        "mode", "travel", "activity_offset", "inline"
    );
    for mode in RefreshMode::presets() {
        let config = RefreshConfig::from_mode(mode)?;
        println!(
            "{:<24} {:>8} {:>16} {:>8}",
            mode.name(),
            config.travel_distance(),
            config.activity_offset(),
            config.insert_activity()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "refreshable",
            "run",
            "scenarios/pull.json",
            "--mode",
            "navigation",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Run { scenario, mode, report } => {
                assert_eq!(scenario, PathBuf::from("scenarios/pull.json"));
                assert_eq!(mode.as_deref(), Some("navigation"));
                assert!(report.is_none());
            }
            _ => panic!("expected run command"),
        }
    }
}
