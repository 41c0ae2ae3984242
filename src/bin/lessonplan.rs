//! Lessonplan CLI Binary
//!
//! Command-line interface for the lesson plan generation service.

use anyhow::Context;
use clap::Parser;
use lessonplan::cli::{map_error, Cli, RunContext};
use lessonplan::config::{ConfigLoader, PlannerConfig};
use lessonplan::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::info;

fn main() {
    let cli = Cli::parse();

    let loaded = ConfigLoader::load(cli.config.as_deref());

    // Initialize logging early, even when the config failed to load
    let logging_config = build_logging_config(&cli, loaded.as_ref().ok());
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&cli, loaded) {
        eprintln!("{}", failure_message(&e));
        process::exit(1);
    }
}

/// Text written to stderr, once, when a command fails.
fn failure_message(error: &anyhow::Error) -> String {
    format!("{:#}", error)
}

fn run(cli: &Cli, loaded: Result<PlannerConfig, lessonplan::ApiError>) -> anyhow::Result<()> {
    let config = loaded.context("Failed to load configuration")?;
    info!("Lessonplan CLI starting");

    let context = RunContext::new(config);
    let output = context
        .execute(&cli.command)
        .map_err(|e| anyhow::anyhow!(map_error(&e)))?;

    info!("Command completed successfully");
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Build logging configuration from CLI args and the loaded config.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, config: Option<&PlannerConfig>) -> LoggingConfig {
    let mut logging = config.map(|c| c.logging.clone()).unwrap_or_default();

    if cli.quiet {
        logging.enabled = false;
    }
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }

    logging
}
