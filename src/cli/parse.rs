//! CLI parse: clap types for lessonplan. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lessonplan CLI - syllabus to lesson plan generation
#[derive(Parser)]
#[command(name = "lessonplan")]
#[command(about = "Generate multi-day lesson plans from syllabus text")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP endpoint
    Serve {
        /// Bind address (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
        /// Port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a plan from a plain-text syllabus file and print it as JSON
    Generate {
        /// Path to the extracted syllabus text
        #[arg(long)]
        file: PathBuf,
        /// Number of lessons (defaults to generation.default_lessons)
        #[arg(long)]
        lessons: Option<usize>,
        /// Skip every provider and use the deterministic plan
        #[arg(long)]
        fallback_only: bool,
    },
    /// Print the effective configuration with credentials redacted
    ShowConfig,
}
