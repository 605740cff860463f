//! Command-line argument definitions for the mmdbatch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Every conversion setting can come from a configuration
//! file; the flags here override individual values from it.

use clap::Parser;

/// Command-line arguments for the mmdbatch diagram converter
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing diagram definitions [default: src/mermaid]
    #[arg(short, long)]
    pub source_dir: Option<String>,

    /// Extension selecting diagram definitions [default: mmd]
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Directory receiving rendered images [default: src/assets]
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Image extension written by the renderer [default: svg]
    #[arg(short, long)]
    pub format: Option<String>,

    /// Renderer program to invoke [default: mmdc]
    #[arg(short, long)]
    pub renderer: Option<String>,

    /// Renderer theme, passed with `-t` [default: dark]
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Background CSS color, passed with `-b` [default: "rgb(23, 23, 26)"]
    #[arg(short, long)]
    pub background: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Maximum number of renderer processes running at once (0 for no limit)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Print the renderer commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with an error if any conversion fails
    #[arg(long)]
    pub strict: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
