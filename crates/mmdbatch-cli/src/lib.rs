//! CLI logic for the mmdbatch diagram converter.
//!
//! This module contains the core CLI logic: it resolves the configuration,
//! applies command-line overrides and drives a [`BatchBuilder`] on a tokio
//! runtime.

pub mod config;
pub mod error_adapter;

mod args;

pub use args::Args;

use std::num::NonZeroUsize;

use log::{info, warn};

use mmdbatch::{
    BatchBuilder, BatchError, BatchReport,
    config::{AppConfig, ExecutionConfig},
};

/// Run the mmdbatch CLI application
///
/// This function plans the conversions described by the configuration and
/// command-line overrides, then either prints the renderer commands
/// (`--dry-run`) or runs them all and waits for every one to finish.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `BatchError` for:
/// - Configuration loading errors
/// - Source directory I/O errors
/// - Planning errors
/// - Failed conversions, only when `--strict` is set
pub fn run(args: &Args) -> Result<(), BatchError> {
    let app_config = apply_overrides(config::load_config(args.config.as_ref())?, args);
    let builder = BatchBuilder::new(app_config);

    if args.dry_run {
        let planned = builder.plan()?;
        for job in &planned {
            println!("{}", job.invocation());
        }
        info!(count = planned.len(); "Dry run complete, no renderer was started");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let report = runtime.block_on(builder.run())?;
    summarize(&report);

    if args.strict {
        report.ensure_success()?;
    }

    Ok(())
}

/// Layers command-line flags over the loaded configuration.
pub fn apply_overrides(config: AppConfig, args: &Args) -> AppConfig {
    let mut source = config.source().clone();
    if let Some(dir) = &args.source_dir {
        source = source.with_dir(dir);
    }
    if let Some(extension) = &args.extension {
        source = source.with_extension(extension);
    }

    let mut output = config.output().clone();
    if let Some(dir) = &args.output_dir {
        output = output.with_dir(dir);
    }
    if let Some(format) = &args.format {
        output = output.with_extension(format);
    }

    let mut renderer = config.renderer().clone();
    if let Some(program) = &args.renderer {
        renderer = renderer.with_program(program);
    }
    if let Some(theme) = &args.theme {
        renderer = renderer.with_theme(theme);
    }
    if let Some(background) = &args.background {
        renderer = renderer.with_background(background);
    }

    let execution = match args.jobs {
        Some(jobs) => ExecutionConfig::new(NonZeroUsize::new(jobs)),
        None => config.execution().clone(),
    };

    config
        .with_source(source)
        .with_output(output)
        .with_renderer(renderer)
        .with_execution(execution)
}

fn summarize(report: &BatchReport) {
    if report.is_success() {
        info!(compiled = report.succeeded(); "All diagrams compiled");
    } else {
        warn!(
            compiled = report.succeeded(),
            failed = report.failed();
            "Some diagrams failed to compile"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = apply_overrides(AppConfig::default(), &Args::default());

        assert_eq!(config.source().dir(), Path::new("src/mermaid"));
        assert_eq!(config.renderer().program(), "mmdc");
        assert_eq!(config.execution().max_concurrency(), None);
    }

    #[test]
    fn test_overrides_replace_individual_fields() {
        let args = Args {
            source_dir: Some("docs/diagrams".to_string()),
            format: Some("png".to_string()),
            theme: Some("forest".to_string()),
            jobs: Some(3),
            ..Default::default()
        };

        let config = apply_overrides(AppConfig::default(), &args);

        assert_eq!(config.source().dir(), Path::new("docs/diagrams"));
        assert_eq!(config.source().extension(), "mmd");
        assert_eq!(config.output().dir(), Path::new("src/assets"));
        assert_eq!(config.output().extension(), "png");
        assert_eq!(config.renderer().theme(), Some("forest"));
        assert_eq!(config.renderer().background(), Some("rgb(23, 23, 26)"));
        assert_eq!(config.execution().max_concurrency().map(|n| n.get()), Some(3));
    }

    #[test]
    fn test_zero_jobs_means_unbounded() {
        let args = Args {
            jobs: Some(0),
            ..Default::default()
        };

        let config = apply_overrides(AppConfig::default(), &args);

        assert_eq!(config.execution().max_concurrency(), None);
    }
}
