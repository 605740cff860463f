//! Configuration types for mmdbatch conversion runs.
//!
//! This module provides configuration structures that control which files
//! are converted, where images are written, and how the renderer is called.
//! All types implement [`serde::Deserialize`] for loading from external
//! sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`SourceConfig`] - Directory and extension of diagram definitions.
//! - [`OutputConfig`] - Directory and extension of rendered images.
//! - [`RendererConfig`] - Renderer program and styling flags.
//! - [`ExecutionConfig`] - Concurrency limits.
//!
//! The defaults convert `src/mermaid/*.mmd` into `src/assets/*.svg` with
//! `mmdc -t dark -b "rgb(23, 23, 26)"`.
//!
//! # Example
//!
//! ```
//! # use mmdbatch::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.renderer().program(), "mmdc");
//! assert!(config.renderer().to_spec().is_ok());
//! ```

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use mmdbatch_core::{
    color::BackgroundColor, invocation::RendererSpec, job::OutputSpec, source::SourceSpec,
};

const DEFAULT_SOURCE_DIR: &str = "src/mermaid";
const DEFAULT_SOURCE_EXTENSION: &str = "mmd";
const DEFAULT_OUTPUT_DIR: &str = "src/assets";
const DEFAULT_OUTPUT_EXTENSION: &str = "svg";
const DEFAULT_RENDERER: &str = "mmdc";
const DEFAULT_THEME: &str = "dark";
const DEFAULT_BACKGROUND: &str = "rgb(23, 23, 26)";

/// Top-level configuration for a conversion run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Source section.
    #[serde(default)]
    source: SourceConfig,

    /// Output section.
    #[serde(default)]
    output: OutputConfig,

    /// Renderer section.
    #[serde(default)]
    renderer: RendererConfig,

    /// Execution section.
    #[serde(default)]
    execution: ExecutionConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        source: SourceConfig,
        output: OutputConfig,
        renderer: RendererConfig,
        execution: ExecutionConfig,
    ) -> Self {
        Self {
            source,
            output,
            renderer,
            execution,
        }
    }

    /// Returns the source configuration.
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the renderer configuration.
    pub fn renderer(&self) -> &RendererConfig {
        &self.renderer
    }

    /// Returns the execution configuration.
    pub fn execution(&self) -> &ExecutionConfig {
        &self.execution
    }

    /// Replaces the source section.
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// Replaces the output section.
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Replaces the renderer section.
    pub fn with_renderer(mut self, renderer: RendererConfig) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replaces the execution section.
    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }
}

/// Where diagram definitions are read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Directory scanned for definitions (not recursive).
    dir: PathBuf,

    /// Extension selecting definition files.
    extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl SourceConfig {
    /// Creates a new [`SourceConfig`].
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Returns the source directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the selecting extension as configured.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Overrides the source directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Overrides the selecting extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Converts this section into a [`SourceSpec`].
    pub fn to_spec(&self) -> SourceSpec {
        SourceSpec::new(&self.dir, &self.extension)
    }
}

/// Where rendered images are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving images.
    dir: PathBuf,

    /// Image extension, which also selects the renderer's output format.
    extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
        }
    }
}

impl OutputConfig {
    /// Creates a new [`OutputConfig`].
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Returns the output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the image extension as configured.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Overrides the output directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Overrides the image extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Converts this section into an [`OutputSpec`].
    pub fn to_spec(&self) -> OutputSpec {
        OutputSpec::new(&self.dir, &self.extension)
    }
}

/// How the external renderer is called.
///
/// `theme` and `background` may be set to an empty string in a configuration
/// file to drop the corresponding flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Program to execute, looked up on `PATH`.
    program: String,

    /// Value of the `-t` flag.
    theme: Option<String>,

    /// Value of the `-b` flag, as a CSS color string.
    background: Option<String>,

    /// Arguments appended after the generated flags.
    extra_args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RENDERER.to_string(),
            theme: Some(DEFAULT_THEME.to_string()),
            background: Some(DEFAULT_BACKGROUND.to_string()),
            extra_args: Vec::new(),
        }
    }
}

impl RendererConfig {
    /// Creates a [`RendererConfig`] for `program` with no styling flags.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            theme: None,
            background: None,
            extra_args: Vec::new(),
        }
    }

    /// Returns the renderer program.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the theme, if set and non-empty.
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref().filter(|theme| !theme.is_empty())
    }

    /// Returns the background color string, if set and non-empty.
    pub fn background(&self) -> Option<&str> {
        self.background
            .as_deref()
            .filter(|background| !background.trim().is_empty())
    }

    /// Returns the arguments appended after the generated flags.
    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    /// Overrides the renderer program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Overrides the theme.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Overrides the background color.
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Replaces the extra arguments.
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Converts this section into a [`RendererSpec`].
    ///
    /// # Errors
    ///
    /// Returns an error if the program is empty or the configured background
    /// is not a valid CSS color.
    pub fn to_spec(&self) -> Result<RendererSpec, String> {
        if self.program.trim().is_empty() {
            return Err("Renderer program must not be empty".to_string());
        }

        let mut spec = RendererSpec::new(&self.program).with_extra_args(self.extra_args.iter().cloned());

        if let Some(theme) = self.theme() {
            spec = spec.with_theme(theme);
        }

        if let Some(background) = self.background() {
            let color = BackgroundColor::new(background)
                .map_err(|err| format!("Invalid background color in config: {err}"))?;
            spec = spec.with_background(color);
        }

        Ok(spec)
    }
}

/// Execution limits for a conversion run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Maximum number of renderer processes alive at once. Unbounded if unset.
    max_concurrency: Option<NonZeroUsize>,
}

impl ExecutionConfig {
    /// Creates a new [`ExecutionConfig`].
    pub fn new(max_concurrency: Option<NonZeroUsize>) -> Self {
        Self { max_concurrency }
    }

    /// Returns the concurrency limit, if any.
    pub fn max_concurrency(&self) -> Option<NonZeroUsize> {
        self.max_concurrency
    }
}
