//! mmdbatch - Batch conversion of diagram definitions into images.
//!
//! Discovers diagram-definition files, derives one output image per file and
//! runs an external renderer (the Mermaid CLI `mmdc` by default) for every
//! file concurrently. A failing conversion is logged and reported without
//! affecting the others.

pub mod config;

mod batch;
mod error;
mod renderer;
mod report;

pub use mmdbatch_core::{color, invocation, job, source};

pub use batch::{BatchRunner, PlannedJob};
pub use error::{BatchError, FailedJob};
pub use renderer::{CommandRenderer, RenderError, Renderer};
pub use report::{BatchReport, JobOutcome};

use log::{debug, info, trace};

use config::AppConfig;

/// Builder for planning and running conversion batches.
///
/// # Examples
///
/// ```rust,no_run
/// use mmdbatch::{BatchBuilder, config::AppConfig};
///
/// # async fn example() -> Result<(), mmdbatch::BatchError> {
/// let builder = BatchBuilder::new(AppConfig::default());
///
/// // Inspect the renderer commands without running them
/// for planned in builder.plan()? {
///     println!("{}", planned.invocation());
/// }
///
/// // Run every conversion and wait for all of them
/// let report = builder.run().await?;
/// println!("{} of {} compiled", report.succeeded(), report.len());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct BatchBuilder {
    config: AppConfig,
}

impl BatchBuilder {
    /// Create a new batch builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Source, output, renderer and execution settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Plan the conversions without running anything.
    ///
    /// This discovers the source files, derives their output paths and builds
    /// one renderer invocation per file, in sorted input order.
    ///
    /// # Errors
    ///
    /// Returns `BatchError` for an invalid renderer configuration, an
    /// unreadable source directory, or inputs whose outputs would collide.
    pub fn plan(&self) -> Result<Vec<PlannedJob>, BatchError> {
        let source = self.config.source().to_spec();
        let output = self.config.output().to_spec();
        let renderer = self
            .config
            .renderer()
            .to_spec()
            .map_err(BatchError::Config)?;

        let inputs = source::discover(&source)?;
        let jobs = job::plan_jobs(inputs, &output)?;

        let planned: Vec<_> = jobs
            .into_iter()
            .map(|job| PlannedJob::new(job, &renderer))
            .collect();

        debug!(count = planned.len(); "Planned conversions");
        trace!(planned:?; "Planned jobs");

        Ok(planned)
    }

    /// Run every planned conversion with the external renderer.
    ///
    /// # Errors
    ///
    /// See [`BatchBuilder::run_with`].
    pub async fn run(&self) -> Result<BatchReport, BatchError> {
        self.run_with(CommandRenderer::new()).await
    }

    /// Run every planned conversion with `renderer` and wait for all of them.
    ///
    /// The output directory is created when there is at least one file to
    /// convert. Individual conversion failures are recorded in the returned
    /// [`BatchReport`]; use [`BatchReport::ensure_success`] to treat them as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `BatchError` if planning fails or the output directory cannot
    /// be created.
    pub async fn run_with<R>(&self, renderer: R) -> Result<BatchReport, BatchError>
    where
        R: Renderer + 'static,
    {
        let planned = self.plan()?;

        if planned.is_empty() {
            info!(
                dir = self.config.source().dir().display().to_string();
                "No diagram definitions found"
            );
            return Ok(BatchReport::default());
        }

        tokio::fs::create_dir_all(self.config.output().dir()).await?;

        info!(count = planned.len(); "Compiling diagrams");

        let runner = BatchRunner::new(renderer)
            .with_max_concurrency(self.config.execution().max_concurrency());
        let report = runner.run(planned).await;

        info!(
            succeeded = report.succeeded(),
            failed = report.failed();
            "Batch finished"
        );

        Ok(report)
    }
}
