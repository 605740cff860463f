//! Concurrent execution of planned conversions.
//!
//! Every planned conversion is launched immediately as its own tokio task.
//! Tasks share nothing but the renderer handle and, when a limit is
//! configured, a semaphore. [`BatchRunner::run`] awaits every task before it
//! returns, so no renderer process outlives the run.

use std::{num::NonZeroUsize, sync::Arc};

use log::{error, info};
use tokio::sync::Semaphore;

use mmdbatch_core::{
    invocation::{Invocation, RendererSpec},
    job::ConversionJob,
};

use crate::{
    renderer::{RenderError, Renderer},
    report::{BatchReport, JobOutcome},
};

/// A conversion job together with the renderer command that performs it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedJob {
    job: ConversionJob,
    invocation: Invocation,
}

impl PlannedJob {
    /// Builds the invocation for `job` from the renderer spec.
    pub fn new(job: ConversionJob, renderer: &RendererSpec) -> Self {
        let invocation = Invocation::for_job(renderer, &job);
        Self { job, invocation }
    }

    /// Returns the conversion job.
    pub fn job(&self) -> &ConversionJob {
        &self.job
    }

    /// Returns the renderer command.
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }
}

/// Runs planned conversions concurrently against a [`Renderer`].
pub struct BatchRunner<R> {
    renderer: Arc<R>,
    limit: Option<Arc<Semaphore>>,
}

impl<R> BatchRunner<R>
where
    R: Renderer + 'static,
{
    /// Creates a runner with unbounded concurrency.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer: Arc::new(renderer),
            limit: None,
        }
    }

    /// Bounds the number of invocations in flight; `None` removes the bound.
    pub fn with_max_concurrency(mut self, max_concurrency: Option<NonZeroUsize>) -> Self {
        self.limit = max_concurrency.map(|n| Arc::new(Semaphore::new(n.get())));
        self
    }

    /// Runs every job and waits for all of them.
    ///
    /// A failing job is logged and recorded; it never cancels or delays the
    /// others. Outcomes are reported in the order the jobs were given.
    pub async fn run(&self, jobs: Vec<PlannedJob>) -> BatchReport {
        let mut handles = Vec::with_capacity(jobs.len());

        for planned in jobs {
            let renderer = Arc::clone(&self.renderer);
            let limit = self.limit.clone();
            let job = planned.job.clone();

            let handle = tokio::spawn(async move {
                let _permit = match limit {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(err) => return Err(RenderError::Aborted(err.to_string())),
                    },
                    None => None,
                };

                let result = renderer.render(&planned.invocation).await;
                log_outcome(&planned.job, &result);
                result
            });

            handles.push((job, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (job, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => {
                    let result = Err(RenderError::Aborted(join_err.to_string()));
                    log_outcome(&job, &result);
                    result
                }
            };
            outcomes.push(JobOutcome::new(job, result));
        }

        BatchReport::new(outcomes)
    }
}

fn log_outcome(job: &ConversionJob, result: &Result<(), RenderError>) {
    match result {
        Ok(()) => info!(
            output = job.output().display().to_string();
            "Compiled {}", job.input().display()
        ),
        Err(err) => error!(
            output = job.output().display().to_string(),
            error = err.to_string();
            "Failed to compile {}", job.input().display()
        ),
    }
}
