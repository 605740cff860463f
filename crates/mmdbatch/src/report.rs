//! Outcomes of a conversion run.

use std::slice;

use mmdbatch_core::job::ConversionJob;

use crate::{
    error::{BatchError, FailedJob},
    renderer::RenderError,
};

/// The result of rendering one [`ConversionJob`].
#[derive(Debug)]
pub struct JobOutcome {
    job: ConversionJob,
    result: Result<(), RenderError>,
}

impl JobOutcome {
    /// Creates a new [`JobOutcome`].
    pub fn new(job: ConversionJob, result: Result<(), RenderError>) -> Self {
        Self { job, result }
    }

    /// Returns the job this outcome belongs to.
    pub fn job(&self) -> &ConversionJob {
        &self.job
    }

    /// Returns the renderer result.
    pub fn result(&self) -> Result<(), &RenderError> {
        self.result.as_ref().map(|_| ())
    }

    /// Returns whether the image was produced.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every [`JobOutcome`] of a run, in planning order.
///
/// Completion order is not recorded; the renderer processes run
/// concurrently and finish in any order.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    /// Creates a report from outcomes in planning order.
    pub fn new(outcomes: Vec<JobOutcome>) -> Self {
        Self { outcomes }
    }

    /// Returns the number of attempted conversions.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns whether nothing was attempted.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns the number of conversions that produced an image.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Returns the number of conversions that failed.
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Returns whether every conversion succeeded. An empty report is a success.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(JobOutcome::is_success)
    }

    /// Iterates over the outcomes in planning order.
    pub fn iter(&self) -> slice::Iter<'_, JobOutcome> {
        self.outcomes.iter()
    }

    /// Turns any failed conversion into [`BatchError::Incomplete`].
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Incomplete`] listing every failed input when at
    /// least one conversion failed.
    pub fn ensure_success(self) -> Result<Self, BatchError> {
        if self.is_success() {
            return Ok(self);
        }

        let total = self.len();
        Err(BatchError::Incomplete {
            failures: self.into_failures(),
            total,
        })
    }

    /// Consumes the report, keeping only the failed conversions.
    pub fn into_failures(self) -> Vec<FailedJob> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.result {
                Ok(()) => None,
                Err(error) => Some(FailedJob {
                    input: outcome.job.input().to_path_buf(),
                    error,
                }),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a BatchReport {
    type Item = &'a JobOutcome;
    type IntoIter = slice::Iter<'a, JobOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
