//! Error types for mmdbatch operations.
//!
//! This module provides [`BatchError`], the run-level error type. Failures of
//! individual renderer invocations are [`RenderError`]s; they are recorded in
//! the [`BatchReport`](crate::BatchReport) instead of aborting the run, and
//! only surface here when a caller asks for [`BatchError::Incomplete`].

use std::{io, path::PathBuf};

use thiserror::Error;

use mmdbatch_core::PathError;

use crate::renderer::RenderError;

/// A conversion that did not produce its image.
#[derive(Debug)]
pub struct FailedJob {
    /// The diagram-definition file.
    pub input: PathBuf,
    /// Why the renderer invocation failed.
    pub error: RenderError,
}

/// The main error type for mmdbatch operations.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Planning error: {0}")]
    Path(#[from] PathError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{} of {total} conversion(s) failed", .failures.len())]
    Incomplete {
        failures: Vec<FailedJob>,
        total: usize,
    },
}
