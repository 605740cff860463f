//! Error adapter for converting BatchError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`BatchError::Incomplete`] lists several failed conversions, each
//! failure is rendered independently.

use std::fmt;

use log::Level;
use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use mmdbatch::{BatchError, FailedJob, RenderError, job::PathError};

const INSTALL_HELP: &str =
    "install the Mermaid CLI with `npm install -g @mermaid-js/mermaid-cli`, or pass --renderer";

/// Adapter for a single failed conversion.
///
/// This adapter wraps a [`FailedJob`] and implements [`MietteDiagnostic`]
/// to enable rich error formatting in the CLI.
pub struct FailureAdapter<'a> {
    /// The wrapped failure
    failure: &'a FailedJob,
}

impl<'a> FailureAdapter<'a> {
    /// Create a new failure adapter.
    pub fn new(failure: &'a FailedJob) -> Self {
        Self { failure }
    }
}

impl fmt::Debug for FailureAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureAdapter")
            .field("failure", &self.failure)
            .finish()
    }
}

impl fmt::Display for FailureAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to compile {}: {}",
            self.failure.input.display(),
            self.failure.error
        )
    }
}

impl std::error::Error for FailureAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.failure.error)
    }
}

impl MietteDiagnostic for FailureAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.failure.error {
            RenderError::Spawn { .. } => "mmdbatch::render::spawn",
            RenderError::Failed { .. } => "mmdbatch::render::failed",
            RenderError::Aborted(_) => "mmdbatch::render::aborted",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.failure.error.is_not_found() {
            return Some(Box::new(INSTALL_HELP));
        }
        None
    }
}

/// Adapter for [`BatchError`] variants that describe the run as a whole.
///
/// This adapter handles errors such as I/O errors, planning errors and
/// configuration errors.
pub struct ErrorAdapter<'a>(pub &'a BatchError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            BatchError::Io(_) => "mmdbatch::io",
            BatchError::Path(_) => "mmdbatch::plan",
            BatchError::Config(_) => "mmdbatch::config",
            BatchError::Incomplete { .. } => "mmdbatch::incomplete",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            BatchError::Path(PathError::OutputCollision { .. }) => {
                Some(Box::new("rename one of the inputs so their base names differ"))
            }
            BatchError::Config(_) => Some(Box::new(
                "check the configuration file and command-line overrides",
            )),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single failed conversion or a run-level error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// One conversion that did not produce its image.
    Failure(FailureAdapter<'a>),
    /// An error affecting the whole run.
    Error(ErrorAdapter<'a>),
}

impl Reportable<'_> {
    /// Returns the level this report is logged at.
    ///
    /// A failed conversion was already logged at `error` by the batch runner,
    /// so its detailed report is a warning.
    pub fn level(&self) -> Level {
        match self {
            Reportable::Failure(_) => Level::Warn,
            Reportable::Error(_) => Level::Error,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Failure(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Failure(d) => d.source(),
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Failure(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Failure(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`BatchError`] into a list of reportable errors.
///
/// For [`BatchError::Incomplete`], this returns one [`Reportable`] for each
/// failed conversion. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &BatchError) -> Vec<Reportable<'_>> {
    match err {
        BatchError::Incomplete { failures, .. } if !failures.is_empty() => failures
            .iter()
            .map(|failure| Reportable::Failure(FailureAdapter::new(failure)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
