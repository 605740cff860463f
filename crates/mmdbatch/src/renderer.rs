//! The renderer seam.
//!
//! A [`Renderer`] turns one [`Invocation`] into an image. Production runs use
//! [`CommandRenderer`], which executes the invocation as a child process;
//! tests substitute their own implementations to simulate failures without
//! an installed renderer.

use std::{future::Future, io, process::Stdio};

use log::{debug, trace};
use thiserror::Error;
use tokio::process::Command;

use mmdbatch_core::invocation::Invocation;

/// Why a renderer invocation failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}{}", format_stderr(.stderr))]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("render task aborted: {0}")]
    Aborted(String),
}

impl RenderError {
    /// Returns whether the renderer program could not be found on `PATH`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Executes renderer invocations.
///
/// Implementations must be shareable across tasks: a batch runs every
/// invocation concurrently against the same renderer.
pub trait Renderer: Send + Sync {
    /// Runs a single invocation to completion.
    fn render(&self, invocation: &Invocation) -> impl Future<Output = Result<(), RenderError>> + Send;
}

/// Runs each invocation as an external process.
///
/// The child's stdin is closed and its output captured; stderr becomes part
/// of the [`RenderError::Failed`] message when the process exits with a
/// non-zero status.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRenderer;

impl CommandRenderer {
    /// Creates a new [`CommandRenderer`].
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for CommandRenderer {
    async fn render(&self, invocation: &Invocation) -> Result<(), RenderError> {
        debug!(command = invocation.to_string(); "Spawning renderer");

        let output = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| RenderError::Spawn {
                program: invocation.program().to_string(),
                source,
            })?;

        trace!(
            stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            "Renderer output"
        );

        if output.status.success() {
            return Ok(());
        }

        Err(RenderError::Failed {
            program: invocation.program().to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let invocation = Invocation::new("mmdbatch-no-such-renderer", vec!["-i".to_string()]);

        let err = CommandRenderer::new().render(&invocation).await.unwrap_err();

        assert!(err.is_not_found(), "unexpected error: {err:?}");
        assert!(err.to_string().contains("mmdbatch-no-such-renderer"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let invocation = Invocation::new("true", vec!["-i".to_string(), "in.mmd".to_string()]);

        assert!(CommandRenderer::new().render(&invocation).await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_captures_stderr() {
        let invocation = Invocation::new(
            "sh",
            vec!["-c".to_string(), "echo 'Parse error on line 2' >&2; exit 3".to_string()],
        );

        let err = CommandRenderer::new().render(&invocation).await.unwrap_err();

        match &err {
            RenderError::Failed { program, stderr, .. } => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "Parse error on line 2");
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
        assert!(!err.is_not_found());
        assert!(err.to_string().ends_with(": Parse error on line 2"));
    }

    #[test]
    fn test_failed_message_without_stderr() {
        let err = RenderError::Failed {
            program: "mmdc".to_string(),
            status: "exit status: 1".to_string(),
            stderr: String::new(),
        };

        assert_eq!(err.to_string(), "`mmdc` exited with exit status: 1");
    }
}
