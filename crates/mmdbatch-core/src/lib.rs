//! mmdbatch Core Types
//!
//! This crate provides the pure building blocks of the mmdbatch diagram
//! converter. Nothing here spawns processes or touches a runtime:
//!
//! - **Source discovery**: Listing diagram-definition files ([`source`] module)
//! - **Jobs**: Output path derivation and conversion planning ([`job`] module)
//! - **Invocations**: Renderer command records ([`invocation::Invocation`])
//! - **Colors**: Background color validation ([`color::BackgroundColor`])

pub mod color;
pub mod invocation;
pub mod job;
pub mod source;

pub use job::PathError;

/// Strips a single leading dot so `".svg"` and `"svg"` name the same extension.
pub(crate) fn normalize_extension(extension: &str) -> String {
    extension.strip_prefix('.').unwrap_or(extension).to_string()
}
