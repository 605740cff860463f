//! Conversion jobs and output path derivation.
//!
//! A [`ConversionJob`] pairs one diagram-definition file with the image the
//! renderer should write for it. Deriving the output path is a pure function
//! of the input path and the [`OutputSpec`].

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::normalize_extension;

/// Errors raised while planning conversion jobs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Input path has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("Inputs {first} and {second} would both write {output}")]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },
}

/// Where rendered images are written and which extension they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    dir: PathBuf,
    extension: String,
}

impl OutputSpec {
    /// Creates a new [`OutputSpec`].
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory the renderer writes images into.
    /// * `extension` - Image extension, with or without a leading dot.
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: normalize_extension(extension),
        }
    }

    /// Returns the output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the image extension, without a leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// Derives the image path for a diagram-definition file.
///
/// The input's final extension is replaced with the output extension and the
/// resulting file name is placed in the output directory.
///
/// # Errors
///
/// Returns [`PathError::NoFileName`] when `input` has no file name component
/// (for example `..` or `/`).
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use mmdbatch_core::job::{OutputSpec, derive_output_path};
///
/// let spec = OutputSpec::new("src/assets", "svg");
/// let output = derive_output_path(Path::new("src/mermaid/flow.mmd"), &spec).unwrap();
/// assert_eq!(output, Path::new("src/assets/flow.svg"));
/// ```
pub fn derive_output_path(input: &Path, spec: &OutputSpec) -> Result<PathBuf, PathError> {
    let stem = input
        .file_stem()
        .ok_or_else(|| PathError::NoFileName(input.to_path_buf()))?;

    let mut file_name = stem.to_os_string();
    if !spec.extension.is_empty() {
        file_name.push(".");
        file_name.push(&spec.extension);
    }

    Ok(spec.dir.join(file_name))
}

/// One diagram-definition file and the image rendered from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    input: PathBuf,
    output: PathBuf,
}

impl ConversionJob {
    /// Creates a job from an input path and the output spec.
    ///
    /// # Errors
    ///
    /// See [`derive_output_path`].
    pub fn new(input: impl Into<PathBuf>, spec: &OutputSpec) -> Result<Self, PathError> {
        let input = input.into();
        let output = derive_output_path(&input, spec)?;
        Ok(Self { input, output })
    }

    /// Returns the diagram-definition file.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Returns the image path the renderer will write.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Plans one [`ConversionJob`] per input, preserving input order.
///
/// # Errors
///
/// Returns [`PathError::NoFileName`] for an input without a file name, and
/// [`PathError::OutputCollision`] when two inputs would write the same image.
pub fn plan_jobs<I, P>(inputs: I, spec: &OutputSpec) -> Result<Vec<ConversionJob>, PathError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut jobs: Vec<ConversionJob> = Vec::new();
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();

    for input in inputs {
        let job = ConversionJob::new(input, spec)?;

        if let Some(&idx) = claimed.get(job.output()) {
            return Err(PathError::OutputCollision {
                first: jobs[idx].input.clone(),
                second: job.input,
                output: job.output,
            });
        }

        claimed.insert(job.output.clone(), jobs.len());
        jobs.push(job);
    }

    Ok(jobs)
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn stem_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,15}"
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Derivation keeps the stem, lands in the output dir, and never depends on the input dir.
    fn check_derivation_is_pure(stem: &str, input_dir: &str) -> Result<(), TestCaseError> {
        let spec = OutputSpec::new("src/assets", "svg");
        let input = Path::new(input_dir).join(format!("{stem}.mmd"));

        let first = derive_output_path(&input, &spec).unwrap();
        let second = derive_output_path(&input, &spec).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.parent(), Some(Path::new("src/assets")));
        let expected = format!("{stem}.svg");
        prop_assert_eq!(first.file_name().and_then(|n| n.to_str()), Some(expected.as_str()));
        Ok(())
    }

    /// Distinct stems always plan distinct outputs.
    fn check_distinct_stems_plan_distinct_outputs(stems: HashSet<String>) -> Result<(), TestCaseError> {
        let spec = OutputSpec::new("src/assets", "svg");
        let inputs: Vec<PathBuf> = stems
            .iter()
            .map(|stem| PathBuf::from(format!("src/mermaid/{stem}.mmd")))
            .collect();

        let jobs = plan_jobs(inputs, &spec).unwrap();
        let outputs: HashSet<_> = jobs.iter().map(|job| job.output().to_path_buf()).collect();

        prop_assert_eq!(jobs.len(), stems.len());
        prop_assert_eq!(outputs.len(), stems.len());
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn derivation_is_pure(stem in stem_strategy(), input_dir in "[a-z]{1,8}(/[a-z]{1,8}){0,2}") {
            check_derivation_is_pure(&stem, &input_dir)?;
        }

        #[test]
        fn distinct_stems_plan_distinct_outputs(stems in prop::collection::hash_set(stem_strategy(), 0..20)) {
            check_distinct_stems_plan_distinct_outputs(stems)?;
        }
    }
}
