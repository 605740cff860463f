//! Discovery of diagram-definition files.
//!
//! Only the direct children of the source directory are considered, so a
//! source of `src/mermaid` with extension `mmd` selects the same files as the
//! glob `src/mermaid/*.mmd`.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::normalize_extension;

/// Where to look for diagram-definition files and which extension selects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    dir: PathBuf,
    extension: String,
}

impl SourceSpec {
    /// Creates a new [`SourceSpec`].
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory whose direct children are scanned.
    /// * `extension` - File extension to select, with or without a leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use mmdbatch_core::source::SourceSpec;
    ///
    /// let spec = SourceSpec::new("src/mermaid", ".mmd");
    /// assert_eq!(spec.extension(), "mmd");
    /// ```
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: normalize_extension(extension),
        }
    }

    /// Returns the source directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the selecting extension, without a leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns whether `path` carries the selecting extension.
    ///
    /// The comparison is case-sensitive, matching glob behavior on
    /// case-sensitive filesystems.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.extension.as_str())
    }
}

/// Lists every regular file in `spec.dir()` carrying `spec.extension()`.
///
/// Hidden files (names starting with `.`) are skipped, as a `*.mmd` glob
/// skips them. The result is sorted so that planning is deterministic. A
/// missing source directory is treated like a glob with no matches.
///
/// # Errors
///
/// Returns any I/O error other than [`io::ErrorKind::NotFound`] raised while
/// reading the directory or inspecting its entries.
pub fn discover(spec: &SourceSpec) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(spec.dir()) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(dir = spec.dir().display().to_string(); "Source directory does not exist");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if is_hidden(&entry.file_name()) {
            continue;
        }

        let path = entry.path();

        // Follows symlinks, so a linked definition file is still picked up
        if !path.is_file() {
            continue;
        }

        if spec.matches(&path) {
            files.push(path);
        }
    }

    files.sort();

    debug!(
        dir = spec.dir().display().to_string(),
        count = files.len();
        "Discovered diagram definitions"
    );

    Ok(files)
}

fn is_hidden(file_name: &OsStr) -> bool {
    file_name.as_encoded_bytes().starts_with(b".")
}
