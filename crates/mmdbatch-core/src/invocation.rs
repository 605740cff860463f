//! Renderer invocation records.
//!
//! An [`Invocation`] is the program name and argument list used to render a
//! single [`ConversionJob`]. It is plain data: building one never spawns a
//! process, which keeps planning and dry runs side-effect free.

use std::{ffi::OsString, fmt};

use crate::{color::BackgroundColor, job::ConversionJob};

/// How the external renderer is called.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererSpec {
    program: String,
    theme: Option<String>,
    background: Option<BackgroundColor>,
    extra_args: Vec<String>,
}

impl RendererSpec {
    /// Creates a spec for `program` with no styling flags.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            theme: None,
            background: None,
            extra_args: Vec::new(),
        }
    }

    /// Sets the theme passed with `-t`.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Sets the background color passed with `-b`.
    pub fn with_background(mut self, background: BackgroundColor) -> Self {
        self.background = Some(background);
        self
    }

    /// Appends arguments after the generated flags.
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the renderer program.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the theme, if any.
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Returns the background color, if any.
    pub fn background(&self) -> Option<&BackgroundColor> {
        self.background.as_ref()
    }

    /// Returns the arguments appended after the generated flags.
    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }
}

/// A single renderer command: program plus positional and flag arguments.
///
/// Arguments are OS strings so file names reach the renderer byte-for-byte,
/// even when they are not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
}

impl Invocation {
    /// Creates an invocation from raw parts.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the renderer command for `job`.
    ///
    /// Arguments are emitted as `-i <input> -o <output>`, then `-t <theme>`
    /// and `-b <background>` when set, then any extra arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use mmdbatch_core::{
    ///     color::BackgroundColor,
    ///     invocation::{Invocation, RendererSpec},
    ///     job::{ConversionJob, OutputSpec},
    /// };
    ///
    /// let job = ConversionJob::new("src/mermaid/flow.mmd", &OutputSpec::new("src/assets", "svg")).unwrap();
    /// let spec = RendererSpec::new("mmdc")
    ///     .with_theme("dark")
    ///     .with_background(BackgroundColor::new("rgb(23, 23, 26)").unwrap());
    ///
    /// let invocation = Invocation::for_job(&spec, &job);
    /// assert_eq!(invocation.program(), "mmdc");
    /// assert_eq!(
    ///     invocation.args(),
    ///     ["-i", "src/mermaid/flow.mmd", "-o", "src/assets/flow.svg", "-t", "dark", "-b", "rgb(23, 23, 26)"]
    /// );
    /// ```
    pub fn for_job(spec: &RendererSpec, job: &ConversionJob) -> Self {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            job.input().into(),
            "-o".into(),
            job.output().into(),
        ];

        if let Some(theme) = spec.theme() {
            args.push("-t".into());
            args.push(theme.into());
        }

        if let Some(background) = spec.background() {
            args.push("-b".into());
            args.push(background.as_str().into());
        }

        args.extend(spec.extra_args().iter().map(OsString::from));

        Self::new(spec.program(), args)
    }

    /// Returns the program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments passed to the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for Invocation {
    /// Formats the invocation as a shell-like command line for logs.
    ///
    /// Arguments that are not valid UTF-8 are shown lossily.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_word(f, &self.program)?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_word(f, &arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn write_word(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    let needs_quotes =
        word.is_empty() || word.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
    if !needs_quotes {
        return f.write_str(word);
    }

    f.write_str("\"")?;
    for c in word.chars() {
        if matches!(c, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests {
    use crate::job::OutputSpec;

    use super::*;

    fn flow_job() -> ConversionJob {
        ConversionJob::new("src/mermaid/flow.mmd", &OutputSpec::new("src/assets", "svg")).unwrap()
    }

    #[test]
    fn test_for_job_without_styling() {
        let invocation = Invocation::for_job(&RendererSpec::new("mmdc"), &flow_job());

        assert_eq!(invocation.program(), "mmdc");
        assert_eq!(
            invocation.args(),
            ["-i", "src/mermaid/flow.mmd", "-o", "src/assets/flow.svg"]
        );
    }

    #[test]
    fn test_for_job_with_styling_and_extra_args() {
        let spec = RendererSpec::new("npx")
            .with_theme("forest")
            .with_background(BackgroundColor::new("white").unwrap())
            .with_extra_args(["--scale", "2"]);

        let invocation = Invocation::for_job(&spec, &flow_job());

        assert_eq!(invocation.program(), "npx");
        assert_eq!(
            invocation.args(),
            [
                "-i",
                "src/mermaid/flow.mmd",
                "-o",
                "src/assets/flow.svg",
                "-t",
                "forest",
                "-b",
                "white",
                "--scale",
                "2",
            ]
        );
    }

    #[test]
    fn test_display_quotes_words_with_spaces() {
        let spec = RendererSpec::new("mmdc")
            .with_theme("dark")
            .with_background(BackgroundColor::new("rgb(23, 23, 26)").unwrap());

        let invocation = Invocation::for_job(&spec, &flow_job());

        assert_eq!(
            invocation.to_string(),
            r#"mmdc -i src/mermaid/flow.mmd -o src/assets/flow.svg -t dark -b "rgb(23, 23, 26)""#
        );
    }

    #[test]
    fn test_display_escapes_quotes() {
        let invocation = Invocation::new("echo", [r#"say "hi""#, ""]);

        assert_eq!(invocation.to_string(), r#"echo "say \"hi\"" """#);
    }

    #[cfg(unix)]
    #[test]
    fn test_for_job_keeps_non_utf8_paths() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt, path::Path};

        let input = Path::new(OsStr::from_bytes(b"src/mermaid/fl\xFFow.mmd"));
        let job = ConversionJob::new(input, &OutputSpec::new("src/assets", "svg")).unwrap();

        let invocation = Invocation::for_job(&RendererSpec::new("mmdc"), &job);

        assert_eq!(invocation.args()[1].as_os_str(), input.as_os_str());
        assert_eq!(
            invocation.args()[3].as_os_str(),
            OsStr::from_bytes(b"src/assets/fl\xFFow.svg")
        );
        assert_eq!(
            invocation.to_string(),
            "mmdc -i src/mermaid/fl\u{FFFD}ow.mmd -o src/assets/fl\u{FFFD}ow.svg"
        );
    }
}
