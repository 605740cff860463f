//! Background color handling for renderer invocations
//!
//! This module provides the [`BackgroundColor`] type. The renderer receives
//! the color exactly as the user wrote it; the `color` crate is only used to
//! reject strings that are not valid CSS colors before any process is
//! spawned.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A CSS color string that has been checked to parse.
///
/// The original text is preserved, so `"rgb(23, 23, 26)"` reaches the
/// renderer unchanged rather than in the color crate's canonical form.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BackgroundColor {
    raw: String,
}

impl BackgroundColor {
    /// Validates `color_str` as a CSS color and keeps its trimmed text.
    ///
    /// # Errors
    ///
    /// Returns a message naming the input when the color crate rejects it.
    ///
    /// # Examples
    ///
    /// ```
    /// use mmdbatch_core::color::BackgroundColor;
    ///
    /// let dark = BackgroundColor::new("rgb(23, 23, 26)").unwrap();
    /// assert_eq!(dark.as_str(), "rgb(23, 23, 26)");
    ///
    /// assert!(BackgroundColor::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let trimmed = color_str.trim();
        DynamicColor::from_str(trimmed)
            .map(|_| Self {
                raw: trimmed.to_string(),
            })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Returns the color text as it will be passed to the renderer.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for BackgroundColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
