//! Color handling for layer and node styling.
//!
//! Wraps the `color` crate's [`DynamicColor`] so the rest of the workspace can
//! parse CSS color strings and carry resolved colors around as plain values.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid color '{value}'")]
pub struct InvalidColor {
    /// The string that failed to parse.
    pub value: String,
}

/// Wrapper around the `DynamicColor` type from the color crate.
///
/// This provides convenience methods for working with colors in Stratum.
/// Colors are parsed from CSS color strings such as `"#ff0000"`,
/// `"rgb(255, 0, 0)"`, or `"red"`.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Parse a `Color` from a CSS color string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidColor`] if the string is not a recognized CSS color.
    pub fn parse(color_str: &str) -> Result<Self, InvalidColor> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Color { color }),
            Err(_) => Err(InvalidColor {
                value: color_str.to_owned(),
            }),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::parse("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl serde::Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
