//! Error types for Stratum operations.
//!
//! Graph anomalies are not errors: they surface as diagnostics on the layout
//! result. [`StratumError`] covers the operational failures around a layout
//! pass, such as configuration that cannot be loaded.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for Stratum operations.
#[derive(Debug, Error)]
pub enum StratumError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
