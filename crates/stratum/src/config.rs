//! Configuration for the layout pipeline.
//!
//! [`LayoutConfig`] carries the tunable geometry parameters. All fields have
//! sensible defaults, implement [`serde::Deserialize`] for loading from TOML,
//! and are sanitized by [`LayoutConfig::normalized`] so a bad value can never
//! produce NaN geometry downstream.
//!
//! # Example
//!
//! ```
//! use stratum::config::LayoutConfig;
//!
//! let config = LayoutConfig::default();
//! assert_eq!(config.canvas_size, 200.0);
//! ```

use std::{fs, path::Path};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::StratumError;

/// Geometry parameters for one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Side length of the square ground-plane canvas.
    pub canvas_size: f64,

    /// Vertical distance between consecutive layers.
    pub layer_spacing: f64,

    /// Planar gap inset around each partition cell.
    pub partition_padding: f64,

    /// Headroom reserved at the top edge of a containing node for its label.
    pub label_padding: f64,

    /// Maximum accepted node count; larger graphs fail validation.
    pub max_nodes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_size: 200.0,
            layer_spacing: 20.0,
            partition_padding: 3.0,
            label_padding: 6.0,
            max_nodes: 10_000,
        }
    }
}

impl LayoutConfig {
    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::ConfigNotFound`] if the path does not exist,
    /// [`StratumError::Io`] if it cannot be read, and
    /// [`StratumError::ConfigParse`] if it is not valid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StratumError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StratumError::ConfigNotFound(path.to_owned()));
        }
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Returns a copy with every out-of-range value replaced by its default.
    ///
    /// Sizes must be finite and positive, paddings finite and non-negative,
    /// and the node ceiling non-zero. Each replacement is logged.
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();

        if !(config.canvas_size.is_finite() && config.canvas_size > 0.0) {
            warn!(canvas_size = config.canvas_size; "Invalid canvas size, using default");
            config.canvas_size = defaults.canvas_size;
        }
        if !(config.layer_spacing.is_finite() && config.layer_spacing > 0.0) {
            warn!(layer_spacing = config.layer_spacing; "Invalid layer spacing, using default");
            config.layer_spacing = defaults.layer_spacing;
        }
        if !(config.partition_padding.is_finite() && config.partition_padding >= 0.0) {
            warn!(
                partition_padding = config.partition_padding;
                "Invalid partition padding, using default",
            );
            config.partition_padding = defaults.partition_padding;
        }
        if !(config.label_padding.is_finite() && config.label_padding >= 0.0) {
            warn!(label_padding = config.label_padding; "Invalid label padding, using default");
            config.label_padding = defaults.label_padding;
        }
        if config.max_nodes == 0 {
            warn!("Node ceiling of zero, using default");
            config.max_nodes = defaults.max_nodes;
        }

        config
    }
}
