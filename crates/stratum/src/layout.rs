//! Spatial layout: planar treemap partitioning and vertical stratification.
//!
//! The two stages are independent by construction. [`partition`] assigns each
//! hierarchy member an area-proportional footprint on the ground plane;
//! [`stratify`] lifts those footprints into 3D by layer index. A node's
//! vertical placement never depends on its weight, and its footprint depends
//! only on the hierarchy and the weights.

pub(crate) mod partition;
pub(crate) mod stratify;

pub(crate) use partition::partition;
pub(crate) use stratify::{compute_bounds, stratify};
