//! Stratum Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Stratum layout
//! engine and its consumers. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Planar rectangles and 3D extents ([`geometry`] module)
//! - **Diagnostics**: Typed warnings and errors collected during a layout
//!   pass ([`diagnostic`] module)

pub mod color;
pub mod diagnostic;
pub mod geometry;
pub mod identifier;
