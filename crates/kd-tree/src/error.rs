//! Error type shared by tree validation, decoding and rendering.

use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The tree has no root node.
    #[error("cannot render an empty tree")]
    EmptyTree,

    /// The root value has no coordinates, so no split axis exists.
    #[error("root node has zero coordinates")]
    ZeroDimensional,

    /// A node's value length differs from the root's.
    #[error("dimension mismatch: expected {expected} coordinates, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A coordinate is infinite or NaN, so no finite plane can be drawn.
    #[error("node has non-finite coordinate {value} on axis {axis}")]
    NonFiniteCoordinate { axis: usize, value: f32 },

    /// The tree is valid but the consumer only draws a fixed dimensionality.
    #[error("unsupported dimensionality {found}, only {supported}-D trees can be drawn")]
    UnsupportedDimensionality { found: usize, supported: usize },

    /// A heap-layout slot holds a node although its parent slot is empty.
    #[error("slot {index} has a value but its parent slot is empty")]
    OrphanedSlot { index: usize },

    /// A line of the textual heap layout could not be read.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
