//! Visitor pattern for split-plane rendering.
//!
//! The renderer computes geometry; visitors decide what to do with it
//! (draw it, collect it, count it) without coupling traversal to a backend.

use crate::{BoundingBox, IntersectionLine, SurfaceGrid};

/// Everything needed to draw one node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitGeometry {
    /// Depth of the node; the root is at depth 0.
    pub depth: usize,
    /// Axis the node splits on (`depth % dims`).
    pub split_axis: usize,
    /// The node's coordinates.
    pub point: Vec<f32>,
    /// Region the node's plane was clipped to.
    pub bounds: BoundingBox,
    /// The clipped split plane.
    pub surface: SurfaceGrid,
    /// Intersection lines lying on the clipped plane.
    pub lines: Vec<IntersectionLine>,
}

/// Visitor for processing split geometry during rendering.
///
/// Nodes arrive in pre-order: a node is always visited before any of its
/// descendants, and the left subtree before the right one.
pub trait SplitVisitor {
    /// Called once for every node of the tree.
    fn visit(&mut self, geometry: &SplitGeometry);
}

/// A simple visitor that collects all visited geometry.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<SplitGeometry>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected geometry.
    pub fn into_geometry(self) -> Vec<SplitGeometry> {
        self.collected
    }

    /// Returns a reference to the collected geometry.
    pub fn geometry(&self) -> &[SplitGeometry] {
        &self.collected
    }
}

impl SplitVisitor for CollectingVisitor {
    fn visit(&mut self, geometry: &SplitGeometry) {
        self.collected.push(geometry.clone());
    }
}

/// A visitor that calls a closure for each node.
pub struct FnVisitor<F>
where
    F: FnMut(&SplitGeometry),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&SplitGeometry),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> SplitVisitor for FnVisitor<F>
where
    F: FnMut(&SplitGeometry),
{
    fn visit(&mut self, geometry: &SplitGeometry) {
        (self.func)(geometry);
    }
}
