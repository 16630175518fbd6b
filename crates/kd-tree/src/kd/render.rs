//! Recursive split-plane renderer.

use log::debug;

use crate::{
    build_surface, find_extent, intersection_lines, BoundingBox, Error, Extent, KdNode, KdTree,
    Result,
};

use super::visitor::{SplitGeometry, SplitVisitor};

/// Computes the clipped split plane of every node and hands it to `visitor`.
///
/// The tree is validated first ([`KdTree::dimensions`]); nothing is visited
/// if validation fails. Traversal starts at the root with an unbounded box at
/// depth 0 and proceeds in pre-order. Returns the global extent used to size
/// the planes.
pub fn render_splits<V: SplitVisitor>(tree: &KdTree, visitor: &mut V) -> Result<Extent> {
    let dims = tree.dimensions()?;
    let root = tree.root().ok_or(Error::EmptyTree)?;

    let extent = find_extent(root);
    debug!(
        "rendering {} nodes in {} dimensions, extent [{}, {}]",
        tree.node_count(),
        dims,
        extent.min,
        extent.max
    );

    let renderer = Renderer { dims, extent };
    renderer.render_node(Some(root), BoundingBox::unbounded(dims), 0, visitor);

    Ok(extent)
}

struct Renderer {
    dims: usize,
    extent: Extent,
}

impl Renderer {
    /// Draws `node` clipped to `bounds`, then recurses into its children.
    ///
    /// Each child receives its own copy of the box, tightened on the split
    /// axis, so siblings never observe each other's limits.
    fn render_node<V: SplitVisitor>(
        &self,
        node: Option<&KdNode>,
        bounds: BoundingBox,
        depth: usize,
        visitor: &mut V,
    ) {
        let Some(node) = node else {
            return;
        };

        let split_axis = depth % self.dims;
        let split_value = node.value()[split_axis];

        let mut surface = build_surface(node.value(), split_axis, &self.extent);
        surface.clip(&bounds);
        let lines = intersection_lines(&surface, node.value(), split_axis);

        debug!(
            "node at depth {} splits axis {} at {}",
            depth, split_axis, split_value
        );

        let left_bounds = bounds.left_of(split_axis, split_value);
        let right_bounds = bounds.right_of(split_axis, split_value);

        visitor.visit(&SplitGeometry {
            depth,
            split_axis,
            point: node.value().to_vec(),
            bounds,
            surface,
            lines,
        });

        self.render_node(node.left(), left_bounds, depth + 1, visitor);
        self.render_node(node.right(), right_bounds, depth + 1, visitor);
    }
}
