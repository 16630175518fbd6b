//! KD-tree node implementation.

use std::fmt;

/// A node in a KD-tree.
///
/// Each node holds a point whose coordinate on the node's split axis divides
/// space in two: the `left` subtree lies at or below that coordinate and the
/// `right` subtree at or above it. Every node exclusively owns its children.
///
/// Nodes are built by an external producer and only read here; the split
/// axis is implied by depth, not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct KdNode {
    /// The split point, one coordinate per axis.
    value: Vec<f32>,

    /// Subtree below the split coordinate.
    left: Option<Box<KdNode>>,

    /// Subtree above the split coordinate.
    right: Option<Box<KdNode>>,
}

impl KdNode {
    /// Creates a node with the given children.
    pub fn new(value: Vec<f32>, left: Option<KdNode>, right: Option<KdNode>) -> Self {
        Self {
            value,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    /// Creates a node without children.
    pub fn leaf(value: Vec<f32>) -> Self {
        Self::new(value, None, None)
    }

    /// Returns the node's coordinates.
    #[inline]
    pub fn value(&self) -> &[f32] {
        &self.value
    }

    /// Number of coordinates of this node.
    #[inline]
    pub fn dims(&self) -> usize {
        self.value.len()
    }

    /// Returns a reference to the left child subtree.
    #[inline]
    pub fn left(&self) -> Option<&KdNode> {
        self.left.as_deref()
    }

    /// Returns a reference to the right child subtree.
    #[inline]
    pub fn right(&self) -> Option<&KdNode> {
        self.right.as_deref()
    }

    /// Detaches and returns the left subtree.
    pub fn take_left(&mut self) -> Option<KdNode> {
        self.left.take().map(|b| *b)
    }

    /// Detaches and returns the right subtree.
    pub fn take_right(&mut self) -> Option<KdNode> {
        self.right.take().map(|b| *b)
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns the number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.left());
            stack.extend(node.right());
        }
        count
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        let left_depth = self.left.as_ref().map_or(0, |n| n.depth());
        let right_depth = self.right.as_ref().map_or(0, |n| n.depth());
        1 + left_depth.max(right_depth)
    }
}

/// Formats the coordinates as `(x,y,z)`.
struct Coords<'a>(&'a [f32]);

impl fmt::Display for Coords<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

/// Pre-order outline of the subtree, one node per line.
impl fmt::Display for KdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_outline(f, self, 0, None)
    }
}

fn write_outline(
    f: &mut fmt::Formatter<'_>,
    node: &KdNode,
    depth: usize,
    parent: Option<(&str, &KdNode)>,
) -> fmt::Result {
    if let Some((side, p)) = parent {
        write!(f, "{} of {} -- ", side, Coords(p.value()))?;
    }
    writeln!(f, "depth = {}: {}", depth, Coords(node.value()))?;

    if let Some(left) = node.left() {
        write_outline(f, left, depth + 1, Some(("left", node)))?;
    }
    if let Some(right) = node.right() {
        write_outline(f, right, depth + 1, Some(("right", node)))?;
    }
    Ok(())
}
