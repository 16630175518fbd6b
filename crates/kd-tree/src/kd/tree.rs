//! KD-tree container and validation.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

use super::layout::parse_heap_layout;
use super::node::KdNode;

/// A KD-tree handed over, fully built, by an external producer.
///
/// The container may be empty; drawing code asks it to validate itself
/// through [`KdTree::dimensions`] before touching any geometry.
///
/// # Construction
///
/// ```ignore
/// use kd_tree::{KdNode, KdTree};
///
/// let tree = KdTree::from_root(KdNode::new(
///     vec![0.0, 0.0, 0.0],
///     Some(KdNode::leaf(vec![-1.0, -1.0, -1.0])),
///     None,
/// ));
/// ```
///
/// Trees serialized in heap order can be decoded with
/// [`KdTree::from_heap_layout`] or parsed from text with [`str::parse`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KdTree {
    root: Option<KdNode>,
}

impl KdTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Wraps an existing root node.
    pub fn from_root(root: KdNode) -> Self {
        Self { root: Some(root) }
    }

    /// Rebuilds a tree stored in heap order.
    ///
    /// Slot `i` has its left child at `2i + 1` and its right child at
    /// `2i + 2`; `None` marks an absent node. An empty slice or an absent
    /// slot 0 gives an empty tree.
    pub fn from_heap_layout(mut slots: Vec<Option<Vec<f32>>>) -> Result<Self> {
        for (index, slot) in slots.iter().enumerate().skip(1) {
            if slot.is_some() && slots[(index - 1) / 2].is_none() {
                return Err(Error::OrphanedSlot { index });
            }
        }

        Ok(Self {
            root: take_slot(&mut slots, 0),
        })
    }

    /// Returns `true` if the tree has no root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a reference to the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&KdNode> {
        self.root.as_ref()
    }

    /// Returns the number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.node_count())
    }

    /// Returns the maximum depth of the tree (0 for empty tree).
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.depth())
    }

    /// Validates the tree and returns its dimensionality.
    ///
    /// The dimensionality is the root's value length; every other node must
    /// match it, and every coordinate must be finite.
    pub fn dimensions(&self) -> Result<usize> {
        let root = self.root.as_ref().ok_or(Error::EmptyTree)?;
        let expected = root.dims();
        if expected == 0 {
            return Err(Error::ZeroDimensional);
        }

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.dims() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    found: node.dims(),
                });
            }
            if let Some((axis, &value)) =
                node.value().iter().enumerate().find(|(_, c)| !c.is_finite())
            {
                return Err(Error::NonFiniteCoordinate { axis, value });
            }
            stack.extend(node.left());
            stack.extend(node.right());
        }

        Ok(expected)
    }

    /// Like [`KdTree::dimensions`], but also rejects any dimensionality
    /// other than `supported`.
    pub fn require_dimensions(&self, supported: usize) -> Result<usize> {
        let found = self.dimensions()?;
        if found != supported {
            return Err(Error::UnsupportedDimensionality { found, supported });
        }
        Ok(found)
    }
}

impl From<KdNode> for KdTree {
    fn from(root: KdNode) -> Self {
        Self::from_root(root)
    }
}

impl FromStr for KdTree {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_heap_layout(parse_heap_layout(s)?)
    }
}

impl fmt::Display for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{}", root),
            None => writeln!(f, "(empty)"),
        }
    }
}

/// Moves slot `index` and its descendants out of `slots`.
fn take_slot(slots: &mut [Option<Vec<f32>>], index: usize) -> Option<KdNode> {
    let value = slots.get_mut(index)?.take()?;
    let left = take_slot(slots, 2 * index + 1);
    let right = take_slot(slots, 2 * index + 2);
    Some(KdNode::new(value, left, right))
}
