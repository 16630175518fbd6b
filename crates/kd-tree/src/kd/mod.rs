//! KD-tree model and split-plane rendering.
//!
//! This module holds the tree handed in by a producer and the traversal that
//! turns it into drawable geometry:
//!
//! - each node becomes a plane perpendicular to its split axis (`depth % D`)
//! - the plane is clipped to the region its ancestors leave valid
//! - lines on the plane mark where sibling planes through the node would cross
//!
//! # Example
//!
//! ```ignore
//! use kd_tree::{KdNode, KdTree};
//! use kd_tree::kd::{render_splits, CollectingVisitor};
//!
//! let tree = KdTree::from_root(KdNode::new(
//!     vec![0.0, 0.0, 0.0],
//!     Some(KdNode::leaf(vec![-1.0, -1.0, -1.0])),
//!     None,
//! ));
//!
//! let mut visitor = CollectingVisitor::new();
//! render_splits(&tree, &mut visitor)?;
//!
//! // One clipped plane per node, root first
//! let planes = visitor.into_geometry();
//! ```
//!
//! # Architecture
//!
//! - [`KdTree`]: The container holding the optional root node
//! - [`KdNode`]: A split point with two optional owned children
//! - [`render_splits`]: Pre-order traversal producing [`SplitGeometry`]
//! - [`SplitVisitor`]: Visitor trait for consuming the geometry

mod layout;
mod node;
mod render;
mod tree;
mod visitor;

// Re-export main types
pub use layout::parse_heap_layout;
pub use node::KdNode;
pub use render::render_splits;
pub use tree::KdTree;
pub use visitor::{CollectingVisitor, FnVisitor, SplitGeometry, SplitVisitor};
