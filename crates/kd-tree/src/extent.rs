//! Global coordinate extent of a tree.

use crate::kd::KdNode;

/// The single smallest and largest coordinate found anywhere in a tree.
///
/// This is a scalar pair covering every axis at once, not a per-axis box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f32,
    pub max: f32,
}

impl Extent {
    /// Width of the extent (`max - min`).
    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Scans every coordinate of every node below (and including) `root`.
///
/// Uses an explicit work-list instead of recursion so deep trees cannot
/// exhaust the call stack. Each node is visited exactly once.
pub fn find_extent(root: &KdNode) -> Extent {
    let mut to_visit = vec![root];
    let mut min = f32::MAX;
    let mut max = f32::MIN;

    while let Some(node) = to_visit.pop() {
        for &coord in node.value() {
            min = min.min(coord);
            max = max.max(coord);
        }

        if let Some(left) = node.left() {
            to_visit.push(left);
        }
        if let Some(right) = node.right() {
            to_visit.push(right);
        }
    }

    Extent { min, max }
}
