//! Intersection lines drawn on a clipped split plane.

use nalgebra::Point3;

use crate::SurfaceGrid;

/// A segment on a split plane, pinned on its own axis and on the split axis.
///
/// `extents[j]` is the `(start, end)` range of coordinate `j`. The segment
/// marks where a plane perpendicular to `axis` through the split point would
/// cross this plane.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionLine {
    axis: usize,
    extents: Vec<(f32, f32)>,
}

impl IntersectionLine {
    /// The axis this line is held constant on (never the split axis).
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Per-axis `(start, end)` ranges.
    #[inline]
    pub fn extents(&self) -> &[(f32, f32)] {
        &self.extents
    }

    pub fn start(&self) -> Vec<f32> {
        self.extents.iter().map(|e| e.0).collect()
    }

    pub fn end(&self) -> Vec<f32> {
        self.extents.iter().map(|e| e.1).collect()
    }

    /// Start and end as 3-D points, or `None` for other dimensionalities.
    pub fn endpoints3(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        match self.extents.as_slice() {
            [x, y, z] => Some((Point3::new(x.0, y.0, z.0), Point3::new(x.1, y.1, z.1))),
            _ => None,
        }
    }

    /// Returns `true` if the segment collapsed to a single point.
    pub fn is_degenerate(&self) -> bool {
        self.extents.iter().all(|&(a, b)| a == b)
    }
}

/// Builds the `D - 1` intersection lines of a clipped split plane.
///
/// Line for axis `i != split_axis` is pinned at `values[i]` on axis `i` and at
/// `values[split_axis]` on the split axis; on every other axis it spans the
/// full clipped range of `surface`. Lines are returned in axis order with the
/// split axis skipped, so axes after it land one slot lower.
///
/// # Panics
/// Panics if `values` and `surface` disagree on dimensionality.
pub fn intersection_lines(
    surface: &SurfaceGrid,
    values: &[f32],
    split_axis: usize,
) -> Vec<IntersectionLine> {
    let dims = values.len();
    assert_eq!(surface.dims(), dims, "Surface and point must have the same dimensionality");

    let mut result = Vec::with_capacity(dims.saturating_sub(1));
    for i in (0..dims).filter(|&i| i != split_axis) {
        let extents = (0..dims)
            .map(|j| {
                if j == i || j == split_axis {
                    (values[j], values[j])
                } else {
                    (surface.min(j), surface.max(j))
                }
            })
            .collect();
        result.push(IntersectionLine { axis: i, extents });
    }
    result
}
