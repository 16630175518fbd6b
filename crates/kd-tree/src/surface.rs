//! Sampled split planes and their clipping.
//!
//! A split at point `p` along axis `a` is the hyperplane `x[a] = p[a]`. It is
//! sampled on a regular mesh spanning the tree's global [`Extent`] on every
//! other axis, then clamped into the [`BoundingBox`] of the subtree so only
//! the region the split actually governs remains.

use nalgebra::{DMatrix, Point3};

use crate::{BoundingBox, Extent};

/// Number of samples per free axis of a split plane.
pub const SURFACE_RESOLUTION: usize = 10;

/// One coordinate grid per axis, jointly describing a sampled hyperplane.
///
/// All grids share the same shape. Entry `(r, c)` of grid `i` is the `i`-th
/// coordinate of mesh vertex `(r, c)`. For three dimensions the shape is
/// `SURFACE_RESOLUTION x SURFACE_RESOLUTION`; the first free axis varies along
/// columns and the second along rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    axes: Vec<DMatrix<f32>>,
}

impl SurfaceGrid {
    /// Number of axes (coordinate grids).
    #[inline]
    pub fn dims(&self) -> usize {
        self.axes.len()
    }

    /// `(rows, columns)` shared by every grid.
    pub fn shape(&self) -> (usize, usize) {
        self.axes.first().map_or((0, 0), |m| m.shape())
    }

    /// All coordinate grids, in axis order.
    #[inline]
    pub fn axes(&self) -> &[DMatrix<f32>] {
        &self.axes
    }

    /// The coordinate grid of `axis`.
    #[inline]
    pub fn axis(&self, axis: usize) -> &DMatrix<f32> {
        &self.axes[axis]
    }

    /// Smallest value of the grid for `axis`.
    pub fn min(&self, axis: usize) -> f32 {
        self.axes[axis].iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Largest value of the grid for `axis`.
    pub fn max(&self, axis: usize) -> f32 {
        self.axes[axis].iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Clamps every grid element-wise into the limits of its axis.
    ///
    /// Idempotent: clipping twice with the same box changes nothing.
    ///
    /// # Panics
    /// Panics if the box has a different dimensionality than the surface.
    pub fn clip(&mut self, bounds: &BoundingBox) {
        assert_eq!(
            bounds.dims(),
            self.dims(),
            "Bounding box and surface must have the same dimensionality"
        );
        for (axis, grid) in self.axes.iter_mut().enumerate() {
            grid.apply(|v| *v = bounds.clamp(axis, *v));
        }
    }

    /// Mesh vertices as 3-D points in row-major order, or `None` unless the
    /// surface is three dimensional.
    pub fn points3(&self) -> Option<Vec<Point3<f32>>> {
        if self.dims() != 3 {
            return None;
        }
        let (rows, cols) = self.shape();
        let mut points = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                points.push(Point3::new(
                    self.axes[0][(r, c)],
                    self.axes[1][(r, c)],
                    self.axes[2][(r, c)],
                ));
            }
        }
        Some(points)
    }
}

/// `n` evenly spaced samples from `start` to `end`, both included.
fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f32;
    (0..n).map(|i| start + step * i as f32).collect()
}

/// Grid shape used for `free` meshed axes.
fn mesh_shape(free: usize) -> (usize, usize) {
    match free {
        0 => (1, 1),
        1 => (1, SURFACE_RESOLUTION),
        _ => (SURFACE_RESOLUTION, SURFACE_RESOLUTION.pow(free as u32 - 1)),
    }
}

/// Sample index of free axis `k` at mesh position `(r, c)`.
fn mesh_index(k: usize, r: usize, c: usize) -> usize {
    match k {
        0 => c % SURFACE_RESOLUTION,
        1 => r,
        _ => (c / SURFACE_RESOLUTION.pow(k as u32 - 1)) % SURFACE_RESOLUTION,
    }
}

/// Samples the hyperplane through `values` perpendicular to `split_axis`.
///
/// The split axis grid is constant at `values[split_axis]`. The remaining
/// axes, in order, receive the full cross product of
/// [`SURFACE_RESOLUTION`] samples over `[extent.min, extent.max]`.
///
/// # Panics
/// Panics if `split_axis` is not an axis of `values`.
pub fn build_surface(values: &[f32], split_axis: usize, extent: &Extent) -> SurfaceGrid {
    let dims = values.len();
    assert!(split_axis < dims, "Split axis {} out of range for {} dimensions", split_axis, dims);

    let samples = linspace(extent.min, extent.max, SURFACE_RESOLUTION);
    let (rows, cols) = mesh_shape(dims - 1);

    let mut axes = Vec::with_capacity(dims);
    let mut k = 0;
    for i in 0..dims {
        if i == split_axis {
            axes.push(DMatrix::from_element(rows, cols, values[i]));
        } else {
            let free = k;
            axes.push(DMatrix::from_fn(rows, cols, |r, c| samples[mesh_index(free, r, c)]));
            k += 1;
        }
    }

    SurfaceGrid { axes }
}
