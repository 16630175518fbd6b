//! Axis-aligned clipping region for a subtree.

/// Per-axis lower and upper limits still valid for the subtree being drawn.
///
/// Limits may be infinite: the root starts unbounded on every axis and each
/// split tightens exactly one limit on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    lower: Vec<f32>,
    upper: Vec<f32>,
}

impl BoundingBox {
    /// Creates a box from explicit limits.
    ///
    /// # Panics
    /// Panics if `lower` and `upper` have different lengths.
    pub fn new(lower: Vec<f32>, upper: Vec<f32>) -> Self {
        assert_eq!(
            lower.len(),
            upper.len(),
            "Bounding box limits must have the same dimensionality"
        );
        Self { lower, upper }
    }

    /// A box spanning `(-inf, +inf)` on each of `dims` axes.
    pub fn unbounded(dims: usize) -> Self {
        Self {
            lower: vec![f32::NEG_INFINITY; dims],
            upper: vec![f32::INFINITY; dims],
        }
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.lower.len()
    }

    #[inline]
    pub fn lower(&self) -> &[f32] {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &[f32] {
        &self.upper
    }

    /// The box left of a split: upper limit on `axis` becomes `value`.
    pub fn left_of(&self, axis: usize, value: f32) -> Self {
        let mut tightened = self.clone();
        tightened.upper[axis] = value;
        tightened
    }

    /// The box right of a split: lower limit on `axis` becomes `value`.
    pub fn right_of(&self, axis: usize, value: f32) -> Self {
        let mut tightened = self.clone();
        tightened.lower[axis] = value;
        tightened
    }

    /// Pulls `value` into the limits of `axis`.
    ///
    /// Applies the lower limit first, then the upper one, so an inverted
    /// box (lower above upper) resolves to the upper limit instead of
    /// panicking like [`f32::clamp`].
    #[inline]
    pub fn clamp(&self, axis: usize, value: f32) -> f32 {
        let mut v = value;
        if v < self.lower[axis] {
            v = self.lower[axis];
        }
        if v > self.upper[axis] {
            v = self.upper[axis];
        }
        v
    }

    /// Returns `true` if every coordinate of `point` lies within the limits.
    pub fn contains(&self, point: &[f32]) -> bool {
        point
            .iter()
            .enumerate()
            .all(|(axis, &c)| self.lower[axis] <= c && c <= self.upper[axis])
    }
}
