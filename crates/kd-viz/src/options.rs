//! Drawing style and per-call render options.

use std::path::{Path, PathBuf};

use crate::{Result, VizError};

/// Points per inch, used to turn line widths and marker sizes into pixels.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Largest figure edge in pixels, the texture size every desktop GPU
/// supports for a render target.
pub const MAX_FIGURE_PIXELS: u32 = 8192;

/// Appearance of a rendered KD-tree, fixed for every `visualize` call.
#[derive(Debug, Clone, PartialEq)]
pub struct KdTreeVisualization {
    /// Opacity of the split planes, in `[0, 1]`.
    pub plane_alpha: f32,
    /// Width of the intersection lines, in points.
    pub intersection_lines_width: f32,
    /// Marker area of split points, in square points.
    pub point_size: f32,
}

impl Default for KdTreeVisualization {
    fn default() -> Self {
        Self::new()
    }
}

impl KdTreeVisualization {
    pub fn new() -> Self {
        Self {
            plane_alpha: 0.4,
            intersection_lines_width: 3.0,
            point_size: 75.0,
        }
    }

    /// Sets the plane opacity, clamped into `[0, 1]`.
    pub fn with_plane_alpha(mut self, alpha: f32) -> Self {
        self.plane_alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_intersection_lines_width(mut self, width: f32) -> Self {
        self.intersection_lines_width = width;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    /// Checks that every field is finite and in range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.plane_alpha) {
            return Err(VizError::InvalidOption(format!(
                "plane_alpha must be within [0, 1], got {}",
                self.plane_alpha
            )));
        }
        check_non_negative("intersection_lines_width", self.intersection_lines_width)?;
        check_non_negative("point_size", self.point_size)?;
        Ok(())
    }
}

/// Where a rendered figure goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output<'a> {
    /// An interactive window.
    Display,
    /// An image file.
    File(&'a Path),
}

/// Options for a single `visualize` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Figure size in inches (width, height).
    pub figsize: (f32, f32),
    /// Pixels per inch.
    pub dpi: f32,
    /// Image file to write; `None` opens a window instead.
    pub filename: Option<PathBuf>,
    /// Camera height above the xy plane, in degrees.
    pub camera_elevation: f32,
    /// Camera azimuth around the z axis, in degrees.
    pub camera_rotation: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            figsize: (20.0, 20.0),
            dpi: 100.0,
            filename: None,
            camera_elevation: 15.0,
            camera_rotation: 30.0,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_figsize(mut self, width: f32, height: f32) -> Self {
        self.figsize = (width, height);
        self
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the camera angles, in degrees.
    pub fn with_camera(mut self, elevation: f32, rotation: f32) -> Self {
        self.camera_elevation = elevation;
        self.camera_rotation = rotation;
        self
    }

    pub fn output(&self) -> Output<'_> {
        match &self.filename {
            Some(path) => Output::File(path),
            None => Output::Display,
        }
    }

    /// Figure size in pixels: `figsize * dpi`, rounded, at least one pixel.
    pub fn figure_pixels(&self) -> Result<(u32, u32)> {
        check_positive("dpi", self.dpi)?;
        check_positive("figsize width", self.figsize.0)?;
        check_positive("figsize height", self.figsize.1)?;

        let width = (self.figsize.0 * self.dpi).round().max(1.0);
        let height = (self.figsize.1 * self.dpi).round().max(1.0);
        if width > MAX_FIGURE_PIXELS as f32 || height > MAX_FIGURE_PIXELS as f32 {
            return Err(VizError::InvalidOption(format!(
                "figure of {}x{} pixels exceeds {} pixels per side",
                width, height, MAX_FIGURE_PIXELS
            )));
        }
        Ok((width as u32, height as u32))
    }
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VizError::InvalidOption(format!("{} must be positive, got {}", name, value)))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(VizError::InvalidOption(format!("{} must not be negative, got {}", name, value)))
    }
}
