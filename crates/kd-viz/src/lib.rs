//! Drawing KD-trees as clipped split planes with macroquad.

use std::hash::{Hash, Hasher};

use macroquad::prelude::*;
use nalgebra::Point3;

pub mod driver;
mod error;
pub mod export;
pub mod figure;
mod options;

pub use driver::visualize;
pub use error::{Result, VizError};
pub use figure::{Figure, SceneBounds};
pub use options::{KdTreeVisualization, Output, RenderOptions, MAX_FIGURE_PIXELS, POINTS_PER_INCH};

/// Vertical field of view used for every camera, in radians.
pub const CAMERA_FOVY: f32 = std::f32::consts::FRAC_PI_4;

/// Maps data coordinates to world space so that data `z` points up.
///
/// Data `(x, y, z)` becomes world `(x, z, -y)`, a proper rotation, so the
/// handedness of the data is preserved on screen.
#[inline]
pub fn to_world(p: &Point3<f32>) -> Vec3 {
    vec3(p.x, p.z, -p.y)
}

/// Generates a deterministic color from a split point using hashing.
/// The plane, marker and any re-render of the same node share one color.
pub fn node_color(point: &[f32], alpha: f32) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for c in point {
        c.to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    // Extract RGB from hash bytes
    let r = ((hash >> 16) & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = (hash & 0xFF) as u8;

    // Ensure colors aren't too dark by adding a minimum brightness
    let r = r.max(40);
    let g = g.max(40);
    let b = b.max(40);

    Color::from_rgba(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Orbit camera for 3D scene navigation.
///
/// Angles follow the plotting convention: `pitch` is the elevation above the
/// data xy plane and the azimuth is measured around the data z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Distance change per scroll wheel step
    pub zoom_speed: f32,
    /// Closest the camera may zoom in
    pub min_distance: f32,
    /// Farthest the camera may zoom out
    pub max_distance: f32,
}

/// Radians of yaw/pitch per pixel of mouse drag.
const DRAG_SENSITIVITY: f32 = 2.0;

/// Radians of yaw/pitch per frame while an arrow key is held.
const KEY_STEP: f32 = 0.02;

/// Pitch limit, short of straight up/down where `up` degenerates.
const MAX_PITCH: f32 = 1.5;

impl OrbitCamera {
    /// Creates a camera orbiting `target` at `distance`.
    ///
    /// Zoom limits scale with the starting distance: the camera may come
    /// four times closer or move eight times farther away.
    pub fn new(target: Vec3, distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target,
            zoom_speed: distance * 0.1,
            min_distance: distance * 0.25,
            max_distance: distance * 8.0,
        }
    }

    /// Frames `bounds` from the given elevation and azimuth, in degrees.
    ///
    /// The distance is chosen so the bounding sphere of the scene fits the
    /// vertical field of view.
    pub fn framing(bounds: &SceneBounds, elevation: f32, rotation: f32) -> Self {
        let radius = bounds.radius().max(1e-3);
        let distance = radius / (CAMERA_FOVY / 2.0).sin() * 1.05;

        // World yaw 0 looks down +z, which is data azimuth -90 degrees
        Self::new(
            bounds.center(),
            distance,
            (rotation + 90.0).to_radians(),
            elevation.to_radians(),
        )
    }

    /// Applies this frame's mouse drag, scroll and arrow key input.
    pub fn update(&mut self) {
        let mut yaw_delta = 0.0;
        let mut pitch_delta = 0.0;

        if is_mouse_button_down(MouseButton::Left) {
            let drag = mouse_delta_position() * DRAG_SENSITIVITY;
            yaw_delta -= drag.x;
            pitch_delta -= drag.y;
        }
        if is_key_down(KeyCode::Left) {
            yaw_delta += KEY_STEP;
        }
        if is_key_down(KeyCode::Right) {
            yaw_delta -= KEY_STEP;
        }
        if is_key_down(KeyCode::Up) {
            pitch_delta += KEY_STEP;
        }
        if is_key_down(KeyCode::Down) {
            pitch_delta -= KEY_STEP;
        }

        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);
        self.zoom(mouse_wheel().1);
    }

    /// Moves toward the target by `steps` wheel steps, within the zoom limits.
    pub fn zoom(&mut self, steps: f32) {
        self.distance =
            (self.distance - steps * self.zoom_speed).clamp(self.min_distance, self.max_distance);
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * vec3(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            fovy: CAMERA_FOVY,
            ..Default::default()
        }
    }
}

/// A small balanced 3-D tree used by the binaries when no tree file is given.
pub fn demo_tree() -> kd_tree::KdTree {
    use kd_tree::{KdNode, KdTree};

    KdTree::from_root(KdNode::new(
        vec![5.0, 5.0, 5.0],
        Some(KdNode::new(
            vec![2.0, 3.0, 6.0],
            Some(KdNode::new(vec![1.0, 1.0, 2.0], Some(KdNode::leaf(vec![0.5, 0.5, 1.0])), None)),
            Some(KdNode::leaf(vec![3.0, 7.0, 4.0])),
        )),
        Some(KdNode::new(
            vec![8.0, 6.0, 3.0],
            Some(KdNode::leaf(vec![7.0, 2.0, 8.0])),
            Some(KdNode::new(vec![9.0, 8.0, 7.0], None, Some(KdNode::leaf(vec![8.5, 9.0, 9.5])))),
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn world_mapping_puts_data_z_up() {
        assert_close(to_world(&Point3::new(1.0, 2.0, 3.0)), vec3(1.0, 3.0, -2.0));
    }

    #[test]
    fn node_color_is_deterministic() {
        let a = node_color(&[1.0, 2.0, 3.0], 0.4);
        let b = node_color(&[1.0, 2.0, 3.0], 0.4);
        assert_eq!(a, b);
        assert!(a.r >= 40.0 / 255.0 - 1e-6);
        assert!((a.a - 102.0 / 255.0).abs() < 1e-6);
        assert_eq!(node_color(&[1.0, 2.0, 3.0], 1.0).a, 1.0);
    }

    #[test]
    fn camera_follows_plot_angle_convention() {
        let bounds = SceneBounds::from_points([vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0)]);

        // Azimuth 0, elevation 0 looks from data +x
        let cam = OrbitCamera::framing(&bounds, 0.0, 0.0);
        let dir = (cam.position() - cam.target).normalize();
        assert_close(dir, to_world(&Point3::new(1.0, 0.0, 0.0)));

        // Azimuth 90 looks from data +y
        let cam = OrbitCamera::framing(&bounds, 0.0, 90.0);
        let dir = (cam.position() - cam.target).normalize();
        assert_close(dir, to_world(&Point3::new(0.0, 1.0, 0.0)));

        // Elevation 90 looks straight down data z
        let cam = OrbitCamera::framing(&bounds, 90.0, 30.0);
        let dir = (cam.position() - cam.target).normalize();
        assert_close(dir, to_world(&Point3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn framing_fits_bounding_sphere() {
        let bounds = SceneBounds::from_points([vec3(0.0, 0.0, 0.0), vec3(2.0, 2.0, 2.0)]);
        let cam = OrbitCamera::framing(&bounds, 15.0, 30.0);

        assert_close(cam.target, vec3(1.0, 1.0, 1.0));
        let half_fov_sin = (CAMERA_FOVY / 2.0).sin();
        assert!(cam.distance * half_fov_sin >= bounds.radius());
        assert!(cam.min_distance < cam.distance && cam.distance < cam.max_distance);
    }

    #[test]
    fn zoom_limits_scale_with_starting_distance() {
        let mut cam = OrbitCamera::new(Vec3::ZERO, 10.0, 0.0, 0.0);
        assert_eq!(cam.min_distance, 2.5);
        assert_eq!(cam.max_distance, 80.0);

        cam.zoom(1.0);
        assert!((cam.distance - 9.0).abs() < 1e-5);

        cam.zoom(1000.0);
        assert_eq!(cam.distance, 2.5);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, 80.0);
    }

    #[test]
    fn demo_tree_is_three_dimensional() {
        let tree = demo_tree();
        assert_eq!(tree.require_dimensions(3), Ok(3));
        assert_eq!(tree.node_count(), 9);
    }
}
