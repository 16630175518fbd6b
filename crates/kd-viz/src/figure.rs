//! Turning split geometry into drawable meshes.
//!
//! A [`Figure`] is built once per `visualize` call from the renderer's
//! output and owns every mesh it draws. Building it touches no GPU state, so
//! it can be inspected without a window.

use kd_tree::{render_splits, CollectingVisitor, Error, KdTree, SplitGeometry};
use log::{info, warn};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::Point3;

use crate::options::POINTS_PER_INCH;
use crate::{node_color, to_world, KdTreeVisualization, RenderOptions, Result};

/// Axis-aligned bounds of everything in a figure, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneBounds {
    /// Bounds that contain nothing yet.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include(p);
        }
        bounds
    }

    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Radius of the bounding sphere (half the diagonal).
    pub fn radius(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        (self.max - self.min).length() * 0.5
    }
}

/// A translucent split plane.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u16>,
    pub color: Color,
}

/// The marker drawn at a split point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub center: Vec3,
    pub radius: f32,
    pub color: Color,
}

/// An intersection line, drawn as a thin square prism so it has a width.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrism {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u16>,
}

/// Everything drawn for one tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureNode {
    pub depth: usize,
    pub split_axis: usize,
    pub surface: SurfaceMesh,
    pub marker: Marker,
    pub lines: Vec<LinePrism>,
}

/// GPU-ready meshes of one node, built once and drawn every frame.
struct DrawNode {
    surface: Mesh,
    marker: Marker,
    lines: Vec<Mesh>,
}

impl DrawNode {
    fn new(node: &FigureNode) -> Self {
        Self {
            surface: Mesh {
                vertices: to_vertices(&node.surface.vertices, node.surface.color),
                indices: node.surface.indices.clone(),
                texture: None,
            },
            marker: node.marker,
            lines: node
                .lines
                .iter()
                .map(|line| Mesh {
                    vertices: to_vertices(&line.vertices, BLACK),
                    indices: line.indices.clone(),
                    texture: None,
                })
                .collect(),
        }
    }
}

/// A KD-tree rendered into meshes, in pre-order.
pub struct Figure {
    nodes: Vec<FigureNode>,
    draw_list: Vec<DrawNode>,
    bounds: SceneBounds,
}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Figure")
            .field("nodes", &self.nodes)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Figure {
    /// Validates `tree` as a 3-D tree and meshes every node.
    ///
    /// Line widths and marker sizes are given in points; they are converted
    /// to world units so that the scene's bounding sphere spans the larger
    /// side of the figure.
    pub fn build(
        tree: &KdTree,
        style: &KdTreeVisualization,
        options: &RenderOptions,
    ) -> Result<Self> {
        style.validate()?;
        options.figure_pixels()?;
        tree.require_dimensions(3)?;

        let mut visitor = CollectingVisitor::new();
        let extent = render_splits(tree, &mut visitor)?;
        let geometry = visitor.into_geometry();

        let mut bounds = SceneBounds::empty();
        let mut surfaces = Vec::with_capacity(geometry.len());
        for g in &geometry {
            let points = g.surface.points3().ok_or(Error::UnsupportedDimensionality {
                found: g.surface.dims(),
                supported: 3,
            })?;
            for p in &points {
                bounds.include(to_world(p));
            }
            surfaces.push(points);
        }

        let figure_points = options.figsize.0.max(options.figsize.1) * POINTS_PER_INCH;
        let world_per_point = (2.0 * bounds.radius()).max(f32::EPSILON) / figure_points;

        let nodes: Vec<FigureNode> = geometry
            .iter()
            .zip(&surfaces)
            .map(|(g, points)| mesh_node(g, points, style, world_per_point))
            .collect();
        let draw_list = nodes.iter().map(DrawNode::new).collect();

        info!(
            "figure with {} planes, data extent [{}, {}]",
            geometry.len(),
            extent.min,
            extent.max
        );

        Ok(Self {
            nodes,
            draw_list,
            bounds,
        })
    }

    #[inline]
    pub fn nodes(&self) -> &[FigureNode] {
        &self.nodes
    }

    #[inline]
    pub fn bounds(&self) -> &SceneBounds {
        &self.bounds
    }

    /// Issues the draw calls for every node, ancestors first.
    ///
    /// Expects a 3D camera to be set.
    pub fn draw(&self) {
        for node in &self.draw_list {
            draw_mesh(&node.surface);
            draw_sphere(node.marker.center, node.marker.radius, None, node.marker.color);
            for line in &node.lines {
                draw_mesh(line);
            }
        }
    }
}

fn to_vertices(points: &[Vec3], color: Color) -> Vec<Vertex> {
    points
        .iter()
        .map(|&p| Vertex::new2(p, vec2(0.0, 0.0), color))
        .collect()
}

fn mesh_node(
    geometry: &SplitGeometry,
    points: &[Point3<f32>],
    style: &KdTreeVisualization,
    world_per_point: f32,
) -> FigureNode {
    let (rows, cols) = geometry.surface.shape();
    let surface = surface_mesh(points, rows, cols, node_color(&geometry.point, style.plane_alpha));

    // Marker sizes are areas in square points
    let marker = Marker {
        center: to_world(&Point3::new(geometry.point[0], geometry.point[1], geometry.point[2])),
        radius: style.point_size.sqrt() * 0.5 * world_per_point,
        color: node_color(&geometry.point, 1.0),
    };

    let radius = style.intersection_lines_width * 0.5 * world_per_point;
    let lines = geometry
        .lines
        .iter()
        .filter_map(|line| {
            let (start, end) = line.endpoints3()?;
            let prism = line_prism(to_world(&start), to_world(&end), radius);
            if prism.is_none() {
                warn!(
                    "skipping collapsed intersection line on axis {} at depth {}",
                    line.axis(),
                    geometry.depth
                );
            }
            prism
        })
        .collect();

    FigureNode {
        depth: geometry.depth,
        split_axis: geometry.split_axis,
        surface,
        marker,
        lines,
    }
}

/// Triangulates a `rows x cols` grid of row-major points, two triangles per cell.
pub fn surface_mesh(points: &[Point3<f32>], rows: usize, cols: usize, color: Color) -> SurfaceMesh {
    let vertices = points.iter().map(to_world).collect();

    let cells = rows.saturating_sub(1) * cols.saturating_sub(1);
    let mut indices: Vec<u16> = Vec::with_capacity(cells * 6);
    for r in 0..rows.saturating_sub(1) {
        for c in 0..cols.saturating_sub(1) {
            let i0 = (r * cols + c) as u16;
            let i1 = i0 + 1;
            let i2 = i0 + cols as u16;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i1, i3, i0, i3, i2]);
        }
    }

    SurfaceMesh {
        vertices,
        indices,
        color,
    }
}

/// Builds a square prism of half-width `radius` from `start` to `end`.
///
/// Returns `None` if the segment has no length.
pub fn line_prism(start: Vec3, end: Vec3, radius: f32) -> Option<LinePrism> {
    let axis = end - start;
    if axis.length() <= f32::EPSILON {
        return None;
    }
    let dir = axis.normalize();

    // Any direction not parallel to the segment works as a reference
    let reference = if dir.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let u = dir.cross(reference).normalize() * radius;
    let v = dir.cross(u).normalize() * radius;

    let offsets = [u + v, u - v, -u - v, -u + v];
    let mut vertices = Vec::with_capacity(8);
    for o in offsets {
        vertices.push(start + o);
    }
    for o in offsets {
        vertices.push(end + o);
    }

    // Four side faces, each a quad between consecutive corners
    let mut indices = Vec::with_capacity(24);
    for k in 0..4u16 {
        let a = k;
        let b = (k + 1) % 4;
        indices.extend_from_slice(&[a, b, b + 4, a, b + 4, a + 4]);
    }

    Some(LinePrism { vertices, indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kd_tree::KdNode;

    fn two_node_tree() -> KdTree {
        KdTree::from_root(KdNode::new(
            vec![0.0, 0.0, 0.0],
            Some(KdNode::leaf(vec![-1.0, -1.0, -1.0])),
            None,
        ))
    }

    #[test]
    fn scene_bounds_grow_with_points() {
        let bounds = SceneBounds::from_points([vec3(0.0, 1.0, 2.0), vec3(-2.0, 3.0, 0.0)]);
        assert_eq!(bounds.min, vec3(-2.0, 1.0, 0.0));
        assert_eq!(bounds.max, vec3(0.0, 3.0, 2.0));
        assert_eq!(bounds.center(), vec3(-1.0, 2.0, 1.0));
        assert!((bounds.radius() - 3.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn empty_bounds() {
        let bounds = SceneBounds::empty();
        assert!(bounds.is_empty());
        assert_eq!(bounds.radius(), 0.0);
        assert_eq!(bounds.center(), Vec3::ZERO);
    }

    #[test]
    fn surface_mesh_has_two_triangles_per_cell() {
        let points: Vec<Point3<f32>> = (0..100)
            .map(|i| Point3::new(0.0, (i % 10) as f32, (i / 10) as f32))
            .collect();
        let mesh = surface_mesh(&points, 10, 10, WHITE);

        assert_eq!(mesh.vertices.len(), 100);
        assert_eq!(mesh.indices.len(), 9 * 9 * 6);
        assert!(mesh.indices.iter().all(|&i| i < 100));
    }

    #[test]
    fn line_prism_surrounds_segment() {
        let prism = line_prism(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 4.0), 0.5).unwrap();

        assert_eq!(prism.vertices.len(), 8);
        assert_eq!(prism.indices.len(), 24);
        for v in &prism.vertices[..4] {
            assert!(v.z.abs() < 1e-6);
            assert!(((v.x * v.x + v.y * v.y).sqrt() - 0.5 * 2.0f32.sqrt()).abs() < 1e-5);
        }
        for v in &prism.vertices[4..] {
            assert!((v.z - 4.0).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_length_line_has_no_prism() {
        assert!(line_prism(vec3(1.0, 1.0, 1.0), vec3(1.0, 1.0, 1.0), 0.5).is_none());
    }

    #[test]
    fn two_node_tree_gives_two_planes_and_markers() {
        let figure = Figure::build(
            &two_node_tree(),
            &KdTreeVisualization::default(),
            &RenderOptions::default(),
        )
        .unwrap();

        let nodes = figure.nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].split_axis, 0);
        assert_eq!(nodes[1].split_axis, 1);
        assert_eq!(nodes[0].marker.center, vec3(0.0, 0.0, 0.0));
        assert_eq!(nodes[1].marker.center, to_world(&Point3::new(-1.0, -1.0, -1.0)));

        // Root plane is translucent, markers are opaque
        assert!((nodes[0].surface.color.a - 0.4).abs() < 0.01);
        assert_eq!(nodes[0].marker.color.a, 1.0);

        // The left child's plane stays on the negative side of the root split
        assert!(nodes[1].surface.vertices.iter().all(|v| v.x <= 0.0));
    }

    #[test]
    fn draw_list_is_built_once_per_node() {
        let figure = Figure::build(
            &two_node_tree(),
            &KdTreeVisualization::default(),
            &RenderOptions::default(),
        )
        .unwrap();

        assert_eq!(figure.draw_list.len(), figure.nodes().len());
        for (drawn, node) in figure.draw_list.iter().zip(figure.nodes()) {
            assert_eq!(drawn.surface.vertices.len(), node.surface.vertices.len());
            assert_eq!(drawn.surface.indices, node.surface.indices);
            assert_eq!(drawn.lines.len(), node.lines.len());
            assert!(drawn
                .surface
                .vertices
                .iter()
                .all(|v| v.color == Into::<[u8; 4]>::into(node.surface.color)));
        }
    }

    #[test]
    fn single_node_draws_one_plane_and_both_lines() {
        let tree = KdTree::from_root(KdNode::leaf(vec![1.0, 2.0, 3.0]));
        let figure =
            Figure::build(&tree, &KdTreeVisualization::default(), &RenderOptions::default())
                .unwrap();

        assert_eq!(figure.nodes().len(), 1);
        assert_eq!(figure.nodes()[0].lines.len(), 2);
        assert!(!figure.bounds().is_empty());
    }

    #[test]
    fn marker_and_line_sizes_follow_style() {
        let tree = two_node_tree();
        let options = RenderOptions::default();
        let small = Figure::build(&tree, &KdTreeVisualization::new().with_point_size(25.0), &options)
            .unwrap();
        let large = Figure::build(&tree, &KdTreeVisualization::new().with_point_size(100.0), &options)
            .unwrap();

        // Radius grows with the square root of the marker area
        let ratio = large.nodes()[0].marker.radius / small.nodes()[0].marker.radius;
        assert!((ratio - 2.0).abs() < 1e-4);
    }

    #[test]
    fn non_three_dimensional_trees_are_rejected() {
        let tree = KdTree::from_root(KdNode::leaf(vec![1.0, 2.0]));
        let result = Figure::build(&tree, &KdTreeVisualization::default(), &RenderOptions::default());

        assert!(matches!(
            result,
            Err(crate::VizError::Tree(Error::UnsupportedDimensionality {
                found: 2,
                supported: 3
            }))
        ));
    }

    #[test]
    fn empty_tree_is_rejected() {
        let result = Figure::build(
            &KdTree::new(),
            &KdTreeVisualization::default(),
            &RenderOptions::default(),
        );
        assert!(matches!(result, Err(crate::VizError::Tree(Error::EmptyTree))));
    }
}
