//! Split-plane geometry for drawing KD-trees in 3D.

mod bounds;
mod error;
mod extent;
pub mod kd;
mod lines;
mod surface;

pub use bounds::BoundingBox;
pub use error::{Error, Result};
pub use extent::{find_extent, Extent};
pub use kd::{
    parse_heap_layout, render_splits, CollectingVisitor, FnVisitor, KdNode, KdTree,
    SplitGeometry, SplitVisitor,
};
pub use lines::{intersection_lines, IntersectionLine};
pub use surface::{build_surface, SurfaceGrid, SURFACE_RESOLUTION};
