//! Pure geometry helpers: distances, arclength resampling, bounds, convex hulls.

pub mod hull;
pub mod path;

pub use hull::{centroid, convex_hull, scale_about_centroid};
pub use path::{
    BoundingBox, DEFAULT_VERTEX_SPACING, MIN_VERTICES_PER_PATH, bounding_box,
    create_uniform_vertices, distance, path_length,
};
