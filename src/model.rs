pub mod document;
pub mod params;
pub mod part;
pub mod vertex_group;

pub use document::{
    Document, MoveDirection, RESERVED_PART_NAME, WHOLE_PART_NAME, is_reserved_part_name,
};
pub use params::AnimationParams;
pub use part::{LassoPath, Part, PartPaths, PathKind};
pub use vertex_group::{VertexGroup, VertexRef};
