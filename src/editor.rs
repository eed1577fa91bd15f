//! Pointer-driven editing: lasso drawing with anchor placement, and vertex picking for seams.
//!
//! Editors only interpret input. They return outcomes that the session applies to the document.

pub mod lasso;
pub mod vertex_picker;

pub use lasso::{
    LONG_PRESS_MS, LONG_PRESS_SLOP_PX, LassoEditor, LassoOutcome, PointerEvent, PointerKind,
};
pub use vertex_picker::{EXPLODED_STEP_PX, VERTEX_PICK_RADIUS, VertexPicker};
