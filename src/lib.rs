//! Spritecut turns a single character image into a looping cut-out animation.
//!
//! Parts are cut from the image with freehand lassos, each part oscillates about its anchor,
//! and every frame is a pure function of the document and a time value:
//!
//! - Edit a [`Document`] (directly or through a [`Session`])
//! - [`segment`] the image into part layers ([`Bitmaps`])
//! - Render frames with a [`Compositor`], or export a spritesheet / GIF
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod editor;
pub mod effects;
pub mod encode;
pub mod foundation;
pub mod geometry;
pub mod model;
pub mod render;
pub mod segment;
pub mod session;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgba8Premul, Vec2};
pub use crate::foundation::error::{SpritecutError, SpritecutResult};

pub use crate::assets::SourceImage;
pub use crate::config::{Preferences, ProjectConfig};
pub use crate::editor::{LassoEditor, LassoOutcome, PointerEvent, PointerKind, VertexPicker};
pub use crate::encode::{
    ExportArtifact, ExportOpts, ExportScale, FrameSink, InMemorySink, RenderingFlag, SinkConfig,
};
pub use crate::model::{
    AnimationParams, Document, LassoPath, MoveDirection, Part, PartPaths, PathKind, VertexGroup,
    VertexRef,
};
pub use crate::render::{Compositor, FrameInputs, FrameRGBA, PartMotion, SeamPatch};
pub use crate::segment::{Bitmaps, Layer, SegmentMode, SegmentOpts, Segmenter, segment};
pub use crate::session::{CancelToken, PreviewLoop, Session};
