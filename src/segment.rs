pub mod bitmaps;
pub mod engine;
pub mod grow;
pub mod mask;

pub use bitmaps::{Bitmaps, Layer, STATIC_BODY_KEY};
pub use engine::{SegmentMode, SegmentOpts, Segmenter, segment};
pub use mask::Mask;
