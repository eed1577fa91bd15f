pub mod backend;
pub mod compositor;
pub(crate) mod cpu;
pub mod motion;
pub mod seam;

pub use backend::FrameRGBA;
pub use compositor::{Compositor, FrameInputs, draw_frame};
pub use motion::{LOOP_DURATION_MS, PartMotion, cycle_at};
pub use seam::{SEAM_HULL_SCALE, SeamContext, SeamPatch, plan_seams};
