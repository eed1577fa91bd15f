pub mod export;
pub mod gif;
pub mod guard;
pub mod sink;
pub mod spritesheet;

pub use export::{
    ExportArtifact, ExportOpts, ExportScale, GIF_FILE_NAME, SPRITESHEET_FILE_NAME, export_gif,
    export_spritesheet, render_frames, scale_nearest,
};
pub use gif::{GIF_FPS, GIF_FRAME_COUNT, GIF_FRAME_DELAY_MS, GifSink, gif_frame_times};
pub use guard::{RenderingFlag, RenderingGuard};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
pub use spritesheet::{SHEET_COLUMNS, SHEET_FRAMES, SHEET_ROWS, SpritesheetSink, sheet_frame_times};
