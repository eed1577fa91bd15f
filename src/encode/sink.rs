use crate::foundation::core::Canvas;
use crate::foundation::error::SpritecutResult;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Size of every pushed frame, after export scaling.
    pub width: u32,
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: usize,
    /// Display time of each frame in milliseconds, for animated outputs.
    pub frame_delay_ms: u32,
}

impl SinkConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

/// Sink contract for consuming rendered frames.
///
/// Ordering contract: `push_frame` is called with indices `0..frame_count` in increasing order,
/// between one `begin` and one `end`.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> SpritecutResult<()>;
    fn push_frame(&mut self, idx: usize, frame: &FrameRGBA) -> SpritecutResult<()>;
    fn end(&mut self) -> SpritecutResult<()>;
}

/// In-memory sink for tests and debugging. Frames are validated like the encoding sinks do.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(usize, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(usize, FrameRGBA)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SpritecutResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &FrameRGBA) -> SpritecutResult<()> {
        check_frame(self.cfg.as_ref(), idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SpritecutResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Check a frame against the size announced in `begin`.
pub(crate) fn check_frame(
    cfg: Option<&SinkConfig>,
    idx: usize,
    frame: &FrameRGBA,
) -> SpritecutResult<SinkConfig> {
    use crate::foundation::error::SpritecutError;

    let cfg = *cfg.ok_or_else(|| SpritecutError::export("push_frame called before begin"))?;
    if idx >= cfg.frame_count {
        return Err(SpritecutError::export(format!(
            "frame index {idx} out of range (expected < {})",
            cfg.frame_count
        )));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(SpritecutError::export(format!(
            "frame {idx} is {}x{}, sink expects {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != frame.canvas().rgba_len() {
        return Err(SpritecutError::export(format!("frame {idx} has a malformed pixel buffer")));
    }
    Ok(cfg)
}
