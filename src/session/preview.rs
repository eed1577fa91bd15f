use crate::foundation::error::SpritecutResult;
use crate::render::backend::FrameRGBA;
use crate::render::compositor::Compositor;
use crate::session::editor_session::Session;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancels a [`PreviewLoop`] from anywhere (teardown, image reset). Cancellation is final.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Inputs a running preview depends on: bitmap cache version and document revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DependencyStamp {
    bitmaps: u64,
    revision: u64,
}

/// Cooperative live-preview driver: the host calls [`PreviewLoop::tick`] once per display frame
/// with its clock, and gets back the frame to show.
///
/// The loop restarts (dropping cached paints) whenever its dependencies change. After
/// cancellation no further frames are drawn.
pub struct PreviewLoop {
    compositor: Compositor,
    stamp: Option<DependencyStamp>,
    cancel: CancelToken,
    restarts: u64,
}

impl Default for PreviewLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewLoop {
    pub fn new() -> Self {
        Self {
            compositor: Compositor::new(),
            stamp: None,
            cancel: CancelToken::default(),
            restarts: 0,
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// How many times the loop restarted because its dependencies changed.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Draw the frame for `now_ms`, or `None` when cancelled or there is nothing to show yet.
    ///
    /// Reads whatever layers the session has cached; stale layers are shown until the host
    /// refreshes them.
    pub fn tick(&mut self, session: &Session, now_ms: f64) -> SpritecutResult<Option<FrameRGBA>> {
        if self.is_cancelled() {
            return Ok(None);
        }
        let bitmaps = session.bitmaps();
        if bitmaps.static_body().is_none() {
            return Ok(None);
        }

        let stamp = DependencyStamp {
            bitmaps: bitmaps.version(),
            revision: session.document().revision(),
        };
        if self.stamp != Some(stamp) {
            if self.stamp.is_some() {
                self.restarts += 1;
                tracing::trace!(restarts = self.restarts, "preview restarted");
            }
            self.compositor.clear_cache();
            self.stamp = Some(stamp);
        }

        self.compositor
            .draw_frame(&session.frame_inputs(), now_ms)
            .map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview.rs"]
mod tests;
