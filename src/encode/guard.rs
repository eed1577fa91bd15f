use crate::foundation::error::{SpritecutError, SpritecutResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "export in progress" flag.
///
/// Clones observe the same flag. At most one [`RenderingGuard`] exists at a time; dropping it
/// clears the flag on success, error and unwind alike.
#[derive(Clone, Debug, Default)]
pub struct RenderingFlag {
    busy: Arc<AtomicBool>,
}

impl RenderingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_rendering(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the flag, or fail with [`SpritecutError::Busy`] when an export is already running.
    pub fn try_begin(&self) -> SpritecutResult<RenderingGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SpritecutError::Busy)?;
        Ok(RenderingGuard {
            busy: Arc::clone(&self.busy),
        })
    }
}

#[derive(Debug)]
pub struct RenderingGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for RenderingGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/guard.rs"]
mod tests;
