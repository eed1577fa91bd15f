use crate::foundation::core::Point;
use crate::model::LassoPath;

/// Hold time after which a touch that has not wandered sets the anchor.
pub const LONG_PRESS_MS: f64 = 500.0;
/// Travel (in image pixels) that cancels a pending long press.
pub const LONG_PRESS_SLOP_PX: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// One pointer sample, already mapped into image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pos: Point,
    /// Monotonic timestamp supplied by the caller.
    pub time_ms: f64,
    pub kind: PointerKind,
    /// Alt held (mouse only): place the anchor instead of drawing.
    pub alt: bool,
}

impl PointerEvent {
    pub fn mouse(pos: Point, time_ms: f64) -> Self {
        Self {
            pos,
            time_ms,
            kind: PointerKind::Mouse,
            alt: false,
        }
    }

    pub fn touch(pos: Point, time_ms: f64) -> Self {
        Self {
            kind: PointerKind::Touch,
            ..Self::mouse(pos, time_ms)
        }
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

/// What the caller should do after feeding an event.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LassoOutcome {
    #[default]
    Nothing,
    /// A lasso with at least three points was completed; commit it as the part outline.
    PathFinished(LassoPath),
    /// The gesture ended with too few points to form a region.
    Discarded,
    /// Move the active part's anchor here.
    AnchorSet(Point),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingPress {
    start: Point,
    start_ms: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum LassoState {
    #[default]
    Idle,
    Drawing {
        path: LassoPath,
        press: Option<PendingPress>,
    },
}

/// Freehand lasso input state machine.
///
/// Mouse: press, drag, release draws one outline; Alt+press sets the anchor. Touch: the same
/// drawing gesture, except a hold of [`LONG_PRESS_MS`] within [`LONG_PRESS_SLOP_PX`] of the
/// start point abandons the lasso and sets the anchor at the start point. There are no timers;
/// the caller forwards time through events or [`LassoEditor::tick`].
#[derive(Clone, Debug, Default)]
pub struct LassoEditor {
    state: LassoState,
}

impl LassoEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, LassoState::Drawing { .. })
    }

    /// Points of the lasso in progress (empty when idle).
    pub fn current_path(&self) -> &[Point] {
        match &self.state {
            LassoState::Drawing { path, .. } => path,
            LassoState::Idle => &[],
        }
    }

    pub fn cancel(&mut self) {
        self.state = LassoState::Idle;
    }

    pub fn pointer_down(&mut self, ev: PointerEvent) -> LassoOutcome {
        if ev.alt && ev.kind == PointerKind::Mouse {
            self.state = LassoState::Idle;
            return LassoOutcome::AnchorSet(ev.pos);
        }
        let press = (ev.kind == PointerKind::Touch).then_some(PendingPress {
            start: ev.pos,
            start_ms: ev.time_ms,
        });
        self.state = LassoState::Drawing {
            path: vec![ev.pos],
            press,
        };
        LassoOutcome::Nothing
    }

    pub fn pointer_move(&mut self, ev: PointerEvent) -> LassoOutcome {
        if let Some(anchor) = self.fire_long_press(ev.time_ms) {
            return LassoOutcome::AnchorSet(anchor);
        }
        if let LassoState::Drawing { path, press } = &mut self.state {
            if press.is_some_and(|p| (ev.pos - p.start).hypot() > LONG_PRESS_SLOP_PX) {
                *press = None;
            }
            path.push(ev.pos);
        }
        LassoOutcome::Nothing
    }

    pub fn pointer_up(&mut self, ev: PointerEvent) -> LassoOutcome {
        if let Some(anchor) = self.fire_long_press(ev.time_ms) {
            return LassoOutcome::AnchorSet(anchor);
        }
        match std::mem::take(&mut self.state) {
            LassoState::Idle => LassoOutcome::Nothing,
            LassoState::Drawing { path, .. } if path.len() >= 3 => LassoOutcome::PathFinished(path),
            LassoState::Drawing { .. } => LassoOutcome::Discarded,
        }
    }

    /// Advance the clock without pointer input; fires a due long press.
    pub fn tick(&mut self, now_ms: f64) -> LassoOutcome {
        match self.fire_long_press(now_ms) {
            Some(anchor) => LassoOutcome::AnchorSet(anchor),
            None => LassoOutcome::Nothing,
        }
    }

    fn fire_long_press(&mut self, now_ms: f64) -> Option<Point> {
        let LassoState::Drawing {
            press: Some(press), ..
        } = &self.state
        else {
            return None;
        };
        if now_ms - press.start_ms < LONG_PRESS_MS {
            return None;
        }
        let anchor = press.start;
        self.state = LassoState::Idle;
        Some(anchor)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/lasso.rs"]
mod tests;
