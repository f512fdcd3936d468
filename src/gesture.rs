//! Horizontal drag on the two-state language toggle.
//!
//! Touch and mouse input feed the same tracker; only the x coordinate of the
//! press and of the release matter.

use crate::i18n::Language;

/// Input device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Touch,
    Mouse,
}

/// Tracks one drag at a time.
#[derive(Debug, Clone)]
pub struct DragGesture {
    threshold: f64,
    start_x: Option<f64>,
}

impl DragGesture {
    /// `threshold` is the horizontal distance a drag must strictly exceed.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.start_x.is_some()
    }

    /// Press: begin tracking (restarts any drag already in progress).
    pub fn start(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Abandon the current drag without a decision.
    pub fn cancel(&mut self) {
        self.start_x = None;
    }

    /// Release: end the drag and decide whether it asks for a switch.
    ///
    /// From the default language the toggle sits left, so only a rightward
    /// drag switches; from the alternate language only a leftward one does.
    pub fn finish(&mut self, x: f64, current: Language) -> Option<Language> {
        let start = self.start_x.take()?;
        let displacement = x - start;
        if !displacement.is_finite() || displacement.abs() <= self.threshold {
            return None;
        }

        let toward_alternate = current.is_default() && displacement > 0.0;
        let toward_default = !current.is_default() && displacement < 0.0;
        (toward_alternate || toward_default).then(|| current.alternate())
    }
}
