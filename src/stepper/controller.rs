//! Stepper controller — wheel input to a bounded milestone index.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use super::milestones::{Milestone, MilestoneSequence};
use super::scroll_lock::{PageScroll, ScrollLockGuard};

/// Default minimum spacing between accepted wheel events.
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(250);

/// What happened to a single wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Moved forward one milestone.
    Advanced { from: usize, to: usize },
    /// Moved back one milestone.
    Retreated { from: usize, to: usize },
    /// Accepted at a boundary; the index did not change.
    Clamped { index: usize },
    /// Arrived inside the throttle window and was dropped.
    Throttled,
    /// Zero or non-finite delta.
    Ignored,
    /// No listener is attached.
    Detached,
}

impl ScrollOutcome {
    /// Whether the caller must suppress the native page scroll for this event.
    pub fn consumed(&self) -> bool {
        !matches!(self, Self::Detached)
    }

    /// Whether the event was accepted past the throttle.
    pub fn accepted(&self) -> bool {
        matches!(
            self,
            Self::Advanced { .. } | Self::Retreated { .. } | Self::Clamped { .. }
        )
    }
}

/// Maps a stream of wheel deltas onto the milestone sequence.
///
/// Holds the page scroll lock for as long as it is attached. The lock is
/// released by `detach()` or, failing that, when the controller is dropped.
#[derive(Debug)]
pub struct StepperController {
    milestones: MilestoneSequence,
    active_index: usize,
    last_transition: Option<Instant>,
    throttle_window: Duration,
    lock: Option<ScrollLockGuard>,
}

impl StepperController {
    pub fn new(milestones: MilestoneSequence) -> Self {
        Self::with_throttle_window(milestones, DEFAULT_THROTTLE_WINDOW)
    }

    pub fn with_throttle_window(milestones: MilestoneSequence, throttle_window: Duration) -> Self {
        Self {
            milestones,
            active_index: 0,
            last_transition: None,
            throttle_window,
            lock: None,
        }
    }

    /// Start listening for wheel input and lock page scrolling.
    ///
    /// Attaching an already attached controller keeps the existing lock.
    pub fn attach(&mut self, page: Arc<dyn PageScroll>) {
        if self.lock.is_none() {
            self.lock = Some(ScrollLockGuard::acquire(page));
        }
    }

    /// Stop listening and release the page scroll lock.
    pub fn detach(&mut self) {
        self.lock.take();
    }

    pub fn is_attached(&self) -> bool {
        self.lock.is_some()
    }

    /// Feed one wheel event.
    ///
    /// Positive `delta` means forward. Only the sign matters.
    pub fn handle_scroll_event(&mut self, delta: f64, timestamp: Instant) -> ScrollOutcome {
        let Some(lock) = self.lock.as_ref() else {
            return ScrollOutcome::Detached;
        };

        if !delta.is_finite() || delta == 0.0 {
            return ScrollOutcome::Ignored;
        }

        if let Some(last) = self.last_transition {
            // Out-of-order timestamps saturate to zero and are throttled.
            if timestamp.saturating_duration_since(last) < self.throttle_window {
                debug!(index = self.active_index, "Wheel event throttled");
                return ScrollOutcome::Throttled;
            }
        }

        lock.page().scroll_to_top();
        self.last_transition = Some(timestamp);

        let from = self.active_index;
        let to = if delta > 0.0 {
            (from + 1).min(self.milestones.last_index())
        } else {
            from.saturating_sub(1)
        };
        self.active_index = to;

        let outcome = match to.cmp(&from) {
            std::cmp::Ordering::Greater => ScrollOutcome::Advanced { from, to },
            std::cmp::Ordering::Less => ScrollOutcome::Retreated { from, to },
            std::cmp::Ordering::Equal => ScrollOutcome::Clamped { index: to },
        };
        debug!(
            from,
            to,
            complete = self.is_journey_complete(),
            "Stepper transition"
        );
        outcome
    }

    /// True once the last milestone is active. Gates the start action.
    pub fn is_journey_complete(&self) -> bool {
        self.active_index == self.milestones.last_index()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_milestone(&self) -> &Milestone {
        self.milestones.at(self.active_index)
    }

    pub fn milestones(&self) -> &MilestoneSequence {
        &self.milestones
    }
}
