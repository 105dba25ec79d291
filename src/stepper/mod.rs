//! Milestone stepper — the scroll-driven journey in front of the intake form.
//!
//! Wheel input moves a single index through a fixed `MilestoneSequence`, one
//! step per accepted event, throttled and clamped to the ends. The start
//! action is enabled once the last milestone is reached.

pub mod controller;
pub mod milestones;
pub mod scroll_lock;

pub use controller::{DEFAULT_THROTTLE_WINDOW, ScrollOutcome, StepperController};
pub use milestones::{Milestone, MilestoneSequence};
pub use scroll_lock::{InMemoryPage, PageScroll, ScrollLockGuard};
