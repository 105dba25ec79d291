//! OnboardingSession — the stepper screen plus its single exit into the
//! intake form.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::FlowError;
use crate::gateway::SubmissionGateway;
use crate::intake::IntakeFormController;
use crate::stepper::{MilestoneSequence, PageScroll, ScrollOutcome, StepperController};

/// Owns the stepper for the lifetime of the onboarding screen.
pub struct OnboardingSession {
    stepper: StepperController,
}

impl OnboardingSession {
    pub fn new(milestones: MilestoneSequence, throttle_window: Duration) -> Self {
        Self {
            stepper: StepperController::with_throttle_window(milestones, throttle_window),
        }
    }

    /// Mount the screen: take the page scroll lock and start routing wheel input.
    pub fn attach(&mut self, page: Arc<dyn PageScroll>) {
        self.stepper.attach(page);
    }

    /// Unmount the screen and release the page.
    pub fn detach(&mut self) {
        self.stepper.detach();
    }

    pub fn scroll(&mut self, delta: f64, timestamp: Instant) -> ScrollOutcome {
        self.stepper.handle_scroll_event(delta, timestamp)
    }

    pub fn stepper(&self) -> &StepperController {
        &self.stepper
    }

    /// Whether the start action is enabled. It is always shown.
    pub fn start_enabled(&self) -> bool {
        self.stepper.is_journey_complete()
    }

    /// Leave the stepper for the intake form.
    ///
    /// Fails while the journey is incomplete. On success the stepper is
    /// detached so the scroll lock is released before the form opens.
    pub fn open_intake(
        &mut self,
        gateway: Arc<dyn SubmissionGateway>,
    ) -> Result<IntakeFormController, FlowError> {
        if !self.start_enabled() {
            return Err(FlowError::JourneyIncomplete {
                active: self.stepper.active_index() + 1,
                total: self.stepper.milestones().len(),
            });
        }
        self.stepper.detach();
        tracing::info!(gateway = gateway.name(), "Journey complete, opening intake form");
        Ok(IntakeFormController::new(gateway))
    }
}
