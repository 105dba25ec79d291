//! Result confirmation — acknowledge a placement, persist it, then hand off
//! to the next screen.
//!
//! The write always happens before navigation. If the write fails the
//! confirmation stays in `AwaitingAcknowledgment` and nothing navigates, so
//! acknowledging again retries the write.

use std::sync::Arc;
#[cfg(test)]
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::CompletionError;
use crate::gateway::PlacementResult;
use crate::intake::state::{IntakeFormState, SubmissionStatus};
use crate::store::{Database, PlacementRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationState {
    AwaitingAcknowledgment,
    Acknowledged,
}

impl ConfirmationState {
    pub fn can_transition_to(&self, target: ConfirmationState) -> bool {
        matches!(
            (self, target),
            (Self::AwaitingAcknowledgment, Self::Acknowledged)
        )
    }
}

impl std::fmt::Display for ConfirmationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingAcknowledgment => "awaiting_acknowledgment",
            Self::Acknowledged => "acknowledged",
        };
        write!(f, "{s}")
    }
}

/// Client-side route transition.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator that keeps every route it was asked to visit.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RouteRecorder {
    routes: Mutex<Vec<String>>,
}

#[cfg(test)]
impl RouteRecorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Navigator for RouteRecorder {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

/// Post-success confirmation step.
pub struct ResultConfirmation {
    placement: PlacementResult,
    state: ConfirmationState,
    db: Arc<dyn Database>,
    navigator: Arc<dyn Navigator>,
    route: String,
}

impl ResultConfirmation {
    /// Enter confirmation from a form whose submission succeeded.
    pub fn enter(
        form: &IntakeFormState,
        db: Arc<dyn Database>,
        navigator: Arc<dyn Navigator>,
        route: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let placement = match (&form.status, &form.placement) {
            (SubmissionStatus::Succeeded, Some(placement)) => placement.clone(),
            _ => {
                return Err(CompletionError::NotSucceeded {
                    status: form.status,
                });
            }
        };
        Ok(Self {
            placement,
            state: ConfirmationState::AwaitingAcknowledgment,
            db,
            navigator,
            route: route.into(),
        })
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    pub fn placement(&self) -> &PlacementResult {
        &self.placement
    }

    /// Persist the placement, then navigate.
    pub async fn acknowledge(&mut self) -> Result<PlacementRecord, CompletionError> {
        if !self.state.can_transition_to(ConfirmationState::Acknowledged) {
            return Err(CompletionError::AlreadyAcknowledged);
        }

        let record = PlacementRecord::confirm(&self.placement);
        if let Err(e) = self.db.save_placement(&record).await {
            tracing::warn!(error = %e, "Failed to persist placement; staying on confirmation");
            return Err(CompletionError::Persist(e));
        }
        tracing::info!(record_id = %record.id, starting_tier = %record.starting_tier, "Placement persisted");

        self.state = ConfirmationState::Acknowledged;
        tracing::info!(route = %self.route, "Navigating after onboarding");
        self.navigator.navigate(&self.route);
        Ok(record)
    }
}
