//! IntakeFormController — owns the form state and drives the single-flight
//! submission against a `SubmissionGateway`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::state::{EditOutcome, FormEdit, IntakeFormState, SubmissionStatus, reduce};
use super::validation::validate;
use crate::error::SubmitError;
use crate::gateway::{PlacementResult, SubmissionGateway};

/// `last_error` of an attempt whose `submit()` future was dropped mid-flight.
pub const SUBMISSION_CANCELLED: &str = "submission cancelled";

/// Coordinates field edits and the submission state machine.
///
/// The state lock is never held across the gateway call: `submit()` moves the
/// form to `Submitting` under the lock, releases it, and re-acquires it to
/// record the outcome. A second `submit()` in between sees `Submitting` and is
/// rejected immediately.
pub struct IntakeFormController {
    state: Mutex<IntakeFormState>,
    gateway: Arc<dyn SubmissionGateway>,
}

fn lock(state: &Mutex<IntakeFormState>) -> MutexGuard<'_, IntakeFormState> {
    // No critical section leaves the form half-updated.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An attempt that has moved the form to `Submitting`.
///
/// Dropping it without `settle` (the caller's future was cancelled, or the
/// gateway panicked) moves the form to `Failed` so single-flight is released.
struct InFlight<'a> {
    state: &'a Mutex<IntakeFormState>,
    attempt_id: Uuid,
    settled: bool,
}

impl<'a> InFlight<'a> {
    /// Disarm and hand back the lock for recording the outcome.
    fn settle(mut self) -> MutexGuard<'a, IntakeFormState> {
        self.settled = true;
        lock(self.state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock(self.state);
        if state.status == SubmissionStatus::Submitting
            && state.transition_to(SubmissionStatus::Failed).is_ok()
        {
            state.last_error = Some(SUBMISSION_CANCELLED.to_string());
            tracing::warn!(attempt_id = %self.attempt_id, "Submission abandoned before the gateway answered");
        }
    }
}

impl IntakeFormController {
    pub fn new(gateway: Arc<dyn SubmissionGateway>) -> Self {
        Self {
            state: Mutex::new(IntakeFormState::new()),
            gateway,
        }
    }

    /// Apply one field edit through the reducer.
    pub fn edit(&self, edit: FormEdit) -> EditOutcome {
        let mut state = lock(&self.state);
        let (next, outcome) = reduce(&state, edit);
        if let EditOutcome::Ignored(reason) = outcome {
            tracing::debug!(?edit, ?reason, "Form edit ignored");
        }
        *state = next;
        outcome
    }

    /// Copy of the current form state.
    pub fn snapshot(&self) -> IntakeFormState {
        lock(&self.state).clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        lock(&self.state).status
    }

    /// Validate and submit the form.
    ///
    /// Rejected locally (no gateway call) when the form is invalid, already
    /// submitting, or already succeeded. Gateway failures move the form to
    /// `Failed` and are returned so the caller can show a retryable error.
    /// Dropping the returned future mid-flight also leaves the form `Failed`.
    pub async fn submit(&self) -> Result<PlacementResult, SubmitError> {
        let (request, in_flight) = {
            let mut state = lock(&self.state);
            match state.status {
                SubmissionStatus::Submitting => return Err(SubmitError::AlreadySubmitting),
                SubmissionStatus::Succeeded => return Err(SubmitError::AlreadySucceeded),
                SubmissionStatus::Idle | SubmissionStatus::Failed => {}
            }

            let request = match validate(&state) {
                Ok(request) => request,
                Err(errors) => {
                    tracing::debug!(fields = ?errors.fields(), "Submission rejected by validation");
                    return Err(SubmitError::Validation(errors));
                }
            };

            state.transition_to(SubmissionStatus::Submitting)?;
            let in_flight = InFlight {
                state: &self.state,
                attempt_id: Uuid::new_v4(),
                settled: false,
            };
            (request, in_flight)
        };
        let attempt_id = in_flight.attempt_id;

        tracing::info!(
            attempt_id = %attempt_id,
            gateway = self.gateway.name(),
            rank = %request.current_rank,
            "Submitting intake form"
        );

        let response = self.gateway.create_career(&request).await;

        let mut state = in_flight.settle();
        match response {
            Ok(response) => {
                let placement = PlacementResult::from(response);
                state.transition_to(SubmissionStatus::Succeeded)?;
                state.placement = Some(placement.clone());
                tracing::info!(
                    attempt_id = %attempt_id,
                    starting_tier = %placement.starting_tier,
                    "Placement received"
                );
                Ok(placement)
            }
            Err(e) => {
                state.transition_to(SubmissionStatus::Failed)?;
                state.last_error = Some(e.to_string());
                tracing::warn!(attempt_id = %attempt_id, error = %e, "Placement request failed");
                Err(SubmitError::Gateway(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::GatewayError;
    use crate::gateway::{CareerRequest, NO_DIVISION, PlacementResponse};
    use crate::intake::model::{Division, ExperienceTier, RankTier};
    use crate::intake::validation::FormField;

    /// Gateway that records calls and optionally waits for a release signal.
    struct StubGateway {
        calls: AtomicUsize,
        last_division: std::sync::Mutex<Option<String>>,
        release: Option<Arc<Notify>>,
        fail_first: AtomicUsize,
    }

    impl StubGateway {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_division: std::sync::Mutex::new(None),
                release: None,
                fail_first: AtomicUsize::new(0),
            }
        }

        fn blocking(release: Arc<Notify>) -> Self {
            Self {
                release: Some(release),
                ..Self::ok()
            }
        }

        fn failing_once() -> Self {
            Self {
                fail_first: AtomicUsize::new(1),
                ..Self::ok()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SubmissionGateway for StubGateway {
        fn name(&self) -> &str {
            "stub"
        }

        async fn create_career(
            &self,
            request: &CareerRequest,
        ) -> Result<PlacementResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_division.lock().unwrap() = Some(request.division.clone());
            if let Some(release) = &self.release {
                release.notified().await;
            }
            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(GatewayError::Status {
                    gateway: "stub".into(),
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            Ok(PlacementResponse {
                starting_tier: "Ranked Play".into(),
                career_info: serde_json::json!({"age": request.age}),
            })
        }
    }

    fn fill_valid(controller: &IntakeFormController) {
        controller.edit(FormEdit::Age(Some(20)));
        controller.edit(FormEdit::Rank(Some(RankTier::Gold)));
        controller.edit(FormEdit::Division(Some(Division::Two)));
    }

    #[tokio::test]
    async fn successful_submit_populates_placement() {
        let gateway = Arc::new(StubGateway::ok());
        let controller = IntakeFormController::new(gateway.clone());
        fill_valid(&controller);

        let placement = controller.submit().await.unwrap();
        assert_eq!(placement.starting_tier, "Ranked Play");

        let state = controller.snapshot();
        assert_eq!(state.status, SubmissionStatus::Succeeded);
        assert_eq!(state.placement, Some(placement));
        assert_eq!(gateway.calls(), 1);

        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::AlreadySucceeded));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn missing_division_makes_no_call() {
        let gateway = Arc::new(StubGateway::ok());
        let controller = IntakeFormController::new(gateway.clone());
        controller.edit(FormEdit::Age(Some(20)));
        controller.edit(FormEdit::Rank(Some(RankTier::Silver)));

        match controller.submit().await.unwrap_err() {
            SubmitError::Validation(errors) => assert!(errors.contains(FormField::Division)),
            other => panic!("expected validation error, got {other}"),
        }
        assert_eq!(gateway.calls(), 0);
        assert_eq!(controller.status(), SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn top_tier_submits_without_division() {
        let gateway = Arc::new(StubGateway::ok());
        let controller = IntakeFormController::new(gateway.clone());
        controller.edit(FormEdit::Age(Some(22)));
        controller.edit(FormEdit::Rank(Some(RankTier::Immortal)));
        controller.edit(FormEdit::Division(Some(Division::One)));
        controller.edit(FormEdit::Rank(Some(RankTier::Radiant)));
        controller
            .edit(FormEdit::Experience(Some(ExperienceTier::Tier2)));

        assert!(controller.snapshot().division.is_none());
        controller.submit().await.unwrap();
        assert_eq!(
            gateway.last_division.lock().unwrap().as_deref(),
            Some(NO_DIVISION)
        );
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_rejected() {
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(StubGateway::blocking(release.clone()));
        let controller = Arc::new(IntakeFormController::new(gateway.clone()));
        fill_valid(&controller);

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };

        // Wait until the first attempt is actually in flight.
        tokio::time::timeout(Duration::from_secs(5), async {
            while gateway.calls() == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert_eq!(controller.status(), SubmissionStatus::Submitting);
        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::AlreadySubmitting));

        // Edits are ignored while submitting.
        let outcome = controller.edit(FormEdit::Age(Some(40)));
        assert!(matches!(outcome, EditOutcome::Ignored(_)));

        release.notify_one();
        let placement = tokio::time::timeout(Duration::from_secs(5), first)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(placement.profile["age"], 20);
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn failure_is_retryable() {
        let gateway = Arc::new(StubGateway::failing_once());
        let controller = IntakeFormController::new(gateway.clone());
        fill_valid(&controller);

        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::Gateway(GatewayError::Status { status: 503, .. })));

        let state = controller.snapshot();
        assert_eq!(state.status, SubmissionStatus::Failed);
        assert!(state.placement.is_none());
        assert!(state.last_error.as_deref().unwrap().contains("503"));

        // Still editable after a failure.
        assert_eq!(controller.edit(FormEdit::Age(Some(21))), EditOutcome::Applied);

        controller.submit().await.unwrap();
        let state = controller.snapshot();
        assert_eq!(state.status, SubmissionStatus::Succeeded);
        assert!(state.last_error.is_none());
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn dropped_submit_releases_single_flight() {
        let release = Arc::new(Notify::new());
        let gateway = Arc::new(StubGateway::blocking(release.clone()));
        let controller = IntakeFormController::new(gateway.clone());
        fill_valid(&controller);

        let abandoned = tokio::time::timeout(Duration::from_millis(50), controller.submit()).await;
        assert!(abandoned.is_err());
        assert_eq!(gateway.calls(), 1);

        let state = controller.snapshot();
        assert_eq!(state.status, SubmissionStatus::Failed);
        assert_eq!(state.last_error.as_deref(), Some(SUBMISSION_CANCELLED));
        assert_eq!(controller.edit(FormEdit::Age(Some(23))), EditOutcome::Applied);

        // Lets the next gateway call through.
        release.notify_one();
        let placement = controller.submit().await.unwrap();
        assert_eq!(placement.profile["age"], 23);
        assert_eq!(controller.status(), SubmissionStatus::Succeeded);
        assert_eq!(gateway.calls(), 2);
    }

    struct PanickingGateway;

    #[async_trait]
    impl SubmissionGateway for PanickingGateway {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn create_career(
            &self,
            _request: &CareerRequest,
        ) -> Result<PlacementResponse, GatewayError> {
            panic!("gateway bug")
        }
    }

    #[tokio::test]
    async fn panicking_gateway_leaves_form_failed() {
        let controller = Arc::new(IntakeFormController::new(Arc::new(PanickingGateway)));
        fill_valid(&controller);

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        assert!(task.await.unwrap_err().is_panic());

        let state = controller.snapshot();
        assert_eq!(state.status, SubmissionStatus::Failed);
        assert_eq!(state.last_error.as_deref(), Some(SUBMISSION_CANCELLED));
        assert_eq!(controller.edit(FormEdit::Age(Some(30))), EditOutcome::Applied);
    }
}
