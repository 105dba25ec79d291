//! Intake form state and the pure edit reducer.
//!
//! Every edit goes through [`reduce`], which returns the next state with the
//! cross-field rules already applied: a rank change clears the division and
//! re-derives the experience field; division and experience edits are
//! dropped when the current rank does not allow them.

use serde::{Deserialize, Serialize};

use super::model::{Division, ExperienceTier, RankTier};
use crate::error::SubmitError;
use crate::gateway::PlacementResult;

/// Lifecycle of the single submission a form may have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    pub fn can_transition_to(&self, target: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, target),
            (Idle, Submitting)
                | (Failed, Submitting)
                | (Submitting, Succeeded)
                | (Submitting, Failed)
        )
    }

    /// Whether field edits are currently disabled.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Submitting | Self::Succeeded)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// A single user edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEdit {
    Age(Option<u32>),
    Rank(Option<RankTier>),
    Division(Option<Division>),
    Experience(Option<ExperienceTier>),
}

/// Why an edit left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// A submission is in flight or already succeeded.
    Locked,
    /// The current rank has no divisions.
    DivisionNotApplicable,
    /// The current rank is below the experience threshold.
    ExperienceNotEligible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Ignored(IgnoredReason),
}

/// Full intake form state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeFormState {
    pub age: Option<u32>,
    pub current_rank: Option<RankTier>,
    pub division: Option<Division>,
    pub past_experience: Option<ExperienceTier>,
    pub status: SubmissionStatus,
    /// Present only while `status == Succeeded`.
    pub placement: Option<PlacementResult>,
    /// Message from the last failed submission.
    pub last_error: Option<String>,
}

impl IntakeFormState {
    /// A fresh form with no rank selected: experience starts disabled at "none".
    pub fn new() -> Self {
        Self {
            age: None,
            current_rank: None,
            division: None,
            past_experience: Some(ExperienceTier::None),
            status: SubmissionStatus::Idle,
            placement: None,
            last_error: None,
        }
    }

    /// Division is mandatory for every rank except the top tier.
    pub fn division_required(&self) -> bool {
        self.current_rank.is_some_and(|rank| rank.has_divisions())
    }

    pub fn division_editable(&self) -> bool {
        !self.current_rank.is_some_and(|rank| rank.is_top())
    }

    pub fn experience_editable(&self) -> bool {
        self.current_rank
            .is_some_and(|rank| rank.is_experience_eligible())
    }

    /// Move the submission FSM, keeping `placement` and `last_error` consistent.
    pub fn transition_to(&mut self, target: SubmissionStatus) -> Result<(), SubmitError> {
        if !self.status.can_transition_to(target) {
            return Err(SubmitError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        if target != SubmissionStatus::Succeeded {
            self.placement = None;
        }
        if target != SubmissionStatus::Failed {
            self.last_error = None;
        }
        Ok(())
    }
}

impl Default for IntakeFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one edit and return the normalized next state.
pub fn reduce(state: &IntakeFormState, edit: FormEdit) -> (IntakeFormState, EditOutcome) {
    if state.status.is_locked() {
        return (state.clone(), EditOutcome::Ignored(IgnoredReason::Locked));
    }

    let mut next = state.clone();
    match edit {
        FormEdit::Age(age) => next.age = age,
        FormEdit::Rank(rank) => {
            next.current_rank = rank;
            next.division = None;
            if !next.experience_editable() {
                next.past_experience = Some(ExperienceTier::None);
            }
        }
        FormEdit::Division(division) => {
            if !state.division_editable() {
                return (
                    state.clone(),
                    EditOutcome::Ignored(IgnoredReason::DivisionNotApplicable),
                );
            }
            next.division = division;
        }
        FormEdit::Experience(tier) => {
            if !state.experience_editable() {
                return (
                    state.clone(),
                    EditOutcome::Ignored(IgnoredReason::ExperienceNotEligible),
                );
            }
            next.past_experience = tier;
        }
    }
    (next, EditOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: IntakeFormState, edits: &[FormEdit]) -> IntakeFormState {
        edits.iter().fold(state, |s, edit| reduce(&s, *edit).0)
    }

    #[test]
    fn valid_transitions() {
        use SubmissionStatus::*;
        for (from, to) in [
            (Idle, Submitting),
            (Submitting, Succeeded),
            (Submitting, Failed),
            (Failed, Submitting),
        ] {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use SubmissionStatus::*;
        assert!(!Submitting.can_transition_to(Submitting));
        assert!(!Idle.can_transition_to(Succeeded));
        assert!(!Succeeded.can_transition_to(Submitting));
        assert!(!Failed.can_transition_to(Succeeded));
    }

    #[test]
    fn status_display_matches_serde() {
        use SubmissionStatus::*;
        for status in [Idle, Submitting, Succeeded, Failed] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(format!("\"{status}\""), json);
        }
    }

    #[test]
    fn rank_change_clears_division() {
        let state = apply(
            IntakeFormState::new(),
            &[
                FormEdit::Rank(Some(RankTier::Gold)),
                FormEdit::Division(Some(Division::Two)),
                FormEdit::Rank(Some(RankTier::Platinum)),
            ],
        );
        assert_eq!(state.division, None);
        assert!(state.division_required());
    }

    #[test]
    fn top_tier_discards_and_refuses_division() {
        let state = apply(
            IntakeFormState::new(),
            &[
                FormEdit::Rank(Some(RankTier::Immortal)),
                FormEdit::Division(Some(Division::Three)),
                FormEdit::Rank(Some(RankTier::Radiant)),
            ],
        );
        assert_eq!(state.division, None);
        assert!(!state.division_required());

        let (after, outcome) = reduce(&state, FormEdit::Division(Some(Division::One)));
        assert_eq!(
            outcome,
            EditOutcome::Ignored(IgnoredReason::DivisionNotApplicable)
        );
        assert_eq!(after.division, None);
    }

    #[test]
    fn low_rank_forces_experience_to_none() {
        let state = apply(
            IntakeFormState::new(),
            &[
                FormEdit::Rank(Some(RankTier::Immortal)),
                FormEdit::Experience(Some(ExperienceTier::Tier2)),
                FormEdit::Rank(Some(RankTier::Silver)),
            ],
        );
        assert_eq!(state.past_experience, Some(ExperienceTier::None));

        let (after, outcome) = reduce(&state, FormEdit::Experience(Some(ExperienceTier::Tier1)));
        assert_eq!(
            outcome,
            EditOutcome::Ignored(IgnoredReason::ExperienceNotEligible)
        );
        assert_eq!(after.past_experience, Some(ExperienceTier::None));
    }

    #[test]
    fn eligible_rank_change_keeps_experience() {
        let state = apply(
            IntakeFormState::new(),
            &[
                FormEdit::Rank(Some(RankTier::Ascendant)),
                FormEdit::Experience(Some(ExperienceTier::Tier3)),
                FormEdit::Rank(Some(RankTier::Immortal)),
            ],
        );
        assert_eq!(state.past_experience, Some(ExperienceTier::Tier3));
    }

    #[test]
    fn no_rank_means_experience_disabled() {
        let state = IntakeFormState::new();
        assert!(!state.experience_editable());
        assert_eq!(state.past_experience, Some(ExperienceTier::None));
        assert!(state.division_editable());
    }

    #[test]
    fn locked_form_ignores_edits() {
        let mut state = IntakeFormState::new();
        state.transition_to(SubmissionStatus::Submitting).unwrap();
        let (after, outcome) = reduce(&state, FormEdit::Age(Some(30)));
        assert_eq!(outcome, EditOutcome::Ignored(IgnoredReason::Locked));
        assert_eq!(after.age, None);
    }

    #[test]
    fn failed_form_stays_editable() {
        let mut state = IntakeFormState::new();
        state.transition_to(SubmissionStatus::Submitting).unwrap();
        state.transition_to(SubmissionStatus::Failed).unwrap();
        let (after, outcome) = reduce(&state, FormEdit::Age(Some(19)));
        assert_eq!(outcome, EditOutcome::Applied);
        assert_eq!(after.age, Some(19));
    }

    #[test]
    fn transition_clears_stale_error() {
        let mut state = IntakeFormState::new();
        state.transition_to(SubmissionStatus::Submitting).unwrap();
        state.transition_to(SubmissionStatus::Failed).unwrap();
        state.last_error = Some("boom".into());
        state.transition_to(SubmissionStatus::Submitting).unwrap();
        assert!(state.last_error.is_none());
        assert!(state.transition_to(SubmissionStatus::Idle).is_err());
    }
}
