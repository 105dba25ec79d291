//! Submit-time validation of the intake form.

use serde::Serialize;

use super::model::{MAX_AGE, MIN_AGE};
use super::state::IntakeFormState;
use crate::gateway::CareerRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Age,
    CurrentRank,
    Division,
    PastExperience,
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Age => "age",
            Self::CurrentRank => "current_rank",
            Self::Division => "division",
            Self::PastExperience => "past_experience",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldProblem {
    Missing,
    OutOfRange { value: u32, min: u32, max: u32 },
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub problem: FieldProblem,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.problem {
            FieldProblem::Missing => write!(f, "{} is required", self.field),
            FieldProblem::OutOfRange { value, min, max } => {
                write!(f, "{} must be between {min} and {max} (got {value})", self.field)
            }
            FieldProblem::NotApplicable => {
                write!(f, "{} does not apply to the selected rank", self.field)
            }
        }
    }
}

/// Every field problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn fields(&self) -> Vec<FormField> {
        self.errors.iter().map(|e| e.field).collect()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check every submit precondition and build the gateway request.
pub fn validate(state: &IntakeFormState) -> Result<CareerRequest, ValidationErrors> {
    let mut errors = Vec::new();
    let mut push = |field, problem| errors.push(FieldError { field, problem });

    match state.age {
        None => push(FormField::Age, FieldProblem::Missing),
        Some(value) if !(MIN_AGE..=MAX_AGE).contains(&value) => push(
            FormField::Age,
            FieldProblem::OutOfRange {
                value,
                min: MIN_AGE,
                max: MAX_AGE,
            },
        ),
        Some(_) => {}
    }

    match state.current_rank {
        None => push(FormField::CurrentRank, FieldProblem::Missing),
        Some(rank) if rank.has_divisions() && state.division.is_none() => {
            push(FormField::Division, FieldProblem::Missing)
        }
        Some(rank) if rank.is_top() && state.division.is_some() => {
            push(FormField::Division, FieldProblem::NotApplicable)
        }
        Some(_) => {}
    }

    if state.past_experience.is_none() {
        push(FormField::PastExperience, FieldProblem::Missing);
    }

    match (state.age, state.current_rank, state.past_experience) {
        (Some(age), Some(rank), Some(experience)) if errors.is_empty() => Ok(CareerRequest::new(
            age,
            rank,
            experience,
            state.division,
        )),
        _ => Err(ValidationErrors { errors }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::NO_DIVISION;
    use crate::intake::model::{Division, ExperienceTier, RankTier};

    fn filled(rank: RankTier, division: Option<Division>) -> IntakeFormState {
        IntakeFormState {
            age: Some(20),
            current_rank: Some(rank),
            division,
            past_experience: Some(ExperienceTier::None),
            ..IntakeFormState::new()
        }
    }

    #[test]
    fn empty_form_lists_missing_fields() {
        let mut state = IntakeFormState::new();
        state.past_experience = None;
        let err = validate(&state).unwrap_err();
        assert_eq!(
            err.fields(),
            vec![FormField::Age, FormField::CurrentRank, FormField::PastExperience]
        );
        assert!(err.to_string().contains("age is required"));
    }

    #[test]
    fn age_out_of_range() {
        let mut state = filled(RankTier::Gold, Some(Division::One));
        state.age = Some(7);
        let err = validate(&state).unwrap_err();
        assert_eq!(
            err.errors,
            vec![FieldError {
                field: FormField::Age,
                problem: FieldProblem::OutOfRange {
                    value: 7,
                    min: MIN_AGE,
                    max: MAX_AGE
                },
            }]
        );

        state.age = Some(MAX_AGE + 1);
        assert!(validate(&state).unwrap_err().contains(FormField::Age));

        state.age = Some(MIN_AGE);
        assert!(validate(&state).is_ok());
    }

    #[test]
    fn non_top_rank_requires_division() {
        let state = filled(RankTier::Diamond, None);
        let err = validate(&state).unwrap_err();
        assert_eq!(err.fields(), vec![FormField::Division]);
    }

    #[test]
    fn top_rank_passes_without_division() {
        let state = filled(RankTier::Radiant, None);
        let request = validate(&state).unwrap();
        assert_eq!(request.current_rank, "Radiant");
        assert_eq!(request.division, NO_DIVISION);
    }

    #[test]
    fn top_rank_with_division_is_rejected() {
        let state = filled(RankTier::Radiant, Some(Division::One));
        let err = validate(&state).unwrap_err();
        assert_eq!(err.errors[0].problem, FieldProblem::NotApplicable);
    }

    #[test]
    fn request_carries_field_values() {
        let mut state = filled(RankTier::Immortal, Some(Division::Three));
        state.past_experience = Some(ExperienceTier::Tier2);
        let request = validate(&state).unwrap();
        assert_eq!(request.age, 20);
        assert_eq!(request.current_rank, "Immortal");
        assert_eq!(request.division, "3");
        assert_eq!(request.past_experience, "Tier 2");
    }
}
