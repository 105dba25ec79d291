//! Intake form — rank/division/experience capture and the single-flight
//! submission that produces a placement.

pub mod controller;
pub mod model;
pub mod state;
pub mod validation;

pub use controller::{IntakeFormController, SUBMISSION_CANCELLED};
pub use model::{Division, ExperienceTier, RankTier};
pub use state::{EditOutcome, FormEdit, IgnoredReason, IntakeFormState, SubmissionStatus, reduce};
pub use validation::{FieldError, FieldProblem, FormField, ValidationErrors, validate};
