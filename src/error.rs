//! Error types for the onboarding core.

use std::time::Duration;

use crate::intake::state::SubmissionStatus;
use crate::intake::validation::ValidationErrors;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures talking to the placement gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway {gateway} request failed: {reason}")]
    Transport { gateway: String, reason: String },

    #[error("Gateway {gateway} timed out after {timeout:?}")]
    Timeout { gateway: String, timeout: Duration },

    #[error("Gateway {gateway} returned status {status}: {body}")]
    Status {
        gateway: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {gateway}: {reason}")]
    InvalidResponse { gateway: String, reason: String },
}

/// Reasons a `submit()` call did not produce a placement.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Form is incomplete: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("A submission is already in flight")]
    AlreadySubmitting,

    #[error("Form was already submitted successfully")]
    AlreadySucceeded,

    #[error("Cannot transition submission from {from} to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("Placement request failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Errors in the confirm → persist → redirect step.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("No successful placement to confirm (status: {status})")]
    NotSucceeded { status: SubmissionStatus },

    #[error("Placement was already acknowledged")]
    AlreadyAcknowledged,

    #[error("Failed to persist placement: {0}")]
    Persist(#[from] DatabaseError),
}

/// Onboarding flow gating errors.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Journey incomplete: milestone {active} of {total}")]
    JourneyIncomplete { active: usize, total: usize },

    #[error("Intake form is not open yet")]
    IntakeNotOpen,

    #[error("No placement is waiting for confirmation")]
    NothingToConfirm,
}

/// Result type alias for the onboarding core.
pub type Result<T> = std::result::Result<T, Error>;
