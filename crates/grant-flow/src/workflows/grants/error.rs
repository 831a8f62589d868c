use axum::http::StatusCode;

use super::domain::{ApplicantId, Application, ApplicationId};
use super::lifecycle::{LifecycleState, TransitionOutcome};
use super::repository::RepositoryError;

/// Recoverable conditions raised by the grant services and facade.
///
/// None of these leave an application half-updated: every variant is returned before the
/// repository is written, or after a no-op lifecycle outcome.
#[derive(Debug, thiserror::Error)]
pub enum GrantError {
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error("applicant {applicant_id} does not own application {application_id}")]
    AccessDenied {
        applicant_id: ApplicantId,
        application_id: ApplicationId,
    },
    #[error("cannot {operation} application {application_id}: expected {expected}, found {actual}")]
    StateMismatch {
        application_id: ApplicationId,
        operation: &'static str,
        expected: LifecycleState,
        actual: LifecycleState,
    },
    #[error("cannot {operation} application {application_id} while {state}: {reason}")]
    IllegalTransition {
        application_id: ApplicationId,
        operation: &'static str,
        state: LifecycleState,
        reason: &'static str,
    },
    #[error("{operation} had no effect on application {application_id} ({state}): {reason}")]
    Redundant {
        application_id: ApplicationId,
        operation: &'static str,
        state: LifecycleState,
        reason: &'static str,
    },
    #[error("invalid evaluation: {0}")]
    InvalidEvaluation(String),
    #[error("unrecognized decision status '{0}', expected APPROVED or REJECTED")]
    InvalidDecisionStatus(String),
    #[error("application title must not be empty")]
    InvalidTitle,
    #[error("expert assignment requires at least one expert")]
    NoExpertsAssigned,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GrantError {
    /// Turn a no-op lifecycle outcome into the matching error condition.
    pub(crate) fn check_outcome(
        application: &Application,
        operation: &'static str,
        outcome: TransitionOutcome,
    ) -> Result<TransitionOutcome, GrantError> {
        match outcome {
            TransitionOutcome::Transitioned { .. } => Ok(outcome),
            TransitionOutcome::Redundant { reason } => Err(GrantError::Redundant {
                application_id: application.id,
                operation,
                state: application.state(),
                reason,
            }),
            TransitionOutcome::Illegal { reason } => Err(GrantError::IllegalTransition {
                application_id: application.id,
                operation,
                state: application.state(),
                reason,
            }),
        }
    }

    /// Stable machine-readable kind for API payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            GrantError::NotFound(_) => "not_found",
            GrantError::AccessDenied { .. } => "access_denied",
            GrantError::StateMismatch { .. } => "state_mismatch",
            GrantError::IllegalTransition { .. } => "illegal_transition",
            GrantError::Redundant { .. } => "redundant",
            GrantError::InvalidEvaluation(_) => "invalid_evaluation",
            GrantError::InvalidDecisionStatus(_) => "invalid_decision_status",
            GrantError::InvalidTitle => "invalid_title",
            GrantError::NoExpertsAssigned => "no_experts_assigned",
            GrantError::Repository(_) => "repository",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GrantError::NotFound(_) | GrantError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            GrantError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            GrantError::StateMismatch { .. }
            | GrantError::IllegalTransition { .. }
            | GrantError::Redundant { .. }
            | GrantError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            GrantError::InvalidEvaluation(_)
            | GrantError::InvalidDecisionStatus(_)
            | GrantError::InvalidTitle
            | GrantError::NoExpertsAssigned => StatusCode::UNPROCESSABLE_ENTITY,
            GrantError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
