use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::lifecycle::{transition, LifecycleOperation, LifecycleState, TransitionOutcome};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier assigned by the registry to each application.
    ApplicationId
);
numeric_id!(
    /// Actor id of the applicant owning an application.
    ApplicantId
);
numeric_id!(ExpertId);
numeric_id!(FundHolderId);
numeric_id!(EvaluationId);
numeric_id!(DecisionId);

/// Roles callers act under when reaching the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Applicant,
    Expert,
    FundHolder,
}

impl ActorRole {
    pub const fn label(self) -> &'static str {
        match self {
            ActorRole::Applicant => "Applicant",
            ActorRole::Expert => "Expert",
            ActorRole::FundHolder => "FundHolder",
        }
    }
}

/// A grant application together with its current lifecycle state.
///
/// The state field is private: it only moves through the lifecycle operations below,
/// each of which applies [`transition`] and reports the outcome without failing. It is
/// serialized for responses but never read back from outside input:
///
/// ```compile_fail
/// use grant_flow::workflows::grants::Application;
///
/// let forged: Application = serde_json::from_str(r#"{"state":"Approved"}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    pub id: ApplicationId,
    pub title: String,
    pub description: String,
    pub applicant_id: ApplicantId,
    state: LifecycleState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub(crate) fn new(
        id: ApplicationId,
        title: String,
        description: String,
        applicant_id: ApplicantId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description,
            applicant_id,
            state: LifecycleState::Submitted,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn is_owned_by(&self, applicant_id: ApplicantId) -> bool {
        self.applicant_id == applicant_id
    }

    pub fn submit(&mut self) -> TransitionOutcome {
        self.apply(LifecycleOperation::Submit)
    }

    pub fn start_review(&mut self) -> TransitionOutcome {
        self.apply(LifecycleOperation::Review)
    }

    pub fn evaluate_transition(&mut self) -> TransitionOutcome {
        self.apply(LifecycleOperation::Evaluate)
    }

    pub fn withdraw(&mut self) -> TransitionOutcome {
        self.apply(LifecycleOperation::Withdraw)
    }

    /// Apply a funding decision. Only the exact literal `APPROVED` approves.
    pub fn make_decision(&mut self, outcome: &str) -> TransitionOutcome {
        self.apply(LifecycleOperation::Decide {
            approved: outcome == super::decision::APPROVED,
        })
    }

    fn apply(&mut self, operation: LifecycleOperation) -> TransitionOutcome {
        let result = transition(self.state, operation);
        match &result.outcome {
            TransitionOutcome::Transitioned { from, to } => {
                info!(
                    application_id = %self.id,
                    operation = operation.name(),
                    from = from.name(),
                    to = to.name(),
                    "application state changed"
                );
                self.updated_at = Utc::now();
            }
            TransitionOutcome::Redundant { reason } => {
                debug!(
                    application_id = %self.id,
                    operation = operation.name(),
                    state = self.state.name(),
                    reason = *reason,
                    "lifecycle operation had no effect"
                );
            }
            TransitionOutcome::Illegal { reason } => {
                warn!(
                    application_id = %self.id,
                    operation = operation.name(),
                    state = self.state.name(),
                    reason = *reason,
                    "lifecycle operation rejected"
                );
            }
        }
        self.state = result.state;
        result.outcome
    }
}
