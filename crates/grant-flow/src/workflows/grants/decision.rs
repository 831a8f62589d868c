use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{Application, ApplicationId, DecisionId, ExpertId, FundHolderId};
use super::error::GrantError;
use super::lifecycle::LifecycleState;
use super::repository::DecisionRepository;

pub const APPROVED: &str = "APPROVED";
pub const REJECTED: &str = "REJECTED";

/// Funding outcome stored on a decision record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    Approved,
    Rejected,
}

impl DecisionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionStatus::Approved => APPROVED,
            DecisionStatus::Rejected => REJECTED,
        }
    }

    /// Strict parsing accepts `APPROVED`/`REJECTED` in any case; lenient parsing maps
    /// everything except the exact literal `APPROVED` to `Rejected`.
    pub fn parse(raw: &str, strict: bool) -> Result<Self, GrantError> {
        if !strict {
            return Ok(if raw == APPROVED {
                DecisionStatus::Approved
            } else {
                DecisionStatus::Rejected
            });
        }

        match raw.trim().to_ascii_uppercase().as_str() {
            APPROVED => Ok(DecisionStatus::Approved),
            REJECTED => Ok(DecisionStatus::Rejected),
            _ => Err(GrantError::InvalidDecisionStatus(raw.to_string())),
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable fund-holder decision on an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub application_id: ApplicationId,
    pub fund_holder_id: FundHolderId,
    pub status: DecisionStatus,
    /// Status text exactly as the fund holder supplied it.
    pub status_text: String,
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

/// Advisory record of experts a fund holder routed an application to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertAssignment {
    pub application_id: ApplicationId,
    pub fund_holder_id: FundHolderId,
    pub expert_ids: Vec<ExpertId>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// Refuse decisions on applications that are not `Evaluated`.
    pub require_evaluated: bool,
    /// Refuse status literals other than `APPROVED`/`REJECTED`.
    pub strict_status: bool,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            require_evaluated: true,
            strict_status: true,
        }
    }
}

pub struct DecisionService<R> {
    repository: Arc<R>,
    policy: DecisionPolicy,
    sequence: AtomicU64,
}

impl<R> DecisionService<R>
where
    R: DecisionRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: DecisionPolicy) -> Self {
        Self {
            repository,
            policy,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    /// Note which experts should assess an application. Has no lifecycle effect.
    pub fn assign_experts(
        &self,
        application: &Application,
        fund_holder_id: FundHolderId,
        expert_ids: Vec<ExpertId>,
    ) -> Result<ExpertAssignment, GrantError> {
        if expert_ids.is_empty() {
            return Err(GrantError::NoExpertsAssigned);
        }

        let assignment = ExpertAssignment {
            application_id: application.id,
            fund_holder_id,
            expert_ids,
            assigned_at: Utc::now(),
        };
        self.repository.record_assignment(assignment.clone())?;
        info!(
            application_id = %application.id,
            experts = ?assignment.expert_ids,
            "experts assigned"
        );
        Ok(assignment)
    }

    /// Store a decision and apply it to the application.
    ///
    /// With `require_evaluated` off, a decision on an application that is not
    /// `Evaluated` is still stored while the application keeps its state.
    pub fn record_decision(
        &self,
        application: &mut Application,
        fund_holder_id: FundHolderId,
        status: &str,
        notes: impl Into<String>,
    ) -> Result<Decision, GrantError> {
        let status_text = status.to_string();
        let status = DecisionStatus::parse(status, self.policy.strict_status)?;

        if self.policy.require_evaluated && application.state() != LifecycleState::Evaluated {
            return Err(GrantError::StateMismatch {
                application_id: application.id,
                operation: "decide",
                expected: LifecycleState::Evaluated,
                actual: application.state(),
            });
        }

        let decision = Decision {
            id: DecisionId(self.sequence.fetch_add(1, Ordering::Relaxed)),
            application_id: application.id,
            fund_holder_id,
            status,
            status_text,
            notes: notes.into(),
            recorded_at: Utc::now(),
        };
        let stored = self.repository.insert(decision)?;

        let outcome = application.make_decision(stored.status.as_str());
        if !outcome.changed_state() {
            warn!(
                application_id = %application.id,
                decision_id = %stored.id,
                state = application.state_name(),
                "decision stored without a state change"
            );
        }
        info!(
            application_id = %application.id,
            decision_id = %stored.id,
            status = stored.status.as_str(),
            status_text = %stored.status_text,
            "decision saved"
        );
        Ok(stored)
    }

    pub fn decisions_for(&self, id: ApplicationId) -> Result<Vec<Decision>, GrantError> {
        Ok(self.repository.for_application(id)?)
    }

    pub fn assignments_for(&self, id: ApplicationId) -> Result<Vec<ExpertAssignment>, GrantError> {
        Ok(self.repository.assignments_for(id)?)
    }
}
