mod policy;

pub use policy::{EvaluationPolicy, ValidityViolation, MAX_SCORE, MIN_SCORE};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{Application, ApplicationId, EvaluationId, ExpertId};
use super::error::GrantError;
use super::lifecycle::LifecycleState;
use super::repository::EvaluationRepository;

/// Immutable expert assessment of an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub application_id: ApplicationId,
    pub expert_id: ExpertId,
    pub score: i32,
    pub comments: String,
    pub recorded_at: DateTime<Utc>,
}

/// Records evaluations and moves reviewed applications to `Evaluated`.
pub struct EvaluationService<R> {
    repository: Arc<R>,
    policy: EvaluationPolicy,
    sequence: AtomicU64,
}

impl<R> EvaluationService<R>
where
    R: EvaluationRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: EvaluationPolicy) -> Self {
        Self {
            repository,
            policy,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn policy(&self) -> EvaluationPolicy {
        self.policy
    }

    /// Store an evaluation for an application under review and advance it.
    ///
    /// Nothing is stored and the application is untouched unless it is `UnderReview`
    /// (and, under a strict policy, the score and comments pass validation).
    pub fn record_evaluation(
        &self,
        application: &mut Application,
        expert_id: ExpertId,
        score: i32,
        comments: impl Into<String>,
    ) -> Result<Evaluation, GrantError> {
        if application.state() != LifecycleState::UnderReview {
            warn!(
                application_id = %application.id,
                state = application.state_name(),
                "cannot evaluate, application not under review"
            );
            return Err(GrantError::StateMismatch {
                application_id: application.id,
                operation: "evaluate",
                expected: LifecycleState::UnderReview,
                actual: application.state(),
            });
        }

        let comments = comments.into();
        let violations = policy::violations(score, &comments);
        if !violations.is_empty() {
            let detail = violations
                .iter()
                .map(ValidityViolation::summary)
                .collect::<Vec<_>>()
                .join("; ");
            if self.policy.enforce_validity {
                return Err(GrantError::InvalidEvaluation(detail));
            }
            warn!(
                application_id = %application.id,
                %expert_id,
                detail = %detail,
                "storing evaluation that fails validation"
            );
        }

        let evaluation = Evaluation {
            id: EvaluationId(self.sequence.fetch_add(1, Ordering::Relaxed)),
            application_id: application.id,
            expert_id,
            score,
            comments,
            recorded_at: Utc::now(),
        };
        let stored = self.repository.insert(evaluation)?;

        application.evaluate_transition();
        info!(
            application_id = %application.id,
            evaluation_id = %stored.id,
            score = stored.score,
            "evaluation saved"
        );
        Ok(stored)
    }

    pub fn evaluations_for(&self, id: ApplicationId) -> Result<Vec<Evaluation>, GrantError> {
        Ok(self.repository.for_application(id)?)
    }
}
