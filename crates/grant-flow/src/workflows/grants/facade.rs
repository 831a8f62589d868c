use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::info;

use super::decision::{Decision, DecisionPolicy, DecisionService, DecisionStatus, ExpertAssignment};
use super::domain::{ApplicantId, Application, ApplicationId, ExpertId, FundHolderId};
use super::error::GrantError;
use super::evaluation::{Evaluation, EvaluationPolicy, EvaluationService};
use super::registry::ApplicationRegistry;
use super::repository::{
    ApplicationRepository, DecisionRepository, EvaluationRepository,
    InMemoryApplicationRepository, InMemoryDecisionRepository, InMemoryEvaluationRepository,
    RepositoryError,
};
use crate::config::GrantPolicyConfig;

pub type InMemoryGrantFacade = GrantFacade<
    InMemoryApplicationRepository,
    InMemoryEvaluationRepository,
    InMemoryDecisionRepository,
>;

/// Role-scoped entry point composing the registry with the evaluation and decision services.
///
/// Each mutating call fetches the application, applies the service, and writes it back
/// while holding the facade's mutation lock.
pub struct GrantFacade<A, E, D> {
    registry: ApplicationRegistry<A>,
    evaluations: EvaluationService<E>,
    decisions: DecisionService<D>,
    mutation: Mutex<()>,
}

impl InMemoryGrantFacade {
    pub fn in_memory(policy: GrantPolicyConfig) -> Self {
        Self::new(
            Arc::new(InMemoryApplicationRepository::default()),
            Arc::new(InMemoryEvaluationRepository::default()),
            Arc::new(InMemoryDecisionRepository::default()),
            policy.evaluation_policy(),
            policy.decision_policy(),
        )
    }
}

impl<A, E, D> GrantFacade<A, E, D>
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    pub fn new(
        applications: Arc<A>,
        evaluations: Arc<E>,
        decisions: Arc<D>,
        evaluation_policy: EvaluationPolicy,
        decision_policy: DecisionPolicy,
    ) -> Self {
        Self {
            registry: ApplicationRegistry::new(applications),
            evaluations: EvaluationService::new(evaluations, evaluation_policy),
            decisions: DecisionService::new(decisions, decision_policy),
            mutation: Mutex::new(()),
        }
    }

    fn serialize(&self) -> Result<MutexGuard<'_, ()>, GrantError> {
        self.mutation.lock().map_err(|_| {
            GrantError::Repository(RepositoryError::Unavailable(
                "facade mutation lock poisoned".to_string(),
            ))
        })
    }

    // Applicant operations

    pub fn submit_application(
        &self,
        applicant_id: ApplicantId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Application, GrantError> {
        let _guard = self.serialize()?;
        let mut application = self.registry.create(title, description, applicant_id)?;
        // Created applications are already submitted; this only confirms it.
        application.submit();
        Ok(application)
    }

    pub fn view_status(
        &self,
        applicant_id: ApplicantId,
    ) -> Result<Vec<ApplicationStatusView>, GrantError> {
        let applications = self.registry.list_by_applicant(applicant_id)?;
        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let evaluations = self.evaluations.evaluations_for(application.id)?;
            let decisions = self.decisions.decisions_for(application.id)?;
            let view = ApplicationStatusView::new(&application, evaluations.len(), &decisions);
            info!(
                application_id = %view.application_id,
                state = view.state,
                "application status"
            );
            views.push(view);
        }
        Ok(views)
    }

    /// Withdraw an application on behalf of its owner.
    pub fn withdraw_application(
        &self,
        applicant_id: ApplicantId,
        application_id: ApplicationId,
    ) -> Result<Application, GrantError> {
        let _guard = self.serialize()?;
        let mut application = self.registry.get(application_id)?;
        if !application.is_owned_by(applicant_id) {
            return Err(GrantError::AccessDenied {
                applicant_id,
                application_id,
            });
        }

        let outcome = application.withdraw();
        GrantError::check_outcome(&application, "withdraw", outcome)?;
        self.registry.save(&application)?;
        Ok(application)
    }

    // Expert operations

    pub fn evaluate_application(
        &self,
        expert_id: ExpertId,
        application_id: ApplicationId,
        score: i32,
        comments: impl Into<String>,
    ) -> Result<Evaluation, GrantError> {
        let _guard = self.serialize()?;
        let mut application = self.registry.get(application_id)?;
        let evaluation =
            self.evaluations
                .record_evaluation(&mut application, expert_id, score, comments)?;
        self.registry.save(&application)?;
        Ok(evaluation)
    }

    // Fund holder operations

    /// Open the review of a submitted application.
    pub fn start_review(
        &self,
        fund_holder_id: FundHolderId,
        application_id: ApplicationId,
    ) -> Result<Application, GrantError> {
        let _guard = self.serialize()?;
        let mut application = self.registry.get(application_id)?;
        let outcome = application.start_review();
        GrantError::check_outcome(&application, "review", outcome)?;
        self.registry.save(&application)?;
        info!(%application_id, %fund_holder_id, "review started");
        Ok(application)
    }

    pub fn assign_experts(
        &self,
        fund_holder_id: FundHolderId,
        application_id: ApplicationId,
        expert_ids: Vec<ExpertId>,
    ) -> Result<ExpertAssignment, GrantError> {
        let application = self.registry.get(application_id)?;
        self.decisions
            .assign_experts(&application, fund_holder_id, expert_ids)
    }

    pub fn make_decision(
        &self,
        fund_holder_id: FundHolderId,
        application_id: ApplicationId,
        status: &str,
        notes: impl Into<String>,
    ) -> Result<Decision, GrantError> {
        let _guard = self.serialize()?;
        let mut application = self.registry.get(application_id)?;
        let decision =
            self.decisions
                .record_decision(&mut application, fund_holder_id, status, notes)?;
        self.registry.save(&application)?;
        Ok(decision)
    }

    // Read side

    pub fn application(&self, application_id: ApplicationId) -> Result<Application, GrantError> {
        self.registry.get(application_id)
    }

    pub fn evaluations(&self, application_id: ApplicationId) -> Result<Vec<Evaluation>, GrantError> {
        self.registry.get(application_id)?;
        self.evaluations.evaluations_for(application_id)
    }

    pub fn decisions(&self, application_id: ApplicationId) -> Result<Vec<Decision>, GrantError> {
        self.registry.get(application_id)?;
        self.decisions.decisions_for(application_id)
    }

    pub fn assignments(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<ExpertAssignment>, GrantError> {
        self.registry.get(application_id)?;
        self.decisions.assignments_for(application_id)
    }

    pub fn status_view(
        &self,
        application_id: ApplicationId,
    ) -> Result<ApplicationStatusView, GrantError> {
        let application = self.registry.get(application_id)?;
        let evaluations = self.evaluations.evaluations_for(application_id)?;
        let decisions = self.decisions.decisions_for(application_id)?;
        Ok(ApplicationStatusView::new(
            &application,
            evaluations.len(),
            &decisions,
        ))
    }
}

/// Human-facing summary of an application's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub title: String,
    pub state: &'static str,
    pub label: &'static str,
    pub evaluations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_decision: Option<DecisionStatus>,
}

impl ApplicationStatusView {
    fn new(application: &Application, evaluations: usize, decisions: &[Decision]) -> Self {
        Self {
            application_id: application.id,
            applicant_id: application.applicant_id,
            title: application.title.clone(),
            state: application.state_name(),
            label: application.state().label(),
            evaluations,
            latest_decision: decisions.last().map(|decision| decision.status),
        }
    }

    pub fn summary(&self) -> String {
        format!("Application {}: {}", self.application_id, self.state)
    }
}
