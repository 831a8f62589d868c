use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::config::GrantPolicyConfig;
use crate::workflows::grants::domain::{
    ApplicantId, Application, ApplicationId, ExpertId, FundHolderId,
};
use crate::workflows::grants::registry::ApplicationRegistry;
use crate::workflows::grants::repository::{
    ApplicationRepository, InMemoryApplicationRepository, RepositoryError,
};
use crate::workflows::grants::{application_router, InMemoryGrantFacade};

pub(super) const ALICE: ApplicantId = ApplicantId(1);
pub(super) const MALLORY: ApplicantId = ApplicantId(7);
pub(super) const BOB: ExpertId = ExpertId(2);
pub(super) const CHARLIE: FundHolderId = FundHolderId(3);

pub(super) fn permissive_policy() -> GrantPolicyConfig {
    GrantPolicyConfig {
        strict_evaluation: false,
        require_evaluated_decision: false,
        strict_decision_status: false,
    }
}

pub(super) fn strict_facade() -> InMemoryGrantFacade {
    InMemoryGrantFacade::in_memory(GrantPolicyConfig::default())
}

pub(super) fn permissive_facade() -> InMemoryGrantFacade {
    InMemoryGrantFacade::in_memory(permissive_policy())
}

pub(super) fn registry() -> ApplicationRegistry<InMemoryApplicationRepository> {
    ApplicationRegistry::new(Arc::new(InMemoryApplicationRepository::default()))
}

/// Fresh `Submitted` application built through a throwaway registry.
pub(super) fn submitted_application() -> Application {
    registry()
        .create("Project X", "Description X", ALICE)
        .expect("application created")
}

pub(super) fn under_review_application() -> Application {
    let mut application = submitted_application();
    application.start_review();
    application
}

pub(super) fn evaluated_application() -> Application {
    let mut application = under_review_application();
    application.evaluate_transition();
    application
}

/// Submit and open review for Alice's "Project X" through the facade.
pub(super) fn reviewed_through_facade(facade: &InMemoryGrantFacade) -> ApplicationId {
    let application = facade
        .submit_application(ALICE, "Project X", "Description X")
        .expect("submission succeeds");
    facade
        .start_review(CHARLIE, application.id)
        .expect("review starts");
    application.id
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_applicant(&self, _applicant_id: ApplicantId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_facade(facade: InMemoryGrantFacade) -> axum::Router {
    application_router(Arc::new(facade))
}
