//! Grant application lifecycle: submission, review, expert evaluation and funding decision.
//!
//! The lifecycle table in [`lifecycle`] decides which operations are legal; the registry and
//! services around it own id allocation, record stores and service-level preconditions, and
//! [`GrantFacade`] exposes one entry point per actor role.

pub mod decision;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod facade;
pub mod lifecycle;
pub mod registry;
pub mod repository;
pub mod router;

#[cfg(test)]
mod tests;

pub use decision::{
    Decision, DecisionPolicy, DecisionService, DecisionStatus, ExpertAssignment, APPROVED,
    REJECTED,
};
pub use domain::{
    ActorRole, ApplicantId, Application, ApplicationId, DecisionId, EvaluationId, ExpertId,
    FundHolderId,
};
pub use error::GrantError;
pub use evaluation::{Evaluation, EvaluationPolicy, EvaluationService};
pub use facade::{ApplicationStatusView, GrantFacade, InMemoryGrantFacade};
pub use lifecycle::{transition, LifecycleOperation, LifecycleState, TransitionOutcome};
pub use registry::ApplicationRegistry;
pub use repository::{
    ApplicationRepository, DecisionRepository, EvaluationRepository,
    InMemoryApplicationRepository, InMemoryDecisionRepository, InMemoryEvaluationRepository,
    RepositoryError,
};
pub use router::application_router;
