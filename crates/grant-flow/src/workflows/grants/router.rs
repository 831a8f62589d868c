use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantId, ApplicationId, ExpertId, FundHolderId};
use super::error::GrantError;
use super::facade::GrantFacade;
use super::repository::{ApplicationRepository, DecisionRepository, EvaluationRepository};

type SharedFacade<A, E, D> = State<Arc<GrantFacade<A, E, D>>>;

#[derive(Debug, Deserialize)]
pub struct SubmitApplicationRequest {
    pub applicant_id: ApplicantId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub applicant_id: ApplicantId,
}

#[derive(Debug, Deserialize)]
pub struct StartReviewRequest {
    pub fund_holder_id: FundHolderId,
}

#[derive(Debug, Deserialize)]
pub struct AssignExpertsRequest {
    pub fund_holder_id: FundHolderId,
    pub expert_ids: Vec<ExpertId>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub expert_id: ExpertId,
    pub score: i32,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub fund_holder_id: FundHolderId,
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

/// Router builder exposing the facade's role-scoped operations.
pub fn application_router<A, E, D>(facade: Arc<GrantFacade<A, E, D>>) -> Router
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    Router::new()
        .route("/api/v1/grants/applications", post(submit_handler::<A, E, D>))
        .route(
            "/api/v1/grants/applications/:application_id",
            get(status_handler::<A, E, D>),
        )
        .route(
            "/api/v1/grants/applicants/:applicant_id/applications",
            get(applicant_status_handler::<A, E, D>),
        )
        .route(
            "/api/v1/grants/applications/:application_id/withdraw",
            post(withdraw_handler::<A, E, D>),
        )
        .route(
            "/api/v1/grants/applications/:application_id/review",
            post(review_handler::<A, E, D>),
        )
        .route(
            "/api/v1/grants/applications/:application_id/experts",
            post(assign_experts_handler::<A, E, D>),
        )
        .route(
            "/api/v1/grants/applications/:application_id/evaluations",
            post(evaluation_handler::<A, E, D>),
        )
        .route(
            "/api/v1/grants/applications/:application_id/decision",
            post(decision_handler::<A, E, D>),
        )
        .with_state(facade)
}

pub(crate) fn error_response(error: GrantError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "kind": error.kind(),
    });
    (error.status_code(), Json(payload)).into_response()
}

fn respond<T: serde::Serialize>(status: StatusCode, result: Result<T, GrantError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<A, E, D>(
    State(facade): SharedFacade<A, E, D>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    let result = facade
        .submit_application(request.applicant_id, request.title, request.description)
        .and_then(|application| facade.status_view(application.id));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn status_handler<A, E, D>(
    State(facade): SharedFacade<A, E, D>,
    Path(application_id): Path<u64>,
) -> Response
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    respond(
        StatusCode::OK,
        facade.status_view(ApplicationId(application_id)),
    )
}

pub(crate) async fn applicant_status_handler<A, E, D>(
    State(facade): SharedFacade<A, E, D>,
    Path(applicant_id): Path<u64>,
) -> Response
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    respond(
        StatusCode::OK,
        facade.view_status(ApplicantId(applicant_id)),
    )
}

pub(crate) async fn withdraw_handler<A, E, D>(
    State(facade): SharedFacade<A, E, D>,
    Path(application_id): Path<u64>,
    Json(request): Json<WithdrawRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    let id = ApplicationId(application_id);
    let result = facade
        .withdraw_application(request.applicant_id, id)
        .and_then(|_| facade.status_view(id));
    respond(StatusCode::OK, result)
}

pub(crate) async fn review_handler<A, E, D>(
    State(facade): SharedFacade<A, E, D>,
    Path(application_id): Path<u64>,
    Json(request): Json<StartReviewRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    let id = ApplicationId(application_id);
    let result = facade
        .start_review(request.fund_holder_id, id)
        .and_then(|_| facade.status_view(id));
    respond(StatusCode::OK, result)
}

pub(crate) async fn assign_experts_handler<A, E, D>(
    State(facade): SharedFacade<A, E, D>,
    Path(application_id): Path<u64>,
    Json(request): Json<AssignExpertsRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        facade.assign_experts(
            request.fund_holder_id,
            ApplicationId(application_id),
            request.expert_ids,
        ),
    )
}

pub(crate) async fn evaluation_handler<A, E, D>(
    State(facade): SharedFacade<A, E, D>,
    Path(application_id): Path<u64>,
    Json(request): Json<EvaluationRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        facade.evaluate_application(
            request.expert_id,
            ApplicationId(application_id),
            request.score,
            request.comments,
        ),
    )
}

pub(crate) async fn decision_handler<A, E, D>(
    State(facade): SharedFacade<A, E, D>,
    Path(application_id): Path<u64>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        facade.make_decision(
            request.fund_holder_id,
            ApplicationId(application_id),
            &request.status,
            request.notes,
        ),
    )
}
