use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use grant_flow::workflows::grants::{
    application_router, ApplicationRepository, DecisionRepository, EvaluationRepository,
    GrantFacade,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_grant_routes<A, E, D>(facade: Arc<GrantFacade<A, E, D>>) -> axum::Router
where
    A: ApplicationRepository + 'static,
    E: EvaluationRepository + 'static,
    D: DecisionRepository + 'static,
{
    application_router(facade)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::in_memory_facade;
    use axum::body::Body;
    use axum::http::Request;
    use grant_flow::config::GrantPolicyConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_route_is_mounted_next_to_grant_routes() {
        let router = with_grant_routes(in_memory_facade(GrantPolicyConfig::default()));

        let response = router
            .clone()
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::get("/api/v1/grants/applicants/1/applications")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
