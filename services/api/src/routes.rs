use crate::infra::{AppState, Services};
use crate::middleware::request_logging;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use loan_origination::auth::auth_router;
use loan_origination::records::records_router;
use loan_origination::urla::forms_router;
use serde_json::json;

/// Every HTTP surface of the service, with request logging applied.
pub(crate) fn app_router(services: &Services) -> Router {
    forms_router()
        .merge(auth_router(services.auth.clone()))
        .merge(records_router(
            services.records.clone(),
            services.auth.clone(),
        ))
        .route("/health", get(healthcheck))
        .route("/api/v1/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(middleware::from_fn(request_logging))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
