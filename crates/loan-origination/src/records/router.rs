use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{
    BorrowerRecord, CommunicationLogRecord, DocumentRecord, LoanApplicationRecord, Organization,
    RecordId,
};
use super::repository::{RecordFields, RepositoryError};
use super::service::{RecordService, RecordServiceError};
use crate::auth::{require_user, AuthService, AuthenticatedUser};

type RecordState = Arc<RecordService>;

/// Bearer-protected CRUD routes for every record collection plus the audit trail.
pub fn records_router(service: Arc<RecordService>, auth: Arc<AuthService>) -> Router {
    let router = Router::new().route("/api/v1/audit-trail", get(audit_trail_handler));
    let router = collection_routes::<Organization>(router);
    let router = collection_routes::<BorrowerRecord>(router);
    let router = collection_routes::<LoanApplicationRecord>(router);
    let router = collection_routes::<DocumentRecord>(router);
    let router = collection_routes::<CommunicationLogRecord>(router);

    router
        .route_layer(middleware::from_fn_with_state(auth, require_user))
        .with_state(service)
}

fn collection_routes<T: RecordFields>(router: Router<RecordState>) -> Router<RecordState> {
    let collection = format!("/api/v1/{}", T::ENTITY.collection());
    let item = format!("{collection}/:id");

    router
        .route(&collection, get(list_handler::<T>).post(create_handler::<T>))
        .route(&item, get(get_handler::<T>).delete(delete_handler::<T>))
}

pub(crate) async fn create_handler<T: RecordFields>(
    State(service): State<RecordState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(fields): Json<T>,
) -> Response {
    match service.create(fields, Some(user.id)) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<T: RecordFields>(State(service): State<RecordState>) -> Response {
    match service.list::<T>() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_handler<T: RecordFields>(
    State(service): State<RecordState>,
    Path(id): Path<RecordId>,
) -> Response {
    match service.get::<T>(id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<T: RecordFields>(
    State(service): State<RecordState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<RecordId>,
) -> Response {
    match service.soft_delete::<T>(id, Some(user.id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn audit_trail_handler(State(service): State<RecordState>) -> Response {
    match service.audit_trail() {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RecordServiceError) -> Response {
    let status = match &err {
        RecordServiceError::InvalidDraft { .. } | RecordServiceError::InvalidReference { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RecordServiceError::NotFound { .. }
        | RecordServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecordServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RecordServiceError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "record store unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
