use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::calculations::FinancialSummary;
use super::schema::urla_2021_v1_schema;
use super::validation::{parse, ValidatedApplication};

/// Dynamic-form endpoints: the URLA schema and a validate-and-derive check.
pub fn forms_router() -> Router {
    Router::new()
        .route("/api/v1/forms/schema/urla_2021_v1", get(schema_handler))
        .route("/api/v1/forms/urla_2021_v1/validate", post(validate_handler))
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidatedFormView {
    pub application: ValidatedApplication,
    pub summary: FinancialSummary,
}

pub(crate) async fn schema_handler() -> Response {
    (StatusCode::OK, Json(urla_2021_v1_schema())).into_response()
}

pub(crate) async fn validate_handler(Json(raw): Json<Value>) -> Response {
    match parse(raw) {
        Ok(application) => {
            let summary = application.financial_summary();
            info!(
                application_id = %application.application_id,
                dti_ratio = %summary.dti_ratio,
                "urla application validated"
            );
            let view = ValidatedFormView {
                application,
                summary,
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(report) => {
            debug!(violations = report.len(), "urla application rejected");
            let payload = json!({
                "error": report.to_string(),
                "violations": report.violations,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}
