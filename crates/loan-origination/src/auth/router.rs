use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::service::AuthService;
use super::AuthError;

/// Signup, login, and refresh endpoints.
pub fn auth_router(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/v1/auth/signup", post(signup_handler))
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/auth/refresh", post(refresh_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2 password-flow form fields.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    pub username: String,
    pub password: String,
}

pub(crate) async fn signup_handler(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<SignupRequest>,
) -> Response {
    let outcome =
        tokio::task::spawn_blocking(move || service.signup(&request.email, &request.password))
            .await;

    match outcome {
        Ok(Ok(user)) => (StatusCode::CREATED, Json(json!({ "email": user.email }))).into_response(),
        Ok(Err(err)) => auth_error_response(err),
        Err(join_error) => {
            error!(error = %join_error, "signup task failed");
            internal_error()
        }
    }
}

pub(crate) async fn login_handler(
    State(service): State<Arc<AuthService>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let outcome =
        tokio::task::spawn_blocking(move || service.login(&form.username, &form.password)).await;

    match outcome {
        Ok(Ok(token)) => (StatusCode::OK, Json(token)).into_response(),
        Ok(Err(err)) => auth_error_response(err),
        Err(join_error) => {
            error!(error = %join_error, "login task failed");
            internal_error()
        }
    }
}

pub(crate) async fn refresh_handler(
    State(service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match service.refresh(token) {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(err) => auth_error_response(err),
    }
}

/// Token from an `Authorization: Bearer <token>` header. The scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware rejecting requests without a valid bearer token. On success the
/// [`super::AuthenticatedUser`] is stored in the request extensions.
pub async fn require_user(
    State(service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match bearer_token(request.headers()) {
        Some(token) => service.authenticate(token),
        None => Err(AuthError::InvalidToken),
    };

    match user {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => auth_error_response(err),
    }
}

fn auth_error_response(err: AuthError) -> Response {
    match err {
        AuthError::UserExists => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() }))).into_response()
        }
        AuthError::InvalidSignup(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        AuthError::InvalidCredentials | AuthError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        AuthError::Hashing | AuthError::Token(_) | AuthError::Repository(_) => {
            error!(error = %err, "authentication backend failure");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}
