use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::password::PasswordHasher;
use super::token::TokenIssuer;
use super::users::{User, UserRepository};
use super::AuthError;
use crate::config::AuthConfig;
use crate::records::{RecordId, RepositoryError};
use crate::urla::validation::is_valid_email;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
}

impl AccessToken {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Identity attached to requests that passed bearer-token authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: RecordId,
    pub email: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Signup, login, token refresh, and request authentication over an injected user store.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub fn from_config(config: &AuthConfig, users: Arc<dyn UserRepository>) -> Self {
        Self::new(
            users,
            PasswordHasher::new(config.password_hash_iterations),
            TokenIssuer::new(&config.secret_key, config.access_token_expire_minutes),
        )
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn signup(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidSignup(
                "email is not a valid e-mail address".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidSignup(
                "password must not be empty".to_string(),
            ));
        }
        if self.users.find_by_email(&email)?.is_some() {
            return Err(AuthError::UserExists);
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .insert(email, password_hash)
            .map_err(|err| match err {
                RepositoryError::Conflict => AuthError::UserExists,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email)? else {
            warn!("login attempt for unknown account");
            return Err(AuthError::InvalidCredentials);
        };
        if !self.hasher.verify(password, &user.password_hash) {
            warn!(user_id = user.id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(AccessToken::bearer(self.tokens.issue(&user.email)?))
    }

    /// Exchange a validly signed token, expired or not, for a fresh one.
    pub fn refresh(&self, token: &str) -> Result<AccessToken, AuthError> {
        let claims = self.tokens.verify_ignoring_expiry(token)?;
        let user = self
            .users
            .find_by_email(&claims.sub)?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AccessToken::bearer(self.tokens.issue(&user.email)?))
    }

    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.tokens.verify(token)?;
        self.users
            .find_by_email(&claims.sub)?
            .map(AuthenticatedUser::from)
            .ok_or(AuthError::InvalidToken)
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
