//! Account signup, password login, and bearer-token authentication.

mod password;
pub mod router;
mod service;
mod token;
mod users;


pub use password::PasswordHasher;
pub use router::{auth_router, bearer_token, require_user};
pub use service::{AccessToken, AuthService, AuthenticatedUser};
pub use token::{Claims, TokenIssuer};
pub use users::{InMemoryUserRepository, User, UserRepository};

use crate::records::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User already exists")]
    UserExists,
    #[error("{0}")]
    InvalidSignup(String),
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("password hashing failed")]
    Hashing,
    #[error("token could not be issued: {0}")]
    Token(jsonwebtoken::errors::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
