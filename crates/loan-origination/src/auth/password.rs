use base64::{engine::general_purpose, Engine as _};
use constant_time_eq::constant_time_eq;
use pbkdf2::hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use uuid::Uuid;

use super::AuthError;

const SCHEME: &str = "pbkdf2_sha256";

/// PBKDF2-HMAC-SHA256 hashes encoded as `pbkdf2_sha256$<iterations>$<salt>$<base64 digest>`.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = derive(password, &salt, self.iterations).ok_or(AuthError::Hashing)?;
        Ok(format!(
            "{SCHEME}${}${salt}${}",
            self.iterations,
            general_purpose::STANDARD.encode(digest)
        ))
    }

    /// Stored hashes carry their own iteration count, so older hashes keep verifying after
    /// the configured count changes.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let parts: Vec<&str> = encoded.split('$').collect();
        let [scheme, iterations, salt, expected] = parts.as_slice() else {
            return false;
        };
        if *scheme != SCHEME {
            return false;
        }
        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };
        let Ok(expected) = general_purpose::STANDARD.decode(expected) else {
            return false;
        };

        match derive(password, salt, iterations) {
            Some(actual) => constant_time_eq(&actual, &expected),
            None => false,
        }
    }
}

fn derive(password: &str, salt: &str, iterations: u32) -> Option<[u8; 32]> {
    let mut output = [0u8; 32];
    pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt.as_bytes(), iterations, &mut output).ok()?;
    Some(output)
}
