use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Deployment stage the service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("production") || value.eq_ignore_ascii_case("prod") {
            Self::Production
        } else if value.eq_ignore_ascii_case("test") || value.eq_ignore_ascii_case("ci") {
            Self::Test
        } else {
            Self::Development
        }
    }
}

/// Everything the loan origination service reads from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub project_name: String,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Read `.env` (when present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::parse(&env_or("APP_ENV", "development")),
            project_name: env_or("PROJECT_NAME", "Loan Origination Service"),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: env_or("APP_LOG_LEVEL", "info"),
            },
            auth: AuthConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = env_or("APP_PORT", "3000")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        Ok(Self {
            host: env_or("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    /// Resolve the bind address. `localhost` maps to the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Token signing and password hashing settings.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub password_hash_iterations: u32,
}

impl AuthConfig {
    pub const DEFAULT_HASH_ITERATIONS: u32 = 100_000;

    fn from_env() -> Result<Self, ConfigError> {
        let secret_key = env_or("SECRET_KEY", "TEMP_KEY");
        if secret_key.trim().is_empty() {
            return Err(ConfigError::EmptySecretKey);
        }

        let access_token_expire_minutes = env_or("ACCESS_TOKEN_EXPIRE_MINUTES", "30")
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(ConfigError::InvalidTokenLifetime)?;

        let password_hash_iterations = match env::var("PASSWORD_HASH_ITERATIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|rounds| *rounds > 0)
                .ok_or(ConfigError::InvalidHashIterations)?,
            Err(_) => Self::DEFAULT_HASH_ITERATIONS,
        };

        Ok(Self {
            secret_key,
            access_token_expire_minutes,
            password_hash_iterations,
        })
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .field("password_hash_iterations", &self.password_hash_iterations)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptySecretKey,
    InvalidTokenLifetime,
    InvalidHashIterations,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptySecretKey => write!(f, "SECRET_KEY must not be empty"),
            ConfigError::InvalidTokenLifetime => {
                write!(f, "ACCESS_TOKEN_EXPIRE_MINUTES must be a positive integer")
            }
            ConfigError::InvalidHashIterations => {
                write!(f, "PASSWORD_HASH_ITERATIONS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::EmptySecretKey
            | ConfigError::InvalidTokenLifetime
            | ConfigError::InvalidHashIterations => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "PROJECT_NAME",
            "SECRET_KEY",
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            "PASSWORD_HASH_ITERATIONS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.project_name, "Loan Origination Service");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.auth.secret_key, "TEMP_KEY");
        assert_eq!(config.auth.access_token_expire_minutes, 30);
        assert_eq!(
            config.auth.password_hash_iterations,
            AuthConfig::DEFAULT_HASH_ITERATIONS
        );
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn environment_aliases_and_bad_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", " PROD ");
        assert_eq!(
            AppConfig::load().expect("config loads").environment,
            AppEnvironment::Production
        );
        env::set_var("APP_ENV", "ci");
        env::set_var("APP_PORT", "70000");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPort)));
        reset_env();
    }

    #[test]
    fn rejects_blank_secret_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SECRET_KEY", "  ");
        let err = AppConfig::load().expect_err("blank secret rejected");
        assert!(matches!(err, ConfigError::EmptySecretKey));
        reset_env();
    }

    #[test]
    fn rejects_non_positive_token_lifetime() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        for raw in ["0", "-5", "soon"] {
            env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", raw);
            let err = AppConfig::load().expect_err("lifetime rejected");
            assert!(matches!(err, ConfigError::InvalidTokenLifetime));
        }
        reset_env();
    }

    #[test]
    fn debug_output_redacts_secret() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SECRET_KEY", "super-secret-value");
        let config = AppConfig::load().expect("config loads");
        let rendered = format!("{:?}", config.auth);
        assert!(!rendered.contains("super-secret-value"));
        reset_env();
    }
}
