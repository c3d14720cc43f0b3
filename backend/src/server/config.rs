//! Process configuration read from the environment.

use std::env;
use std::net::SocketAddr;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::domain::SeedPasswords;

const DEFAULT_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 8;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_FRONTEND_HOST: &str = "http://localhost:5173";

/// Deployment environment the process believes it is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Result<Self, SettingsError> {
        match raw {
            "local" => Ok(Self::Local),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(SettingsError::UnknownEnvironment(other.to_owned())),
        }
    }

    /// Lowercase name as configured.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

/// Configuration failures surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `ENVIRONMENT` held a value outside the known set.
    #[error("unknown ENVIRONMENT value: {0}")]
    UnknownEnvironment(String),
    /// A non-local environment was started without an explicit secret.
    #[error("SECRET_KEY must be set outside the local environment")]
    MissingSecretKey,
    /// A numeric variable failed to parse.
    #[error("invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    /// `BIND_ADDR` was not a socket address.
    #[error("invalid BIND_ADDR: {0}")]
    InvalidBindAddr(String),
}

/// Immutable process settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub backend_cors_origins: Vec<String>,
    pub frontend_host: String,
    pub bind_addr: SocketAddr,
    pub seed: SeedPasswords,
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(43)
        .map(char::from)
        .collect()
}

fn parse_minutes(name: &'static str, raw: String) -> Result<i64, SettingsError> {
    raw.parse::<i64>()
        .ok()
        .filter(|minutes| *minutes > 0)
        .ok_or(SettingsError::InvalidNumber { name, value: raw })
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_owned())
        .filter(|origin| !origin.is_empty())
        .collect()
}

impl Settings {
    /// Read settings from process environment variables.
    ///
    /// `SECRET_KEY` gets a random per-process fallback in `local` only;
    /// everywhere else its absence is a startup error.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let environment = match lookup("ENVIRONMENT") {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::Local,
        };
        let secret_key = match lookup("SECRET_KEY") {
            Some(key) => key,
            None if environment == Environment::Local => random_secret(),
            None => return Err(SettingsError::MissingSecretKey),
        };
        let access_token_expire_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => parse_minutes("ACCESS_TOKEN_EXPIRE_MINUTES", raw)?,
            None => DEFAULT_TOKEN_EXPIRE_MINUTES,
        };
        let backend_cors_origins = lookup("BACKEND_CORS_ORIGINS")
            .map(|raw| split_origins(&raw))
            .unwrap_or_default();
        let frontend_host = lookup("FRONTEND_HOST")
            .map(|host| host.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| DEFAULT_FRONTEND_HOST.to_owned());
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| SettingsError::InvalidBindAddr(err.to_string()))?;

        let mut seed = SeedPasswords::default();
        if let Some(password) = lookup("SEED_ADMIN_PASSWORD") {
            seed.admin = password;
        }
        if let Some(password) = lookup("SEED_USER_PASSWORD") {
            seed.user = password;
        }

        Ok(Self {
            environment,
            secret_key,
            access_token_expire_minutes,
            backend_cors_origins,
            frontend_host,
            bind_addr,
            seed,
        })
    }

    /// Whether the process runs in the local development environment.
    pub fn is_local(&self) -> bool {
        self.environment == Environment::Local
    }

    /// Lifetime applied to issued access tokens.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }

    /// Configured CORS origins with the frontend host always included.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = self.backend_cors_origins.clone();
        if !origins.contains(&self.frontend_host) {
            origins.push(self.frontend_host.clone());
        }
        origins
    }
}
