use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Background job intervals.
    pub jobs: JobConfig,
}

/// Tick intervals of the periodic background jobs.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub familiarity_decay_interval: Duration,
    pub session_cleanup_interval: Duration,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            familiarity_decay_interval: Duration::from_secs(86_400),
            session_cleanup_interval: Duration::from_secs(3_600),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default                 |
    /// |-----------------------------------|-------------------------|
    /// | `HOST`                            | `0.0.0.0`               |
    /// | `PORT`                            | `3000`                  |
    /// | `CORS_ORIGINS`                    | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`            | `30`                    |
    /// | `FAMILIARITY_DECAY_INTERVAL_SECS` | `86400`                 |
    /// | `SESSION_CLEANUP_INTERVAL_SECS`   | `3600`                  |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_secs("REQUEST_TIMEOUT_SECS", 30);

        let defaults = JobConfig::default();
        let jobs = JobConfig {
            familiarity_decay_interval: Duration::from_secs(env_secs(
                "FAMILIARITY_DECAY_INTERVAL_SECS",
                defaults.familiarity_decay_interval.as_secs(),
            )),
            session_cleanup_interval: Duration::from_secs(env_secs(
                "SESSION_CLEANUP_INTERVAL_SECS",
                defaults.session_cleanup_interval.as_secs(),
            )),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            jobs,
        }
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    let secs: u64 = match std::env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    };
    assert!(secs > 0, "{name} must be greater than zero");
    secs
}
