//! Process configuration for the NAXML ingestion core.
//!
//! Environment variables with sensible defaults, loaded once at startup.
//! Multi-tenancy here means per-store file-exchange paths live in the
//! `pos_integration` table, not in this process config — this crate only
//! holds what's the same for every tenant the process serves.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

pub const DEFAULT_RUST_LOG: &str = "info,naxml_core=debug,naxml_server=debug,sqlx=warn";
pub const DEFAULT_AUDIT_RETENTION_DAYS: i64 = 365;
pub const DEFAULT_SCHEDULER_TICK_SECONDS: u64 = 30;

/// Env var holding the key used to decrypt `pos_integration.encrypted_credentials`.
/// The primitive itself is an external collaborator; this
/// crate only knows the variable's name.
pub const CREDENTIAL_KEY_ENV_VAR: &str = "NAXML_CREDENTIAL_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn env_parse<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            name,
            value: raw,
            reason: "could not parse".to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Process-wide settings: database connection, scheduler cadence, audit
/// retention, and logging. Loaded once at startup via [`Config::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,

    /// How often the Scheduler re-enumerates watchable `POSIntegration` rows
    /// and reconciles its running `FileWatcher` set.
    pub scheduler_tick: Duration,

    pub audit_retention_days: i64,
    pub rust_log: String,
}

impl Config {
    /// Load configuration from the environment, falling back to `.env` in the
    /// working directory if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let db_max_connections = env_parse("NAXML_DB_MAX_CONNECTIONS", num_cpus::get() as u32)?;
        let db_min_connections = env_parse("NAXML_DB_MIN_CONNECTIONS", 2u32)?;

        if db_min_connections > db_max_connections {
            return Err(ConfigError::InvalidValue {
                name: "NAXML_DB_MIN_CONNECTIONS",
                value: db_min_connections.to_string(),
                reason: "must not exceed NAXML_DB_MAX_CONNECTIONS".to_string(),
            });
        }

        let scheduler_tick_secs =
            env_parse("NAXML_SCHEDULER_TICK_SECONDS", DEFAULT_SCHEDULER_TICK_SECONDS)?;
        let audit_retention_days =
            env_parse("NAXML_AUDIT_RETENTION_DAYS", DEFAULT_AUDIT_RETENTION_DAYS)?;
        let rust_log =
            env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string());

        let scheduler_tick = Duration::from_secs(scheduler_tick_secs);

        info!(
            db_max_connections,
            db_min_connections,
            scheduler_tick = %humantime::format_duration(scheduler_tick),
            audit_retention_days,
            "configuration loaded"
        );

        Ok(Self {
            database_url,
            db_max_connections,
            db_min_connections,
            scheduler_tick,
            audit_retention_days,
            rust_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in [
            "DATABASE_URL",
            "NAXML_DB_MAX_CONNECTIONS",
            "NAXML_DB_MIN_CONNECTIONS",
            "NAXML_SCHEDULER_TICK_SECONDS",
            "NAXML_AUDIT_RETENTION_DAYS",
            "RUST_LOG",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        assert!(matches!(Config::from_env(), Err(ConfigError::MissingVar("DATABASE_URL"))));
    }

    #[test]
    fn defaults_fill_in_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("DATABASE_URL", "postgres://localhost/naxml");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.audit_retention_days, DEFAULT_AUDIT_RETENTION_DAYS);
        assert_eq!(cfg.scheduler_tick, Duration::from_secs(DEFAULT_SCHEDULER_TICK_SECONDS));
        clear_env();
    }

    #[test]
    fn min_exceeding_max_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("DATABASE_URL", "postgres://localhost/naxml");
        env::set_var("NAXML_DB_MAX_CONNECTIONS", "2");
        env::set_var("NAXML_DB_MIN_CONNECTIONS", "5");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidValue { name: "NAXML_DB_MIN_CONNECTIONS", .. })
        ));
        clear_env();
    }
}
