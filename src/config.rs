use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    Missing(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_pool_size: u32,
    /// Lifetime of an idle cart session.
    pub session_ttl: chrono::Duration,
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&get, "PORT", 8080u16)?;
        let db_pool_size = parse_or(&get, "DB_POOL_SIZE", 10u32)?;
        let ttl_secs = parse_or(&get, "SESSION_TTL_SECS", 1_209_600i64)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: "SESSION_TTL_SECS",
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            db_pool_size,
            session_ttl: chrono::Duration::seconds(ttl_secs),
        })
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
