use crate::admin::PasswordHash;
use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are missing or invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are missing or invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a plain map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = lookup("DATABASE_URL").ok().filter(|u| !u.trim().is_empty());
    let env = parse_environment(&or_default("FBDB_ENV", "development"))?;

    let bind_addr = parse("FBDB_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FBDB_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("FBDB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("FBDB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FBDB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let admin_username = or_default("FBDB_ADMIN_USERNAME", "admin");
    if admin_username.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "FBDB_ADMIN_USERNAME".to_string(),
            reason: "must be non-empty".to_string(),
        });
    }
    let admin_password_hash = match lookup("FBDB_ADMIN_PASSWORD_HASH") {
        Ok(raw) => Some(raw.parse::<PasswordHash>().map_err(|e| {
            ConfigError::InvalidEnvVar {
                var: "FBDB_ADMIN_PASSWORD_HASH".to_string(),
                reason: e.to_string(),
            }
        })?),
        Err(_) if env == Environment::Development => None,
        Err(_) => {
            return Err(ConfigError::MissingEnvVar(
                "FBDB_ADMIN_PASSWORD_HASH".to_string(),
            ))
        }
    };

    let rate_limit_per_minute = parse_usize("FBDB_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        admin_username,
        admin_password_hash,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FBDB_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
