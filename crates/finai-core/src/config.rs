use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `.env` templates can leave a URL blank.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let narrow = |var: &str, value: u64| -> Result<u32, ConfigError> {
        u32::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let to_usize = |var: &str, value: u64| -> Result<usize, ConfigError> {
        usize::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("FINAI_ENV", "development"))?;

    let raw_bind = or_default("FINAI_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr =
        raw_bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "FINAI_BIND_ADDR".to_string(),
                reason: e.to_string(),
            })?;
    let log_level = or_default("FINAI_LOG_LEVEL", "info");
    let redis_url = optional("FINAI_REDIS_URL");

    let db_max_connections = narrow(
        "FINAI_DB_MAX_CONNECTIONS",
        parse_num("FINAI_DB_MAX_CONNECTIONS", "10")?,
    )?;
    let db_min_connections = narrow(
        "FINAI_DB_MIN_CONNECTIONS",
        parse_num("FINAI_DB_MIN_CONNECTIONS", "1")?,
    )?;
    let db_acquire_timeout_secs = parse_num("FINAI_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let financial_model_url = optional("FINAI_FINANCIAL_MODEL_URL");
    let general_model_url = optional("FINAI_GENERAL_MODEL_URL");
    let ner_url = optional("FINAI_NER_URL");
    let model_timeout_ms = parse_num("FINAI_MODEL_TIMEOUT_MS", "5000")?;
    if model_timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FINAI_MODEL_TIMEOUT_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let model_max_retries = narrow(
        "FINAI_MODEL_MAX_RETRIES",
        parse_num("FINAI_MODEL_MAX_RETRIES", "1")?,
    )?;

    let rate_limit_sentiment_per_min = to_usize(
        "FINAI_RATE_LIMIT_SENTIMENT_PER_MIN",
        parse_num("FINAI_RATE_LIMIT_SENTIMENT_PER_MIN", "30")?,
    )?;
    let rate_limit_recommend_per_min = to_usize(
        "FINAI_RATE_LIMIT_RECOMMEND_PER_MIN",
        parse_num("FINAI_RATE_LIMIT_RECOMMEND_PER_MIN", "20")?,
    )?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        redis_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        financial_model_url,
        general_model_url,
        ner_url,
        model_timeout_ms,
        model_max_retries,
        rate_limit_sentiment_per_min,
        rate_limit_recommend_per_min,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FINAI_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
