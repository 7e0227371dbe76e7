use crate::app_config::{AppConfig, Environment, SalesSource};
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
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let client_id = require("SALESDASH_CLIENT_ID")?;
    let client_secret = require("SALESDASH_CLIENT_SECRET")?;

    let env = parse_environment(&or_default("SALESDASH_ENV", "development"))?;
    let log_level = or_default("SALESDASH_LOG_LEVEL", "info");

    let api_base_url = or_default("SALESDASH_API_BASE_URL", "https://iapitest.eva.guru");
    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "SALESDASH_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base_url}'"),
        });
    }
    let redirect_uri = or_default("SALESDASH_REDIRECT_URI", "https://api.eva.guru");
    let scope = or_default("SALESDASH_SCOPE", "amazon_data");

    let request_timeout_secs = parse_u64("SALESDASH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SALESDASH_USER_AGENT", "salesdash/0.1 (sales-dashboard)");
    let state_path = PathBuf::from(or_default(
        "SALESDASH_STATE_PATH",
        "./.salesdash/session.json",
    ));
    let sales_source = parse_sales_source(&or_default("SALESDASH_SALES_SOURCE", "fixture"))?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        client_id,
        client_secret,
        redirect_uri,
        scope,
        request_timeout_secs,
        user_agent,
        state_path,
        sales_source,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SALESDASH_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

fn parse_sales_source(s: &str) -> Result<SalesSource, ConfigError> {
    match s {
        "fixture" => Ok(SalesSource::Fixture),
        "live" => Ok(SalesSource::Live),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SALESDASH_SALES_SOURCE".to_string(),
            reason: format!("expected fixture or live; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
