use crate::app_config::{AppConfig, AssistantConfig, Environment};
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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
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

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let geosearch_url = require("GEOQUERY_GEOSEARCH_URL")?;

    let env = parse_environment(&or_default("GEOQUERY_ENV", "development"));
    let bind_addr = parse_addr("GEOQUERY_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("GEOQUERY_LOG_LEVEL", "info");
    let geosearch_timeout_secs = parse_u64("GEOQUERY_GEOSEARCH_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("GEOQUERY_USER_AGENT", "geoquery/0.1 (geosearch-gateway)");

    // The assistant is configured only when both the endpoint and the API key
    // are present; a partial pair is treated as unconfigured, not an error.
    let assistant = match (
        lookup("GEOQUERY_ASSISTANT_ENDPOINT").ok(),
        lookup("GEOQUERY_ASSISTANT_API_KEY").ok(),
    ) {
        (Some(endpoint), Some(api_key)) if !endpoint.is_empty() && !api_key.is_empty() => {
            Some(AssistantConfig {
                endpoint,
                api_key,
                deployment: or_default("GEOQUERY_ASSISTANT_DEPLOYMENT", "gpt-4o-mini"),
                api_version: or_default("GEOQUERY_ASSISTANT_API_VERSION", "2025-01-01-preview"),
                timeout_secs: parse_u64("GEOQUERY_ASSISTANT_TIMEOUT_SECS", "10")?,
            })
        }
        _ => None,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        geosearch_url,
        geosearch_timeout_secs,
        user_agent,
        assistant,
    })
}

fn parse_environment(raw: &str) -> Environment {
    match raw.to_ascii_lowercase().as_str() {
        "test" => Environment::Test,
        "production" | "prod" => Environment::Production,
        _ => Environment::Development,
    }
}
