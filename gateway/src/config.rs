//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to the legacy variable names used by older Aqman deployments
//! (`SERVER_PORT`, `LOG_FILE_LOCATION`, `DATABASE_URL`).

use aqman_gateway_common::config::GatewayConfig;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use aqman_gateway::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("AQMAN_PORT", "SERVER_PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
/// A value that fails to parse is logged as a warning.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|raw| parse_env_value(new_name, &raw))
        .unwrap_or(default)
}

fn parse_env_value<T: std::str::FromStr>(name: &str, raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(
                variable = name,
                value = raw,
                "Invalid environment variable value, using default"
            );
            None
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve only the log file path (`AQMAN_LOG_FILE`, then `LOG_FILE_LOCATION`).
///
/// Used before the subscriber is installed, so it never logs.
pub fn log_file_from_env() -> Option<String> {
    non_empty_env("AQMAN_LOG_FILE").or_else(|| non_empty_env("LOG_FILE_LOCATION"))
}

/// Load the gateway configuration from environment variables.
///
/// Empty values are treated as unset. Call after logging is initialised so
/// deprecation and parse warnings are emitted.
pub fn gateway_config_from_env() -> GatewayConfig {
    let defaults = GatewayConfig::default();

    let host = non_empty_env("AQMAN_HOST").unwrap_or(defaults.host);
    let port = get_env_with_fallback_parse("AQMAN_PORT", "SERVER_PORT", defaults.port);
    let database_url = get_env_with_fallback("AQMAN_DATABASE_URL", "DATABASE_URL")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(defaults.database_url);
    let log_file = get_env_with_fallback("AQMAN_LOG_FILE", "LOG_FILE_LOCATION")
        .filter(|v| !v.trim().is_empty());
    let device_timeout_secs = std::env::var("AQMAN_DEVICE_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| parse_env_value("AQMAN_DEVICE_TIMEOUT_SECS", &raw))
        .unwrap_or(defaults.device_timeout_secs);

    GatewayConfig {
        host,
        port,
        database_url,
        log_file,
        device_timeout_secs,
    }
}
