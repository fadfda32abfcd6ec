use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::sites::{SupportedSites, DEFAULT_SUPPORTED_SITES};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let origin = or_default("MOTOPARSE_ORIGIN", "http://localhost:5000");
    if !origin.starts_with("http://") && !origin.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "MOTOPARSE_ORIGIN".to_string(),
            reason: format!("expected an http(s) origin, got \"{origin}\""),
        });
    }

    let api_url = or_default("MOTOPARSE_API_URL", "/api");
    let data_dir = PathBuf::from(or_default("MOTOPARSE_DATA_DIR", "./.motoparse"));
    let cache_namespace = or_default("MOTOPARSE_CACHE_NAMESPACE", "");
    let supported_sites = SupportedSites::parse(
        "MOTOPARSE_SUPPORTED_SITES",
        &or_default("MOTOPARSE_SUPPORTED_SITES", DEFAULT_SUPPORTED_SITES),
    )?;

    let history_limit = parse_usize("MOTOPARSE_HISTORY_LIMIT", "10")?;
    if history_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "MOTOPARSE_HISTORY_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let request_timeout_secs = parse_u64("MOTOPARSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MOTOPARSE_USER_AGENT", "motoparse/0.1");
    let log_level = or_default("MOTOPARSE_LOG_LEVEL", "info");

    Ok(AppConfig {
        origin,
        api_url,
        data_dir,
        cache_namespace,
        supported_sites,
        history_limit,
        request_timeout_secs,
        user_agent,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
