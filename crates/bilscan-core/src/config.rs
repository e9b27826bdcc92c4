use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "nb-NO,nb;q=0.9,en-US;q=0.8,en;q=0.7";
pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://www.vegvesen.no/ws/no/vegvesen/kjoretoy/felles/datautlevering/enkeltoppslag/kjoretoydata";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
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
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values fail. Decoupled
/// from the real environment so it can be tested with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let bind_addr = or_default("BILSCAN_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("BILSCAN_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("BILSCAN_LOG_LEVEL", "info");
    let user_agent = or_default("BILSCAN_USER_AGENT", DEFAULT_USER_AGENT);
    let accept_language = or_default("BILSCAN_ACCEPT_LANGUAGE", DEFAULT_ACCEPT_LANGUAGE);

    let max_workers = parse_positive("BILSCAN_MAX_WORKERS", "10")?;
    let default_max_results = parse_positive("BILSCAN_DEFAULT_MAX_RESULTS", "200")?;

    let search_timeout_secs = parse_u64("BILSCAN_SEARCH_TIMEOUT_SECS", "15")?;
    let detail_timeout_secs = parse_u64("BILSCAN_DETAIL_TIMEOUT_SECS", "10")?;
    let registry_timeout_secs = parse_u64("BILSCAN_REGISTRY_TIMEOUT_SECS", "10")?;

    let registry_base_url = or_default("BILSCAN_REGISTRY_BASE_URL", DEFAULT_REGISTRY_BASE_URL);
    let registry_api_key = lookup("BILSCAN_REGISTRY_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    let session_ttl_secs = parse_u64("BILSCAN_SESSION_TTL_SECS", "3600")?;

    Ok(AppConfig {
        bind_addr,
        log_level,
        user_agent,
        accept_language,
        max_workers,
        default_max_results,
        search_timeout_secs,
        detail_timeout_secs,
        registry_timeout_secs,
        registry_base_url,
        registry_api_key,
        session_ttl_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
