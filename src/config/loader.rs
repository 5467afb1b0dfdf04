//! Configuration loading from the process environment.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::duration::{parse_duration, DurationError};
use crate::config::schema::{self, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse {var}={value:?}: {source}")]
    Duration {
        var: &'static str,
        value: String,
        #[source]
        source: DurationError,
    },
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Load and validate configuration from an arbitrary variable lookup.
pub fn load_with<F>(lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Unset and empty are the same thing.
    let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
    let defaults = ProxyConfig::default();

    let timeout_raw = get(schema::REQUEST_TIMEOUT_DURATION)
        .unwrap_or_else(|| schema::DEFAULT_REQUEST_TIMEOUT.to_string());
    let request_timeout = parse_duration(&timeout_raw).map_err(|source| ConfigError::Duration {
        var: schema::REQUEST_TIMEOUT_DURATION,
        value: timeout_raw.clone(),
        source,
    })?;

    let upstream_endpoint = get(schema::UPSTREAM_ENDPOINT)
        .unwrap_or(defaults.upstream_endpoint)
        .trim_end_matches('/')
        .to_string();

    let config = ProxyConfig {
        listen_addr: get(schema::LISTEN_ADDR).unwrap_or(defaults.listen_addr),
        upstream_endpoint,
        allowed_paths: split_by_comma(get(schema::UPSTREAM_ALLOW_PATHS).as_deref()),
        allowed_methods: split_by_comma(get(schema::ALLOWED_METHODS).as_deref()),
        ca_cert_path: get(schema::CA_CERT_PATH).map(PathBuf::from),
        request_timeout,
        shutdown_grace: defaults.shutdown_grace,
        metrics_addr: get(schema::METRICS_ADDR),
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Split a comma-separated list into a set of trimmed, non-empty entries.
pub fn split_by_comma(value: Option<&str>) -> HashSet<String> {
    value
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
