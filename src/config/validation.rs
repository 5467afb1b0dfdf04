//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (parsing handles syntax)
//! - Upstream endpoint must be an absolute http(s) URL with a host
//! - Timeout must be non-zero so every upstream exchange is bounded
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::time::Duration;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listen address is empty")]
    EmptyListenAddr,
    #[error("upstream endpoint {endpoint:?} is not a valid URL: {reason}")]
    InvalidUpstream { endpoint: String, reason: String },
    #[error("upstream endpoint {endpoint:?} must use http or https, got {scheme:?}")]
    UnsupportedScheme { endpoint: String, scheme: String },
    #[error("request timeout must be greater than zero; 0 would leave the upstream exchange unbounded")]
    ZeroTimeout,
}

/// Check the loaded configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listen_addr.trim().is_empty() {
        errors.push(ValidationError::EmptyListenAddr);
    }

    if let Err(e) = validate_upstream(&config.upstream_endpoint) {
        errors.push(e);
    }

    if config.request_timeout == Duration::ZERO {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream(endpoint: &str) -> Result<(), ValidationError> {
    let url = Url::parse(endpoint).map_err(|e| ValidationError::InvalidUpstream {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::UnsupportedScheme {
                endpoint: endpoint.to_string(),
                scheme: other.to_string(),
            })
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidUpstream {
            endpoint: endpoint.to_string(),
            reason: "missing host".to_string(),
        });
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ValidationError::InvalidUpstream {
            endpoint: endpoint.to_string(),
            reason: "query and fragment are not allowed in the base URL".to_string(),
        });
    }

    Ok(())
}
