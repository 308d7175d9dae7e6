//! Configuration validation.
//!
//! Semantic checks on top of what serde already enforces. Returns all
//! violations, not just the first, so a broken config is fixable in one
//! pass. Runs before the config is accepted into the system.

use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic violation.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("not a valid socket address: {:?}", config.listener.bind_address),
        });
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "listener.request_timeout_secs",
            message: "must be at least 1".to_string(),
        });
    }

    if config.database.url.is_empty() {
        errors.push(ValidationError {
            field: "database.url",
            message: "not set (provide DATABASE_URL or a [database] url)".to_string(),
        });
    }

    if config.database.pool_size == 0 {
        errors.push(ValidationError {
            field: "database.pool_size",
            message: "must be at least 1".to_string(),
        });
    }

    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError {
            field: "rate_limit.max_requests",
            message: "must be at least 1".to_string(),
        });
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError {
            field: "rate_limit.window_secs",
            message: "must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.database.url = "postgres://localhost:5432/analytics".to_string();
        config
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_missing_database_url() {
        let config = GatewayConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "database.url"));
    }

    #[test]
    fn rejects_zero_limits() {
        let mut config = valid_config();
        config.rate_limit.max_requests = 0;
        config.rate_limit.window_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejects_bad_bind_address() {
        let mut config = valid_config();
        config.listener.bind_address = "not-an-address".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "listener.bind_address"));
    }
}
