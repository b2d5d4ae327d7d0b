use std::fs;
use tracing::{debug, error, info, warn};

use crate::types::server_config::{AppConfig, ConfigError};

/// Minimum accepted length of the token signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime: one year.
pub const MAX_TOKEN_EXPIRY_HOURS: u64 = 24 * 365;

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    parse_config(&contents)
}

/// Parse and validate a configuration document already in memory.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(contents)?;

    info!("Configuration loaded successfully");

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.auth.token_expiry_hours == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_expiry_hours must be greater than 0".into(),
        ));
    }

    if config.auth.token_expiry_hours > MAX_TOKEN_EXPIRY_HOURS {
        return Err(ConfigError::InvalidConfig(format!(
            "token_expiry_hours must be at most {}",
            MAX_TOKEN_EXPIRY_HOURS
        )));
    }

    if config.server.max_body_bytes == 0 {
        return Err(ConfigError::InvalidConfig(
            "max_body_bytes must be greater than 0".into(),
        ));
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "request_timeout_secs must be greater than 0".into(),
        ));
    }

    // The scoring call must always carry a finite deadline.
    if config.scoring.timeout_ms == 0 || config.scoring.connect_timeout_ms == 0 {
        return Err(ConfigError::InvalidConfig(
            "scoring timeouts must be greater than 0".into(),
        ));
    }

    let endpoint = config.scoring.endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ConfigError::InvalidConfig(
            "scoring.endpoint must be an http(s) URL".into(),
        ));
    }

    if config.database.path.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "database.path cannot be empty".into(),
        ));
    }

    if config.scoring.timeout_ms / 1000 >= config.server.request_timeout_secs {
        warn!(
            "scoring.timeout_ms ({}) is not below request_timeout_secs ({}); slow verdicts will surface as request timeouts",
            config.scoring.timeout_ms, config.server.request_timeout_secs
        );
    }

    // Resolved here so a bad secret is rejected before the listener binds
    // rather than at the first login.
    match config.auth.resolved_jwt_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be set via the JWT_SECRET env var or auth.jwt_secret config field"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < MIN_JWT_SECRET_LEN => {
            return Err(ConfigError::InvalidConfig(format!(
                "jwt_secret must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            )));
        }
        _ => {}
    }

    Ok(())
}
