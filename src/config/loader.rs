//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables naming each well-known backend, with the
/// namespace it owns.
const SERVICE_ENV: &[(&str, &str, &str)] = &[
    ("AUTH_SERVICE_URL", "auth-service", "auth"),
    ("USER_SERVICE_URL", "user-service", "users"),
    ("CHAT_SERVICE_URL", "chat-service", "chats"),
    ("EVENT_SERVICE_URL", "event-service", "events"),
    ("NOTIFICATION_SERVICE_URL", "notification-service", "notifications"),
    ("PRESENCE_SERVICE_URL", "presence-service", "presence"),
];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply process
/// environment overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values on top of a loaded configuration.
///
/// `lookup` abstracts the environment so overrides can be exercised
/// without touching process state.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }

    if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
        config.auth.jwt_secret = secret;
    }

    for (key, name, namespace) in SERVICE_ENV {
        let Some(url) = lookup(*key).filter(|u| !u.is_empty()) else {
            continue;
        };

        match config.services.iter_mut().find(|s| s.namespace == *namespace) {
            Some(existing) => existing.url = url,
            None => config
                .services
                .push(ServiceConfig::new(*name, *namespace, url)),
        }
    }
}
