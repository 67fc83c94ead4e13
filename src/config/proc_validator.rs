//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * settings: logging level, server address, metrics path, timeout
//!   * token store path
//!   * authorization server block and its use by endpoints
//!   * search endpoint url, method, auth scheme prerequisites, headers

use http::{HeaderName, Method};
use tracing::{error, info};

use crate::auth::credentials::AuthScheme;
use crate::config::service::{AuthorizationConfig, SearchConfig, ServiceConfig, TokenStoreConfig};
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::get_metrics;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_token_store(&cfg.token_store, &mut errors);
    if let Some(authorization) = &cfg.authorization {
        validate_authorization(authorization, &mut errors);
    }
    validate_search(&cfg.search, cfg.authorization.is_some(), &mut errors);

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        let metrics = get_metrics().await;
        for e in &errors {
            error!("config: {}", e);
            metrics.config_validation_errors.inc();
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' is not one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }

    if settings.http_timeout_ms == Some(0) {
        errors.push("settings.http_timeout_ms must be greater than 0".to_string());
    }

    if !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }

    if let Some(server) = &settings.server {
        if server.host.trim().is_empty() {
            errors.push("settings.server.host is empty".to_string());
        }
        if server.port.parse::<u16>().is_err() {
            errors.push(format!("settings.server.port '{}' is not a valid port", server.port));
        }
    }
}

fn validate_token_store(token_store: &TokenStoreConfig, errors: &mut Vec<String>) {
    if token_store.path.trim().is_empty() {
        errors.push("token_store.path is empty".to_string());
    }
}

fn validate_authorization(authorization: &AuthorizationConfig, errors: &mut Vec<String>) {
    validate_url("authorization.url", &authorization.url, errors);
    if authorization.username.as_deref().unwrap_or("").is_empty() {
        errors.push("authorization.username is required for the Basic-authenticated token request".to_string());
    }
}

fn validate_search(search: &SearchConfig, has_authorization: bool, errors: &mut Vec<String>) {
    validate_url("search.url", &search.url, errors);

    if search.method != Method::GET && search.method != Method::POST {
        errors.push(format!("search.method '{}' must be GET or POST", search.method));
    }

    match search.auth {
        AuthScheme::OAuth2 if !has_authorization => {
            errors.push("search.auth is 'oauth2' but no 'authorization' block is configured".to_string());
        }
        AuthScheme::Basic if search.username.is_none() => {
            errors.push("search.auth is 'basic' but search.username is missing".to_string());
        }
        _ => {}
    }

    if let Some(headers) = &search.headers {
        for name in headers.keys() {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                errors.push(format!("search.headers['{}'] is not a valid header name", name));
            }
        }
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if url.trim().is_empty() {
        errors.push(format!("{} is empty", field));
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("{} '{}' must start with http:// or https://", field, url));
    }
}
