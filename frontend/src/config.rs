use serde::{Deserialize, Serialize};
use std::{sync::OnceLock, time::Duration};
use thiserror::Error;

use crate::api::PathStrategy;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Raw, unvalidated deployment configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default, alias = "API_BASE_URL")]
    pub api_base_url: Option<String>,
    #[serde(default, alias = "API_PREFIX")]
    pub api_prefix: Option<String>,
    #[serde(default, alias = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub path_strategy: PathStrategy,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("backend origin is not configured (set API_BASE_URL in env.js or config.json)")]
    MissingBaseUrl,
    #[error("backend origin `{0}` must start with http:// or https://")]
    InvalidBaseUrl(String),
    #[error("API prefix `{0}` must be empty or start with `/`")]
    InvalidPrefix(String),
}

impl RuntimeConfig {
    /// Fills fields this config leaves unset from `other`.
    pub fn or(self, other: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            api_base_url: self.api_base_url.or(other.api_base_url),
            api_prefix: self.api_prefix.or(other.api_prefix),
            request_timeout_ms: self.request_timeout_ms.or(other.request_timeout_ms),
        }
    }

    pub fn validate(&self) -> Result<AppConfig, ConfigError> {
        let base = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base.to_string()));
        }
        let api_base_url = base.trim_end_matches('/').to_string();

        let path_strategy = match self.api_prefix.as_deref().map(str::trim) {
            None => PathStrategy::Probe,
            Some(prefix) if prefix.is_empty() || prefix == "/" => {
                PathStrategy::Fixed(String::new())
            }
            Some(prefix) if prefix.starts_with('/') => {
                PathStrategy::Fixed(prefix.trim_end_matches('/').to_string())
            }
            Some(prefix) => return Err(ConfigError::InvalidPrefix(prefix.to_string())),
        };

        let request_timeout = self
            .request_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(AppConfig {
            api_base_url,
            path_strategy,
            request_timeout,
        })
    }
}

static APP_CONFIG: OnceLock<Result<AppConfig, ConfigError>> = OnceLock::new();

fn read_global_object(name: &str) -> Option<RuntimeConfig> {
    let w = web_sys::window()?;
    let any = js_sys::Reflect::get(&w, &name.into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    let field = |upper: &str, lower: &str| {
        js_sys::Reflect::get(&any, &upper.into())
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
            .or_else(|| js_sys::Reflect::get(&any, &lower.into()).ok())
            .filter(|v| !v.is_undefined() && !v.is_null())
    };
    Some(RuntimeConfig {
        api_base_url: field("API_BASE_URL", "api_base_url").and_then(|v| v.as_string()),
        api_prefix: field("API_PREFIX", "api_prefix").and_then(|v| v.as_string()),
        request_timeout_ms: field("REQUEST_TIMEOUT_MS", "request_timeout_ms")
            .and_then(|v| v.as_f64())
            .filter(|ms| *ms > 0.0)
            .map(|ms| ms as u64),
    })
}

fn from_build_env() -> RuntimeConfig {
    RuntimeConfig {
        api_base_url: option_env!("TEAMDESK_API_URL").map(str::to_string),
        api_prefix: option_env!("TEAMDESK_API_PREFIX").map(str::to_string),
        request_timeout_ms: None,
    }
}

async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    let origin = web_sys::window()?.location().origin().ok()?;
    let resp = reqwest::get(format!("{}/config.json", origin)).await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<RuntimeConfig>().await.ok()
}

/// Resolves the configuration once: `window.__TEAMDESK_ENV` (env.js), then
/// `./config.json`, then build-time environment.
pub async fn init() -> Result<AppConfig, ConfigError> {
    if let Some(resolved) = APP_CONFIG.get() {
        return resolved.clone();
    }
    let mut raw = read_global_object("__TEAMDESK_ENV").unwrap_or_default();
    if raw.api_base_url.is_none() {
        if let Some(fetched) = fetch_runtime_config().await {
            raw = raw.or(fetched);
        }
    }
    let raw = raw.or(from_build_env());
    let resolved = raw.validate();
    match &resolved {
        Ok(cfg) => log::info!(
            "backend origin {} ({:?})",
            cfg.api_base_url,
            cfg.path_strategy
        ),
        Err(err) => log::error!("configuration error: {}", err),
    }
    APP_CONFIG.get_or_init(|| resolved).clone()
}

pub fn current() -> Option<AppConfig> {
    APP_CONFIG.get().and_then(|r| r.as_ref().ok()).cloned()
}

/// Absolute URL for a backend-relative asset such as an uploaded avatar.
pub fn resolve_asset_url(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}
