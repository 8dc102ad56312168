use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{rc::Rc, time::Duration};
use thiserror::Error;

use crate::{
    api::types::ApiError,
    config::{self, DEFAULT_REQUEST_TIMEOUT},
    state::session::SessionStore,
};

pub const NETWORK_ERROR: &str = "Network error";

/// How backend paths map onto absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStrategy {
    /// `{base}/api{path}` first, then `{base}{path}`.
    Probe,
    /// A single `{base}{prefix}{path}` candidate.
    Fixed(String),
}

impl PathStrategy {
    pub fn candidates(&self, base: &str, path: &str) -> Vec<String> {
        let base = base.trim_end_matches('/');
        let path = normalize_path(path);
        match self {
            PathStrategy::Probe => vec![format!("{}/api{}", base, path), format!("{}{}", base, path)],
            PathStrategy::Fixed(prefix) => vec![format!("{}{}{}", base, prefix, path)],
        }
    }
}

pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartField {
    pub name: String,
    pub file_name: Option<String>,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<MultipartField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    /// Send without the session's bearer token.
    pub anonymous: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: RequestBody::Empty,
            anonymous: false,
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json(method: Method, body: Value) -> Self {
        Self {
            method,
            body: RequestBody::Json(body),
            ..Self::default()
        }
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// One attempt against one candidate URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request could not be built: {0}")]
    Build(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Sends a single request and reports the raw outcome. An `Err` means no
/// response was obtained at all.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn build(&self, request: PreparedRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Multipart(fields) => {
                let mut form = reqwest::multipart::Form::new();
                for field in fields {
                    let mut part = reqwest::multipart::Part::bytes(field.bytes);
                    if let Some(file_name) = field.file_name {
                        part = part.file_name(file_name);
                    }
                    if let Some(mime) = field.mime {
                        part = part
                            .mime_str(&mime)
                            .map_err(|e| TransportError::Build(e.to_string()))?;
                    }
                    form = form.part(field.name, part);
                }
                builder.multipart(form)
            }
        };
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(request.timeout);
        }
        Ok(builder)
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        let timeout = request.timeout;
        let builder = self.build(request)?;
        let response = with_deadline(builder.send(), timeout)
            .await?
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(timeout)
                } else {
                    TransportError::Connect(e.to_string())
                }
            })?;
        let status = response.status().as_u16();
        // A body that cannot be read still counts as a response.
        let body = response.text().await.unwrap_or_default();
        Ok(RawResponse { status, body })
    }
}

#[cfg(target_arch = "wasm32")]
async fn with_deadline<F: std::future::Future>(
    fut: F,
    timeout: Duration,
) -> Result<F::Output, TransportError> {
    use futures::future::{select, Either};

    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    let timer = gloo_timers::future::TimeoutFuture::new(millis);
    futures::pin_mut!(fut);
    match select(fut, timer).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(_) => Err(TransportError::Timeout(timeout)),
    }
}

// Native clients enforce the deadline through `RequestBuilder::timeout`.
#[cfg(not(target_arch = "wasm32"))]
async fn with_deadline<F: std::future::Future>(
    fut: F,
    _timeout: Duration,
) -> Result<F::Output, TransportError> {
    Ok(fut.await)
}

/// Uniform envelope returned by every backend call.
///
/// `success` implies a payload is present; a failure always carries an
/// error message. Construct through [`ApiResult::ok`] and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResult {
    pub fn ok(status: u16, data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            status: Some(status),
            error: None,
        }
    }

    pub fn http_error(status: u16, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            status: Some(status),
            error: Some(error.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            status: None,
            error: Some(error.into()),
        }
    }

    pub fn network_error() -> Self {
        Self::failure(NETWORK_ERROR)
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Top-level field of the payload, so callers can read `token` or
    /// `teamId` without going through `data`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|d| d.get(field))
    }

    pub fn into_result(self) -> Result<Value, ApiError> {
        if self.success {
            Ok(self.data.unwrap_or_else(|| Value::Object(Map::new())))
        } else {
            let message = self.error.unwrap_or_else(|| NETWORK_ERROR.to_string());
            Err(match self.status {
                Some(status) => ApiError::http(status, message),
                None if message == NETWORK_ERROR => ApiError::network(),
                None => ApiError::request_failed(message),
            })
        }
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = self.into_result()?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::unknown(format!("Failed to parse response: {}", e)))
    }
}

/// Turns a received response into an [`ApiResult`]. Non-JSON bodies are
/// treated as an empty object.
pub fn interpret(raw: RawResponse) -> ApiResult {
    let parsed = if raw.body.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(&raw.body).ok()
    };
    if (200..300).contains(&raw.status) {
        return ApiResult::ok(raw.status, parsed.unwrap_or_else(|| Value::Object(Map::new())));
    }
    let message = parsed
        .as_ref()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .or_else(|| v.get("error").and_then(Value::as_str))
        })
        .map(str::to_string)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| Some(raw.body.trim().to_string()).filter(|b| !b.is_empty()))
        .or_else(|| {
            StatusCode::from_u16(raw.status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {}", raw.status));
    ApiResult::http_error(raw.status, message)
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    base_url: Option<String>,
    strategy: Option<PathStrategy>,
    timeout: Option<Duration>,
    session: Option<SessionStore>,
    on_unauthorized: Option<Rc<dyn Fn()>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("strategy", &self.strategy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Client that reads origin, path strategy and deadline from the
    /// resolved [`config::AppConfig`] on every call.
    pub fn new() -> Self {
        Self {
            transport: Rc::new(ReqwestTransport::new()),
            base_url: None,
            strategy: None,
            timeout: None,
            session: None,
            on_unauthorized: None,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::new()
        }
    }

    pub fn from_config(cfg: &config::AppConfig) -> Self {
        Self::new_with_base_url(cfg.api_base_url.clone())
            .with_strategy(cfg.path_strategy.clone())
            .with_timeout(cfg.request_timeout)
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Rc::new(transport);
        self
    }

    pub fn with_strategy(mut self, strategy: PathStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches the session whose token authorizes requests and which is
    /// cleared when an authorized request comes back 401.
    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    pub fn on_unauthorized(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_unauthorized = Some(Rc::new(hook));
        self
    }

    pub fn session(&self) -> Option<&SessionStore> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> Option<String> {
        self.base_url
            .clone()
            .or_else(|| config::current().map(|cfg| cfg.api_base_url))
    }

    fn strategy(&self) -> PathStrategy {
        self.strategy
            .clone()
            .or_else(|| config::current().map(|cfg| cfg.path_strategy))
            .unwrap_or(PathStrategy::Probe)
    }

    fn timeout(&self) -> Duration {
        self.timeout
            .or_else(|| config::current().map(|cfg| cfg.request_timeout))
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    fn merged_headers(&self, options: &RequestOptions) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = Vec::new();
        if !matches!(options.body, RequestBody::Multipart(_)) {
            headers.push(("Content-Type".into(), "application/json".into()));
        }
        for (name, value) in &options.headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        let has_auth = headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("authorization"));
        if !has_auth && !options.anonymous {
            if let Some(token) = self.session.as_ref().and_then(SessionStore::token) {
                headers.push(("Authorization".into(), format!("Bearer {}", token)));
            }
        }
        headers
    }

    fn handle_unauthorized(&self) {
        warn!("authorized request rejected with 401; clearing session");
        if let Some(session) = &self.session {
            session.clear();
        }
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }

    /// Issues `path` against each candidate URL in order. Never fails: every
    /// outcome is reported through the returned [`ApiResult`].
    pub async fn request(&self, path: &str, options: RequestOptions) -> ApiResult {
        let Some(base) = self.base_url() else {
            warn!("request to {} skipped: backend origin is not configured", path);
            return ApiResult::failure(config::ConfigError::MissingBaseUrl.to_string());
        };
        let headers = self.merged_headers(&options);
        let authorized = headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("authorization"));
        let timeout = self.timeout();

        for url in self.strategy().candidates(&base, path) {
            debug!("{} {}", options.method, url);
            let attempt = PreparedRequest {
                method: options.method.clone(),
                url: url.clone(),
                headers: headers.clone(),
                body: options.body.clone(),
                timeout,
            };
            match self.transport.send(attempt).await {
                Ok(raw) => {
                    let result = interpret(raw);
                    if let Some(error) = result.error() {
                        warn!("{} {} -> {:?}: {}", options.method, url, result.status(), error);
                    }
                    if authorized && result.status() == Some(401) {
                        self.handle_unauthorized();
                    }
                    return result;
                }
                Err(err @ TransportError::Timeout(_)) => {
                    // The server may already have acted on the request.
                    warn!("{} {} {}; not retrying", options.method, url, err);
                    return ApiResult::network_error();
                }
                Err(err) => warn!("{} {} unreachable ({}), trying next candidate", options.method, url, err),
            }
        }
        ApiResult::network_error()
    }

    pub async fn get(&self, path: &str) -> ApiResult {
        self.request(path, RequestOptions::new(Method::GET)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult {
        self.request(path, RequestOptions::new(Method::DELETE)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> ApiResult {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> ApiResult {
        self.send_json(Method::PUT, path, body).await
    }

    pub async fn patch_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> ApiResult {
        self.send_json(Method::PATCH, path, body).await
    }

    pub async fn upload(&self, path: &str, fields: Vec<MultipartField>) -> ApiResult {
        let options = RequestOptions {
            method: Method::POST,
            body: RequestBody::Multipart(fields),
            ..RequestOptions::default()
        };
        self.request(path, options).await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> ApiResult {
        match serde_json::to_value(body) {
            Ok(value) => self.request(path, RequestOptions::json(method, value)).await,
            Err(err) => ApiResult::failure(format!("Failed to encode request: {}", err)),
        }
    }
}
