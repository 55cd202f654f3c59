//! Client handle carrying validated per-request defaults.
//!
//! # Design
//! `Client` is built once from a `ClientConfig` and passed to whoever needs
//! to make requests; there is no process-wide instance. Construction is the
//! only place configuration can fail. After that the client is immutable,
//! holds no connection, and can be shared across threads freely. Every call
//! still dials its own socket through `transport::fetch`.

use serde::Deserialize;

use crate::error::{ConfigError, FetchError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport;

/// Headers added to every request unless the request already sets them.
///
/// Deserializable so a host application can keep it in a config file:
///
/// ```
/// let config: wirefetch_core::ClientConfig = serde_json::from_str(
///     r#"{"user_agent": "weather/1.0", "default_headers": [["Accept", "application/json"]]}"#,
/// ).unwrap();
/// assert_eq!(config.user_agent.as_deref(), Some("weather/1.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Sent as `User-Agent`; `None` sends no user agent.
    pub user_agent: Option<String>,
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: Some(format!("wirefetch/{}", env!("CARGO_PKG_VERSION"))),
            default_headers: vec![("Accept".to_string(), "*/*".to_string())],
        }
    }
}

impl ClientConfig {
    /// Reject names and values that would corrupt the header block.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(agent) = &self.user_agent {
            check_header("User-Agent", agent)?;
        }
        for (name, value) in &self.default_headers {
            check_header(name, value)?;
        }
        Ok(())
    }
}

fn check_header(name: &str, value: &str) -> Result<(), ConfigError> {
    let bad_name = name.is_empty()
        || name
            .chars()
            .any(|c| c == ':' || c.is_whitespace() || c.is_control());
    if bad_name {
        return Err(ConfigError::InvalidHeaderName(name.to_string()));
    }
    if value.contains(['\r', '\n']) {
        return Err(ConfigError::InvalidHeaderValue {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Plain-HTTP client. Each call opens, uses and closes one TCP connection.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    /// Build a client, failing if `config` holds an unusable header.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET url` with the configured defaults.
    pub fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.fetch(HttpRequest::get(url))
    }

    /// Send `request` after filling in any default header it does not set.
    pub fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        transport::fetch(&self.prepare(request))
    }

    /// The request as it will be sent: caller headers first, then defaults.
    pub fn prepare(&self, mut request: HttpRequest) -> HttpRequest {
        let mut defaults = Vec::new();
        if let Some(agent) = &self.config.user_agent {
            defaults.push(("User-Agent".to_string(), agent.clone()));
        }
        defaults.extend(self.config.default_headers.iter().cloned());

        for (name, value) in defaults {
            if !request.has_header(&name) {
                request.headers.push((name, value));
            }
        }
        request
    }
}
