//! Configuration types for the HCP client.
//!
//! This module provides the `HcpConfig` type for configuring the HCP client:
//! the namespace REST endpoint, the pre-built Authorization value, the
//! write-target prefix, the upload buffer size, and transport settings.

use crate::error::{ConfigurationError, HcpError, RequestError};
use crate::types::ObjectRequest;
use secrecy::SecretString;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Default upload buffer size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Configuration for the HCP client.
#[derive(Clone)]
pub struct HcpConfig {
    /// Namespace REST endpoint, e.g. `https://ns.tenant.hcp.example.com/rest`.
    pub rest_url: Url,

    /// Pre-built Authorization header value.
    pub authorization: SecretString,

    /// Path prefix applied to write targets. Always starts with `/`.
    pub prepend_path: String,

    /// Upload chunk size in bytes.
    pub buffer_size: usize,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Deadline for buffered requests. Streamed bodies are not bounded by it.
    pub read_timeout: Duration,

    /// Maximum idle connections kept in the pool.
    pub max_connections: usize,

    /// Idle connection timeout.
    pub idle_timeout: Duration,

    /// Verify TLS certificates.
    pub verify_ssl: bool,
}

impl std::fmt::Debug for HcpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HcpConfig")
            .field("rest_url", &self.rest_url.as_str())
            .field("prepend_path", &self.prepend_path)
            .field("buffer_size", &self.buffer_size)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("max_connections", &self.max_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("verify_ssl", &self.verify_ssl)
            // authorization omitted
            .finish_non_exhaustive()
    }
}

impl HcpConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HcpConfigBuilder {
        HcpConfigBuilder::default()
    }

    /// Build a configuration from the environment.
    pub fn from_env() -> Result<Self, HcpError> {
        HcpConfigBuilder::new().from_env().build()
    }

    fn base_url(&self) -> &str {
        self.rest_url.as_str().trim_end_matches('/')
    }

    fn join(&self, path: &str) -> Result<String, HcpError> {
        if path.is_empty() {
            return Err(RequestError::Validation {
                message: "object path must not be empty".to_string(),
            }
            .into());
        }
        if path.starts_with('/') {
            Ok(format!("{}{}", self.base_url(), path))
        } else {
            Ok(format!("{}/{}", self.base_url(), path))
        }
    }

    fn request(&self, url: String) -> ObjectRequest {
        ObjectRequest::with_secret(url, self.authorization.clone())
    }

    /// Request for the object at `path`, relative to the REST endpoint.
    pub fn object_request(&self, path: &str) -> Result<ObjectRequest, HcpError> {
        Ok(self.request(self.join(path)?))
    }

    /// Request for the directory at `path`. A trailing `/` is ensured.
    pub fn directory_request(&self, path: &str) -> Result<ObjectRequest, HcpError> {
        Ok(self.object_request(path)?.as_directory())
    }

    /// Request for a write target: `prepend_path` is applied before `path`.
    ///
    /// A `/` separates the prefix from the path only when neither supplies
    /// one; when both do, one is dropped.
    pub fn target_request(&self, path: &str) -> Result<ObjectRequest, HcpError> {
        if path.is_empty() {
            return Err(RequestError::Validation {
                message: "target path must not be empty".to_string(),
            }
            .into());
        }

        let prefix = &self.prepend_path;
        let target = match (prefix.ends_with('/'), path.starts_with('/')) {
            (false, false) => format!("{}/{}", prefix, path),
            (true, true) => format!("{}{}", prefix, &path[1..]),
            _ => format!("{}{}", prefix, path),
        };
        Ok(self.request(format!("{}{}", self.base_url(), target)))
    }
}

fn normalize_prepend_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Builder for HCP configuration.
#[derive(Default)]
pub struct HcpConfigBuilder {
    rest_url: Option<Url>,
    authorization: Option<SecretString>,
    prepend_path: Option<String>,
    buffer_size: Option<usize>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    max_connections: Option<usize>,
    idle_timeout: Option<Duration>,
    verify_ssl: Option<bool>,
}

impl HcpConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace REST endpoint.
    pub fn rest_url(mut self, rest_url: impl Into<String>) -> Result<Self, HcpError> {
        let url_str = rest_url.into();
        let url = Url::parse(&url_str).map_err(|e| {
            HcpError::Configuration(ConfigurationError::InvalidRestUrl {
                url: url_str,
                details: e.to_string(),
            })
        })?;
        self.rest_url = Some(url);
        Ok(self)
    }

    /// Set the namespace REST endpoint (infallible version).
    pub fn rest_url_parsed(mut self, rest_url: Url) -> Self {
        self.rest_url = Some(rest_url);
        self
    }

    /// Set the Authorization header value.
    pub fn authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(SecretString::new(authorization.into()));
        self
    }

    /// Set the write-target prefix.
    pub fn prepend_path(mut self, path: impl Into<String>) -> Self {
        self.prepend_path = Some(path.into());
        self
    }

    /// Set the upload buffer size.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections in the pool.
    pub fn max_connections(mut self, connections: usize) -> Self {
        self.max_connections = Some(connections);
        self
    }

    /// Set the idle connection timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Enable or disable TLS verification.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        if let Ok(url) = std::env::var("HCP_REST_URL") {
            match Url::parse(&url) {
                Ok(url) => self.rest_url = Some(url),
                Err(e) => warn!(url = %url, error = %e, "Ignoring invalid HCP_REST_URL"),
            }
        }
        if let Ok(auth) = std::env::var("HCP_AUTHORIZATION") {
            self.authorization = Some(SecretString::new(auth));
        }
        if let Ok(path) = std::env::var("HCP_PREPEND_PATH") {
            self.prepend_path = Some(path);
        }
        if let Ok(val) = std::env::var("HCP_BUFFER_SIZE") {
            match val.parse() {
                Ok(size) => self.buffer_size = Some(size),
                Err(_) => warn!(value = %val, "Ignoring unparsable HCP_BUFFER_SIZE"),
            }
        }
        if let Ok(val) = std::env::var("HCP_VERIFY_SSL") {
            self.verify_ssl = Some(val.eq_ignore_ascii_case("true"));
        }
        if let Ok(val) = std::env::var("HCP_TIMEOUT_MS") {
            match val.parse() {
                Ok(ms) => self.read_timeout = Some(Duration::from_millis(ms)),
                Err(_) => warn!(value = %val, "Ignoring unparsable HCP_TIMEOUT_MS"),
            }
        }

        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<HcpConfig, HcpError> {
        let rest_url = self
            .rest_url
            .ok_or(HcpError::Configuration(ConfigurationError::MissingRestUrl))?;

        if rest_url.cannot_be_a_base() || !matches!(rest_url.scheme(), "http" | "https") {
            return Err(HcpError::Configuration(ConfigurationError::InvalidRestUrl {
                url: rest_url.to_string(),
                details: "REST URL must be an http or https URL".to_string(),
            }));
        }

        let buffer_size = self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        if buffer_size == 0 {
            return Err(HcpError::Configuration(
                ConfigurationError::InvalidConfiguration {
                    field: "buffer_size".to_string(),
                    message: "Buffer size must be greater than zero".to_string(),
                },
            ));
        }

        Ok(HcpConfig {
            rest_url,
            authorization: self
                .authorization
                .unwrap_or_else(|| SecretString::new(String::new())),
            prepend_path: normalize_prepend_path(self.prepend_path.as_deref().unwrap_or("/")),
            buffer_size,
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(10)),
            read_timeout: self.read_timeout.unwrap_or(Duration::from_secs(60)),
            max_connections: self.max_connections.unwrap_or(32),
            idle_timeout: self.idle_timeout.unwrap_or(Duration::from_secs(90)),
            verify_ssl: self.verify_ssl.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prepend: &str) -> HcpConfig {
        HcpConfig::builder()
            .rest_url("https://ns1.tenant.hcp.example.com/rest/")
            .unwrap()
            .authorization("HCP dXNlcg==:abc")
            .prepend_path(prepend)
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config("/");
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(config.prepend_path, "/");
        assert!(config.verify_ssl);
    }

    #[test]
    fn test_missing_rest_url() {
        let err = HcpConfig::builder().build().unwrap_err();
        assert!(matches!(
            err,
            HcpError::Configuration(ConfigurationError::MissingRestUrl)
        ));
    }

    #[test]
    fn test_invalid_rest_url() {
        assert!(HcpConfig::builder().rest_url("not a url").is_err());
        assert!(HcpConfig::builder()
            .rest_url("mailto:someone@example.com")
            .unwrap()
            .build()
            .is_err());
    }

    #[test]
    fn test_zero_buffer_size_rejected() {
        let result = HcpConfig::builder()
            .rest_url("https://h/rest")
            .unwrap()
            .buffer_size(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_omits_authorization() {
        let debug = format!("{:?}", config("/"));
        assert!(!debug.contains("dXNlcg"));
        assert!(debug.contains("rest_url"));
    }

    #[test]
    fn test_object_and_directory_requests() {
        let config = config("/");
        assert_eq!(
            config.object_request("docs/a.txt").unwrap().url,
            "https://ns1.tenant.hcp.example.com/rest/docs/a.txt"
        );
        assert_eq!(
            config.object_request("/docs/a.txt").unwrap().url,
            "https://ns1.tenant.hcp.example.com/rest/docs/a.txt"
        );
        assert_eq!(
            config.directory_request("/docs").unwrap().url,
            "https://ns1.tenant.hcp.example.com/rest/docs/"
        );
        assert!(config.object_request("").is_err());
    }

    #[test]
    fn test_target_request_joins_prefix() {
        let base = "https://ns1.tenant.hcp.example.com/rest";
        assert_eq!(config("uploads").prepend_path, "/uploads");
        assert_eq!(
            config("uploads").target_request("a.txt").unwrap().url,
            format!("{}/uploads/a.txt", base)
        );
        assert_eq!(
            config("/uploads/").target_request("a.txt").unwrap().url,
            format!("{}/uploads/a.txt", base)
        );
        assert_eq!(
            config("/uploads").target_request("/a.txt").unwrap().url,
            format!("{}/uploads/a.txt", base)
        );
        assert_eq!(
            config("/").target_request("/a.txt").unwrap().url,
            format!("{}/a.txt", base)
        );
        assert!(config("/").target_request("").is_err());
    }
}
