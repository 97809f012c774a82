//! HTTP transport layer for HCP requests.
//!
//! This module provides the HTTP transport abstraction the operations are
//! executed over. It handles connection pooling, timeouts, and TLS
//! configuration, and returns the status code, the header multimap and the
//! body (buffered or streamed).

use crate::error::{HcpError, NetworkError};
use crate::transfer::{BodyStream, ResponseStream};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use http::HeaderMap;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// HTTP request to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add multiple headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Canonical reason phrase for a status code.
pub fn reason_phrase(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unrecognized status code {}", status))
}

/// HTTP response with a buffered body.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Reason phrase for the status code.
    pub fn reason_phrase(&self) -> String {
        reason_phrase(self.status)
    }

    /// First value of a header (case-insensitive).
    pub fn first_header(&self, name: &str) -> Option<&str> {
        crate::metadata::first_value(&self.headers, name)
    }
}

/// HTTP response whose body is still on the wire.
pub struct StreamingResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: ResponseStream,
}

impl StreamingResponse {
    /// Reason phrase for the status code.
    pub fn reason_phrase(&self) -> String {
        reason_phrase(self.status)
    }
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// HTTP transport trait for making requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and buffer the response body.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HcpError>;

    /// Send a request with a streaming body and buffer the response body.
    async fn send_streaming(
        &self,
        request: HttpRequest,
        body_stream: BodyStream,
    ) -> Result<HttpResponse, HcpError>;

    /// Send a request and return the response body as a stream.
    async fn open(&self, request: HttpRequest) -> Result<StreamingResponse, HcpError>;
}

/// Default HTTP transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
    read_timeout: Duration,
}

impl ReqwestTransport {
    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, HcpError> {
        Self::builder().build()
    }

    /// Create a transport builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    fn prepare(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, HcpError> {
        let method = request.method.parse::<reqwest::Method>().map_err(|e| {
            HcpError::Network(NetworkError::ConnectionFailed {
                message: format!("Invalid HTTP method: {}", e),
            })
        })?;

        let mut req_builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }
        Ok(req_builder)
    }

    fn map_error(&self, e: reqwest::Error) -> HcpError {
        if e.is_timeout() {
            HcpError::Network(NetworkError::Timeout {
                duration: self.read_timeout,
            })
        } else {
            HcpError::Network(NetworkError::ConnectionFailed {
                message: e.to_string(),
            })
        }
    }

    async fn buffer(&self, response: reqwest::Response) -> Result<HttpResponse, HcpError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            HcpError::Network(NetworkError::ConnectionFailed {
                message: format!("Failed to read response body: {}", e),
            })
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HcpError> {
        let mut req_builder = self.prepare(&request)?.timeout(self.read_timeout);
        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(|e| self.map_error(e))?;
        self.buffer(response).await
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
        body_stream: BodyStream,
    ) -> Result<HttpResponse, HcpError> {
        let req_builder = self
            .prepare(&request)?
            .body(reqwest::Body::wrap_stream(body_stream));

        let response = req_builder.send().await.map_err(|e| self.map_error(e))?;
        self.buffer(response).await
    }

    async fn open(&self, request: HttpRequest) -> Result<StreamingResponse, HcpError> {
        let mut req_builder = self.prepare(&request)?;
        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
            .boxed();

        Ok(StreamingResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

/// Builder for reqwest transport.
pub struct ReqwestTransportBuilder {
    connect_timeout: Duration,
    read_timeout: Duration,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Option<Duration>,
    verify_ssl: bool,
    user_agent: String,
}

impl ReqwestTransportBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
            pool_max_idle_per_host: 32,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            verify_ssl: true,
            user_agent: format!("hcp-integration/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the deadline for buffered requests.
    ///
    /// It covers the whole exchange, so it applies to `send` only. Streamed
    /// uploads and downloads are bounded by the connect timeout alone.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set the idle connection timeout.
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set whether to verify TLS certificates. HCP clusters commonly run with
    /// self-signed certificates.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport, HcpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .danger_accept_invalid_certs(!self.verify_ssl)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| {
                HcpError::Network(NetworkError::TlsError {
                    message: e.to_string(),
                })
            })?;

        Ok(ReqwestTransport {
            client,
            read_timeout: self.read_timeout,
        })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
