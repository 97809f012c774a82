//! Mock HTTP transport for testing.

use crate::error::{HcpError, NetworkError, TransferError};
use crate::transfer::{BodyStream, ResponseStream};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, StreamingResponse};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;

/// Mock HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, in order. Names may repeat.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Bytes,
    /// Fail the call before any status is obtained.
    pub failure: Option<String>,
    /// Fail a streamed body after its first chunk.
    pub stream_failure: bool,
}

impl MockResponse {
    /// Create a response with the given status and an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
            failure: None,
            stream_failure: false,
        }
    }

    /// Create a 200 OK response.
    pub fn ok() -> Self {
        Self::status(200)
    }

    /// Create a 200 OK response with body.
    pub fn ok_with_body(body: impl Into<Bytes>) -> Self {
        Self::ok().with_body(body)
    }

    /// Create a 201 Created response.
    pub fn created() -> Self {
        Self::status(201)
    }

    /// Create a transport failure: no status is obtained.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::status(0)
        }
    }

    /// Set the response body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Append a header. Repeated names are kept in order.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append multiple headers.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Make a streamed body fail after its first chunk.
    pub fn with_stream_failure(mut self) -> Self {
        self.stream_failure = true;
        self
    }

    fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                map.append(name, value);
            }
        }
        map
    }

    fn into_result(self) -> Result<HttpResponse, HcpError> {
        if let Some(message) = self.failure {
            return Err(HcpError::Network(NetworkError::ConnectionFailed { message }));
        }
        Ok(HttpResponse {
            status: self.status,
            headers: self.header_map(),
            body: self.body,
        })
    }
}

/// Builder for mock transports.
pub struct MockResponseBuilder {
    responses: Vec<MockResponse>,
}

impl MockResponseBuilder {
    /// Create a new mock response builder.
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
        }
    }

    /// Add a response to return.
    pub fn respond(mut self, response: MockResponse) -> Self {
        self.responses.push(response);
        self
    }

    /// Build the mock transport.
    pub fn build(self) -> MockTransport {
        MockTransport::with_responses(self.responses)
    }
}

impl Default for MockResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock HTTP transport for testing.
///
/// Responses are returned in queue order, one per call, whichever trait
/// method is used. Every request is recorded; a streamed upload body is
/// collected into the recorded request's `body`.
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<MockResponse>,
}

impl MockTransport {
    /// Create a new mock transport with no responses.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock transport with queued responses.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            default_response: None,
        }
    }

    /// Create a mock transport with a default response.
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::new()
        }
    }

    /// Create a builder for the mock transport.
    pub fn builder() -> MockResponseBuilder {
        MockResponseBuilder::new()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: MockResponse) {
        self.responses.lock().push_back(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Methods of the recorded requests, in order.
    pub fn methods(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.method.clone()).collect()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Get the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    fn next_response(&self, request: HttpRequest) -> Result<MockResponse, HcpError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                HcpError::Network(NetworkError::ConnectionFailed {
                    message: "No mock response available".to_string(),
                })
            })
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HcpError> {
        self.next_response(request)?.into_result()
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
        mut body_stream: BodyStream,
    ) -> Result<HttpResponse, HcpError> {
        let mut body = BytesMut::new();
        while let Some(chunk) = body_stream.next().await {
            let chunk = chunk.map_err(|e| TransferError::StreamInterrupted {
                bytes_transferred: body.len() as u64,
                message: e.to_string(),
            })?;
            body.extend_from_slice(&chunk);
        }

        self.next_response(request.with_body(body.freeze()))?
            .into_result()
    }

    async fn open(&self, request: HttpRequest) -> Result<StreamingResponse, HcpError> {
        let mock = self.next_response(request)?;
        let stream_failure = mock.stream_failure;
        let response = mock.into_result()?;

        let mut chunks: Vec<io::Result<Bytes>> = Vec::new();
        if !response.body.is_empty() {
            chunks.push(Ok(response.body));
        }
        if stream_failure {
            chunks.push(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset mid-body",
            )));
        }
        let body: ResponseStream = futures::stream::iter(chunks).boxed();

        Ok(StreamingResponse {
            status: response.status,
            headers: response.headers,
            body,
        })
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued_responses", &self.responses.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .finish()
    }
}
