//! HCP service implementations.
//!
//! This module provides service implementations for the store operations:
//! - Objects: Get, Head, List, Delete, Create, Upsert and Put
//! - Metadata: system metadata and custom metadata updates

mod metadata;
mod objects;

pub use metadata::MetadataService;
pub use objects::ObjectsService;

use crate::transport::{reason_phrase, HttpRequest};
use crate::types::{classify, ObjectRequest, ResponseBase};

/// Content type sent with object requests.
const OCTET_STREAM: &str = "application/octet-stream";

/// Build a request carrying the caller's Authorization value.
fn authorized(method: &str, url: impl Into<String>, request: &ObjectRequest) -> HttpRequest {
    HttpRequest::new(method, url)
        .with_header("Authorization", request.authorization())
        .with_header("Content-Type", OCTET_STREAM)
}

/// Classify a status code into a response base with its reason phrase.
fn outcome(code: u16) -> ResponseBase {
    ResponseBase::new(classify(code), reason_phrase(code))
}
