//! Metadata service for HCP system and custom metadata updates.

use super::{authorized, outcome};
use crate::error::{HcpError, RequestError};
use crate::metadata::{populate_create_metadata, populate_minimum_metadata};
use crate::transport::HttpTransport;
use crate::types::*;
use crate::xml;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Service for HCP metadata operations.
pub struct MetadataService {
    transport: Arc<dyn HttpTransport>,
}

impl MetadataService {
    /// Create a new metadata service.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Change an object's system metadata (index, shred, hold, retention).
    pub async fn set_system_metadata(
        &self,
        request: &ObjectRequest,
        update: &SystemMetadataUpdate,
    ) -> Result<CreateResponse, HcpError> {
        if update.is_empty() {
            return Err(RequestError::Validation {
                message: "no system metadata options given".to_string(),
            }
            .into());
        }

        let mut url = parse_url(&request.url)?;
        url.query_pairs_mut()
            .extend_pairs(update.query_pairs().iter().map(|(k, v)| (*k, v.as_str())));

        info!(url = %url, "Adding system metadata");
        let response = self
            .transport
            .send(authorized("POST", url.as_str(), request))
            .await?;

        Ok(decode(response.status, &response.headers))
    }

    /// Attach a custom metadata document, optionally under a named
    /// annotation.
    ///
    /// The document must be non-empty, well-formed XML; it is rejected before
    /// anything is sent otherwise.
    pub async fn put_custom_metadata(
        &self,
        request: &ObjectRequest,
        annotation: Option<&str>,
        document: &str,
    ) -> Result<CreateResponse, HcpError> {
        if document.trim().is_empty() {
            return Err(RequestError::InvalidCustomMetadata {
                reason: "document is empty".to_string(),
            }
            .into());
        }
        xml::check_well_formed(document).map_err(|e| RequestError::InvalidCustomMetadata {
            reason: e.to_string(),
        })?;

        let mut url = parse_url(&request.url)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("type", "custom-metadata");
            if let Some(annotation) = annotation.filter(|a| !a.is_empty()) {
                query.append_pair("annotation", annotation);
            }
        }

        info!(url = %url, "Adding custom metadata");
        debug!(bytes = document.len(), "Custom metadata document");
        let http_request = authorized("PUT", url.as_str(), request)
            .with_header("Content-Type", "application/xml")
            .with_body(document.to_string());
        let response = self.transport.send(http_request).await?;

        Ok(decode(response.status, &response.headers))
    }
}

fn parse_url(url: &str) -> Result<Url, HcpError> {
    Url::parse(url).map_err(|e| {
        RequestError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn decode(status: u16, headers: &http::HeaderMap) -> CreateResponse {
    let base = outcome(status);
    if !matches!(base.status(), Status::Ok | Status::Created) {
        return CreateResponse::from_base(base);
    }
    let base = populate_minimum_metadata(base, headers);
    populate_create_metadata(CreateResponse::from_base(base), headers)
}

impl std::fmt::Debug for MetadataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataService").finish_non_exhaustive()
    }
}
