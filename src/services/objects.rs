//! Objects service for HCP object operations.

use super::{authorized, outcome};
use crate::config::HcpConfig;
use crate::error::{HcpError, TransferError};
use crate::metadata::{populate_create_metadata, populate_minimum_metadata, populate_read_metadata};
use crate::transfer::{copy_to_sink, BodySource, BodyStream};
use crate::transport::HttpTransport;
use crate::types::*;
use crate::xml;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Service for HCP object operations.
///
/// Each operation issues its transport calls once and returns a typed
/// response. A failure status from the store is a normal `Ok` response with
/// `success() == false`; only transport failures, undecodable bodies and
/// local stream failures are errors.
pub struct ObjectsService {
    config: Arc<HcpConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl ObjectsService {
    /// Create a new objects service.
    pub fn new(config: Arc<HcpConfig>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Download an object into `sink`.
    ///
    /// The body is copied only when the store answers OK. The sink is shut
    /// down exactly once whatever the outcome.
    pub async fn get<W>(&self, request: &ObjectRequest, sink: W) -> Result<ReadResponse, HcpError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut sink = sink;
        let result = self.download(request, &mut sink).await;
        let closed = sink.shutdown().await;

        match (result, closed) {
            (Ok(response), Ok(())) => Ok(response),
            (Ok(_), Err(e)) => Err(TransferError::Sink(e).into()),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(url = %request.url, error = %close_err, "Failed to close sink after error");
                Err(e)
            }
        }
    }

    async fn download<W>(&self, request: &ObjectRequest, sink: &mut W) -> Result<ReadResponse, HcpError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        debug!(url = %request.url, "Fetching");
        let response = self
            .transport
            .open(authorized("GET", request.url.as_str(), request))
            .await?;

        let base = outcome(response.status);
        if base.status() != Status::Ok {
            return Ok(ReadResponse::from_base(base));
        }

        let base = populate_minimum_metadata(base, &response.headers);
        let read = populate_read_metadata(ReadResponse::from_base(base), &response.headers);

        info!(url = %request.url, "Downloading");
        let written = copy_to_sink(response.body, sink).await?;
        debug!(url = %request.url, bytes = written, "Download complete");

        Ok(read)
    }

    /// Fetch an object's metadata only (HEAD).
    pub async fn head(&self, request: &ObjectRequest) -> Result<ReadResponse, HcpError> {
        debug!(url = %request.url, "Fetching (metadata only)");
        let response = self
            .transport
            .send(authorized("HEAD", request.url.as_str(), request))
            .await?;

        let base = outcome(response.status);
        if base.status() != Status::Ok {
            return Ok(ReadResponse::from_base(base));
        }

        let base = populate_minimum_metadata(base, &response.headers);
        Ok(populate_read_metadata(
            ReadResponse::from_base(base),
            &response.headers,
        ))
    }

    /// List a directory. The request URL is given a trailing `/`.
    ///
    /// A listing body that cannot be parsed is an error, never an empty
    /// listing.
    pub async fn list(&self, request: &ObjectRequest) -> Result<ListResponse, HcpError> {
        let request = request.as_directory();
        debug!(url = %request.url, "Listing");
        let response = self
            .transport
            .send(authorized("GET", request.url.as_str(), &request))
            .await?;

        let base = outcome(response.status);
        if base.status() != Status::Ok {
            return Ok(ListResponse::from_base(base));
        }

        let base = populate_minimum_metadata(base, &response.headers);
        let listing = xml::parse_listing(&response.body)?;
        debug!(
            url = %request.url,
            entries = listing.entries.len(),
            "Listing parsed"
        );
        Ok(ListResponse::from_base(base).with_listing(listing.directory, listing.entries))
    }

    /// Delete an object.
    pub async fn delete(&self, request: &ObjectRequest) -> Result<DeleteResponse, HcpError> {
        debug!(url = %request.url, "Deleting");
        let response = self
            .transport
            .send(authorized("DELETE", request.url.as_str(), request))
            .await?;

        let base = outcome(response.status);
        if base.status() != Status::Ok {
            return Ok(DeleteResponse { base });
        }

        Ok(DeleteResponse {
            base: populate_minimum_metadata(base, &response.headers),
        })
    }

    /// Create an object from a body stream (PUT).
    pub async fn create(
        &self,
        request: &ObjectRequest,
        body: BodyStream,
    ) -> Result<CreateResponse, HcpError> {
        debug!(url = %request.url, "Creating");
        let response = self
            .transport
            .send_streaming(authorized("PUT", request.url.as_str(), request), body)
            .await?;

        let base = outcome(response.status);
        if base.status() != Status::Created {
            return Ok(CreateResponse::from_base(base));
        }

        let base = populate_minimum_metadata(base, &response.headers);
        Ok(populate_create_metadata(
            CreateResponse::from_base(base),
            &response.headers,
        ))
    }

    /// Create or replace an object.
    ///
    /// Probes the target with HEAD. If it does not answer OK the object is
    /// created. Otherwise the object is deleted and, if the delete answers
    /// OK, created again from a freshly opened source. A failed delete is
    /// returned as a failed create carrying the delete's status and
    /// explanation; no create is attempted.
    ///
    /// This is not atomic: if the create fails after a successful delete,
    /// the object is gone.
    pub async fn upsert(
        &self,
        request: &ObjectRequest,
        source: &dyn BodySource,
        buffer_size: usize,
    ) -> Result<CreateResponse, HcpError> {
        let probe = self.probe(request).await?;
        debug!(url = %request.url, status = %probe, "Existence check");

        if probe != Status::Ok {
            let body = source.open(buffer_size).await?;
            return self.create(request, body).await;
        }

        debug!(url = %request.url, "Target exists, replacing");
        let deleted = self.delete(request).await?;
        if deleted.base.status() != Status::Ok {
            warn!(
                url = %request.url,
                status = %deleted.base.status(),
                explanation = deleted.base.explanation(),
                "Delete before re-create failed"
            );
            return Ok(CreateResponse::failed(
                deleted.base.status(),
                deleted.base.explanation(),
            ));
        }

        let body = source.open(buffer_size).await?;
        self.create(request, body).await
    }

    /// Write `source` to the target using the configured buffer size.
    pub async fn put(
        &self,
        request: &ObjectRequest,
        source: &dyn BodySource,
        mode: PutMode,
    ) -> Result<CreateResponse, HcpError> {
        let buffer_size = self.config.buffer_size;
        match mode {
            PutMode::Create => {
                let body = source.open(buffer_size).await?;
                self.create(request, body).await
            }
            PutMode::Upsert => self.upsert(request, source, buffer_size).await,
        }
    }

    /// HEAD the target and classify the answer. No metadata is decoded.
    async fn probe(&self, request: &ObjectRequest) -> Result<Status, HcpError> {
        let response = self
            .transport
            .send(authorized("HEAD", request.url.as_str(), request))
            .await?;
        Ok(classify(response.status))
    }
}

impl std::fmt::Debug for ObjectsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectsService")
            .field("rest_url", &self.config.rest_url.as_str())
            .finish_non_exhaustive()
    }
}
