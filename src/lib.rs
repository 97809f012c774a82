//! Hitachi Content Platform (HCP) Integration Module
//!
//! Type-safe client for the HCP namespace REST interface.
//!
//! # Features
//!
//! - **Object Operations**: Get, Head, List, Delete, Create, Upsert
//! - **Metadata**: System metadata updates and custom metadata annotations
//! - **Typed Responses**: Status taxonomy with decoded HCP response headers
//! - **Streaming**: Chunked uploads and sink-based downloads
//!
//! Failure statuses from the store are returned as ordinary responses whose
//! `success()` is false. Only transport failures, undecodable bodies and
//! local stream failures surface as [`HcpError`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hcp::{HcpClient, HcpConfig, PutMode, Response};
//! use hcp::transfer::FileSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hcp::HcpError> {
//!     let config = HcpConfig::builder()
//!         .rest_url("https://ns1.tenant.hcp.example.com/rest")?
//!         .authorization("HCP dXNlcg==:29def7dbc8892a9389ebc7a5210dd844")
//!         .prepend_path("/uploads")
//!         .build()?;
//!     let client = hcp::create_client(config)?;
//!
//!     // Replace the object if it already exists
//!     let target = client.config().target_request("report.csv")?;
//!     let source = FileSource::new("report.csv");
//!     let response = client.objects().put(&target, &source, PutMode::Upsert).await?;
//!
//!     println!("{}: {}", response.status(), response.explanation());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod metadata;
pub mod mocks;
pub mod services;
pub mod transfer;
pub mod transport;
pub mod types;
pub mod xml;

// Re-export main types at crate root
pub use client::{HcpClient, HcpClientBuilder, HcpClientImpl};
pub use config::HcpConfig;
pub use error::{
    ConfigurationError, HcpError, NetworkError, RequestError, ResponseError, TransferError,
};
pub use services::{MetadataService, ObjectsService};
pub use transfer::{BodySource, BytesSource, FileSource};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, StreamingResponse};
pub use types::{
    // Request types
    ObjectRequest,
    PutMode,
    SystemMetadataUpdate,
    // Response types
    CreateResponse,
    DeleteResponse,
    HcpResponse,
    ListResponse,
    ReadResponse,
    Response,
    ResponseBase,
    // Common types
    DirectoryAttributes,
    FieldValue,
    ListEntry,
    OutputRow,
    Status,
};

/// Create a new HCP client from environment variables.
///
/// This will read configuration from:
/// - `HCP_REST_URL` for the namespace REST endpoint
/// - `HCP_AUTHORIZATION` for the Authorization header value
/// - `HCP_PREPEND_PATH` for the write-target prefix
/// - `HCP_BUFFER_SIZE`, `HCP_VERIFY_SSL` and `HCP_TIMEOUT_MS` for tuning
///
/// # Example
///
/// ```rust,no_run
/// let client = hcp::create_client_from_env()?;
/// # Ok::<(), hcp::HcpError>(())
/// ```
pub fn create_client_from_env() -> Result<impl HcpClient> {
    HcpClientBuilder::new().from_env().build()
}

/// Create a new HCP client with explicit configuration.
///
/// # Example
///
/// ```rust,no_run
/// use hcp::HcpConfig;
///
/// let config = HcpConfig::builder()
///     .rest_url("https://ns1.tenant.hcp.example.com/rest")?
///     .authorization("HCP dXNlcg==:29def7dbc8892a9389ebc7a5210dd844")
///     .build()?;
///
/// let client = hcp::create_client(config)?;
/// # Ok::<(), hcp::HcpError>(())
/// ```
pub fn create_client(config: HcpConfig) -> Result<impl HcpClient> {
    HcpClientBuilder::new().config(config).build()
}

/// Result type alias for HCP operations.
pub type Result<T> = std::result::Result<T, HcpError>;
