//! HCP client implementation.
//!
//! This module provides the main HCP client interface and builder.

use crate::config::HcpConfig;
use crate::error::{ConfigurationError, HcpError};
use crate::services::{MetadataService, ObjectsService};
use crate::transport::{HttpTransport, ReqwestTransport};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// HCP client trait.
pub trait HcpClient: Send + Sync {
    /// Get the objects service.
    fn objects(&self) -> &ObjectsService;

    /// Get the metadata service.
    fn metadata(&self) -> &MetadataService;

    /// Get the client configuration.
    fn config(&self) -> &HcpConfig;
}

/// HCP client implementation.
pub struct HcpClientImpl {
    config: Arc<HcpConfig>,
    transport: Arc<dyn HttpTransport>,

    // Lazy-initialized services
    objects: OnceCell<ObjectsService>,
    metadata: OnceCell<MetadataService>,
}

impl HcpClientImpl {
    /// Create a new HCP client with the given configuration.
    pub fn new(config: HcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            objects: OnceCell::new(),
            metadata: OnceCell::new(),
        }
    }
}

impl HcpClient for HcpClientImpl {
    fn objects(&self) -> &ObjectsService {
        self.objects
            .get_or_init(|| ObjectsService::new(self.config.clone(), self.transport.clone()))
    }

    fn metadata(&self) -> &MetadataService {
        self.metadata
            .get_or_init(|| MetadataService::new(self.transport.clone()))
    }

    fn config(&self) -> &HcpConfig {
        &self.config
    }
}

impl std::fmt::Debug for HcpClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HcpClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for HCP client.
pub struct HcpClientBuilder {
    config: Option<HcpConfig>,
    from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl HcpClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            from_env: false,
            transport: None,
        }
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: HcpConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the HCP client.
    ///
    /// There is no default endpoint: without a configuration or
    /// `from_env`, building fails with a missing REST URL.
    pub fn build(self) -> Result<HcpClientImpl, HcpError> {
        let config = if let Some(config) = self.config {
            config
        } else if self.from_env {
            HcpConfig::from_env()?
        } else {
            return Err(ConfigurationError::MissingRestUrl.into());
        };

        let transport = if let Some(transport) = self.transport {
            transport
        } else {
            let builder = ReqwestTransport::builder()
                .connect_timeout(config.connect_timeout)
                .read_timeout(config.read_timeout)
                .pool_max_idle_per_host(config.max_connections)
                .pool_idle_timeout(Some(config.idle_timeout))
                .verify_ssl(config.verify_ssl);

            Arc::new(builder.build()?)
        };

        Ok(HcpClientImpl::new(config, transport))
    }
}

impl Default for HcpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
