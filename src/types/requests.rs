//! Request types for HCP operations.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Target of a single store operation: the full object URL and the
/// pre-built Authorization header value.
#[derive(Clone)]
pub struct ObjectRequest {
    /// Full object (or directory) URL.
    pub url: String,
    authorization: SecretString,
}

impl ObjectRequest {
    /// Create a request descriptor.
    pub fn new(url: impl Into<String>, authorization: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            authorization: SecretString::new(authorization.into()),
        }
    }

    /// Create a request descriptor from an already-wrapped secret.
    pub fn with_secret(url: impl Into<String>, authorization: SecretString) -> Self {
        Self {
            url: url.into(),
            authorization,
        }
    }

    /// Authorization header value, as sent on the wire.
    pub(crate) fn authorization(&self) -> &str {
        self.authorization.expose_secret()
    }

    /// Same request against a directory URL (trailing `/` ensured).
    pub fn as_directory(&self) -> Self {
        let mut url = self.url.clone();
        if !url.ends_with('/') {
            url.push('/');
        }
        Self {
            url,
            authorization: self.authorization.clone(),
        }
    }
}

impl fmt::Debug for ObjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRequest")
            .field("url", &self.url)
            .field("authorization", &"[REDACTED]")
            .finish()
    }
}

/// System metadata changes applied by a single update call.
///
/// Only the options that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemMetadataUpdate {
    /// Index the object for search.
    pub index: Option<bool>,
    /// Shred the object on delete.
    pub shred: Option<bool>,
    /// Place or release a hold.
    pub hold: Option<bool>,
    /// Retention expression, e.g. `A+1y` or a retention class name.
    pub retention: Option<String>,
}

impl SystemMetadataUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index flag.
    pub fn with_index(mut self, index: bool) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the shred flag.
    pub fn with_shred(mut self, shred: bool) -> Self {
        self.shred = Some(shred);
        self
    }

    /// Set the hold flag.
    pub fn with_hold(mut self, hold: bool) -> Self {
        self.hold = Some(hold);
        self
    }

    /// Set the retention expression.
    pub fn with_retention(mut self, retention: impl Into<String>) -> Self {
        self.retention = Some(retention.into());
        self
    }

    /// Returns true if no option is set.
    pub fn is_empty(&self) -> bool {
        self.index.is_none()
            && self.shred.is_none()
            && self.hold.is_none()
            && self.retention.is_none()
    }

    /// Query parameters in wire order.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(index) = self.index {
            pairs.push(("index", index.to_string()));
        }
        if let Some(shred) = self.shred {
            pairs.push(("shred", shred.to_string()));
        }
        if let Some(hold) = self.hold {
            pairs.push(("hold", hold.to_string()));
        }
        if let Some(retention) = &self.retention {
            pairs.push(("retention", retention.to_lowercase()));
        }
        pairs
    }
}

/// How a put writes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PutMode {
    /// Plain create; fails with CONFLICT if the object exists.
    #[default]
    Create,
    /// Create or replace via probe, delete and create.
    Upsert,
}
