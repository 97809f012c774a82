//! Error types for the HCP integration module.
//!
//! Only structurally fatal conditions are errors: a transport failure before
//! any status was obtained, a body that could not be decoded, a local stream
//! failure, or a request that was rejected before it was sent. A store
//! response with a failure status is *not* an error; it is returned as a
//! normal response whose `success` flag is false.

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the HCP integration.
#[derive(Debug, Error)]
pub enum HcpError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Request validation errors.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Network and transport errors.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Response decoding errors.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Upload source or download sink errors.
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),
}

impl HcpError {
    /// Returns true if no HTTP status was obtained because the transport failed.
    pub fn is_transport(&self) -> bool {
        matches!(self, HcpError::Network(_))
    }

    /// Returns true if the store answered but its body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, HcpError::Response(_))
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing REST endpoint.
    #[error("Missing REST URL: the namespace REST URL must be specified via config or environment")]
    MissingRestUrl,

    /// Invalid REST endpoint URL.
    #[error("Invalid REST URL: {url} ({details})")]
    InvalidRestUrl {
        /// The invalid URL.
        url: String,
        /// Details about the validation error.
        details: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },
}

/// Request validation errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// General validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Details about the validation error.
        message: String,
    },

    /// The request URL could not be built.
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Reason why the URL is invalid.
        reason: String,
    },

    /// Custom metadata document is empty or not well-formed XML.
    #[error("Invalid custom metadata: {reason}")]
    InvalidCustomMetadata {
        /// Reason why the document was rejected.
        reason: String,
    },
}

/// Network and transport errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection could not be established or was dropped.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Details about the failure.
        message: String,
    },

    /// The request timed out.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// Configured timeout.
        duration: Duration,
    },

    /// TLS setup failed.
    #[error("TLS error: {message}")]
    TlsError {
        /// Details about the TLS error.
        message: String,
    },
}

/// Response decoding errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The body was not well-formed XML.
    #[error("XML parse error: {message}")]
    XmlParseError {
        /// Parser message.
        message: String,
    },

    /// The body was not valid UTF-8.
    #[error("Invalid body encoding: {message}")]
    InvalidEncoding {
        /// Details about the decoding failure.
        message: String,
    },
}

/// Upload source and download sink errors.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The upload source could not be opened.
    #[error("Failed to open source '{source_name}': {source}")]
    SourceUnavailable {
        /// Source description (usually a file path).
        source_name: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The body stream failed mid-transfer.
    #[error("Stream interrupted after {bytes_transferred} bytes: {message}")]
    StreamInterrupted {
        /// Bytes moved before the failure.
        bytes_transferred: u64,
        /// Details about the failure.
        message: String,
    },

    /// Writing to, flushing, or closing the download sink failed.
    #[error("Sink error: {0}")]
    Sink(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinguishable() {
        let transport = HcpError::Network(NetworkError::ConnectionFailed {
            message: "connection reset".to_string(),
        });
        assert!(transport.is_transport());
        assert!(!transport.is_decode());

        let decode = HcpError::Response(ResponseError::XmlParseError {
            message: "unexpected end".to_string(),
        });
        assert!(decode.is_decode());
        assert!(!decode.is_transport());
    }

    #[test]
    fn test_error_display() {
        let err: HcpError = ConfigurationError::MissingRestUrl.into();
        assert!(err.to_string().starts_with("Configuration error: Missing REST URL"));

        let err: HcpError = TransferError::StreamInterrupted {
            bytes_transferred: 12,
            message: "eof".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Transfer error: Stream interrupted after 12 bytes: eof"
        );
    }
}
