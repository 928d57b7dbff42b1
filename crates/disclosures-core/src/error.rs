//! Error types for disclosure operations.
//!
//! This module defines [`DisclosureError`] which covers all error cases that
//! can occur when fetching, extracting, or parsing disclosure documents.

use thiserror::Error;

use crate::types::TradeRecord;

/// Errors that can occur during disclosure operations.
#[derive(Error, Debug)]
pub enum DisclosureError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit or access denial by a source host.
    #[error("Rate limited by {host}: retry after {retry_after:?}")]
    RateLimited {
        /// The host that rejected the request.
        host: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested document was not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// An asset-type code was not present in the lookup table.
    #[error("Asset code not found: {0}")]
    AssetCodeNotFound(String),

    /// A primary record line had fewer tokens than the positional layout
    /// requires. Records committed before the offending line are preserved
    /// in the error so callers can keep partial results.
    #[error("Malformed record line in document {document}: {line:?}")]
    MalformedRecordLine {
        /// Identifier of the document being parsed.
        document: String,
        /// The offending line, trimmed.
        line: String,
        /// Records committed before the failure.
        records: Vec<TradeRecord>,
    },

    /// Error parsing data from a source (archive, XML, PDF text, HTML).
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested feature is not supported.
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Error writing exported data.
    #[error("Export error: {0}")]
    Export(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`DisclosureError`].
pub type Result<T> = std::result::Result<T, DisclosureError>;
