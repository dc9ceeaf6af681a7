//! Error types for wsdlschema
//!
//! This module defines all error types used throughout the library.
//! Most absences in a WSDL document have documented defaults and never
//! surface here; only structural problems and unsupported shapes do.

use std::fmt;
use thiserror::Error;

/// Result type alias using wsdlschema Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wsdlschema operations
#[derive(Error, Debug)]
pub enum Error {
    /// The document is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document is XML but not a usable WSDL structure
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// An RPC-style message part references an element instead of a type
    #[error("unsupported RPC part '{part}' in message '{message}': RPC parts must declare a type")]
    UnsupportedRpcPart {
        /// Name of the message declaring the part
        message: String,
        /// Name of the offending part
        part: String,
    },

    /// A `ref=` attribute points at no top-level element
    #[error("unresolved element reference '{reference}' (namespace: {})", .namespace.as_deref().unwrap_or("none"))]
    UnresolvedReference {
        /// The raw `ref` attribute value
        reference: String,
        /// The namespace the reference resolved to
        namespace: Option<String>,
    },

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural WSDL error with context
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Element path or position in the document
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Root element is not wsdl:definitions")
            .with_location("/description");

        let msg = format!("{}", err);
        assert!(msg.contains("Root element is not wsdl:definitions"));
        assert!(msg.contains("Location: /description"));
        assert!(msg.ends_with("Location: /description"));
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = Error::UnresolvedReference {
            reference: "tns:missing".to_string(),
            namespace: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("tns:missing"));
        assert!(msg.contains("namespace: none"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ParseError::new("test").into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
