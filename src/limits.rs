//! Limits and constraints for WSDL processing
//!
//! This module defines limits that protect the resolver against oversized
//! documents and pathologically nested anonymous types.

use crate::error::{Error, Result};

/// Processing limits applied while loading and resolving a WSDL document
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum document size in bytes
    pub max_document_size: usize,

    /// Maximum number of XML nodes the tree parser will allocate
    pub max_nodes: u32,

    /// Maximum nesting depth of anonymous types inside the type catalog
    pub max_type_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_document_size: 100 * 1024 * 1024, // 100 MB
            max_nodes: 10_000_000,
            max_type_depth: 256,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_document_size: 10 * 1024 * 1024, // 10 MB
            max_nodes: 500_000,
            max_type_depth: 32,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_document_size: 1024 * 1024 * 1024, // 1 GB
            max_nodes: u32::MAX,
            max_type_depth: 4096,
        }
    }

    /// Check if the document size is within limits
    pub fn check_document_size(&self, size: usize) -> Result<()> {
        if size > self.max_document_size {
            Err(Error::LimitExceeded(format!(
                "document size {} bytes exceeds maximum {} bytes",
                size, self.max_document_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if an anonymous type nesting depth is within limits
    pub fn check_type_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_type_depth {
            Err(Error::LimitExceeded(format!(
                "anonymous type depth {} exceeds maximum {}",
                depth, self.max_type_depth
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_type_depth, 256);
        assert!(limits.check_type_depth(10).is_ok());
        assert!(limits.check_type_depth(257).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_document_size < Limits::default().max_document_size);
        assert!(limits.check_document_size(11 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_type_depth > Limits::default().max_type_depth);
        assert!(limits.check_document_size(200 * 1024 * 1024).is_ok());
    }
}
