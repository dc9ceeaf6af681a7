//! Resource loading utilities
//!
//! The resolver itself performs no I/O; the loader turns a [`Location`] into
//! document text before parsing.

use std::fs;

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;

/// Resource loader for WSDL documents
#[derive(Debug, Clone)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
    /// Whether remote locations may be requested at all
    allow_remote: bool,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            allow_remote: false,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set whether to allow remote resources
    pub fn with_allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    /// The limits applied to loaded documents
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a resource as a string
    pub fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::Path(path) => {
                let size = fs::metadata(path)
                    .map_err(|e| {
                        Error::Resource(format!("failed to read '{}': {}", path.display(), e))
                    })?
                    .len();
                self.limits
                    .check_document_size(usize::try_from(size).unwrap_or(usize::MAX))?;

                fs::read_to_string(path).map_err(|e| {
                    Error::Resource(format!("failed to read '{}': {}", path.display(), e))
                })
            }
            Location::Url(url) => {
                if !self.allow_remote {
                    return Err(Error::Resource(format!(
                        "remote resources are not allowed: {}",
                        url
                    )));
                }

                Err(Error::Resource(format!(
                    "URL loading is not supported: {}",
                    url
                )))
            }
            Location::String(s) => {
                self.limits.check_document_size(s.len())?;
                Ok(s.clone())
            }
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
