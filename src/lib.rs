//! # wsdlschema
//!
//! Resolves a WSDL 1.1 service description and its embedded XML Schemas into
//! a structured model: target namespace, endpoint, binding style, the
//! operation catalog and the full type catalog.
//!
//! The resolver runs a fixed sequence of passes over one `roxmltree` tree.
//! Namespace prefixes are resolved relative to the node that uses them,
//! forward-referenced and anonymous types are named and merged, and
//! RPC-style bindings get synthetic pseudo types built from their message
//! parts. Producing SOAP messages is left to the caller.
//!
//! ## Features
//!
//! - Operation catalog with SOAP actions and input/output element identities
//! - Parameters for document/literal and RPC operations
//! - Type catalog with attributes, ordered and unordered members,
//!   enumerations, patterns and inheritance
//! - Element reference (`ref=`) resolution
//! - Limits against oversized input
//!
//! ## Example
//!
//! ```rust,ignore
//! use wsdlschema::WsdlDefinition;
//!
//! let wsdl = WsdlDefinition::from_file("service.wsdl")?;
//!
//! for (name, operation) in &wsdl.operations {
//!     println!("{} -> {}", name, operation.action);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Utilities
pub mod names;
pub mod namespaces;
pub mod locations;

// Resource loading
pub mod documents;
pub mod loaders;

// Resolution
pub mod definition;
pub mod model;
pub mod parser;

// Re-exports for convenience
pub use definition::WsdlDefinition;
pub use error::{Error, ParseError, Result};
pub use limits::Limits;
pub use model::{
    BaseType, FormDefault, MaxOccurs, Member, NamespacedMap, Operation, Parameter,
    SimpleRestriction, Style, TopLevelElement, TypeDefinition, UnresolvedExtension,
};
pub use namespaces::QName;
pub use parser::Parser;

/// Version of the wsdlschema library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XML Schema namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// WSDL 1.1 namespace
pub const WSDL_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/";

/// WSDL SOAP 1.1 binding namespace
pub const SOAP_1_1_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/soap/";

/// WSDL SOAP 1.2 binding namespace
pub const SOAP_1_2_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse WSDL text with default limits
pub fn parse(text: &str) -> Result<WsdlDefinition> {
    WsdlDefinition::parse(text)
}
