//! WSDL resolution engine
//!
//! The [`Parser`] runs a fixed sequence of passes over one parsed tree:
//!
//! 1. header: namespaces, `elementFormDefault`, target namespace, service
//!    name, binding style and endpoint
//! 2. section indexing: messages, port types and their operations, bindings,
//!    services and schemas
//! 3. operations from `binding/operation`
//! 4. parameters for operations whose input is a top-level schema element
//! 5. the type catalog
//! 6. replay of extensions whose base was not yet available
//! 7. RPC pseudo types
//! 8. `ref=` resolution
//! 9. backfill of inline parameter types with their generated names
//!
//! Each pass reads only what earlier passes produced, so the order is fixed.

mod operations;
mod parameters;
mod refs;
mod rpc;
mod sections;
mod types;

use std::collections::HashMap;

use indexmap::IndexMap;
use roxmltree::{Document, Node, NodeId};
use url::Url;

use crate::definition::WsdlDefinition;
use crate::error::Result;
use crate::limits::Limits;
use crate::model::{
    FormDefault, NamespacedMap, Operation, Parameter, Style, TopLevelElement, TypeDefinition,
    UnresolvedExtension,
};
use crate::namespaces::QName;

use self::sections::Sections;

/// Catalog key of a type: `(namespace, local name)`
pub(crate) type TypeKey = (Option<String>, String);

/// A parameter that may still be waiting on a later pass
#[derive(Debug, Clone)]
pub(crate) enum PendingParameter<'a, 'input> {
    /// Fully known
    Resolved(Parameter),
    /// Declared with an anonymous type; its generated name is filled in by
    /// the backfill pass
    InlineType {
        name: String,
        node: Node<'a, 'input>,
    },
    /// A `ref=` element awaiting the reference pass
    Ref(Node<'a, 'input>),
}

/// A `complexContent/extension` whose merge was postponed
#[derive(Debug, Clone)]
pub(crate) struct PendingExtension {
    pub subtype: TypeKey,
    pub base: QName,
}

/// Resolver for a single WSDL document
pub struct Parser<'a, 'input> {
    document: &'a Document<'input>,
    limits: Limits,

    namespace: Option<String>,
    namespaces: IndexMap<String, String>,
    endpoint: Option<Url>,
    service_name: String,
    element_form_default: FormDefault,
    style: Style,

    sections: Sections<'a, 'input>,

    operations: IndexMap<String, Operation>,
    parameters: IndexMap<String, IndexMap<String, PendingParameter<'a, 'input>>>,
    types: NamespacedMap<TypeDefinition>,
    pseudo_types: NamespacedMap<TypeDefinition>,
    top_level_elements: NamespacedMap<TopLevelElement>,

    type_refs: IndexMap<TypeKey, Vec<Node<'a, 'input>>>,
    pending_extensions: Vec<PendingExtension>,
    unresolved_extensions: Vec<UnresolvedExtension>,
    generated: HashMap<NodeId, QName>,
    generated_count: usize,
}

impl<'a, 'input: 'a> Parser<'a, 'input> {
    /// Create a resolver over `document` with default limits
    pub fn new(document: &'a Document<'input>) -> Self {
        Self {
            document,
            limits: Limits::default(),
            namespace: None,
            namespaces: IndexMap::new(),
            endpoint: None,
            service_name: String::new(),
            element_form_default: FormDefault::default(),
            style: Style::default(),
            sections: Sections::default(),
            operations: IndexMap::new(),
            parameters: IndexMap::new(),
            types: NamespacedMap::new(),
            pseudo_types: NamespacedMap::new(),
            top_level_elements: NamespacedMap::new(),
            type_refs: IndexMap::new(),
            pending_extensions: Vec::new(),
            unresolved_extensions: Vec::new(),
            generated: HashMap::new(),
            generated_count: 0,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Run every pass and return the resolved definition
    pub fn parse(mut self) -> Result<WsdlDefinition> {
        let root = self.document.root_element();

        self.sections = Sections::index(root)?;
        self.read_header(root);
        log::debug!(
            "header: namespace={:?} style={} schemas={}",
            self.namespace,
            self.style,
            self.sections.schemas.len()
        );

        self.parse_operations();
        log::debug!("resolved {} operations", self.operations.len());

        self.parse_parameters();
        log::debug!("collected parameters for {} operations", self.parameters.len());

        self.parse_types()?;
        log::debug!(
            "type catalog: {} types, {} top-level elements, {} pending extensions",
            self.types.len(),
            self.top_level_elements.len(),
            self.pending_extensions.len()
        );

        self.replay_extensions();
        self.parse_rpc_pseudo_types()?;
        log::debug!("synthesized {} pseudo types", self.pseudo_types.len());

        self.resolve_refs()?;
        self.backfill_generated_types()?;
        log::debug!("resolution complete");

        Ok(WsdlDefinition {
            namespace: self.namespace,
            namespaces: self.namespaces,
            endpoint: self.endpoint,
            service_name: self.service_name,
            element_form_default: self.element_form_default,
            style: self.style,
            operations: self.operations,
            types: self.types,
            pseudo_types: self.pseudo_types,
            top_level_elements: self.top_level_elements,
            unresolved_extensions: self.unresolved_extensions,
        })
    }

    /// Record a parameter against an operation key
    fn add_parameter(&mut self, operation: &str, key: String, parameter: PendingParameter<'a, 'input>) {
        self.parameters
            .entry(operation.to_string())
            .or_default()
            .insert(key, parameter);
    }
}
