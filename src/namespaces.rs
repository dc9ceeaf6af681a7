//! XML namespace handling
//!
//! This module provides qualified names (QNames) and the namespace resolver
//! used by every pass of the WSDL parser. Prefixes are always resolved
//! relative to the node that carries the prefixed token, because WSDL
//! documents frequently rebind prefixes per subtree.

use std::fmt;

use indexmap::IndexMap;
use roxmltree::Node;
use serde::Serialize;

use crate::names::split_qname;

/// Key used for the default (unprefixed) namespace declaration
pub const DEFAULT_NAMESPACE_KEY: &str = "xmlns";

/// Qualified name (QName) - local name plus the namespace it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QName {
    /// Local name
    pub local_name: String,
    /// Namespace URI (None when no declaration was in scope)
    pub namespace: Option<String>,
    /// Prefix the name was written with, if any
    pub prefix: Option<String>,
}

impl QName {
    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            namespace: None,
            prefix: None,
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            namespace: Some(namespace.into()),
            prefix: None,
        }
    }

    /// Set the prefix
    pub fn with_prefix(mut self, prefix: Option<impl Into<String>>) -> Self {
        self.prefix = prefix.map(Into::into);
        self
    }

    /// The name as written in the document (`prefix:local` or `local`)
    pub fn prefixed_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace URI bound to `prefix` in scope at `node`.
///
/// A `None` prefix looks up the default namespace. Unbound prefixes yield
/// `None`; callers treat that as "no namespace".
pub fn resolve_prefix<'a>(node: Node<'a, '_>, prefix: Option<&str>) -> Option<&'a str> {
    node.lookup_namespace_uri(prefix)
}

/// Expand a `prefix:local` token against the declarations in scope at `node`
pub fn expand_name(token: &str, node: Node<'_, '_>) -> QName {
    let (prefix, local) = split_qname(token);
    QName {
        local_name: local.to_string(),
        namespace: resolve_prefix(node, prefix).map(str::to_string),
        prefix: prefix.map(str::to_string),
    }
}

/// Target namespace of the nearest ancestor-or-self carrying `targetNamespace`.
///
/// A schema without its own target namespace inherits the one declared on the
/// enclosing `definitions` element.
pub fn target_namespace<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.ancestors()
        .filter(|n| n.is_element())
        .find_map(|n| n.attribute("targetNamespace"))
}

/// All namespace declarations in scope at `node`, keyed by prefix.
///
/// The default namespace is reported under [`DEFAULT_NAMESPACE_KEY`]; the
/// implicit `xml` binding is omitted.
pub fn in_scope_namespaces(node: Node<'_, '_>) -> IndexMap<String, String> {
    node.namespaces()
        .filter(|ns| ns.uri() != crate::XML_NAMESPACE)
        .map(|ns| {
            let key = ns.name().unwrap_or(DEFAULT_NAMESPACE_KEY).to_string();
            (key, ns.uri().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<root xmlns="urn:default" xmlns:a="urn:a" targetNamespace="urn:tns">
        <inner xmlns:a="urn:rebound">
            <leaf type="a:thing" plain="thing"/>
        </inner>
        <other xmlns="" targetNamespace="urn:other"><leaf/></other>
    </root>"#;

    #[test]
    fn test_qname_display() {
        let qname = QName::namespaced("http://example.com", "element");
        assert_eq!(qname.to_string(), "{http://example.com}element");
        assert_eq!(QName::local("element").to_string(), "element");
    }

    #[test]
    fn test_prefixed_name() {
        let qname = QName::namespaced("urn:a", "thing").with_prefix(Some("a"));
        assert_eq!(qname.prefixed_name(), "a:thing");
        assert_eq!(QName::local("thing").prefixed_name(), "thing");
    }

    #[test]
    fn test_prefix_resolved_relative_to_node() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let leaf = doc
            .descendants()
            .find(|n| n.has_tag_name("leaf") && n.has_attribute("type"))
            .unwrap();

        let qname = expand_name(leaf.attribute("type").unwrap(), leaf);
        assert_eq!(qname.namespace.as_deref(), Some("urn:rebound"));
        assert_eq!(qname.prefix.as_deref(), Some("a"));
        assert_eq!(qname.local_name, "thing");

        let plain = expand_name("thing", leaf);
        assert_eq!(plain.namespace.as_deref(), Some("urn:default"));
        assert_eq!(plain.prefix, None);
    }

    #[test]
    fn test_unbound_prefix_is_none() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let qname = expand_name("missing:thing", doc.root_element());
        assert_eq!(qname.namespace, None);
        assert_eq!(qname.prefix.as_deref(), Some("missing"));
    }

    #[test]
    fn test_target_namespace_walks_upward() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let inner_leaf = doc
            .descendants()
            .find(|n| n.has_tag_name("leaf") && n.has_attribute("type"))
            .unwrap();
        assert_eq!(target_namespace(inner_leaf), Some("urn:tns"));

        let other_leaf = doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "leaf")
            .last()
            .unwrap();
        assert_eq!(target_namespace(other_leaf), Some("urn:other"));
    }

    #[test]
    fn test_in_scope_namespaces() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let namespaces = in_scope_namespaces(doc.root_element());
        assert_eq!(namespaces.get("xmlns").map(String::as_str), Some("urn:default"));
        assert_eq!(namespaces.get("a").map(String::as_str), Some("urn:a"));
        assert!(!namespaces.contains_key("xml"));
    }
}
