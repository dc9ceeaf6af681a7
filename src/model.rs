//! Resolved WSDL model
//!
//! Fixed-shape records produced by the resolver: operations with their
//! parameters, type definitions, top-level elements and the namespace-keyed
//! catalog that holds them. Every record serializes with `serde`; catalogs
//! serialize as JSON objects keyed by namespace URI, with `""` standing in
//! for "no namespace".

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ParseError;
use crate::namespaces::QName;

/// Two-level catalog keyed by namespace, then local name
#[derive(Debug, Clone, PartialEq)]
pub struct NamespacedMap<V> {
    inner: IndexMap<Option<String>, IndexMap<String, V>>,
}

impl<V> Default for NamespacedMap<V> {
    fn default() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }
}

impl<V> NamespacedMap<V> {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry
    pub fn get(&self, namespace: Option<&str>, name: &str) -> Option<&V> {
        self.inner
            .get(&namespace.map(str::to_string))
            .and_then(|entries| entries.get(name))
    }

    /// Look up an entry for modification
    pub fn get_mut(&mut self, namespace: Option<&str>, name: &str) -> Option<&mut V> {
        self.inner
            .get_mut(&namespace.map(str::to_string))
            .and_then(|entries| entries.get_mut(name))
    }

    /// Whether an entry exists
    pub fn contains(&self, namespace: Option<&str>, name: &str) -> bool {
        self.get(namespace, name).is_some()
    }

    /// Insert an entry, returning the value it replaced
    pub fn insert(&mut self, namespace: Option<&str>, name: impl Into<String>, value: V) -> Option<V> {
        self.inner
            .entry(namespace.map(str::to_string))
            .or_default()
            .insert(name.into(), value)
    }

    /// Entry for `(namespace, name)`, created with `default` when absent
    pub fn get_or_insert_with(
        &mut self,
        namespace: Option<&str>,
        name: &str,
        default: impl FnOnce() -> V,
    ) -> &mut V {
        self.inner
            .entry(namespace.map(str::to_string))
            .or_default()
            .entry(name.to_string())
            .or_insert_with(default)
    }

    /// All entries of one namespace
    pub fn namespace(&self, namespace: Option<&str>) -> Option<&IndexMap<String, V>> {
        self.inner.get(&namespace.map(str::to_string))
    }

    /// Namespaces present in the catalog, in insertion order
    pub fn namespaces(&self) -> impl Iterator<Item = Option<&str>> {
        self.inner.keys().map(|ns| ns.as_deref())
    }

    /// Iterate `(namespace, name, value)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &str, &V)> {
        self.inner.iter().flat_map(|(ns, entries)| {
            entries
                .iter()
                .map(move |(name, value)| (ns.as_deref(), name.as_str(), value))
        })
    }

    /// Total number of entries across all namespaces
    pub fn len(&self) -> usize {
        self.inner.values().map(IndexMap::len).sum()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Serialize> Serialize for NamespacedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (ns, entries) in &self.inner {
            map.serialize_entry(ns.as_deref().unwrap_or(""), entries)?;
        }
        map.end()
    }
}

/// A SOAP operation from a `binding/operation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// SOAP action (the operation name when none is declared)
    pub action: String,
    /// Identity of the request element
    pub input: QName,
    /// Identity of the response element; absent for placeholder operations
    pub output: Option<QName>,
    /// Namespace of the input element
    pub namespace: Option<String>,
    /// Prefix the input element was declared with
    pub namespace_prefix: Option<String>,
    /// Request parameters in declaration order
    pub parameters: IndexMap<String, Parameter>,
}

impl Operation {
    /// Operation whose input and output identities were resolved
    pub fn new(action: impl Into<String>, input: QName, output: QName) -> Self {
        Self {
            action: action.into(),
            namespace: input.namespace.clone(),
            namespace_prefix: input.prefix.clone(),
            input,
            output: Some(output),
            parameters: IndexMap::new(),
        }
    }

    /// Minimal operation recorded when no `portType` describes it
    pub fn placeholder(name: &str) -> Self {
        Self {
            action: name.to_string(),
            input: QName::local(name),
            output: None,
            namespace: None,
            namespace_prefix: None,
            parameters: IndexMap::new(),
        }
    }

    /// Whether this is a placeholder operation
    pub fn is_placeholder(&self) -> bool {
        self.output.is_none()
    }
}

/// An operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter (element) name
    pub name: String,
    /// Local name of the parameter's type
    pub type_name: String,
    /// Namespace of the parameter's type
    pub namespace: Option<String>,
    /// Prefix the type was written with
    pub namespace_prefix: Option<String>,
}

impl Parameter {
    /// Parameter named `name` whose type is `type_name`
    pub fn new(name: impl Into<String>, type_name: &QName) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.local_name.clone(),
            namespace: type_name.namespace.clone(),
            namespace_prefix: type_name.prefix.clone(),
        }
    }
}

/// Upper bound of an element's occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    /// A fixed bound
    Bounded(u32),
    /// `unbounded`
    Unbounded,
}

impl FromStr for MaxOccurs {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unbounded" => Ok(MaxOccurs::Unbounded),
            other => other
                .parse()
                .map(MaxOccurs::Bounded)
                .map_err(|_| ParseError::new(format!("invalid maxOccurs value '{}'", s))),
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurs::Bounded(n) => write!(f, "{}", n),
            MaxOccurs::Unbounded => write!(f, "unbounded"),
        }
    }
}

impl Serialize for MaxOccurs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaxOccurs::Bounded(n) => serializer.serialize_u32(*n),
            MaxOccurs::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

/// Element member of a complex type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Type reference as written (`xs:string`)
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Local name of the member type
    pub type_name: String,
    /// Namespace of the member type
    pub type_namespace: Option<String>,
    /// `nillable` facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nillable: Option<bool>,
    /// `minOccurs` facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_occurs: Option<u32>,
    /// `maxOccurs` facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_occurs: Option<MaxOccurs>,
}

impl Member {
    /// Member of type `type_name`, written as `type_ref`
    pub fn new(type_ref: impl Into<String>, type_name: &QName) -> Self {
        Self {
            type_ref: type_ref.into(),
            type_name: type_name.local_name.clone(),
            type_namespace: type_name.namespace.clone(),
            nillable: None,
            min_occurs: None,
            max_occurs: None,
        }
    }
}

/// Restriction facets of a simple type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleRestriction {
    /// Restricted base type
    pub base: QName,
    /// Enumerated values in document order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<String>>,
    /// Pattern facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// What a type derives from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    /// Simple-type restriction
    Restriction(SimpleRestriction),
    /// Complex-content extension, by base local name
    Extension(String),
}

/// A named or generated type in the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    /// Namespace the type is declared in
    pub namespace: Option<String>,
    /// Restriction or extension base
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<BaseType>,
    /// Attribute name to attribute type
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, Option<QName>>,
    /// Element members by name
    pub members: IndexMap<String, Member>,
    /// Member names declared under `sequence`, inherited first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    /// Member names declared under `all`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unordered: Option<Vec<String>>,
}

impl TypeDefinition {
    /// Empty type in `namespace`
    pub fn new(namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            ..Self::default()
        }
    }

    /// Append a member name to the sequence order
    pub fn push_ordered(&mut self, name: impl Into<String>) {
        self.order.get_or_insert_with(Vec::new).push(name.into());
    }

    /// Append a member name to the unordered group
    pub fn push_unordered(&mut self, name: impl Into<String>) {
        self.unordered.get_or_insert_with(Vec::new).push(name.into());
    }

    /// Merge `base` underneath this type.
    ///
    /// Members and attributes declared here win over inherited ones; the
    /// sequence order becomes the base order followed by own names not
    /// already present.
    pub fn inherit(&mut self, base: &TypeDefinition, base_name: &str) {
        let mut attributes = base.attributes.clone();
        attributes.extend(std::mem::take(&mut self.attributes));
        self.attributes = attributes;

        let mut members = base.members.clone();
        members.extend(std::mem::take(&mut self.members));
        self.members = members;

        self.order = union(base.order.as_deref(), self.order.take());
        self.unordered = union(base.unordered.as_deref(), self.unordered.take());
        self.base_type = Some(BaseType::Extension(base_name.to_string()));
    }

    /// Overlay `other` on this type field by field, `other` winning
    pub fn overlay(&mut self, other: &TypeDefinition) {
        self.namespace = other.namespace.clone();
        if other.base_type.is_some() {
            self.base_type = other.base_type.clone();
        }
        self.attributes
            .extend(other.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.members
            .extend(other.members.iter().map(|(k, v)| (k.clone(), v.clone())));
        if other.order.is_some() {
            self.order = other.order.clone();
        }
        if other.unordered.is_some() {
            self.unordered = other.unordered.clone();
        }
    }

    /// Replace a member name inside `order` and `unordered`
    pub fn rename_in_groups(&mut self, from: &str, to: &str) {
        for group in [self.order.as_mut(), self.unordered.as_mut()].into_iter().flatten() {
            for name in group.iter_mut().filter(|name| name.as_str() == from) {
                *name = to.to_string();
            }
        }
    }
}

fn union(base: Option<&[String]>, own: Option<Vec<String>>) -> Option<Vec<String>> {
    match (base, own) {
        (None, own) => own,
        (Some(base), own) => {
            let mut merged = base.to_vec();
            for name in own.into_iter().flatten() {
                if !merged.contains(&name) {
                    merged.push(name);
                }
            }
            Some(merged)
        }
    }
}

/// Type identity of a top-level schema element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLevelElement {
    /// Local name of the element's type
    pub type_name: String,
    /// Namespace of the element's type
    pub type_namespace: Option<String>,
    /// Prefix the type was written with
    pub type_prefix: Option<String>,
}

impl From<QName> for TopLevelElement {
    fn from(qname: QName) -> Self {
        Self {
            type_name: qname.local_name,
            type_namespace: qname.namespace,
            type_prefix: qname.prefix,
        }
    }
}

/// SOAP binding style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// `style="rpc"`
    Rpc,
    /// `style="document"`
    Document,
    /// No style declared
    #[default]
    Unset,
}

impl FromStr for Style {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rpc" => Ok(Style::Rpc),
            "document" => Ok(Style::Document),
            other => Err(ParseError::new(format!("unknown binding style '{}'", other))),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Rpc => write!(f, "rpc"),
            Style::Document => write!(f, "document"),
            Style::Unset => write!(f, "unset"),
        }
    }
}

/// `elementFormDefault` of the first schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormDefault {
    /// Local elements are namespace-qualified
    Qualified,
    /// Local elements are unqualified
    #[default]
    Unqualified,
}

impl FromStr for FormDefault {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qualified" => Ok(FormDefault::Qualified),
            "unqualified" => Ok(FormDefault::Unqualified),
            other => Err(ParseError::new(format!(
                "unknown elementFormDefault '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for FormDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormDefault::Qualified => write!(f, "qualified"),
            FormDefault::Unqualified => write!(f, "unqualified"),
        }
    }
}

/// An extension whose base type never became available
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedExtension {
    /// Namespace of the extending type
    pub type_namespace: Option<String>,
    /// Name of the extending type
    pub type_name: String,
    /// The base it names
    pub base: QName,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn member(type_name: &str) -> Member {
        Member::new(
            format!("xs:{}", type_name),
            &QName::namespaced(crate::XSD_NAMESPACE, type_name).with_prefix(Some("xs")),
        )
    }

    #[test]
    fn test_namespaced_map() {
        let mut map = NamespacedMap::new();
        map.insert(Some("urn:a"), "One", 1);
        map.insert(None, "Two", 2);
        map.insert(Some("urn:a"), "Three", 3);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(Some("urn:a"), "Three"), Some(&3));
        assert_eq!(map.get(None, "Two"), Some(&2));
        assert!(!map.contains(Some("urn:b"), "One"));
        assert_eq!(
            map.namespaces().collect::<Vec<_>>(),
            vec![Some("urn:a"), None]
        );

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["urn:a"]["One"], 1);
        assert_eq!(json[""]["Two"], 2);
    }

    #[test]
    fn test_inherit_base_first() {
        let mut base = TypeDefinition::new(Some("urn:t"));
        base.members.insert("a".into(), member("string"));
        base.members.insert("shared".into(), member("string"));
        base.push_ordered("a");
        base.push_ordered("shared");

        let mut derived = TypeDefinition::new(Some("urn:t"));
        derived.members.insert("shared".into(), member("int"));
        derived.members.insert("b".into(), member("string"));
        derived.push_ordered("shared");
        derived.push_ordered("b");

        derived.inherit(&base, "Base");

        assert_eq!(
            derived.order,
            Some(vec!["a".to_string(), "shared".to_string(), "b".to_string()])
        );
        assert_eq!(derived.members["shared"].type_name, "int");
        assert_eq!(derived.members.len(), 3);
        assert_eq!(derived.base_type, Some(BaseType::Extension("Base".into())));
    }

    #[test]
    fn test_inherit_without_groups() {
        let base = TypeDefinition::new(None);
        let mut derived = TypeDefinition::new(None);
        derived
            .attributes
            .insert("id".into(), Some(QName::namespaced(crate::XSD_NAMESPACE, "int")));

        derived.inherit(&base, "Base");

        assert_eq!(derived.order, None);
        assert_eq!(derived.unordered, None);
        assert_eq!(derived.attributes.len(), 1);
    }

    #[test]
    fn test_rename_in_groups() {
        let mut def = TypeDefinition::new(None);
        def.push_ordered("first");
        def.push_ordered("REF!tns:Article");
        def.rename_in_groups("REF!tns:Article", "article");
        assert_eq!(def.order, Some(vec!["first".to_string(), "article".to_string()]));
    }

    #[test]
    fn test_max_occurs() {
        assert_eq!("unbounded".parse::<MaxOccurs>().unwrap(), MaxOccurs::Unbounded);
        assert_eq!("3".parse::<MaxOccurs>().unwrap(), MaxOccurs::Bounded(3));
        assert!("many".parse::<MaxOccurs>().is_err());
        assert_eq!(serde_json::to_value(MaxOccurs::Unbounded).unwrap(), "unbounded");
    }

    #[test]
    fn test_style_and_form() {
        assert_eq!("rpc".parse::<Style>().unwrap(), Style::Rpc);
        assert!("literal".parse::<Style>().is_err());
        assert_eq!(Style::default(), Style::Unset);
        assert_eq!(FormDefault::default().to_string(), "unqualified");
        assert_eq!("qualified".parse::<FormDefault>().unwrap(), FormDefault::Qualified);
    }

    #[test]
    fn test_placeholder_operation() {
        let op = Operation::placeholder("Orphan");
        assert!(op.is_placeholder());
        assert_eq!(op.action, "Orphan");
        assert_eq!(op.input, QName::local("Orphan"));
        assert_eq!(op.namespace, None);
    }
}
