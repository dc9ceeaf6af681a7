//! The resolved WSDL definition
//!
//! [`WsdlDefinition`] is what a parse returns. It owns the finished
//! catalogs and offers the derived views message builders use.

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use roxmltree::Document;
use serde::Serialize;
use url::Url;

use crate::documents::parse_document;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::locations::Location;
use crate::model::{
    FormDefault, NamespacedMap, Operation, Style, TopLevelElement, TypeDefinition,
    UnresolvedExtension,
};
use crate::parser::Parser;

/// Namespaces whose types are built in rather than defined by the service
const BUILTIN_NAMESPACE_PREFIXES: [&str; 2] = ["http://schemas.xmlsoap.org", "http://www.w3.org"];

/// A fully resolved WSDL document
#[derive(Debug, Clone, Serialize)]
pub struct WsdlDefinition {
    /// `definitions/@targetNamespace`, verbatim
    pub namespace: Option<String>,
    /// Namespace declarations on the root, the default one under `xmlns`
    pub namespaces: IndexMap<String, String>,
    /// SOAP address of the first service
    pub endpoint: Option<Url>,
    /// `definitions/@name`
    pub service_name: String,
    /// `elementFormDefault` of the first schema
    pub element_form_default: FormDefault,
    /// SOAP binding style
    pub style: Style,
    /// Operations keyed by snake-cased name
    pub operations: IndexMap<String, Operation>,
    /// Schema types, including generated ones
    pub types: NamespacedMap<TypeDefinition>,
    /// Types synthesized for RPC messages
    pub pseudo_types: NamespacedMap<TypeDefinition>,
    /// Type identity of every top-level element
    pub top_level_elements: NamespacedMap<TopLevelElement>,
    /// Extensions whose base type never resolved
    pub unresolved_extensions: Vec<UnresolvedExtension>,
}

impl WsdlDefinition {
    /// Parse WSDL text with default limits
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_limits(text, &Limits::default())
    }

    /// Parse WSDL text under `limits`
    pub fn parse_with_limits(text: &str, limits: &Limits) -> Result<Self> {
        let document = parse_document(text, limits)?;
        Parser::new(&document).with_limits(limits.clone()).parse()
    }

    /// Resolve an already parsed tree
    pub fn from_document(document: &Document<'_>) -> Result<Self> {
        Parser::new(document).parse()
    }

    /// Load and parse a WSDL file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let location = Location::Path(path.as_ref().to_path_buf());
        Self::from_location(&location, &Loader::new())
    }

    /// Load a WSDL document through `loader` and parse it
    pub fn from_location(location: &Location, loader: &Loader) -> Result<Self> {
        let text = loader.load(location)?;
        log::debug!("loaded {} bytes from {}", text.len(), location);
        Self::parse_with_limits(&text, loader.limits())
    }

    /// Look up an operation by its snake-cased key
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Look up a schema type
    pub fn type_definition(&self, namespace: Option<&str>, name: &str) -> Option<&TypeDefinition> {
        self.types.get(namespace, name)
    }

    /// SOAP action keys in document order
    pub fn soap_actions(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }

    /// Schema types with the RPC pseudo types overlaid
    pub fn all_types(&self) -> NamespacedMap<TypeDefinition> {
        let mut all = self.types.clone();
        for (namespace, name, pseudo) in self.pseudo_types.iter() {
            all.get_or_insert_with(namespace, name, || TypeDefinition::new(namespace))
                .overlay(pseudo);
        }
        all
    }

    /// Namespace of every type and of every member path.
    ///
    /// Yields `([type], namespace)` for each type followed by
    /// `([type, member], namespace)` for each of its members.
    pub fn type_namespaces(&self) -> Vec<(Vec<String>, Option<String>)> {
        let mut namespaces = Vec::new();
        for (namespace, name, definition) in self.types.iter() {
            namespaces.push((vec![name.to_string()], namespace.map(str::to_string)));
            for member in definition.members.keys() {
                namespaces.push((
                    vec![name.to_string(), member.clone()],
                    namespace.map(str::to_string),
                ));
            }
        }
        namespaces
    }

    /// Type names of members whose types are defined by the service itself
    pub fn type_definitions(&self) -> Vec<(Vec<String>, String)> {
        let mut definitions = Vec::new();
        for (_, name, definition) in self.types.iter() {
            for (member_name, member) in &definition.members {
                let user_defined = member.type_namespace.as_deref().map_or(false, |ns| {
                    !BUILTIN_NAMESPACE_PREFIXES
                        .iter()
                        .any(|prefix| ns.starts_with(prefix))
                });
                if user_defined {
                    definitions.push((
                        vec![name.to_string(), member_name.clone()],
                        member.type_name.clone(),
                    ));
                }
            }
        }
        definitions
    }

    /// The model as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromStr for WsdlDefinition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WSDL: &str = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
        xmlns:xs="http://www.w3.org/2001/XMLSchema"
        xmlns:tns="urn:shop"
        name="Shop"
        targetNamespace="urn:shop">
      <types>
        <xs:schema targetNamespace="urn:shop">
          <xs:complexType name="Item">
            <xs:sequence>
              <xs:element name="sku" type="xs:string"/>
              <xs:element name="price" type="tns:Money"/>
            </xs:sequence>
          </xs:complexType>
          <xs:simpleType name="Money">
            <xs:restriction base="xs:decimal"/>
          </xs:simpleType>
        </xs:schema>
      </types>
    </definitions>"#;

    #[test]
    fn test_from_str() {
        let wsdl: WsdlDefinition = WSDL.parse().unwrap();
        assert_eq!(wsdl.namespace.as_deref(), Some("urn:shop"));
        assert_eq!(wsdl.service_name, "Shop");
        assert_eq!(wsdl.namespaces.get("xmlns").map(String::as_str), Some(crate::WSDL_NAMESPACE));
        assert!(wsdl.operations.is_empty());
        assert!(wsdl.type_definition(Some("urn:shop"), "Item").is_some());
    }

    #[test]
    fn test_type_namespaces() {
        let wsdl = WsdlDefinition::parse(WSDL).unwrap();
        let namespaces = wsdl.type_namespaces();
        let shop = Some("urn:shop".to_string());
        assert!(namespaces.contains(&(vec!["Item".to_string()], shop.clone())));
        assert!(namespaces.contains(&(vec!["Item".to_string(), "sku".to_string()], shop.clone())));
        assert!(namespaces.contains(&(vec!["Money".to_string()], shop)));
    }

    #[test]
    fn test_type_definitions_skip_builtins() {
        let wsdl = WsdlDefinition::parse(WSDL).unwrap();
        assert_eq!(
            wsdl.type_definitions(),
            vec![(vec!["Item".to_string(), "price".to_string()], "Money".to_string())]
        );
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", WSDL).unwrap();

        let wsdl = WsdlDefinition::from_file(file.path()).unwrap();
        assert_eq!(wsdl.service_name, "Shop");
    }

    #[test]
    fn test_to_json() {
        let wsdl = WsdlDefinition::parse(WSDL).unwrap();
        let json: serde_json::Value = serde_json::from_str(&wsdl.to_json().unwrap()).unwrap();
        assert_eq!(json["types"]["urn:shop"]["Item"]["order"][1], "price");
        assert_eq!(json["style"], "unset");
    }
}
