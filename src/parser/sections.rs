//! Header pass and section indexing

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use roxmltree::Node;
use url::Url;

use super::Parser;
use crate::documents::NodeExt;
use crate::error::{ParseError, Result};
use crate::model::{FormDefault, Style};
use crate::namespaces::in_scope_namespaces;
use crate::{SOAP_1_1_NAMESPACE, SOAP_1_2_NAMESPACE};

/// Name-keyed indices over the top-level WSDL sections
#[derive(Debug, Default)]
pub(crate) struct Sections<'a, 'input> {
    pub messages: IndexMap<&'a str, Node<'a, 'input>>,
    pub port_type_operations: IndexMap<&'a str, IndexMap<&'a str, Node<'a, 'input>>>,
    pub bindings: Vec<Node<'a, 'input>>,
    pub services: Vec<Node<'a, 'input>>,
    pub schemas: Vec<Node<'a, 'input>>,
}

impl<'a, 'input: 'a> Sections<'a, 'input> {
    /// Index the children of `definitions`.
    ///
    /// Later declarations with a duplicate name replace earlier ones.
    pub fn index(root: Node<'a, 'input>) -> Result<Self> {
        if root.tag_name().name() != "definitions" {
            return Err(ParseError::new(format!(
                "root element is <{}>, expected <definitions>",
                root.tag_name().name()
            ))
            .with_location(root.describe())
            .into());
        }

        let mut sections = Sections::default();
        let mut types_seen = false;

        for node in root.children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "message" => {
                    sections.messages.insert(node.name_attr(), node);
                }
                "portType" => {
                    let operations = node
                        .children_named("operation")
                        .map(|op| (op.name_attr(), op))
                        .collect();
                    sections
                        .port_type_operations
                        .insert(node.name_attr(), operations);
                }
                "binding" => sections.bindings.push(node),
                "service" => sections.services.push(node),
                // only the first <types> section carries schemas
                "types" if !types_seen => {
                    types_seen = true;
                    sections.schemas.extend(node.children_named("schema"));
                }
                other => log::trace!("skipping top-level <{}>", other),
            }
        }

        Ok(sections)
    }

    /// Port type operation named `operation` in port type `port_type`
    pub fn port_type_operation(&self, port_type: &str, operation: &str) -> Option<Node<'a, 'input>> {
        self.port_type_operations
            .get(port_type)
            .and_then(|ops| ops.get(operation))
            .copied()
    }
}

impl<'a, 'input: 'a> Parser<'a, 'input> {
    /// Namespace and header pass
    pub(super) fn read_header(&mut self, root: Node<'a, 'input>) {
        self.namespaces = in_scope_namespaces(root);
        self.namespace = root.attribute("targetNamespace").map(str::to_string);
        self.service_name = root.attribute("name").unwrap_or_default().to_string();

        if let Some(form) = self
            .sections
            .schemas
            .first()
            .and_then(|schema| schema.attribute("elementFormDefault"))
        {
            self.element_form_default = form.parse().unwrap_or_else(|err| {
                log::warn!("{}; assuming unqualified", err);
                FormDefault::Unqualified
            });
        }

        self.style = self.binding_style();
        self.endpoint = self.service_endpoint();
    }

    fn binding_style(&self) -> Style {
        let soap_binding = [SOAP_1_1_NAMESPACE, SOAP_1_2_NAMESPACE]
            .iter()
            .find_map(|ns| {
                self.sections
                    .bindings
                    .iter()
                    .find_map(|binding| binding.first_child_ns(ns, "binding"))
            });

        match soap_binding.and_then(|node| node.attribute("style")) {
            Some(style) => style.parse().unwrap_or_else(|err| {
                log::warn!("{}", err);
                Style::Unset
            }),
            None => Style::Unset,
        }
    }

    fn service_endpoint(&self) -> Option<Url> {
        let service = self.sections.services.first()?;
        let location = [SOAP_1_1_NAMESPACE, SOAP_1_2_NAMESPACE]
            .iter()
            .find_map(|ns| {
                service
                    .descendants()
                    .filter(|n| {
                        n.is_element()
                            && n.tag_name().name() == "address"
                            && n.tag_name().namespace() == Some(*ns)
                    })
                    .find_map(|n| n.attribute("location"))
            })?;

        parse_endpoint(location)
    }
}

/// Normalize endpoint text: percent-escapes are decoded first, then `Url`
/// re-escapes whatever is invalid in the decoded text.
pub(crate) fn parse_endpoint(location: &str) -> Option<Url> {
    let decoded = match percent_decode_str(location.trim()).decode_utf8() {
        Ok(decoded) => decoded,
        Err(err) => {
            log::warn!("ignoring endpoint '{}' with invalid escapes: {}", location, err);
            return None;
        }
    };

    match Url::parse(&decoded) {
        Ok(url) => Some(url),
        Err(err) => {
            log::warn!("ignoring malformed endpoint '{}': {}", location, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_parse_endpoint_escapes() {
        let url = parse_endpoint("http://example.com/my service?q=a%20b").unwrap();
        assert_eq!(url.as_str(), "http://example.com/my%20service?q=a%20b");
    }

    #[test]
    fn test_parse_endpoint_decodes_escapes() {
        let url = parse_endpoint("http://example.com/%7Euser/a%41b").unwrap();
        assert_eq!(url.as_str(), "http://example.com/~user/aAb");

        assert!(parse_endpoint("http://example.com/%FF").is_none());
    }

    #[test]
    fn test_parse_endpoint_malformed() {
        assert!(parse_endpoint("not a url").is_none());
        assert!(parse_endpoint("http://[::1").is_none());
    }

    #[test]
    fn test_index_requires_definitions() {
        let doc = Document::parse("<description/>").unwrap();
        assert!(Sections::index(doc.root_element()).is_err());
    }

    #[test]
    fn test_index_sections() {
        let doc = Document::parse(
            r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/">
                <types><schema/><schema/></types>
                <message name="In"/><message name="Out"/>
                <portType name="PT"><operation name="Op"/></portType>
                <binding name="B"/>
                <service name="S"/>
            </definitions>"#,
        )
        .unwrap();

        let sections = Sections::index(doc.root_element()).unwrap();
        assert_eq!(sections.schemas.len(), 2);
        assert_eq!(sections.messages.len(), 2);
        assert!(sections.port_type_operation("PT", "Op").is_some());
        assert!(sections.port_type_operation("PT", "Other").is_none());
        assert_eq!(sections.bindings.len(), 1);
        assert_eq!(sections.services.len(), 1);
    }
}
