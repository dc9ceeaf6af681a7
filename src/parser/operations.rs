//! Operation extraction from `binding/operation`

use roxmltree::Node;

use super::Parser;
use crate::documents::NodeExt;
use crate::model::Operation;
use crate::names::{local_part, snake_case};
use crate::namespaces::{expand_name, QName};

/// Which side of an operation is being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn element_name(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }
}

/// The `parts` attribute of the SOAP body under a binding operation's input
/// or output, if declared
pub(crate) fn soap_body_parts<'a>(binding_operation: Node<'a, '_>, direction: Direction) -> Option<&'a str> {
    binding_operation
        .first_child_named(direction.element_name())?
        .first_child_named("body")?
        .attribute("parts")
}

/// Message part selected by a `parts` filter, or the first part without one
pub(crate) fn select_part<'a, 'input>(
    message: Node<'a, 'input>,
    parts: Option<&str>,
) -> Option<Node<'a, 'input>> {
    let mut candidates = message.children_named("part");
    match parts {
        Some(parts) => candidates.find(|part| {
            parts
                .split_whitespace()
                .any(|name| name == part.name_attr())
        }),
        None => candidates.next(),
    }
}

impl<'a, 'input: 'a> Parser<'a, 'input> {
    /// Operation pass.
    ///
    /// Operations are keyed by their snake-cased name; a resolved entry is
    /// never replaced by a later binding operation of the same name.
    pub(super) fn parse_operations(&mut self) {
        for binding in self.sections.bindings.clone() {
            let port_type = local_part(binding.attribute("type").unwrap_or_default());

            for binding_operation in binding.children_named("operation") {
                let name = binding_operation.name_attr();
                let key = snake_case(name);

                let operation = match self.sections.port_type_operation(port_type, name) {
                    Some(port_operation) => {
                        let action = binding_operation
                            .first_child_named("operation")
                            .and_then(|soap| soap.attribute("soapAction"))
                            .filter(|action| !action.is_empty())
                            .unwrap_or(name);
                        let input = self.resolve_io(binding_operation, port_operation, Direction::Input);
                        let output = self.resolve_io(binding_operation, port_operation, Direction::Output);
                        Operation::new(action, input, output)
                    }
                    None => {
                        log::warn!(
                            "no portType operation for {}; recording a placeholder",
                            binding_operation.describe()
                        );
                        Operation::placeholder(name)
                    }
                };

                match self.operations.get(&key) {
                    Some(existing) if !existing.is_placeholder() => {
                        log::trace!("operation '{}' already resolved, keeping the first", key);
                    }
                    _ => {
                        log::trace!("operation '{}' -> {}", key, operation.input);
                        self.operations.insert(key, operation);
                    }
                }
            }
        }
    }

    /// Identity of one side of an operation.
    ///
    /// The selected message part's `element` wins. Without one, the output
    /// falls back to the message name and the input to the binding
    /// operation's own name.
    fn resolve_io(
        &self,
        binding_operation: Node<'a, 'input>,
        port_operation: Node<'a, 'input>,
        direction: Direction,
    ) -> QName {
        let operation_name = binding_operation.name_attr();

        let port_io = match port_operation.first_child_named(direction.element_name()) {
            Some(node) => node,
            None => return QName::local(operation_name),
        };
        let message = expand_name(port_io.attribute("message").unwrap_or_default(), port_io);

        let parts = soap_body_parts(binding_operation, direction);
        let element = self
            .sections
            .messages
            .get(message.local_name.as_str())
            .and_then(|node| select_part(*node, parts))
            .and_then(|part| part.attribute("element").map(|element| expand_name(element, part)));

        match (element, direction) {
            (Some(element), _) => element,
            (None, Direction::Output) => message,
            (None, Direction::Input) => QName {
                local_name: operation_name.to_string(),
                ..message
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const MESSAGE: &str = r#"<message name="M">
        <part name="header" element="h"/>
        <part name="body" element="b"/>
    </message>"#;

    #[test]
    fn test_select_part() {
        let doc = Document::parse(MESSAGE).unwrap();
        let message = doc.root_element();

        let first = select_part(message, None).unwrap();
        assert_eq!(first.name_attr(), "header");

        let body = select_part(message, Some("body")).unwrap();
        assert_eq!(body.name_attr(), "body");

        assert!(select_part(message, Some("missing")).is_none());
    }

    #[test]
    fn test_soap_body_parts() {
        let doc = Document::parse(
            r#"<operation name="Op" xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/">
                <input><soap:body use="literal" parts="body"/></input>
                <output><soap:body use="literal"/></output>
            </operation>"#,
        )
        .unwrap();
        let op = doc.root_element();
        assert_eq!(soap_body_parts(op, Direction::Input), Some("body"));
        assert_eq!(soap_body_parts(op, Direction::Output), None);
    }
}
