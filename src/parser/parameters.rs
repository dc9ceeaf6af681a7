//! Parameter extraction for document-style operations

use roxmltree::Node;

use super::operations::{select_part, soap_body_parts, Direction};
use super::{Parser, PendingParameter};
use crate::documents::NodeExt;
use crate::model::Parameter;
use crate::names::{local_part, ref_key, snake_case};
use crate::namespaces::{expand_name, target_namespace, QName};

/// Whether a prefixed or bare reference names `local` in `namespace`.
///
/// A bare reference resolves through the default namespace. Only when no
/// default namespace is in scope does it match on the local name alone.
fn references(reference: &QName, local: &str, namespace: Option<&str>) -> bool {
    if reference.local_name != local {
        return false;
    }
    match (&reference.prefix, &reference.namespace) {
        (None, None) => true,
        (_, resolved) => resolved.as_deref() == namespace,
    }
}

impl<'a, 'input: 'a> Parser<'a, 'input> {
    /// Parameter pass
    pub(super) fn parse_parameters(&mut self) {
        for schema in self.sections.schemas.clone() {
            for element in schema.children_named("element") {
                let name = element.name_attr();
                let operations = self.operations_for_input_element(name, target_namespace(element));
                if operations.is_empty() {
                    continue;
                }

                let children = self.parameter_nodes(element);
                log::trace!(
                    "element '{}' is the input of {:?} with {} parameters",
                    name,
                    operations,
                    children.len()
                );

                for child in children {
                    let (key, parameter) = match classify_parameter(child) {
                        Some(entry) => entry,
                        None => {
                            log::trace!("skipping untyped parameter {}", child.describe());
                            continue;
                        }
                    };
                    for operation in &operations {
                        self.add_parameter(operation, key.clone(), parameter.clone());
                    }
                }
            }
        }
    }

    /// `sequence/element` children describing an input element's parameters,
    /// either inline or through the named complex type of its `type=`
    fn parameter_nodes(&self, element: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        if let Some(complex_type) = element.first_child_named("complexType") {
            return complex_type.descend(&["sequence", "element"]);
        }

        let type_name = match element.attribute("type") {
            Some(type_ref) => expand_name(type_ref, element),
            None => return Vec::new(),
        };

        self.sections
            .schemas
            .iter()
            .flat_map(|schema| schema.children_named("complexType"))
            .find(|complex_type| {
                complex_type.name_attr() == type_name.local_name
                    && target_namespace(*complex_type) == type_name.namespace.as_deref()
            })
            .map(|complex_type| complex_type.descend(&["sequence", "element"]))
            .unwrap_or_default()
    }

    /// Keys of the operations whose input message carries `element_name`.
    ///
    /// The join runs message part -> portType operation input -> binding.
    /// The binding keeps an operation only when the part it selects for the
    /// SOAP body is the matched part: the `parts` filter if declared, the
    /// message's first part otherwise.
    fn operations_for_input_element(
        &self,
        element_name: &str,
        element_namespace: Option<&str>,
    ) -> Vec<String> {
        let mut matched = Vec::new();

        for (message_name, message) in &self.sections.messages {
            let message_namespace = target_namespace(*message);

            for part in message.children_named("part") {
                let refers = part
                    .attribute("element")
                    .map(|element| references(&expand_name(element, part), element_name, element_namespace))
                    .unwrap_or(false);
                if !refers {
                    continue;
                }

                for (port_type_name, port_operations) in &self.sections.port_type_operations {
                    for (operation_name, port_operation) in port_operations {
                        let input = match port_operation.first_child_named("input") {
                            Some(input) => input,
                            None => continue,
                        };
                        let message_ref = expand_name(input.attribute("message").unwrap_or_default(), input);
                        if !references(&message_ref, message_name, message_namespace) {
                            continue;
                        }

                        if !self.binding_selects_part(port_type_name, operation_name, *message, part) {
                            log::trace!(
                                "binding body of operation '{}' does not carry part '{}'",
                                operation_name,
                                part.name_attr()
                            );
                            continue;
                        }

                        let key = snake_case(operation_name);
                        if self.operations.contains_key(&key) && !matched.contains(&key) {
                            matched.push(key);
                        }
                    }
                }
            }
        }

        matched
    }

    fn binding_selects_part(
        &self,
        port_type: &str,
        operation: &str,
        message: Node<'a, 'input>,
        part: Node<'a, 'input>,
    ) -> bool {
        let parts = self
            .sections
            .bindings
            .iter()
            .filter(|binding| local_part(binding.attribute("type").unwrap_or_default()) == port_type)
            .flat_map(|binding| binding.children_named("operation"))
            .find(|binding_operation| binding_operation.name_attr() == operation)
            .and_then(|binding_operation| soap_body_parts(binding_operation, Direction::Input));

        select_part(message, parts).map_or(false, |selected| selected.id() == part.id())
    }
}

/// Key and pending state of one parameter element, or `None` for elements
/// with neither a type, an inline type, nor a reference
fn classify_parameter<'a, 'input>(
    child: Node<'a, 'input>,
) -> Option<(String, PendingParameter<'a, 'input>)> {
    if let Some(type_ref) = child.attribute("type") {
        let name = child.name_attr();
        let parameter = Parameter::new(name, &expand_name(type_ref, child));
        return Some((name.to_string(), PendingParameter::Resolved(parameter)));
    }

    if let Some(name) = child.attribute("name") {
        let inline = child.first_child_named("complexType").is_some()
            || child.first_child_named("simpleType").is_some();
        if inline {
            return Some((
                name.to_string(),
                PendingParameter::InlineType {
                    name: name.to_string(),
                    node: child,
                },
            ));
        }
    }

    child
        .attribute("ref")
        .map(|reference| (ref_key(reference), PendingParameter::Ref(child)))
}
