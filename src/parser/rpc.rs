//! RPC pseudo types
//!
//! RPC-style bindings wrap the message parts in an element named after the
//! operation rather than a schema element. For each `portType/operation`
//! the resolver manufactures a type for each side and registers it as the
//! top-level element of the message. The names start with `&`, which no XML
//! name can, so they never collide with schema types.

use roxmltree::Node;

use super::{Parser, PendingParameter};
use crate::documents::NodeExt;
use crate::error::{Error, Result};
use crate::model::{Member, Parameter, Style, TopLevelElement, TypeDefinition};
use crate::names::{pseudo_type_name, snake_case};
use crate::namespaces::expand_name;

impl<'a, 'input: 'a> Parser<'a, 'input> {
    /// RPC pseudo-type pass
    pub(super) fn parse_rpc_pseudo_types(&mut self) -> Result<()> {
        if self.style != Style::Rpc {
            return Ok(());
        }

        let root = self.document.root_element();
        for operation in root.descend(&["portType", "operation"]) {
            let operation_name = operation.name_attr();
            let operation_key = snake_case(operation_name);

            if let Some(input) = operation.first_child_named("input") {
                self.add_pseudo_type(input, &operation_key, |_| pseudo_type_name(operation_name))?;
            }
            if let Some(output) = operation.first_child_named("output") {
                self.add_pseudo_type(output, &operation_key, pseudo_type_name)?;
            }
        }
        Ok(())
    }

    /// Register the pseudo type for one side of an operation.
    ///
    /// `type_name` maps the message's local name to the pseudo type name.
    /// Parts of input messages also become parameters of the operation.
    fn add_pseudo_type(
        &mut self,
        io: Node<'a, 'input>,
        operation_key: &str,
        type_name: impl FnOnce(&str) -> String,
    ) -> Result<()> {
        let message_ref = match io.attribute("message") {
            Some(message_ref) => expand_name(message_ref, io),
            None => {
                log::warn!("{} names no message", io.describe());
                return Ok(());
            }
        };
        let is_input = io.tag_name().name() == "input";
        let type_name = type_name(&message_ref.local_name);
        let namespace = message_ref.namespace.as_deref();

        self.top_level_elements.insert(
            namespace,
            message_ref.local_name.as_str(),
            TopLevelElement {
                type_name: type_name.clone(),
                type_namespace: message_ref.namespace.clone(),
                type_prefix: message_ref.prefix.clone(),
            },
        );

        let mut pseudo = TypeDefinition::new(namespace);
        let message = self.sections.messages.get(message_ref.local_name.as_str()).copied();
        if message.is_none() {
            log::warn!("message '{}' is not declared", message_ref);
        }
        if is_input && !self.operations.contains_key(operation_key) {
            log::warn!(
                "RPC operation '{}' has no binding operation; its parts are not attached",
                operation_key
            );
        }

        for part in message.into_iter().flat_map(|m| m.children_named("part")) {
            let part_name = part.name_attr();
            let type_ref = part.attribute("type").ok_or_else(|| Error::UnsupportedRpcPart {
                message: message_ref.local_name.clone(),
                part: part_name.to_string(),
            })?;
            let part_type = expand_name(type_ref, part);

            pseudo.push_ordered(part_name);
            pseudo
                .members
                .insert(part_name.to_string(), Member::new(type_ref, &part_type));

            if is_input && self.operations.contains_key(operation_key) {
                self.add_parameter(
                    operation_key,
                    part_name.to_string(),
                    PendingParameter::Resolved(Parameter::new(part_name, &part_type)),
                );
            }
        }

        log::trace!(
            "pseudo type '{}' with {} members",
            type_name,
            pseudo.members.len()
        );
        self.pseudo_types.insert(namespace, type_name, pseudo);
        Ok(())
    }
}
