//! Element reference resolution and generated-type backfill

use indexmap::IndexMap;
use roxmltree::Node;

use super::{Parser, PendingParameter};
use crate::documents::NodeExt;
use crate::error::{Error, ParseError, Result};
use crate::model::{MaxOccurs, Member, Parameter};
use crate::names::ref_key;
use crate::namespaces::{expand_name, QName};

/// A `ref=` element resolved against the top-level elements
#[derive(Debug, Clone)]
struct ResolvedRef {
    name: String,
    type_name: QName,
}

impl<'a, 'input: 'a> Parser<'a, 'input> {
    fn resolve_element_ref(&self, node: Node<'a, 'input>) -> Result<ResolvedRef> {
        let reference = node.attribute("ref").unwrap_or_default();
        let target = expand_name(reference, node);

        let element = self
            .top_level_elements
            .get(target.namespace.as_deref(), &target.local_name)
            .ok_or_else(|| Error::UnresolvedReference {
                reference: reference.to_string(),
                namespace: target.namespace.clone(),
            })?;

        Ok(ResolvedRef {
            name: target.local_name.clone(),
            type_name: QName {
                local_name: element.type_name.clone(),
                namespace: element.type_namespace.clone(),
                prefix: element.type_prefix.clone(),
            },
        })
    }

    /// Reference pass.
    ///
    /// Placeholder parameters are replaced in place under the referenced
    /// element's name. Referencing members are added to their types and the
    /// placeholders in `order`/`unordered` renamed.
    pub(super) fn resolve_refs(&mut self) -> Result<()> {
        let operations: Vec<String> = self.parameters.keys().cloned().collect();
        for operation in operations {
            let pending = self.parameters.get(&operation).cloned().unwrap_or_default();
            let mut resolved = IndexMap::with_capacity(pending.len());

            for (key, parameter) in pending {
                match parameter {
                    PendingParameter::Ref(node) => {
                        let target = self.resolve_element_ref(node)?;
                        log::trace!("parameter {} -> {}", key, target.name);
                        let parameter = Parameter::new(target.name.as_str(), &target.type_name);
                        resolved.insert(target.name, PendingParameter::Resolved(parameter));
                    }
                    other => {
                        resolved.insert(key, other);
                    }
                }
            }
            self.parameters.insert(operation, resolved);
        }

        let type_refs = std::mem::take(&mut self.type_refs);
        for ((namespace, type_name), nodes) in type_refs {
            let mut members = Vec::with_capacity(nodes.len());
            for node in nodes {
                let target = self.resolve_element_ref(node)?;
                let mut member = Member::new(target.type_name.local_name.as_str(), &target.type_name);
                member.min_occurs = node.attribute("minOccurs").and_then(|v| v.trim().parse().ok());
                member.max_occurs = node
                    .attribute("maxOccurs")
                    .and_then(|v| v.parse::<MaxOccurs>().ok());
                members.push((ref_key(node.attribute("ref").unwrap_or_default()), target.name, member));
            }

            if let Some(definition) = self.types.get_mut(namespace.as_deref(), &type_name) {
                for (placeholder, name, member) in members {
                    definition.rename_in_groups(&placeholder, &name);
                    definition.members.insert(name, member);
                }
            }
        }
        Ok(())
    }

    /// Backfill pass.
    ///
    /// Inline parameters take the generated type registered for their node,
    /// and every parameter is moved onto its operation.
    pub(super) fn backfill_generated_types(&mut self) -> Result<()> {
        let parameters = std::mem::take(&mut self.parameters);
        for (operation, pending) in parameters {
            let mut finished = IndexMap::with_capacity(pending.len());
            for (key, parameter) in pending {
                let parameter = match parameter {
                    PendingParameter::Resolved(parameter) => parameter,
                    PendingParameter::InlineType { name, node } => {
                        let generated = self.generated.get(&node.id()).ok_or_else(|| {
                            ParseError::new(format!("no generated type for parameter '{}'", name))
                                .with_location(node.describe())
                        })?;
                        Parameter::new(name, generated)
                    }
                    PendingParameter::Ref(node) => {
                        return Err(Error::UnresolvedReference {
                            reference: node.attribute("ref").unwrap_or_default().to_string(),
                            namespace: None,
                        })
                    }
                };
                finished.insert(key, parameter);
            }

            if let Some(target) = self.operations.get_mut(&operation) {
                target.parameters = finished;
            }
        }

        self.generated.clear();
        Ok(())
    }
}
