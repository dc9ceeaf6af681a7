//! Type catalog construction and deferred extension merges

use roxmltree::Node;

use super::{Parser, PendingExtension, TypeKey};
use crate::documents::NodeExt;
use crate::error::Result;
use crate::model::{
    BaseType, MaxOccurs, Member, SimpleRestriction, TopLevelElement, TypeDefinition,
    UnresolvedExtension,
};
use crate::names::{generated_name, ref_key, GENERATED_NAMESPACE};
use crate::namespaces::{expand_name, target_namespace, QName};
use crate::XSD_NAMESPACE;

/// Group a member element was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Sequence,
    All,
}

fn key(namespace: Option<&str>, name: &str) -> TypeKey {
    (namespace.map(str::to_string), name.to_string())
}

fn any_type() -> QName {
    QName::namespaced(XSD_NAMESPACE, "anyType")
}

impl<'a, 'input: 'a> Parser<'a, 'input> {
    /// Type catalog pass
    pub(super) fn parse_types(&mut self) -> Result<()> {
        for schema in self.sections.schemas.clone() {
            let namespace = target_namespace(schema);

            for node in schema.children().filter(|n| n.is_element()) {
                let name = node.name_attr();
                match node.tag_name().name() {
                    "element" => self.parse_top_level_element(namespace, node)?,
                    "complexType" => self.process_complex_type(namespace, node, name, 0)?,
                    "simpleType" => self.process_simple_type(namespace, node, name),
                    other => log::trace!("skipping schema child <{}>", other),
                }
            }
        }
        Ok(())
    }

    fn parse_top_level_element(&mut self, namespace: Option<&str>, node: Node<'a, 'input>) -> Result<()> {
        let name = node.name_attr();
        let own_type = || TopLevelElement {
            type_name: name.to_string(),
            type_namespace: namespace.map(str::to_string),
            type_prefix: None,
        };

        if let Some(complex_type) = node.first_child_named("complexType") {
            self.top_level_elements.insert(namespace, name, own_type());
            self.process_complex_type(namespace, complex_type, name, 0)?;
        } else if let Some(simple_type) = node.first_child_named("simpleType") {
            self.top_level_elements.insert(namespace, name, own_type());
            self.process_simple_type(namespace, simple_type, name);
        } else {
            let type_name = node
                .attribute("type")
                .map(|type_ref| expand_name(type_ref, node))
                .unwrap_or_else(any_type);
            self.top_level_elements.insert(namespace, name, type_name.into());
        }
        Ok(())
    }

    fn next_generated_name(&mut self) -> String {
        self.generated_count += 1;
        generated_name(self.generated_count)
    }

    /// Name an anonymous type and remember it for the node that declared it
    fn register_generated(&mut self, declaring: Node<'a, 'input>) -> String {
        let name = self.next_generated_name();
        log::trace!("{} declares anonymous type {}", declaring.describe(), name);
        self.generated
            .insert(declaring.id(), QName::namespaced(GENERATED_NAMESPACE, name.as_str()));
        name
    }

    fn process_simple_type(&mut self, namespace: Option<&str>, node: Node<'a, 'input>, name: &str) {
        let mut base_type = None;
        for restriction in node.children_named("restriction") {
            let base = expand_name(restriction.attribute("base").unwrap_or_default(), restriction);
            let enumeration: Vec<String> = restriction
                .children_named("enumeration")
                .filter_map(|e| e.attribute("value"))
                .map(str::to_string)
                .collect();
            let pattern = restriction
                .children_named("pattern")
                .filter_map(|p| p.attribute("value"))
                .last()
                .map(str::to_string);

            base_type = Some(BaseType::Restriction(SimpleRestriction {
                base,
                enumeration: if enumeration.is_empty() { None } else { Some(enumeration) },
                pattern,
            }));
        }

        let definition = self
            .types
            .get_or_insert_with(namespace, name, || TypeDefinition::new(namespace));
        if base_type.is_some() {
            definition.base_type = base_type;
        }
    }

    fn process_complex_type(
        &mut self,
        namespace: Option<&str>,
        node: Node<'a, 'input>,
        name: &str,
        depth: usize,
    ) -> Result<()> {
        self.limits.check_type_depth(depth)?;
        self.types
            .get_or_insert_with(namespace, name, || TypeDefinition::new(namespace));

        let attributes = node
            .children_named("attribute")
            .chain(node.descend(&["complexContent", "extension", "attribute"]))
            .chain(node.descend(&["simpleContent", "extension", "attribute"]));
        for attribute in attributes.collect::<Vec<_>>() {
            self.process_attribute(namespace, name, attribute);
        }

        for inner in node.descend(&["sequence", "element"]) {
            self.process_member(namespace, name, inner, Group::Sequence, depth)?;
        }
        for inner in node.descend(&["all", "element"]) {
            self.process_member(namespace, name, inner, Group::All, depth)?;
        }
        for inner in node.descend(&["complexContent", "extension", "sequence", "element"]) {
            self.process_member(namespace, name, inner, Group::Sequence, depth)?;
        }

        for extension in node.descend(&["complexContent", "extension"]) {
            if let Some(base) = extension.attribute("base") {
                let base = expand_name(base, extension);
                self.extend(key(namespace, name), base);
            }
        }
        Ok(())
    }

    fn process_attribute(&mut self, namespace: Option<&str>, type_name: &str, attribute: Node<'a, 'input>) {
        let attribute_type = if let Some(type_ref) = attribute.attribute("type") {
            Some(expand_name(type_ref, attribute))
        } else if let Some(simple_type) = attribute.first_child_named("simpleType") {
            let generated = self.register_generated(attribute);
            self.process_simple_type(Some(GENERATED_NAMESPACE), simple_type, &generated);
            Some(QName::namespaced(GENERATED_NAMESPACE, generated))
        } else {
            None
        };

        if let Some(definition) = self.types.get_mut(namespace, type_name) {
            definition
                .attributes
                .insert(attribute.name_attr().to_string(), attribute_type);
        }
    }

    fn process_member(
        &mut self,
        namespace: Option<&str>,
        type_name: &str,
        inner: Node<'a, 'input>,
        group: Group,
        depth: usize,
    ) -> Result<()> {
        let (member_name, member) = if let Some(reference) = inner.attribute("ref") {
            self.type_refs
                .entry(key(namespace, type_name))
                .or_default()
                .push(inner);
            (ref_key(reference), None)
        } else {
            let member_name = inner.name_attr().to_string();
            let member = self.member_for(inner, depth)?;
            (member_name, Some(member))
        };

        if let Some(definition) = self.types.get_mut(namespace, type_name) {
            if let Some(member) = member {
                definition.members.insert(member_name.clone(), member);
            }
            match group {
                Group::Sequence => definition.push_ordered(member_name),
                Group::All => definition.push_unordered(member_name),
            }
        }
        Ok(())
    }

    /// Member descriptor for a named element, naming and walking any
    /// anonymous type it declares
    fn member_for(&mut self, inner: Node<'a, 'input>, depth: usize) -> Result<Member> {
        let mut member = if let Some(type_ref) = inner.attribute("type") {
            Member::new(type_ref, &expand_name(type_ref, inner))
        } else if let Some(complex_type) = inner.first_child_named("complexType") {
            let generated = self.register_generated(inner);
            self.process_complex_type(Some(GENERATED_NAMESPACE), complex_type, &generated, depth + 1)?;
            Member::new(generated.as_str(), &QName::namespaced(GENERATED_NAMESPACE, generated.as_str()))
        } else if let Some(simple_type) = inner.first_child_named("simpleType") {
            let generated = self.register_generated(inner);
            self.process_simple_type(Some(GENERATED_NAMESPACE), simple_type, &generated);
            Member::new(generated.as_str(), &QName::namespaced(GENERATED_NAMESPACE, generated.as_str()))
        } else {
            Member::new("anyType", &any_type())
        };

        member.nillable = inner.attribute("nillable").and_then(|value| match value {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            other => {
                log::warn!("ignoring nillable='{}' on {}", other, inner.describe());
                None
            }
        });
        member.min_occurs = inner.attribute("minOccurs").and_then(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| log::warn!("ignoring minOccurs='{}' on {}", value, inner.describe()))
                .ok()
        });
        member.max_occurs = inner.attribute("maxOccurs").and_then(|value| {
            value
                .parse::<MaxOccurs>()
                .map_err(|err| log::warn!("{} on {}", err, inner.describe()))
                .ok()
        });
        Ok(member)
    }

    /// Catalog key of an extension base: the resolved QName first, then the
    /// same local name in the subtype's namespace
    fn find_base(&self, subtype: &TypeKey, base: &QName) -> Option<TypeKey> {
        if self.types.contains(base.namespace.as_deref(), &base.local_name) {
            return Some(key(base.namespace.as_deref(), &base.local_name));
        }
        if self.types.contains(subtype.0.as_deref(), &base.local_name) {
            return Some(key(subtype.0.as_deref(), &base.local_name));
        }
        None
    }

    fn is_pending(&self, type_key: &TypeKey) -> bool {
        self.pending_extensions
            .iter()
            .any(|pending| &pending.subtype == type_key)
    }

    /// Merge the base into `subtype` now if the base is complete, otherwise
    /// queue the merge
    fn extend(&mut self, subtype: TypeKey, base: QName) {
        match self.find_base(&subtype, &base) {
            Some(base_key) if !self.is_pending(&base_key) && base_key != subtype => {
                self.merge_extension(&subtype, &base_key);
            }
            _ => {
                log::trace!("deferring merge of {} into {:?}", base, subtype);
                self.pending_extensions.push(PendingExtension { subtype, base });
            }
        }
    }

    fn merge_extension(&mut self, subtype: &TypeKey, base_key: &TypeKey) {
        let base = match self.types.get(base_key.0.as_deref(), &base_key.1) {
            Some(base) => base.clone(),
            None => return,
        };
        if let Some(definition) = self.types.get_mut(subtype.0.as_deref(), &subtype.1) {
            definition.inherit(&base, &base_key.1);
        }

        if let Some(base_refs) = self.type_refs.get(base_key).cloned() {
            let own = self.type_refs.entry(subtype.clone()).or_default();
            let mut merged = base_refs;
            for node in own.drain(..) {
                if !merged.iter().any(|n| n.id() == node.id()) {
                    merged.push(node);
                }
            }
            *own = merged;
        }
        log::trace!("merged {:?} into {:?}", base_key, subtype);
    }

    /// Deferred merge pass.
    ///
    /// Merges are replayed in dependency order until no queued extension
    /// has a complete base. Whatever remains is reported.
    pub(super) fn replay_extensions(&mut self) {
        loop {
            let ready = self.pending_extensions.iter().enumerate().find_map(|(index, pending)| {
                self.find_base(&pending.subtype, &pending.base)
                    .filter(|base_key| !self.is_pending(base_key))
                    .map(|base_key| (index, base_key))
            });

            match ready {
                Some((index, base_key)) => {
                    let pending = self.pending_extensions.remove(index);
                    self.merge_extension(&pending.subtype, &base_key);
                }
                None => break,
            }
        }

        for pending in self.pending_extensions.drain(..) {
            log::warn!(
                "base type {} of {} was never defined or is cyclic; leaving it unmerged",
                pending.base,
                pending.subtype.1
            );
            self.unresolved_extensions.push(UnresolvedExtension {
                type_namespace: pending.subtype.0,
                type_name: pending.subtype.1,
                base: pending.base,
            });
        }
    }
}
