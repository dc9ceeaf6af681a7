//! XML document handling
//!
//! Parsing of WSDL text into a `roxmltree` tree under the configured
//! [`Limits`], plus the small set of navigation helpers the resolver passes
//! share. Structural matching is by local name; WSDL documents in the wild
//! mix prefixes and default namespaces freely for the same constructs.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::Result;
use crate::limits::Limits;

/// Parse XML text into a tree, enforcing size and node limits.
///
/// DTDs are rejected.
pub fn parse_document<'input>(text: &'input str, limits: &Limits) -> Result<Document<'input>> {
    limits.check_document_size(text.len())?;

    let mut options = ParsingOptions::default();
    options.allow_dtd = false;
    options.nodes_limit = limits.max_nodes;

    let document = Document::parse_with_options(text, options)?;
    log::trace!(
        "parsed document with root <{}>",
        document.root_element().tag_name().name()
    );
    Ok(document)
}

/// Navigation helpers over element nodes
pub trait NodeExt<'a, 'input: 'a> {
    /// Element children with the given local name, in document order
    fn children_named(self, local_name: &'a str) -> Box<dyn Iterator<Item = Node<'a, 'input>> + 'a>;

    /// First element child with the given local name
    fn first_child_named(self, local_name: &str) -> Option<Node<'a, 'input>>;

    /// First element child with the given namespace and local name
    fn first_child_ns(self, namespace: &str, local_name: &str) -> Option<Node<'a, 'input>>;

    /// Element children reached by following a path of local names
    fn descend(self, path: &[&str]) -> Vec<Node<'a, 'input>>;

    /// The `name` attribute, or an empty string
    fn name_attr(self) -> &'a str;

    /// Short path of the node for diagnostics (`/definitions/binding[Foo]`)
    fn describe(self) -> String;
}

impl<'a, 'input: 'a> NodeExt<'a, 'input> for Node<'a, 'input> {
    fn children_named(self, local_name: &'a str) -> Box<dyn Iterator<Item = Node<'a, 'input>> + 'a> {
        Box::new(
            self.children()
                .filter(move |n| n.is_element() && n.tag_name().name() == local_name),
        )
    }

    fn first_child_named(self, local_name: &str) -> Option<Node<'a, 'input>> {
        self.children()
            .find(|n| n.is_element() && n.tag_name().name() == local_name)
    }

    fn first_child_ns(self, namespace: &str, local_name: &str) -> Option<Node<'a, 'input>> {
        self.children().find(|n| {
            n.is_element()
                && n.tag_name().name() == local_name
                && n.tag_name().namespace() == Some(namespace)
        })
    }

    fn descend(self, path: &[&str]) -> Vec<Node<'a, 'input>> {
        let mut current = vec![self];
        for step in path {
            current = current
                .into_iter()
                .flat_map(move |node| {
                    node.children()
                        .filter(move |n| n.is_element() && n.tag_name().name() == *step)
                })
                .collect();
        }
        current
    }

    fn name_attr(self) -> &'a str {
        self.attribute("name").unwrap_or("")
    }

    fn describe(self) -> String {
        let mut segments: Vec<String> = self
            .ancestors()
            .filter(|n| n.is_element())
            .map(|n| match n.attribute("name") {
                Some(name) => format!("{}[{}]", n.tag_name().name(), name),
                None => n.tag_name().name().to_string(),
            })
            .collect();
        segments.reverse();
        format!("/{}", segments.join("/"))
    }
}
