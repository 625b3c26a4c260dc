//! Helpers over `roxmltree` nodes.
//!
//! Elements are matched by local name only; EWS never reuses a local name
//! across the types/messages namespaces in a way that matters here.

use std::str::FromStr;

use roxmltree::Node;

use super::names;
use crate::error::{EwsError, EwsResult};

/// Child elements of `node`, skipping text and comments.
pub fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// First child element named `local_name`.
pub fn child<'a, 'input>(node: Node<'a, 'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    child_elements(node).find(|n| n.tag_name().name() == local_name)
}

pub fn required_child<'a, 'input>(
    node: Node<'a, 'input>,
    local_name: &str,
) -> EwsResult<Node<'a, 'input>> {
    child(node, local_name).ok_or_else(|| {
        EwsError::UnexpectedXml(format!(
            "element {} is missing child element {}",
            node.tag_name().name(),
            local_name
        ))
    })
}

pub fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> EwsResult<&'a str> {
    node.attribute(name).ok_or_else(|| {
        EwsError::UnexpectedXml(format!(
            "element {} is missing attribute {}",
            node.tag_name().name(),
            name
        ))
    })
}

/// An `Id` attribute, trimmed the same way as [`element_text`] so that ids
/// declared in attributes and ids referenced in element bodies compare equal.
pub fn required_id<'a>(node: Node<'a, '_>) -> EwsResult<&'a str> {
    required_attribute(node, names::ATTR_ID).map(str::trim)
}

/// Fails unless `node` is the element `local_name`.
pub fn expect_element(node: Node<'_, '_>, local_name: &str) -> EwsResult<()> {
    if node.tag_name().name() == local_name {
        Ok(())
    } else {
        Err(EwsError::UnexpectedXml(format!(
            "expected element {}, found {}",
            local_name,
            node.tag_name().name()
        )))
    }
}

/// Text content of an element, trimmed; empty when the element has none.
pub fn element_text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().map(str::trim).unwrap_or("")
}

/// Parses the text of the child element `local_name`.
pub fn read_child_value<T: FromStr>(node: Node<'_, '_>, local_name: &str) -> EwsResult<T> {
    let element = required_child(node, local_name)?;
    let text = element_text(element);
    text.parse()
        .map_err(|_| EwsError::invalid_value(local_name, text))
}

/// Finds the first descendant (or `node` itself) with the given local name.
pub fn find_element<'a, 'input>(
    node: Node<'a, 'input>,
    local_name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == local_name)
}
