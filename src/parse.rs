//! Build the element tree from `roxmltree`

use crate::dom::{Document, Element, Node};
use crate::errors::{LabelError, Result};
use miette::{NamedSource, SourceSpan};
use roxmltree::NodeType;

/// Parse a `label.xml` document.
pub fn parse(source: &str) -> Result<Document> {
    parse_named("label.xml", source)
}

/// Parse a document, naming it `name` in diagnostics.
pub fn parse_named(name: &str, source: &str) -> Result<Document> {
    let xml = roxmltree::Document::parse(source).map_err(|e| {
        let pos = e.pos();
        let offset = byte_offset(source, pos.row, pos.col);
        syntax(name, source, e.to_string(), (offset, 0))
    })?;

    Ok(Document::new(convert(xml.root_element())))
}

/// Parse raw `label.xml` bytes, which must be UTF-8.
pub fn parse_bytes(name: &str, bytes: &[u8]) -> Result<Document> {
    match std::str::from_utf8(bytes) {
        Ok(text) => parse_named(name, text),
        Err(e) => {
            // The valid prefix survives the lossy copy unchanged, so the bad
            // bytes start at the same offset there.
            let text = String::from_utf8_lossy(bytes);
            let span = (e.valid_up_to(), char::REPLACEMENT_CHARACTER.len_utf8());
            Err(syntax(name, &text, "document is not valid UTF-8", span))
        }
    }
}

fn syntax(
    name: &str,
    text: &str,
    message: impl Into<String>,
    span: impl Into<SourceSpan>,
) -> LabelError {
    LabelError::Syntax {
        message: message.into(),
        src: NamedSource::new(name, text.to_string()),
        span: span.into(),
    }
}

/// Byte offset of a 1-based row and character column.
fn byte_offset(text: &str, row: u32, col: u32) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(row.saturating_sub(1) as usize)
        .map(str::len)
        .sum();
    let line = &text[line_start.min(text.len())..];
    line.char_indices()
        .nth(col.saturating_sub(1) as usize)
        .map_or(text.len(), |(i, _)| line_start + i)
}

/// Copy a roxmltree element into an owned [`Element`].
///
/// Names keep the prefix the document used (`text:text`), so lookups
/// match the written form rather than the namespace URI.
fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(qualified(node, tag.namespace(), tag.name()));
    for attr in node.attributes() {
        element.set_attr(qualified(node, attr.namespace(), attr.name()), attr.value());
    }

    for child in node.children() {
        match child.node_type() {
            NodeType::Element => element.push_node(Node::Element(convert(child))),
            NodeType::Text => {
                let text = child.text().unwrap_or_default();
                element.push_node(Node::Text(text.to_string()));
            }
            _ => {}
        }
    }
    element
}

fn qualified(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}
