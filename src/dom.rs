//! Element tree for label documents
//!
//! The renderer only needs a small capability surface over the parsed
//! document: first/all descendants by qualified tag name, direct children,
//! attribute lookup and text content. Tag names are namespaced and
//! case-sensitive (`text:text`, `pt:objectStyle`).

use std::fmt;

/// Identity of an element: its position in document (pre-)order.
///
/// Ids are assigned by [`Document::new`], so they are stable for the lifetime
/// of a document and usable as keys in side tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    name: String,
    attributes: Vec<(String, String)>,
    nodes: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ElementId::default(),
            name: name.into(),
            attributes: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.nodes.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.nodes.push(Node::Text(text.into()));
        self
    }

    /// Set an attribute, replacing an existing value of the same name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Qualified tag name, e.g. `text:text`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Direct element children in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children().find(|el| el.name == tag)
    }

    /// All descendants (not including `self`) in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.nodes.iter()],
        }
    }

    /// First descendant with the given tag, in document order.
    pub fn first(&self, tag: &str) -> Option<&Element> {
        self.descendants().find(|el| el.name == tag)
    }

    /// All descendants with the given tag, in document order.
    pub fn all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |el| el.name == tag)
    }

    /// Descendants with the given tag, not looking inside elements named `fence`.
    pub fn all_within<'a>(&'a self, tag: &str, fence: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        collect_within(self, tag, fence, &mut found);
        found
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        append_text(self, &mut out);
        out
    }

    fn number(&mut self, next: &mut usize) {
        self.id = ElementId(*next);
        *next += 1;
        for node in &mut self.nodes {
            if let Node::Element(el) = node {
                el.number(next);
            }
        }
    }
}

fn collect_within<'a>(el: &'a Element, tag: &str, fence: &str, found: &mut Vec<&'a Element>) {
    for child in el.children() {
        if child.name == tag {
            found.push(child);
        }
        if child.name != fence {
            collect_within(child, tag, fence, found);
        }
    }
}

fn append_text(el: &Element, out: &mut String) {
    for node in &el.nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => append_text(child, out),
        }
    }
}

/// Pre-order iterator over the element descendants of an element.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Node::Element(el)) => {
                    self.stack.push(el.nodes.iter());
                    return Some(el);
                }
                Some(Node::Text(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A parsed label document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
    len: usize,
}

impl Document {
    /// Wrap a tree, numbering every element in document order.
    pub fn new(mut root: Element) -> Self {
        let mut next = 0;
        root.number(&mut next);
        Self { root, len: next }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First element with the given tag, the root included.
    pub fn first(&self, tag: &str) -> Option<&Element> {
        if self.root.name == tag {
            Some(&self.root)
        } else {
            self.root.first(tag)
        }
    }

    /// All elements with the given tag, the root included.
    pub fn all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        std::iter::once(&self.root)
            .chain(self.root.descendants())
            .filter(move |el| el.name == tag)
    }
}
