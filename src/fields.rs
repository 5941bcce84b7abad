//! Merge fields
//!
//! Every `pt:data` node is a merge field. Field names come from the sibling
//! `pt:objectStyle`'s `pt:expanded` block, falling back to `Field{N}` where N
//! counts data nodes in document order. Resolution never touches the parsed
//! tree: resolved text lives in a side table keyed by the data node's id.

use std::collections::{BTreeMap, HashMap};

use crate::dom::{Document, Element, ElementId};
use crate::errors::{LabelError, Result};
use crate::log::debug;

/// One named field and its current value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeField {
    pub name: String,
    pub value: String,
    /// Data nodes bound to this name, in document order.
    pub nodes: Vec<ElementId>,
}

/// Resolved merge fields for one document snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldTable {
    fields: Vec<MergeField>,
    text: HashMap<ElementId, String>,
}

/// Fold state while walking data nodes.
struct Fold<'a> {
    counter: usize,
    by_name: HashMap<String, usize>,
    table: FieldTable,
    overwrites: &'a HashMap<String, String>,
    previous: Option<&'a FieldTable>,
}

impl Fold<'_> {
    fn visit(&mut self, data: &Element, style: &Element) {
        self.counter += 1;
        let name = field_name(style).unwrap_or_else(|| format!("Field{}", self.counter));

        let value = match (self.overwrites.get(&name), self.by_name.get(&name)) {
            (Some(value), _) => value.clone(),
            (None, Some(&index)) => self.table.fields[index].value.clone(),
            (None, None) => self
                .previous
                .and_then(|table| table.text(data.id()))
                .map(str::to_string)
                .unwrap_or_else(|| data.text_content()),
        };

        self.table.text.insert(data.id(), value.clone());
        match self.by_name.get(&name) {
            Some(&index) => self.table.fields[index].nodes.push(data.id()),
            None => {
                self.by_name.insert(name.clone(), self.table.fields.len());
                self.table.fields.push(MergeField {
                    name,
                    value,
                    nodes: vec![data.id()],
                });
            }
        }
    }
}

impl FieldTable {
    /// Discover fields with their literal document text.
    pub fn discover(document: &Document) -> Result<FieldTable> {
        Self::resolve(document, &HashMap::new(), None)
    }

    /// Resolve fields, applying `overwrites` by name.
    ///
    /// Fields without an overwrite keep their text from `previous` when given,
    /// so earlier overwrites persist.
    pub fn resolve(
        document: &Document,
        overwrites: &HashMap<String, String>,
        previous: Option<&FieldTable>,
    ) -> Result<FieldTable> {
        let mut fold = Fold {
            counter: 0,
            by_name: HashMap::new(),
            table: FieldTable::default(),
            overwrites,
            previous,
        };
        walk(document.root(), &mut fold)?;

        for name in overwrites.keys() {
            if !fold.by_name.contains_key(name) {
                debug!(name = name.as_str(), "ignoring overwrite for unknown field");
            }
        }

        Ok(fold.table)
    }

    /// Resolved text of a data node.
    pub fn text(&self, data: ElementId) -> Option<&str> {
        self.text.get(&data).map(String::as_str)
    }

    /// Fields in document order.
    pub fn iter(&self) -> impl Iterator<Item = &MergeField> {
        self.fields.iter()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Field names mapped to their current values.
    pub fn values(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Visit data nodes in document order; a data node's style is a sibling.
fn walk(el: &Element, fold: &mut Fold<'_>) -> Result<()> {
    for child in el.children() {
        if child.name() == "pt:data" {
            let style = el
                .child("pt:objectStyle")
                .ok_or_else(|| LabelError::MissingObjectStyle {
                    tag: el.name().to_string(),
                })?;
            fold.visit(child, style);
        }
        walk(child, fold)?;
    }
    Ok(())
}

/// Explicit merge-field name, else object name. Empty attributes don't count.
fn field_name(style: &Element) -> Option<String> {
    let expanded = style.first("pt:expanded")?;
    ["dbMergeFieldStyleName", "objectName"]
        .into_iter()
        .filter_map(|attr| expanded.attr(attr))
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_object(expanded: Option<(&str, &str)>, data: &str) -> Element {
        let mut style = Element::new("pt:objectStyle");
        if let Some((attr, value)) = expanded {
            style = style.with_child(Element::new("pt:expanded").with_attr(attr, value));
        }
        Element::new("text:text")
            .with_child(style)
            .with_child(Element::new("pt:data").with_text(data))
    }

    fn label(objects: Vec<Element>) -> Document {
        let container = objects
            .into_iter()
            .fold(Element::new("pt:objects"), Element::with_child);
        Document::new(Element::new("pt:document").with_child(container))
    }

    fn overwrites(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn names_prefer_merge_field_then_object_name_then_counter() {
        let doc = label(vec![
            text_object(Some(("dbMergeFieldStyleName", "Price")), "1.99"),
            text_object(Some(("objectName", "Title")), "Apples"),
            text_object(None, "fresh"),
            text_object(Some(("objectName", "")), "daily"),
        ]);
        let table = FieldTable::discover(&doc).unwrap();
        let names: Vec<&str> = table.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Price", "Title", "Field3", "Field4"]);
        assert_eq!(table.get("Field3"), Some("fresh"));
    }

    #[test]
    fn discovery_is_repeatable() {
        let doc = label(vec![text_object(None, "a"), text_object(None, "b")]);
        assert_eq!(
            FieldTable::discover(&doc).unwrap(),
            FieldTable::discover(&doc).unwrap()
        );
    }

    #[test]
    fn overwrites_replace_text_without_touching_the_tree() {
        let doc = label(vec![text_object(Some(("objectName", "Title")), "Apples")]);
        let before = doc.clone();
        let table =
            FieldTable::resolve(&doc, &overwrites(&[("Title", "Pears")]), None).unwrap();
        let data = doc.first("pt:data").unwrap();
        assert_eq!(table.text(data.id()), Some("Pears"));
        assert_eq!(doc, before);
    }

    #[test]
    fn applying_discovered_values_is_idempotent() {
        let doc = label(vec![
            text_object(Some(("objectName", "Title")), "Apples"),
            text_object(None, "fresh"),
        ]);
        let discovered = FieldTable::discover(&doc).unwrap();
        let values: HashMap<String, String> = discovered.values().into_iter().collect();
        let applied = FieldTable::resolve(&doc, &values, Some(&discovered)).unwrap();
        assert_eq!(applied.values(), discovered.values());
    }

    #[test]
    fn earlier_overwrites_persist() {
        let doc = label(vec![
            text_object(Some(("objectName", "A")), "a"),
            text_object(Some(("objectName", "B")), "b"),
        ]);
        let first = FieldTable::resolve(&doc, &overwrites(&[("A", "x")]), None).unwrap();
        let second =
            FieldTable::resolve(&doc, &overwrites(&[("B", "y")]), Some(&first)).unwrap();
        assert_eq!(second.get("A"), Some("x"));
        assert_eq!(second.get("B"), Some("y"));
    }

    #[test]
    fn duplicate_names_share_the_first_value() {
        let doc = label(vec![
            text_object(Some(("objectName", "Same")), "first"),
            text_object(Some(("objectName", "Same")), "second"),
        ]);
        let table = FieldTable::discover(&doc).unwrap();
        assert_eq!(table.len(), 1);
        let ids: Vec<ElementId> = doc.all("pt:data").map(|el| el.id()).collect();
        assert_eq!(table.text(ids[0]), Some("first"));
        assert_eq!(table.text(ids[1]), Some("first"));
    }

    #[test]
    fn data_without_style_is_an_error() {
        let doc = Document::new(
            Element::new("pt:objects")
                .with_child(Element::new("text:text").with_child(Element::new("pt:data"))),
        );
        let err = FieldTable::discover(&doc).unwrap_err();
        assert!(
            matches!(err, LabelError::MissingObjectStyle { ref tag } if tag == "text:text"),
            "got {err:?}"
        );
    }
}
