//! Document tree produced by the HTML tree builder.
//!
//! A [`Node`] is either an [`Element`] or a [`Text`] run. Children are owned
//! and kept in document order. The tree carries no parent links: the tree
//! builder tracks open ancestors on its own construction stack, so nothing
//! downstream can depend on them.
//!
//! The serde representation is the JSON tree output:
//!
//! ```json
//! { "type": "element", "tag": "p", "attributes": {}, "children": [
//!     { "type": "text", "text": "Hello" }
//! ] }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text(Text),
}

/// An element with its attributes and ordered children.
///
/// `flattened_tags` / `flattened_classes` record the single-child wrapper
/// chain collapsed into this element, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flattened_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flattened_classes: Option<Vec<String>>,
}

/// A decoded, trimmed text run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flattened_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flattened_classes: Option<Vec<String>>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            ..Default::default()
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Element children only
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

impl Text {
    pub fn new(content: &str) -> Self {
        Self {
            text: content.to_string(),
            ..Default::default()
        }
    }
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Node::Element(Element::new(tag))
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut element = Element::new(tag);
        for (name, value) in attrs {
            element.set_attr(name, value);
        }
        Node::Element(element)
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Node::Text(Text::new(content))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Tag name for elements, `None` for text
    pub fn tag_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag.as_str())
    }

    /// Text content for text nodes, `None` for elements
    pub fn text_value(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text.text.as_str()),
            Node::Element(_) => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.as_element()?.attr(name)
    }

    /// Child nodes (always empty for text)
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Text(_) => &[],
        }
    }

    /// Add a child node. Text nodes ignore children.
    pub fn add_child(&mut self, child: Node) {
        if let Node::Element(element) = self {
            element.add_child(child);
        }
    }

    pub fn flattened_tags(&self) -> Option<&[String]> {
        match self {
            Node::Element(element) => element.flattened_tags.as_deref(),
            Node::Text(text) => text.flattened_tags.as_deref(),
        }
    }

    pub fn flattened_classes(&self) -> Option<&[String]> {
        match self {
            Node::Element(element) => element.flattened_classes.as_deref(),
            Node::Text(text) => text.flattened_classes.as_deref(),
        }
    }

    /// Record a collapsed wrapper chain on this node
    pub fn set_flattened(&mut self, tags: Vec<String>, classes: Vec<String>) {
        let (tag_slot, class_slot) = match self {
            Node::Element(element) => (&mut element.flattened_tags, &mut element.flattened_classes),
            Node::Text(text) => (&mut text.flattened_tags, &mut text.flattened_classes),
        };
        *tag_slot = Some(tags);
        *class_slot = Some(classes);
    }

    /// Concatenated content of every descendant text node, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Whether any descendant text node (or this node) has non-blank content
    pub fn has_text(&self) -> bool {
        match self {
            Node::Text(text) => !text.text.trim().is_empty(),
            Node::Element(element) => element.children.iter().any(Node::has_text),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}
