//! Render tree: the backend-agnostic output of compilation.
//!
//! A render tree is made of [`Element`]s and text. Element fields are already
//! split into DOM `properties` and HTML `attributes` by the attribute mapper,
//! so a backend can apply them without consulting any HTML knowledge itself.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// Value of a property or attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean value; `true` renders as a bare attribute.
    Bool(bool),
    /// Integer value (`start`, `colspan`, ...).
    Number(i64),
    /// String value.
    String(String),
}

impl AttributeValue {
    /// JavaScript-style truthiness, used for strictly boolean properties.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Number(value) => *value != 0,
            Self::String(value) => !value.is_empty(),
        }
    }

    /// String form of the value, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Insertion-ordered name/value map.
///
/// Order matters for deterministic output: fields appear in the order the
/// compiler declared them, with overrides replacing values in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, AttributeValue)>);

impl Attributes {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Get the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Insert a value, replacing an existing one in place.
    ///
    /// Returns the previous value, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> Option<AttributeValue> {
        let name = name.into();
        if let Some((_, slot)) = self.0.iter_mut().find(|(key, _)| *key == name) {
            return Some(std::mem::replace(slot, value));
        }
        self.0.push((name, value));
        None
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttributeValue);
    type IntoIter = std::vec::IntoIter<(String, AttributeValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Element node of the render tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Lower-case tag name.
    pub tag_name: String,
    /// Fields placed as DOM properties, keyed by DOM name (`className`).
    pub properties: Attributes,
    /// Fields placed as HTML attributes, keyed by attribute name.
    pub attributes: Attributes,
    /// Reconciliation key assigned during materialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Child nodes.
    pub children: Vec<RenderNode>,
}

impl Element {
    /// Create an element without fields or children.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children = children;
        self
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(RenderNode::as_element)
    }
}

fn collect_text(nodes: &[RenderNode], out: &mut String) {
    for node in nodes {
        match node {
            RenderNode::Text(text) => out.push_str(text),
            RenderNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Node of the render tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderNode {
    /// An element with fields and children.
    Element(Element),
    /// Literal text.
    Text(String),
}

impl RenderNode {
    /// Create a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The element, if this is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Mutable access to the element, if this is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// The text, if this is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Element(element) => element.text_content(),
        }
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl Serialize for RenderNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Element(element) => {
                let len = if element.key.is_some() { 6 } else { 5 };
                let mut state = serializer.serialize_struct("Element", len)?;
                state.serialize_field("type", "element")?;
                state.serialize_field("tagName", &element.tag_name)?;
                state.serialize_field("properties", &element.properties)?;
                state.serialize_field("attributes", &element.attributes)?;
                if let Some(key) = &element.key {
                    state.serialize_field("key", key)?;
                }
                state.serialize_field("children", &element.children)?;
                state.end()
            }
            Self::Text(text) => {
                let mut state = serializer.serialize_struct("Text", 2)?;
                state.serialize_field("type", "text")?;
                state.serialize_field("value", text)?;
                state.end()
            }
        }
    }
}
