//! Source tree: a Markdown syntax tree in the mdast shape.
//!
//! [`Node`] is a closed enum with one variant per construct the compiler
//! knows, plus [`Node::Unknown`] for discriminants it does not. Trees are
//! either built directly (see the `mdvdom-cmark` crate) or loaded from mdast
//! JSON with [`Node::from_json`].

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::tree::AttributeValue;

/// Point in the source document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Span of a node in the source document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

/// Ordered field overrides carried in [`Data::render_attributes`].
///
/// `None` values are kept so an override can remove a default field. Arrays
/// of scalars are joined with spaces (`["a", "b"]` becomes `"a b"`) and
/// non-integral numbers are kept in their JSON spelling. Values with no
/// attribute form, such as nested objects, are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides(pub Vec<(String, Option<AttributeValue>)>);

impl Overrides {
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&AttributeValue>)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }
}

impl<'de> Deserialize<'de> for Overrides {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OverridesVisitor;

        impl<'de> Visitor<'de> for OverridesVisitor {
            type Value = Overrides;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of attribute overrides")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    if value.is_null() {
                        entries.push((key, None));
                    } else if let Some(value) = override_value(&value) {
                        entries.push((key, Some(value)));
                    } else {
                        tracing::debug!(attribute = %key, %value, "Skipped override value");
                    }
                }
                Ok(Overrides(entries))
            }
        }

        deserializer.deserialize_map(OverridesVisitor)
    }
}

fn override_value(value: &Value) -> Option<AttributeValue> {
    match value {
        Value::Bool(flag) => Some(AttributeValue::Bool(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Some(AttributeValue::Number(integer)),
            None => Some(AttributeValue::String(number.to_string())),
        },
        Value::String(text) => Some(AttributeValue::String(text.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(|parts| AttributeValue::String(parts.join(" "))),
        Value::Null | Value::Object(_) => None,
    }
}

/// Table alignments, with `null` for both the whole list and single columns.
fn lenient_align<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Option<Align>>, D::Error> {
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .iter()
        .map(|item| match item.as_str() {
            Some("left") => Some(Align::Left),
            Some("right") => Some(Align::Right),
            Some("center") => Some(Align::Center),
            _ => None,
        })
        .collect())
}

/// Render overrides attached to a source node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    /// Replaces the tag name the compiler would use.
    #[serde(default, alias = "htmlName", alias = "hName")]
    pub render_name: Option<String>,
    /// Merged over the compiler's default fields; overrides win.
    #[serde(default, alias = "htmlAttributes", alias = "hProperties")]
    pub render_attributes: Overrides,
}

/// Column alignment in a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

/// How a reference was written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    /// `[foo]`
    Shortcut,
    /// `[foo][]`
    Collapsed,
    /// `[text][foo]`
    #[default]
    Full,
}

/// Container with children only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parent {
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

/// Node without children or value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Void {
    pub data: Option<Data>,
    pub position: Option<Position>,
}

/// Leaf carrying literal text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Literal {
    pub value: String,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Heading {
    pub depth: u8,
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub start: Option<i64>,
    pub loose: bool,
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListItem {
    /// `Some` for task list items.
    pub checked: Option<bool>,
    pub loose: bool,
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub align: Vec<Option<Align>>,
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Code {
    pub lang: Option<String>,
    pub value: String,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    pub url: String,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkReference {
    pub identifier: String,
    pub reference_type: ReferenceType,
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageReference {
    pub identifier: String,
    pub reference_type: ReferenceType,
    pub alt: Option<String>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FootnoteReference {
    pub identifier: String,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FootnoteDefinition {
    pub identifier: String,
    pub children: Vec<Node>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Definition {
    pub identifier: String,
    pub url: String,
    pub title: Option<String>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

/// Node with a discriminant the compiler has no rule for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Unknown {
    pub node_type: String,
    pub children: Option<Vec<Node>>,
    pub value: Option<String>,
    pub data: Option<Data>,
    pub position: Option<Position>,
}

/// Source tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Root(Parent),
    Paragraph(Parent),
    Heading(Heading),
    Blockquote(Parent),
    List(List),
    ListItem(ListItem),
    Table(Table),
    TableRow(Parent),
    TableCell(Parent),
    ThematicBreak(Void),
    Break(Void),
    Text(Literal),
    Emphasis(Parent),
    Strong(Parent),
    Delete(Parent),
    InlineCode(Literal),
    Code(Code),
    Html(Literal),
    Yaml(Literal),
    Link(Link),
    Image(Image),
    LinkReference(LinkReference),
    ImageReference(ImageReference),
    Footnote(Parent),
    FootnoteReference(FootnoteReference),
    FootnoteDefinition(FootnoteDefinition),
    Definition(Definition),
    Unknown(Unknown),
}

/// Scalar fields of any node, read in one pass.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Fields {
    value: Option<String>,
    depth: Option<u8>,
    ordered: Option<bool>,
    start: Option<i64>,
    #[serde(alias = "spread")]
    loose: Option<bool>,
    checked: Option<bool>,
    #[serde(deserialize_with = "lenient_align")]
    align: Vec<Option<Align>>,
    lang: Option<String>,
    #[serde(alias = "href", alias = "src", alias = "link")]
    url: Option<String>,
    title: Option<String>,
    alt: Option<String>,
    identifier: Option<String>,
    reference_type: Option<ReferenceType>,
    data: Option<Data>,
    position: Option<Position>,
}

impl Node {
    /// Load a node from mdast JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdvdom::Node;
    ///
    /// let root = Node::from_json(r#"{"type": "root", "children": [{"type": "thematicBreak"}]}"#)?;
    /// assert_eq!(root.node_type(), "root");
    /// assert_eq!(root.children().map(<[_]>::len), Some(1));
    /// # Ok::<(), mdvdom::Error>(())
    /// ```
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Convert a parsed JSON value into a node.
    ///
    /// Fails with [`Error::MissingType`] when the value, or any value in a
    /// `children` array below it, is not an object with a string `type`.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(missing_type(&value));
        };
        let node_type = match map.get("type") {
            Some(Value::String(node_type)) => node_type.clone(),
            _ => return Err(missing_type(&Value::Object(map))),
        };

        let children = match map.remove("children") {
            Some(Value::Array(items)) => {
                let children = items.into_iter().map(Self::from_value);
                Some(children.collect::<Result<Vec<_>>>()?)
            }
            _ => None,
        };
        let fields: Fields = serde_json::from_value(Value::Object(map))?;

        Ok(Self::assemble(node_type, children, fields))
    }

    fn assemble(node_type: String, children: Option<Vec<Node>>, fields: Fields) -> Self {
        let Fields {
            value,
            depth,
            ordered,
            start,
            loose,
            checked,
            align,
            lang,
            url,
            title,
            alt,
            identifier,
            reference_type,
            data,
            position,
        } = fields;
        let has_children = children.is_some();
        let kids = children.unwrap_or_default();
        macro_rules! parent {
            () => {
                Parent {
                    children: kids,
                    data,
                    position,
                }
            };
        }
        macro_rules! literal {
            () => {
                Literal {
                    value: value.unwrap_or_default(),
                    data,
                    position,
                }
            };
        }

        match node_type.as_str() {
            "root" => Self::Root(parent!()),
            "paragraph" => Self::Paragraph(parent!()),
            "blockquote" => Self::Blockquote(parent!()),
            "tableRow" => Self::TableRow(parent!()),
            "tableCell" => Self::TableCell(parent!()),
            "emphasis" => Self::Emphasis(parent!()),
            "strong" => Self::Strong(parent!()),
            "delete" => Self::Delete(parent!()),
            "footnote" => Self::Footnote(parent!()),
            "thematicBreak" | "horizontalRule" => Self::ThematicBreak(Void { data, position }),
            "break" => Self::Break(Void { data, position }),
            "text" => Self::Text(literal!()),
            "inlineCode" => Self::InlineCode(literal!()),
            "html" => Self::Html(literal!()),
            "yaml" => Self::Yaml(literal!()),
            "heading" => Self::Heading(Heading {
                depth: depth.unwrap_or(1),
                children: kids,
                data,
                position,
            }),
            "list" => Self::List(List {
                ordered: ordered.unwrap_or(false),
                start,
                loose: loose.unwrap_or(false),
                children: kids,
                data,
                position,
            }),
            "listItem" => Self::ListItem(ListItem {
                checked,
                loose: loose.unwrap_or(false),
                children: kids,
                data,
                position,
            }),
            "table" => Self::Table(Table {
                align,
                children: kids,
                data,
                position,
            }),
            "code" => Self::Code(Code {
                lang,
                value: value.unwrap_or_default(),
                data,
                position,
            }),
            "link" => Self::Link(Link {
                url: url.unwrap_or_default(),
                title,
                children: kids,
                data,
                position,
            }),
            "image" => Self::Image(Image {
                url: url.unwrap_or_default(),
                title,
                alt,
                data,
                position,
            }),
            "linkReference" => Self::LinkReference(LinkReference {
                identifier: identifier.unwrap_or_default(),
                reference_type: reference_type.unwrap_or_default(),
                children: kids,
                data,
                position,
            }),
            "imageReference" => Self::ImageReference(ImageReference {
                identifier: identifier.unwrap_or_default(),
                reference_type: reference_type.unwrap_or_default(),
                alt,
                data,
                position,
            }),
            "footnoteReference" => Self::FootnoteReference(FootnoteReference {
                identifier: identifier.unwrap_or_default(),
                data,
                position,
            }),
            "footnoteDefinition" => Self::FootnoteDefinition(FootnoteDefinition {
                identifier: identifier.unwrap_or_default(),
                children: kids,
                data,
                position,
            }),
            "definition" => Self::Definition(Definition {
                identifier: identifier.unwrap_or_default(),
                url: url.unwrap_or_default(),
                title,
                data,
                position,
            }),
            _ => Self::Unknown(Unknown {
                node_type,
                children: has_children.then_some(kids),
                value,
                data,
                position,
            }),
        }
    }

    /// The mdast discriminant of this node.
    #[must_use]
    pub fn node_type(&self) -> &str {
        match self {
            Self::Root(_) => "root",
            Self::Paragraph(_) => "paragraph",
            Self::Heading(_) => "heading",
            Self::Blockquote(_) => "blockquote",
            Self::List(_) => "list",
            Self::ListItem(_) => "listItem",
            Self::Table(_) => "table",
            Self::TableRow(_) => "tableRow",
            Self::TableCell(_) => "tableCell",
            Self::ThematicBreak(_) => "thematicBreak",
            Self::Break(_) => "break",
            Self::Text(_) => "text",
            Self::Emphasis(_) => "emphasis",
            Self::Strong(_) => "strong",
            Self::Delete(_) => "delete",
            Self::InlineCode(_) => "inlineCode",
            Self::Code(_) => "code",
            Self::Html(_) => "html",
            Self::Yaml(_) => "yaml",
            Self::Link(_) => "link",
            Self::Image(_) => "image",
            Self::LinkReference(_) => "linkReference",
            Self::ImageReference(_) => "imageReference",
            Self::Footnote(_) => "footnote",
            Self::FootnoteReference(_) => "footnoteReference",
            Self::FootnoteDefinition(_) => "footnoteDefinition",
            Self::Definition(_) => "definition",
            Self::Unknown(unknown) => &unknown.node_type,
        }
    }

    /// Children of container nodes, `None` for leaves.
    #[must_use]
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Self::Root(node)
            | Self::Paragraph(node)
            | Self::Blockquote(node)
            | Self::TableRow(node)
            | Self::TableCell(node)
            | Self::Emphasis(node)
            | Self::Strong(node)
            | Self::Delete(node)
            | Self::Footnote(node) => Some(&node.children),
            Self::Heading(node) => Some(&node.children),
            Self::List(node) => Some(&node.children),
            Self::ListItem(node) => Some(&node.children),
            Self::Table(node) => Some(&node.children),
            Self::Link(node) => Some(&node.children),
            Self::LinkReference(node) => Some(&node.children),
            Self::FootnoteDefinition(node) => Some(&node.children),
            Self::Unknown(node) => node.children.as_deref(),
            Self::ThematicBreak(_)
            | Self::Break(_)
            | Self::Text(_)
            | Self::InlineCode(_)
            | Self::Code(_)
            | Self::Html(_)
            | Self::Yaml(_)
            | Self::Image(_)
            | Self::ImageReference(_)
            | Self::FootnoteReference(_)
            | Self::Definition(_) => None,
        }
    }

    /// Render overrides attached to this node.
    #[must_use]
    pub fn data(&self) -> Option<&Data> {
        self.meta().0
    }

    /// Source span of this node.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        self.meta().1
    }

    fn meta(&self) -> (Option<&Data>, Option<&Position>) {
        match self {
            Self::Root(n)
            | Self::Paragraph(n)
            | Self::Blockquote(n)
            | Self::TableRow(n)
            | Self::TableCell(n)
            | Self::Emphasis(n)
            | Self::Strong(n)
            | Self::Delete(n)
            | Self::Footnote(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::ThematicBreak(n) | Self::Break(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::Text(n) | Self::InlineCode(n) | Self::Html(n) | Self::Yaml(n) => {
                (n.data.as_ref(), n.position.as_ref())
            }
            Self::Heading(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::List(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::ListItem(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::Table(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::Code(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::Link(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::Image(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::LinkReference(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::ImageReference(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::FootnoteReference(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::FootnoteDefinition(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::Definition(n) => (n.data.as_ref(), n.position.as_ref()),
            Self::Unknown(n) => (n.data.as_ref(), n.position.as_ref()),
        }
    }

    /// Visit this node and all descendants in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        if let Some(children) = self.children() {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

fn missing_type(value: &Value) -> Error {
    Error::MissingType {
        value: value.to_string(),
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}
