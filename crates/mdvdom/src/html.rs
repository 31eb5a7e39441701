//! HTML serialization of render trees.
//!
//! Useful for snapshot tests and for backends that want a string. Property
//! names are mapped back to attribute names (`className` becomes `class`),
//! `true` renders as a bare attribute, and keys are not rendered.

use crate::property;
use crate::tree::{AttributeValue, Attributes, Element, RenderNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize one render node.
#[must_use]
pub fn to_html(node: &RenderNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Serialize a sequence of render nodes.
#[must_use]
pub fn render(nodes: &[RenderNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &RenderNode, out: &mut String) {
    match node {
        RenderNode::Text(text) => out.push_str(&escape_html(text)),
        RenderNode::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag_name);
    write_fields(&element.properties, true, out);
    write_fields(&element.attributes, false, out);
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
        return;
    }

    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.tag_name);
    out.push('>');
}

fn write_fields(fields: &Attributes, map_names: bool, out: &mut String) {
    for (name, value) in fields.iter() {
        let name = if map_names {
            property::attribute_name(name)
        } else {
            name
        };
        match value {
            AttributeValue::Bool(false) => {}
            AttributeValue::Bool(true) => {
                out.push(' ');
                out.push_str(name);
            }
            AttributeValue::Number(number) => {
                out.push_str(&format!(" {name}=\"{number}\""));
            }
            AttributeValue::String(value) => {
                out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
            }
        }
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_void_element() {
        let mut element = Element::new("img");
        element.properties.insert("src", "a.png".into());
        element.properties.insert("alt", "".into());
        assert_eq!(to_html(&element.into()), "<img src=\"a.png\" alt=\"\">");
    }

    #[test]
    fn test_property_names_are_mapped() {
        let mut element = Element::new("label").with_children(vec![RenderNode::text("x")]);
        element.properties.insert("className", "c".into());
        element.properties.insert("htmlFor", "f".into());
        element.attributes.insert("data-x", 2_i64.into());
        assert_eq!(
            to_html(&element.into()),
            "<label class=\"c\" for=\"f\" data-x=\"2\">x</label>"
        );
    }

    #[test]
    fn test_booleans() {
        let mut element = Element::new("script");
        element.properties.insert("async", true.into());
        element.properties.insert("defer", false.into());
        assert_eq!(to_html(&element.into()), "<script async></script>");
    }

    #[test]
    fn test_key_is_not_rendered() {
        let mut element = Element::new("div");
        element.key = Some("h-1".to_owned());
        assert_eq!(to_html(&element.into()), "<div></div>");
    }
}
