//! Render tree sanitizer.
//!
//! A [`Schema`] lists the tags, attributes and URL protocols that survive.
//! Disallowed elements are unwrapped (their sanitized children take their
//! place) unless listed in `strip`, in which case they are dropped with their
//! content. Because the top element itself may be unwrapped, [`sanitize`]
//! returns a sequence.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::property;
use crate::tree::{AttributeValue, Attributes, Element, RenderNode};

/// Allow lists for [`sanitize`].
///
/// Attribute names are HTML attribute names (`class`, `for`); DOM property
/// names (`className`) are accepted too. `data*` allows every `data-`
/// attribute. The `*` key of `attributes` applies to every tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    /// Tags that are kept.
    pub tag_names: Vec<String>,
    /// Tag name (or `*`) to allowed attribute names.
    pub attributes: BTreeMap<String, Vec<String>>,
    /// Attribute name to allowed URL protocols; relative URLs always pass.
    pub protocols: BTreeMap<String, Vec<String>>,
    /// Tags removed together with their content.
    pub strip: Vec<String>,
    /// Attributes whose values get `clobber_prefix` prepended.
    pub clobber: Vec<String>,
    pub clobber_prefix: String,
    /// Tag name to tags of which at least one must be an ancestor.
    pub ancestors: BTreeMap<String, Vec<String>>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|&item| item.to_owned()).collect()
}

impl Schema {
    /// GitHub-style rules: common Markdown output passes, scripts and
    /// `javascript:` URLs do not, and `id`/`name` are prefixed with
    /// `user-content-`.
    #[must_use]
    pub fn baseline() -> Self {
        let tag_names = strings(&[
            "h1", "h2", "h3", "h4", "h5", "h6", "br", "b", "i", "strong", "em", "a", "pre", "code",
            "img", "tt", "div", "ins", "del", "sup", "sub", "p", "ol", "ul", "table", "thead",
            "tbody", "tfoot", "blockquote", "dl", "dt", "dd", "kbd", "q", "samp", "var", "hr",
            "ruby", "rt", "rp", "li", "tr", "td", "th", "s", "strike", "summary", "details",
            "caption", "figure", "figcaption", "abbr", "bdo", "cite", "dfn", "mark", "small",
            "span", "time", "wbr", "input",
        ]);

        let attributes = BTreeMap::from([
            ("a".to_owned(), strings(&["href", "class"])),
            ("img".to_owned(), strings(&["src", "longdesc"])),
            ("code".to_owned(), strings(&["class"])),
            ("div".to_owned(), strings(&["class", "itemscope", "itemtype"])),
            ("li".to_owned(), strings(&["class"])),
            ("input".to_owned(), strings(&["type", "checked", "disabled", "class"])),
            ("blockquote".to_owned(), strings(&["cite"])),
            ("del".to_owned(), strings(&["cite"])),
            ("ins".to_owned(), strings(&["cite"])),
            ("q".to_owned(), strings(&["cite"])),
            (
                "*".to_owned(),
                strings(&[
                    "abbr", "accept", "accept-charset", "accesskey", "action", "align", "alt",
                    "axis", "border", "cellpadding", "cellspacing", "char", "charoff", "charset",
                    "clear", "cols", "colspan", "color", "compact", "coords", "datetime", "dir",
                    "disabled", "enctype", "for", "frame", "headers", "height", "hreflang",
                    "hspace", "id", "ismap", "label", "lang", "maxlength", "media", "method",
                    "multiple", "name", "nohref", "noshade", "nowrap", "open", "prompt",
                    "readonly", "rel", "rev", "rows", "rowspan", "rules", "scope", "selected",
                    "shape", "size", "span", "start", "summary", "tabindex", "target", "title",
                    "type", "usemap", "valign", "value", "vspace", "width", "itemprop",
                ]),
            ),
        ]);

        let protocols = BTreeMap::from([
            ("href".to_owned(), strings(&["http", "https", "mailto"])),
            ("src".to_owned(), strings(&["http", "https"])),
            ("cite".to_owned(), strings(&["http", "https"])),
            ("longdesc".to_owned(), strings(&["http", "https"])),
        ]);

        let ancestors = BTreeMap::from([
            ("li".to_owned(), strings(&["ol", "ul"])),
            ("tbody".to_owned(), strings(&["table"])),
            ("tfoot".to_owned(), strings(&["table"])),
            ("thead".to_owned(), strings(&["table"])),
            ("tr".to_owned(), strings(&["table"])),
            ("th".to_owned(), strings(&["table"])),
            ("td".to_owned(), strings(&["table"])),
        ]);

        Self {
            tag_names,
            attributes,
            protocols,
            strip: strings(&["script"]),
            clobber: strings(&["id", "name"]),
            clobber_prefix: "user-content-".to_owned(),
            ancestors,
        }
    }
}

/// Sanitize a render tree.
///
/// # Examples
///
/// ```
/// use mdvdom::{Element, RenderNode, Schema, sanitize};
///
/// let tree = Element::new("div").with_children(vec![
///     Element::new("script").with_children(vec![RenderNode::text("alert(1)")]).into(),
///     Element::new("blink").with_children(vec![RenderNode::text("hi")]).into(),
/// ]);
/// let clean = sanitize(tree.into(), &Schema::baseline());
/// assert_eq!(clean, vec![Element::new("div").with_children(vec![RenderNode::text("hi")]).into()]);
/// ```
#[must_use]
pub fn sanitize(node: RenderNode, schema: &Schema) -> Vec<RenderNode> {
    let rules = Rules::new(schema);
    let mut stack = Vec::new();
    rules.node(node, &mut stack)
}

/// Schema with lookups prepared.
struct Rules<'s> {
    schema: &'s Schema,
    tags: HashSet<&'s str>,
    strip: HashSet<&'s str>,
}

impl<'s> Rules<'s> {
    fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            tags: schema.tag_names.iter().map(String::as_str).collect(),
            strip: schema.strip.iter().map(String::as_str).collect(),
        }
    }

    fn node(&self, node: RenderNode, stack: &mut Vec<String>) -> Vec<RenderNode> {
        match node {
            RenderNode::Text(_) => vec![node],
            RenderNode::Element(element) => self.element(element, stack),
        }
    }

    fn element(&self, element: Element, stack: &mut Vec<String>) -> Vec<RenderNode> {
        let Element {
            tag_name,
            properties,
            attributes,
            key,
            children,
        } = element;

        if self.strip.contains(tag_name.as_str()) {
            tracing::trace!(tag = %tag_name, "Stripped element");
            return Vec::new();
        }

        if !self.tags.contains(tag_name.as_str()) || !self.has_ancestor(&tag_name, stack) {
            tracing::trace!(tag = %tag_name, "Unwrapped element");
            return self.children(children, stack);
        }

        stack.push(tag_name);
        let children = self.children(children, stack);
        let tag_name = stack.pop().unwrap_or_default();

        let properties = self.fields(&tag_name, properties, true);
        let attributes = self.fields(&tag_name, attributes, false);
        vec![RenderNode::Element(Element {
            tag_name,
            properties,
            attributes,
            key,
            children,
        })]
    }

    fn children(&self, children: Vec<RenderNode>, stack: &mut Vec<String>) -> Vec<RenderNode> {
        children
            .into_iter()
            .flat_map(|child| self.node(child, stack))
            .collect()
    }

    fn has_ancestor(&self, tag_name: &str, stack: &[String]) -> bool {
        match self.schema.ancestors.get(tag_name) {
            Some(required) => stack.iter().any(|ancestor| required.contains(ancestor)),
            None => true,
        }
    }

    fn fields(&self, tag_name: &str, fields: Attributes, properties: bool) -> Attributes {
        fields
            .into_iter()
            .filter_map(|(name, value)| {
                let attribute = if properties {
                    property::attribute_name(&name).to_owned()
                } else {
                    name.clone()
                };
                if !self.allows(tag_name, &attribute, &name) {
                    return None;
                }
                if !self.safe_protocol(&attribute, &value) {
                    tracing::debug!(tag = %tag_name, attribute = %attribute, "Dropped unsafe URL");
                    return None;
                }
                let value = match value {
                    AttributeValue::String(value) if self.schema.clobber.contains(&attribute) => {
                        AttributeValue::String(format!("{}{value}", self.schema.clobber_prefix))
                    }
                    other => other,
                };
                Some((name, value))
            })
            .collect()
    }

    fn allows(&self, tag_name: &str, attribute: &str, name: &str) -> bool {
        [tag_name, "*"]
            .iter()
            .filter_map(|key| self.schema.attributes.get(*key))
            .flatten()
            .any(|allowed| {
                allowed.eq_ignore_ascii_case(attribute)
                    || allowed == name
                    || (allowed == "data*" && attribute.starts_with("data-"))
            })
    }

    fn safe_protocol(&self, attribute: &str, value: &AttributeValue) -> bool {
        let Some(allowed) = self.schema.protocols.get(attribute) else {
            return true;
        };
        let AttributeValue::String(url) = value else {
            return false;
        };
        match protocol(url) {
            Some(scheme) => allowed.iter().any(|p| p.eq_ignore_ascii_case(scheme)),
            None => true,
        }
    }
}

/// URL scheme, or `None` for relative URLs.
fn protocol(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let before = &url[..colon];
    if before.contains(['/', '?', '#']) {
        return None;
    }
    Some(before.trim())
}
