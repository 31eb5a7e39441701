//! Element factory.
//!
//! [`Template`] describes the element the compiler would like to produce:
//! a default tag name, default fields and already-compiled children.
//! [`Template::build`] applies the source node's render overrides and sends
//! every field through the attribute mapper.

use crate::attributes::{Placement, classify};
use crate::mdast::Data;
use crate::tree::{AttributeValue, Attributes, Element, RenderNode};

/// Defaults for one element, before overrides.
#[derive(Clone, Debug, Default)]
pub struct Template {
    name: String,
    fields: Vec<(String, Option<AttributeValue>)>,
    children: Vec<RenderNode>,
}

impl Template {
    /// Create a template for the given default tag name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a default field.
    #[must_use]
    pub fn attribute(self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.optional(name, Some(value))
    }

    /// Add a default field that may be absent.
    #[must_use]
    pub fn optional(mut self, name: &str, value: Option<impl Into<AttributeValue>>) -> Self {
        merge(&mut self.fields, name, value.map(Into::into));
        self
    }

    /// Set compiled children.
    #[must_use]
    pub fn content(mut self, children: Vec<RenderNode>) -> Self {
        self.children = children;
        self
    }

    /// Set a single text child.
    #[must_use]
    pub fn text(self, value: impl Into<String>) -> Self {
        self.content(vec![RenderNode::text(value)])
    }

    /// Build the element, applying `data` overrides when present.
    ///
    /// `renderName` replaces the tag name; `renderAttributes` entries replace
    /// defaults with the same key in place and append new keys.
    #[must_use]
    pub fn build(self, data: Option<&Data>) -> Element {
        let Self {
            mut name,
            mut fields,
            children,
        } = self;

        if let Some(data) = data {
            if let Some(render_name) = &data.render_name {
                render_name.clone_into(&mut name);
            }
            for (key, value) in data.render_attributes.iter() {
                merge(&mut fields, key, value.cloned());
            }
        }

        let mut properties = Attributes::new();
        let mut attributes = Attributes::new();
        for (key, value) in &fields {
            let Some(classified) = classify(key, value.as_ref()) else {
                continue;
            };
            match classified.placement {
                Placement::Property => properties.insert(classified.name, classified.value),
                Placement::Attribute => attributes.insert(classified.name, classified.value),
            };
        }

        Element {
            tag_name: name,
            properties,
            attributes,
            key: None,
            children,
        }
    }
}

fn merge(
    fields: &mut Vec<(String, Option<AttributeValue>)>,
    name: &str,
    value: Option<AttributeValue>,
) {
    if let Some((_, slot)) = fields.iter_mut().find(|(key, _)| key == name) {
        *slot = value;
    } else {
        fields.push((name.to_owned(), value));
    }
}
