//! Render tree materialization.
//!
//! After sanitization every element is rebuilt top-down through a
//! [`CreateElement`] implementation: a registered component for its
//! lower-cased tag name, or the element factory (default [`Hyperscript`]).
//! Keys are assigned in pre-order, counting from 1 per compilation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::tree::{Attributes, Element, RenderNode};

/// Fields handed to a [`CreateElement`] implementation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Props {
    pub properties: Attributes,
    pub attributes: Attributes,
    pub key: Option<String>,
}

/// Element constructor.
///
/// Returning several nodes (or none) splices them into the parent. Closures
/// with the matching signature implement this trait.
///
/// ```
/// use mdvdom::{CreateElement, Props, RenderNode};
///
/// // Replace every element with its children.
/// let unwrap = |_: &str, _: Props, children: Vec<RenderNode>| children;
/// let out = unwrap.create("em", Props::default(), vec![RenderNode::text("x")]);
/// assert_eq!(out, vec![RenderNode::text("x")]);
/// ```
pub trait CreateElement: Send + Sync {
    fn create(&self, tag_name: &str, props: Props, children: Vec<RenderNode>) -> Vec<RenderNode>;
}

impl<F> CreateElement for F
where
    F: Fn(&str, Props, Vec<RenderNode>) -> Vec<RenderNode> + Send + Sync,
{
    fn create(&self, tag_name: &str, props: Props, children: Vec<RenderNode>) -> Vec<RenderNode> {
        self(tag_name, props, children)
    }
}

/// Default element factory: builds one element as given.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hyperscript;

impl CreateElement for Hyperscript {
    fn create(&self, tag_name: &str, props: Props, children: Vec<RenderNode>) -> Vec<RenderNode> {
        vec![RenderNode::Element(Element {
            tag_name: tag_name.to_owned(),
            properties: props.properties,
            attributes: props.attributes,
            key: props.key,
            children,
        })]
    }
}

/// Components keyed by lower-cased tag name.
pub type Components = HashMap<String, Arc<dyn CreateElement>>;

/// Per-compilation rebuild state.
pub(crate) struct Materializer<'o> {
    components: &'o Components,
    factory: &'o dyn CreateElement,
    key_prefix: Option<&'o str>,
    counter: usize,
}

impl<'o> Materializer<'o> {
    pub(crate) fn new(
        components: &'o Components,
        factory: &'o dyn CreateElement,
        key_prefix: Option<&'o str>,
    ) -> Self {
        Self {
            components,
            factory,
            key_prefix,
            counter: 0,
        }
    }

    /// Rebuild `root`, always yielding a single element.
    pub(crate) fn root(mut self, root: Element) -> Element {
        let mut nodes = self.node(RenderNode::Element(root));
        match nodes.pop() {
            Some(RenderNode::Element(element)) if nodes.is_empty() => element,
            last => {
                nodes.extend(last);
                tracing::debug!(nodes = nodes.len(), "Wrapped root in container");
                Element::new("div").with_children(nodes)
            }
        }
    }

    fn node(&mut self, node: RenderNode) -> Vec<RenderNode> {
        let RenderNode::Element(element) = node else {
            return vec![node];
        };

        self.counter += 1;
        let key = self
            .key_prefix
            .map(|prefix| format!("{prefix}{}", self.counter))
            .or(element.key);

        let mut children = Vec::with_capacity(element.children.len());
        for child in element.children {
            children.extend(self.node(child));
        }

        let props = Props {
            properties: element.properties,
            attributes: element.attributes,
            key,
        };
        let create = self
            .components
            .get(&element.tag_name.to_lowercase())
            .map_or(self.factory, |component| component.as_ref());
        create.create(&element.tag_name, props, children)
    }
}
