//! Compilation entry point.

use crate::compiler::Compiler;
use crate::error::Result;
use crate::hyperscript::Materializer;
use crate::mdast::Node;
use crate::options::{Options, Sanitize};
use crate::sanitize::sanitize;
use crate::tree::{Element, RenderNode};

/// Compiles source trees into render trees.
///
/// A processor holds only configuration; every call to [`Processor::compile`]
/// allocates its own definition and footnote state, so one processor can be
/// shared between threads.
///
/// # Example
///
/// ```
/// use mdvdom::{Node, Options, Processor, html};
///
/// let root = Node::from_json(
///     r#"{"type": "root", "children": [{"type": "paragraph", "children": [{"type": "text", "value": "Hi"}]}]}"#,
/// )?;
/// let tree = Processor::new(Options::default()).compile(&root);
/// assert_eq!(tree.key.as_deref(), Some("h-1"));
/// assert_eq!(html::to_html(&tree.into()), "<div><p>Hi</p>\n</div>");
/// # Ok::<(), mdvdom::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct Processor {
    options: Options,
}

impl Processor {
    /// Create a processor with the given options.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Options in use.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Compile a source tree into a render tree rooted at one `div`.
    ///
    /// Never fails: unresolved references, unknown node types and a sanitizer
    /// that removes the container all have fallback output.
    #[must_use]
    pub fn compile(&self, root: &Node) -> Element {
        let children = Compiler::new(self.options.unknown.as_ref())
            .with_tab_size(self.options.tab_size)
            .compile(root);
        let mut container = Element::new("div").with_children(children);

        if let Sanitize::Enabled(schema) = &self.options.sanitize {
            let mut nodes = sanitize(container.into(), schema);
            container = match nodes.pop() {
                Some(RenderNode::Element(element))
                    if nodes.is_empty() && element.tag_name == "div" =>
                {
                    element
                }
                last => {
                    nodes.extend(last);
                    tracing::debug!("Restored container removed by sanitizer");
                    Element::new("div").with_children(nodes)
                }
            };
        }

        Materializer::new(
            &self.options.components,
            self.options.element_factory.as_ref(),
            self.options.key_prefix.as_deref(),
        )
        .root(container)
    }

    /// Load a source tree from mdast JSON and compile it.
    pub fn compile_json(&self, input: &str) -> Result<Element> {
        let root = Node::from_json(input)?;
        Ok(self.compile(&root))
    }
}

/// Compile a source tree with default options.
#[must_use]
pub fn compile(root: &Node) -> Element {
    Processor::default().compile(root)
}
