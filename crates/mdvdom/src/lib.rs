//! Compile Markdown syntax trees into virtual element trees.
//!
//! The input is an mdast-shaped [`Node`] tree, produced by a Markdown parser
//! (see the `mdvdom-cmark` crate) or loaded from JSON. The output is a
//! backend-agnostic render tree of [`Element`]s and text whose fields are
//! already split into DOM properties and HTML attributes.
//!
//! # Architecture
//!
//! [`Processor::compile`] runs four stages:
//! - [`Compiler`]: indexes definitions and footnotes, then walks the tree.
//!   Every element goes through [`Template`] and the attribute mapper
//!   ([`classify`]); block siblings are separated by [`wrap_in_lines`].
//! - The result is wrapped in a `div` and, unless disabled, passed through
//!   [`sanitize`]. If the sanitizer removes the `div`, it is restored.
//! - Every element is rebuilt through a component or the element factory
//!   ([`CreateElement`]) and receives a key.
//! - [`html::to_html`] serializes the result when a string is wanted.
//!
//! # Example
//!
//! ```
//! use mdvdom::{Node, Options, Processor, html};
//!
//! let root = Node::from_json(
//!     r#"{"type": "root", "children": [
//!         {"type": "heading", "depth": 1, "children": [{"type": "text", "value": "Hello"}]}
//!     ]}"#,
//! )?;
//! let tree = Processor::new(Options::new().without_keys()).compile(&root);
//! assert_eq!(html::to_html(&tree.into()), "<div><h1>Hello</h1>\n</div>");
//! # Ok::<(), mdvdom::Error>(())
//! ```

mod attributes;
mod compiler;
mod definitions;
mod error;
mod factory;
pub mod html;
mod hyperscript;
pub mod mdast;
mod options;
mod processor;
pub mod property;
mod sanitize;
pub mod text;
mod tree;
mod wrap;

pub use attributes::{Classified, Placement, classify, kebab_case};
pub use compiler::{Compiler, DEFAULT_TAB_SIZE, GenericContainer, UnknownHandler};
pub use error::{Error, Result};
pub use factory::Template;
pub use hyperscript::{Components, CreateElement, Hyperscript, Props};
pub use mdast::Node;
pub use options::{
    DEFAULT_KEY_PREFIX, KeyPrefixConfig, Options, OptionsConfig, Sanitize, SanitizeConfig,
};
pub use processor::{Processor, compile};
pub use sanitize::{Schema, sanitize};
pub use tree::{AttributeValue, Attributes, Element, RenderNode};
pub use wrap::wrap_in_lines;
