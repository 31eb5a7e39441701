//! Markdown front end for [`mdvdom`].
//!
//! Parses `CommonMark` (with GitHub extensions) using `pulldown-cmark` and
//! produces the mdast source tree that [`mdvdom::Processor`] compiles.
//!
//! # Architecture
//!
//! - [`parse`] runs the parser and feeds its events to an internal tree
//!   builder. Link reference definitions, which the parser resolves and does
//!   not emit, are appended to the root as `definition` nodes so that
//!   references compile the same way as in any other mdast tree.
//! - A shortcut reference with no definition (`[text]`) is kept as a
//!   `linkReference` rather than plain text, so the compiler's fallback
//!   output applies.
//! - [`MarkdownProcessor`] pairs [`ParseOptions`] with a [`Processor`].
//!
//! # Example
//!
//! ```
//! use mdvdom::{Options, html};
//! use mdvdom_cmark::MarkdownProcessor;
//!
//! let processor = MarkdownProcessor::new(Options::new().without_keys());
//! let tree = processor.render("*Hi*");
//! assert_eq!(html::to_html(&tree.into()), "<div><p><em>Hi</em></p>\n</div>");
//! ```

mod builder;

use mdvdom::mdast::{Definition, Node};
use mdvdom::{Element, Options, Processor};
use pulldown_cmark::{BrokenLink, CowStr, LinkType, Parser};

use crate::builder::TreeBuilder;

/// Parser switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tables, strikethrough, task lists and GitHub blockquote tags.
    pub gfm: bool,
    /// `[^label]` footnotes.
    pub footnotes: bool,
    /// YAML front matter delimited by `---`.
    pub front_matter: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            footnotes: true,
            front_matter: true,
        }
    }
}

impl ParseOptions {
    /// Parser options for these switches.
    #[must_use]
    pub fn parser_options(&self) -> pulldown_cmark::Options {
        let mut options = pulldown_cmark::Options::empty();
        if self.gfm {
            options |= pulldown_cmark::Options::ENABLE_TABLES
                | pulldown_cmark::Options::ENABLE_STRIKETHROUGH
                | pulldown_cmark::Options::ENABLE_TASKLISTS
                | pulldown_cmark::Options::ENABLE_GFM;
        }
        if self.footnotes {
            options |= pulldown_cmark::Options::ENABLE_FOOTNOTES;
        }
        if self.front_matter {
            options |= pulldown_cmark::Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
        }
        options
    }
}

/// Keep undefined shortcut references as references.
fn keep_shortcut<'input>(link: BrokenLink<'input>) -> Option<(CowStr<'input>, CowStr<'input>)> {
    (link.link_type == LinkType::Shortcut).then_some((CowStr::Borrowed(""), CowStr::Borrowed("")))
}

/// Parse markdown into an mdast `root` node.
#[must_use]
pub fn parse(markdown: &str, options: &ParseOptions) -> Node {
    let mut parser = Parser::new_with_broken_link_callback(
        markdown,
        options.parser_options(),
        Some(keep_shortcut),
    );
    let mut builder = TreeBuilder::new();
    for event in parser.by_ref() {
        builder.event(event);
    }

    let mut definitions: Vec<_> = parser.reference_definitions().iter().collect();
    definitions.sort_by_key(|(_, definition)| definition.span.start);
    tracing::debug!(definitions = definitions.len(), "Parsed markdown");

    builder.finish(definitions.into_iter().map(|(label, definition)| {
        Node::Definition(Definition {
            identifier: label.to_owned(),
            url: definition.dest.to_string(),
            title: definition.title.as_ref().map(ToString::to_string),
            ..Definition::default()
        })
    }))
}

/// Markdown to render tree in one step.
#[derive(Debug, Default, Clone)]
pub struct MarkdownProcessor {
    parse: ParseOptions,
    processor: Processor,
}

impl MarkdownProcessor {
    /// Create a processor with default parser switches and the given
    /// compile options.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            parse: ParseOptions::default(),
            processor: Processor::new(options),
        }
    }

    /// Replace the parser switches.
    #[must_use]
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Enable or disable GitHub Flavored Markdown extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.parse.gfm = enabled;
        self
    }

    /// Enable or disable footnotes.
    #[must_use]
    pub fn with_footnotes(mut self, enabled: bool) -> Self {
        self.parse.footnotes = enabled;
        self
    }

    /// Enable or disable YAML front matter.
    #[must_use]
    pub fn with_front_matter(mut self, enabled: bool) -> Self {
        self.parse.front_matter = enabled;
        self
    }

    #[must_use]
    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse
    }

    #[must_use]
    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Parse markdown into a source tree.
    #[must_use]
    pub fn parse(&self, markdown: &str) -> Node {
        parse(markdown, &self.parse)
    }

    /// Parse and compile markdown into a render tree.
    #[must_use]
    pub fn render(&self, markdown: &str) -> Element {
        self.processor.compile(&self.parse(markdown))
    }
}

/// Render markdown with default options.
#[must_use]
pub fn render(markdown: &str) -> Element {
    MarkdownProcessor::default().render(markdown)
}
