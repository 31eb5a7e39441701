//! Node compiler: source tree to render tree.
//!
//! [`Compiler`] carries the state of one compilation (definition index and
//! footnote list) and dispatches on [`Node`] variants. Visiting the root runs
//! the indexing pass first, so references may appear before their
//! definitions. Compiled footnotes are appended after the root's content.
//!
//! Nodes with a discriminant the compiler has no rule for are handed to an
//! [`UnknownHandler`]; the default, [`GenericContainer`], renders a `div`.

use crate::definitions::{Definitions, FootnoteEntry, Footnotes};
use crate::factory::Template;
use crate::mdast::{
    Align, Code, Data, Image, ImageReference, LinkReference, ListItem, Node, ReferenceType, Table,
    Unknown,
};
use crate::text::{collapse_whitespace, detab, normalize_uri, trim_lines};
use crate::tree::{Element, RenderNode};
use crate::wrap::{LINE, wrap_in_lines};

/// Default tab width for code blocks.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Fallback for nodes the compiler has no rule for.
pub trait UnknownHandler: Send + Sync {
    /// Compile `node`. Use [`Compiler::children`] to compile its children.
    fn compile<'a>(&self, compiler: &mut Compiler<'a>, node: &'a Unknown) -> Vec<RenderNode>;
}

/// Renders unknown nodes as a `div`.
///
/// Content is the compiled children when the node has any, else its literal
/// value. The node's render overrides apply, so `data.renderName` can turn it
/// into any element.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericContainer;

impl UnknownHandler for GenericContainer {
    fn compile<'a>(&self, compiler: &mut Compiler<'a>, node: &'a Unknown) -> Vec<RenderNode> {
        let content = match (&node.children, &node.value) {
            (Some(children), _) => compiler.children(children),
            (None, Some(value)) => vec![RenderNode::text(value.as_str())],
            (None, None) => Vec::new(),
        };
        vec![
            Template::new("div")
                .content(content)
                .build(node.data.as_ref())
                .into(),
        ]
    }
}

static GENERIC_CONTAINER: GenericContainer = GenericContainer;

/// State of one compilation.
pub struct Compiler<'a> {
    definitions: Definitions<'a>,
    footnotes: Footnotes<'a>,
    tab_size: usize,
    unknown: &'a dyn UnknownHandler,
}

impl Default for Compiler<'_> {
    fn default() -> Self {
        Self::new(&GENERIC_CONTAINER)
    }
}

impl<'a> Compiler<'a> {
    /// Create a compiler with the given unknown-node fallback.
    #[must_use]
    pub fn new(unknown: &'a dyn UnknownHandler) -> Self {
        Self {
            definitions: Definitions::default(),
            footnotes: Footnotes::default(),
            tab_size: DEFAULT_TAB_SIZE,
            unknown,
        }
    }

    /// Set the tab width used to expand tabs in code blocks.
    #[must_use]
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    /// Compile a document, consuming the per-call state.
    pub fn compile(mut self, root: &'a Node) -> Vec<RenderNode> {
        let nodes = self.visit(root, None);
        tracing::debug!(
            node_type = root.node_type(),
            definitions = self.definitions.len(),
            footnotes = self.footnotes.len(),
            "Compiled source tree"
        );
        nodes
    }

    /// Compile one node. `parent` is the node whose children are being compiled.
    pub fn visit(&mut self, node: &'a Node, parent: Option<&'a Node>) -> Vec<RenderNode> {
        match node {
            Node::Root(_) => self.root(node),
            Node::Paragraph(p) => self.element("p", node, p.data.as_ref()),
            Node::Heading(heading) => {
                let name = format!("h{}", heading.depth.clamp(1, 6));
                self.element(&name, node, heading.data.as_ref())
            }
            Node::Blockquote(quote) => {
                let content = wrap_in_lines(self.all(node), true);
                one(Template::new("blockquote")
                    .content(content)
                    .build(quote.data.as_ref()))
            }
            Node::List(list) => {
                let start = list.start.filter(|&start| start != 1);
                let content = wrap_in_lines(self.all(node), true);
                one(Template::new(if list.ordered { "ol" } else { "ul" })
                    .optional("start", start)
                    .content(content)
                    .build(list.data.as_ref()))
            }
            Node::ListItem(item) => self.list_item(node, item, parent),
            Node::Table(table) => self.table(table),
            Node::TableRow(row) | Node::TableCell(row) => {
                self.element("div", node, row.data.as_ref())
            }
            Node::ThematicBreak(rule) => one(Template::new("hr").build(rule.data.as_ref())),
            Node::Break(brk) => vec![
                Template::new("br").build(brk.data.as_ref()).into(),
                RenderNode::text(LINE),
            ],
            Node::Text(text) => vec![RenderNode::text(trim_lines(&text.value))],
            Node::Emphasis(em) => self.element("em", node, em.data.as_ref()),
            Node::Strong(strong) => self.element("strong", node, strong.data.as_ref()),
            Node::Delete(del) => self.element("del", node, del.data.as_ref()),
            Node::InlineCode(code) => one(Template::new("code")
                .text(collapse_whitespace(&code.value))
                .build(code.data.as_ref())),
            Node::Code(code) => self.code(code),
            Node::Html(html) => vec![RenderNode::text(html.value.as_str())],
            Node::Yaml(_) | Node::Definition(_) | Node::FootnoteDefinition(_) => Vec::new(),
            Node::Link(link) => one(Template::new("a")
                .attribute("href", normalize_uri(&link.url))
                .optional("title", link.title.as_deref())
                .content(self.all(node))
                .build(link.data.as_ref())),
            Node::Image(image) => self.image(image),
            Node::LinkReference(reference) => self.link_reference(node, reference),
            Node::ImageReference(reference) => self.image_reference(reference),
            Node::Footnote(footnote) => {
                let identifier = self.footnotes.push_inline(&footnote.children);
                one(footnote_reference(&identifier, None))
            }
            Node::FootnoteReference(reference) => {
                one(footnote_reference(&reference.identifier, reference.data.as_ref()))
            }
            Node::Unknown(unknown) => {
                tracing::debug!(node_type = %unknown.node_type, "Compiling unknown node type");
                let handler = self.unknown;
                handler.compile(self, unknown)
            }
        }
    }

    /// Compile the children of `parent`.
    pub fn all(&mut self, parent: &'a Node) -> Vec<RenderNode> {
        match parent.children() {
            Some(children) => self.compile_children(children, Some(parent)),
            None => Vec::new(),
        }
    }

    /// Compile a sequence of sibling nodes that has no parent node.
    pub fn children(&mut self, nodes: &'a [Node]) -> Vec<RenderNode> {
        self.compile_children(nodes, None)
    }

    fn compile_children(&mut self, nodes: &'a [Node], parent: Option<&'a Node>) -> Vec<RenderNode> {
        let mut values = Vec::with_capacity(nodes.len());
        let mut previous: Option<&Node> = None;
        for node in nodes {
            let mut value = self.visit(node, parent);
            if matches!(previous, Some(Node::Break(_))) {
                trim_leading_whitespace(&mut value);
            }
            values.append(&mut value);
            previous = Some(node);
        }
        values
    }

    fn element(&mut self, name: &str, node: &'a Node, data: Option<&Data>) -> Vec<RenderNode> {
        let content = self.all(node);
        one(Template::new(name).content(content).build(data))
    }

    fn root(&mut self, node: &'a Node) -> Vec<RenderNode> {
        self.definitions = Definitions::collect(node);
        self.footnotes = Footnotes::collect(node);

        let mut result = wrap_in_lines(self.all(node), false);
        if !result.is_empty() {
            result.push(RenderNode::text(LINE));
        }
        result.extend(self.generate_footnotes());
        result
    }

    fn list_item(
        &mut self,
        node: &'a Node,
        item: &'a ListItem,
        parent: Option<&'a Node>,
    ) -> Vec<RenderNode> {
        let loose = matches!(parent, Some(Node::List(list)) if list.loose);
        let single = match item.children.as_slice() {
            [only] if !loose && only.children().is_some() => Some(only),
            _ => None,
        };

        let mut result = match single {
            Some(only) => self.all(only),
            None => self.all(node),
        };

        if let Some(checked) = item.checked {
            let checkbox = [
                Template::new("input")
                    .attribute("type", "checkbox")
                    .attribute("checked", checked)
                    .attribute("disabled", true)
                    .build(None)
                    .into(),
                RenderNode::text(" "),
            ];
            if single.is_some() {
                result.splice(0..0, checkbox);
            } else {
                let starts_with_paragraph = result
                    .first()
                    .and_then(RenderNode::as_element)
                    .is_some_and(|element| element.tag_name == "p");
                if !starts_with_paragraph {
                    result.insert(0, Element::new("p").into());
                }
                if let Some(paragraph) = result.first_mut().and_then(RenderNode::as_element_mut) {
                    paragraph.children.splice(0..0, checkbox);
                }
            }
        }

        let content = if single.is_some() {
            result
        } else {
            wrap_in_lines(result, true)
        };
        one(Template::new("li")
            .content(content)
            .build(item.data.as_ref()))
    }

    fn table(&mut self, table: &'a Table) -> Vec<RenderNode> {
        let mut rows = Vec::with_capacity(table.children.len());
        for (index, row) in table.children.iter().enumerate() {
            let name = if index == 0 { "th" } else { "td" };
            let cells = row.children().unwrap_or_default();
            let mut out = Vec::with_capacity(table.align.len());
            for (position, align) in table.align.iter().enumerate() {
                let cell = cells.get(position);
                let content = match cell {
                    Some(cell) => wrap_in_lines(self.all(cell), false),
                    None => Vec::new(),
                };
                out.push(
                    Template::new(name)
                        .optional("align", align.map(Align::as_str))
                        .content(content)
                        .build(cell.and_then(Node::data))
                        .into(),
                );
            }
            rows.push(
                Template::new("tr")
                    .content(wrap_in_lines(out, true))
                    .build(row.data())
                    .into(),
            );
        }

        let mut rows = rows.into_iter();
        let head: Vec<RenderNode> = rows.next().into_iter().collect();
        let body: Vec<RenderNode> = rows.collect();
        let sections = vec![
            Template::new("thead")
                .content(wrap_in_lines(head, true))
                .build(None)
                .into(),
            Template::new("tbody")
                .content(wrap_in_lines(body, true))
                .build(None)
                .into(),
        ];
        one(Template::new("table")
            .content(wrap_in_lines(sections, true))
            .build(table.data.as_ref()))
    }

    fn code(&self, code: &Code) -> Vec<RenderNode> {
        let content = if code.value.is_empty() {
            Vec::new()
        } else {
            vec![RenderNode::text(detab(&format!("{}{LINE}", code.value), self.tab_size))]
        };
        let class = code.lang.as_ref().map(|lang| format!("language-{lang}"));
        let inner = Template::new("code")
            .optional("class", class)
            .content(content)
            .build(code.data.as_ref());
        one(Template::new("pre").content(vec![inner.into()]).build(None))
    }

    fn image(&self, image: &Image) -> Vec<RenderNode> {
        one(Template::new("img")
            .attribute("src", normalize_uri(&image.url))
            .attribute("alt", image.alt.as_deref().unwrap_or_default())
            .optional("title", image.title.as_deref())
            .build(image.data.as_ref()))
    }

    fn link_reference(&mut self, node: &'a Node, reference: &'a LinkReference) -> Vec<RenderNode> {
        let definition = self.definitions.get(&reference.identifier);
        let url = definition.map_or("", |definition| definition.url.as_str());

        if reference.reference_type == ReferenceType::Shortcut && url.is_empty() {
            tracing::debug!(identifier = %reference.identifier, "Unresolved link reference");
            let mut out = vec![RenderNode::text("[")];
            out.extend(self.all(node));
            out.push(RenderNode::text("]"));
            return out;
        }
        if definition.is_none() {
            tracing::debug!(identifier = %reference.identifier, "Missing link definition");
        }

        let title = definition.and_then(|definition| definition.title.as_deref());
        one(Template::new("a")
            .attribute("href", normalize_uri(url))
            .optional("title", title)
            .content(self.all(node))
            .build(reference.data.as_ref()))
    }

    fn image_reference(&self, reference: &ImageReference) -> Vec<RenderNode> {
        let definition = self.definitions.get(&reference.identifier);
        let url = definition.map_or("", |definition| definition.url.as_str());
        let alt = reference.alt.as_deref().unwrap_or_default();

        if reference.reference_type == ReferenceType::Shortcut && url.is_empty() {
            tracing::debug!(identifier = %reference.identifier, "Unresolved image reference");
            return vec![RenderNode::text(format!("![{alt}]"))];
        }

        let title = definition.and_then(|definition| definition.title.as_deref());
        one(Template::new("img")
            .attribute("src", normalize_uri(url))
            .attribute("alt", alt)
            .optional("title", title)
            .build(reference.data.as_ref()))
    }

    fn generate_footnotes(&mut self) -> Vec<RenderNode> {
        if self.footnotes.is_empty() {
            return Vec::new();
        }

        // Footnote bodies may contain inline footnotes, which grow the list.
        let mut items = Vec::with_capacity(self.footnotes.len());
        let mut index = 0;
        while let Some(entry) = self.footnotes.entries().get(index).cloned() {
            items.push(self.footnote_item(entry));
            index += 1;
        }

        let list = Template::new("ol")
            .content(wrap_in_lines(items, true))
            .build(None);
        let rule = Template::new("hr").build(None);
        vec![
            Template::new("div")
                .attribute("class", "footnotes")
                .content(wrap_in_lines(vec![rule.into(), list.into()], true))
                .build(None)
                .into(),
            RenderNode::text(LINE),
        ]
    }

    fn footnote_item(&mut self, entry: FootnoteEntry<'a>) -> RenderNode {
        let identifier = entry.identifier;
        let mut content = self.children(entry.children);
        content.push(
            Template::new("a")
                .attribute("href", normalize_uri(&format!("#fnref-{identifier}")))
                .attribute("class", "footnote-backref")
                .text("↩")
                .build(None)
                .into(),
        );
        Template::new("li")
            .attribute("id", format!("fn-{identifier}"))
            .content(wrap_in_lines(content, true))
            .build(None)
            .into()
    }
}

fn one(element: Element) -> Vec<RenderNode> {
    vec![RenderNode::Element(element)]
}

fn footnote_reference(identifier: &str, data: Option<&Data>) -> Element {
    let link = Template::new("a")
        .attribute("href", format!("#fn-{identifier}"))
        .attribute("class", "footnote-ref")
        .text(identifier)
        .build(None);
    Template::new("sup")
        .attribute("id", format!("fnref-{identifier}"))
        .content(vec![link.into()])
        .build(data)
}

/// Strip leading whitespace from the first text of a compiled sibling.
fn trim_leading_whitespace(nodes: &mut [RenderNode]) {
    let text = match nodes.first_mut() {
        Some(RenderNode::Text(text)) => text,
        Some(RenderNode::Element(element)) => match element.children.first_mut() {
            Some(RenderNode::Text(text)) => text,
            _ => return,
        },
        None => return,
    };
    let trimmed = text.len() - text.trim_start().len();
    text.drain(..trimmed);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::html;
    use crate::tree::AttributeValue;

    fn compile(json: &str) -> String {
        let root = Node::from_json(json).unwrap();
        html::render(&Compiler::default().compile(&root))
    }

    fn paragraph(inline: &str) -> String {
        let paragraph = format!(r#"{{"type": "paragraph", "children": [{inline}]}}"#);
        format!(r#"{{"type": "root", "children": [{paragraph}]}}"#)
    }

    #[test]
    fn test_empty_root() {
        assert_eq!(compile(r#"{"type": "root", "children": []}"#), "");
    }

    #[test]
    fn test_inline_formatting() {
        let json = paragraph(
            r#"{"type": "emphasis", "children": [{"type": "text", "value": "Emphasis"}]},
               {"type": "text", "value": ", "},
               {"type": "strong", "children": [{"type": "text", "value": "importance"}]},
               {"type": "text", "value": ", and "},
               {"type": "inlineCode", "value": "code"},
               {"type": "text", "value": "."}"#,
        );
        assert_eq!(
            compile(&json),
            "<p><em>Emphasis</em>, <strong>importance</strong>, and <code>code</code>.</p>\n"
        );
    }

    #[test]
    fn test_blocks_are_separated_by_lines() {
        let json = r#"{"type": "root", "children": [
            {"type": "heading", "depth": 2, "children": [{"type": "text", "value": "Title"}]},
            {"type": "thematicBreak"},
            {"type": "blockquote", "children": [
                {"type": "paragraph", "children": [{"type": "text", "value": "quoted"}]}
            ]}
        ]}"#;
        assert_eq!(
            compile(json),
            "<h2>Title</h2>\n<hr>\n<blockquote>\n<p>quoted</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_heading_depth_is_clamped() {
        let json = r#"{"type": "root", "children": [
            {"type": "heading", "depth": 9, "children": []},
            {"type": "heading", "depth": 0, "children": []}
        ]}"#;
        assert_eq!(compile(json), "<h6></h6>\n<h1></h1>\n");
    }

    #[test]
    fn test_tight_list_unwraps_paragraphs() {
        let json = r#"{"type": "root", "children": [{"type": "list", "ordered": false, "loose": false, "children": [
            {"type": "listItem", "children": [{"type": "paragraph", "children": [{"type": "text", "value": "a"}]}]},
            {"type": "listItem", "children": [{"type": "paragraph", "children": [{"type": "text", "value": "b"}]}]}
        ]}]}"#;
        assert_eq!(compile(json), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
    }

    #[test]
    fn test_loose_list_keeps_paragraphs() {
        let json = r#"{"type": "root", "children": [{"type": "list", "ordered": false, "loose": true, "children": [
            {"type": "listItem", "children": [{"type": "paragraph", "children": [{"type": "text", "value": "a"}]}]}
        ]}]}"#;
        assert_eq!(compile(json), "<ul>\n<li>\n<p>a</p>\n</li>\n</ul>\n");
    }

    #[test]
    fn test_ordered_list_start() {
        let list = |start: i64| {
            format!(
                r#"{{"type": "root", "children": [{{"type": "list", "ordered": true, "start": {start}, "children": [
                    {{"type": "listItem", "children": [{{"type": "paragraph", "children": [{{"type": "text", "value": "a"}}]}}]}}
                ]}}]}}"#
            )
        };
        assert_eq!(compile(&list(3)), "<ol start=\"3\">\n<li>a</li>\n</ol>\n");
        assert_eq!(compile(&list(1)), "<ol>\n<li>a</li>\n</ol>\n");
        assert_eq!(compile(&list(-1)), "<ol start=\"-1\">\n<li>a</li>\n</ol>\n");
    }

    #[test]
    fn test_task_item_tight() {
        let json = r#"{"type": "root", "children": [{"type": "list", "children": [
            {"type": "listItem", "checked": true, "children": [{"type": "paragraph", "children": [{"type": "text", "value": "done"}]}]}
        ]}]}"#;
        assert_eq!(
            compile(json),
            "<ul>\n<li><input type=\"checkbox\" checked disabled> done</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_task_item_loose() {
        let json = r#"{"type": "root", "children": [{"type": "list", "loose": true, "children": [
            {"type": "listItem", "checked": false, "children": [{"type": "paragraph", "children": [{"type": "text", "value": "todo"}]}]}
        ]}]}"#;
        assert_eq!(
            compile(json),
            "<ul>\n<li>\n<p><input type=\"checkbox\" disabled> todo</p>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_task_item_synthesizes_paragraph() {
        let json = r#"{"type": "root", "children": [{"type": "list", "loose": true, "children": [
            {"type": "listItem", "checked": true, "children": [{"type": "code", "value": "x"}]}
        ]}]}"#;
        assert_eq!(
            compile(json),
            "<ul>\n<li>\n<p><input type=\"checkbox\" checked disabled> </p>\n<pre><code>x\n</code></pre>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_shortcut_reference_without_definition() {
        let json = paragraph(
            r#"{"type": "linkReference", "identifier": "foo", "referenceType": "shortcut",
                "children": [{"type": "emphasis", "children": [{"type": "text", "value": "foo"}]}]}"#,
        );
        assert_eq!(compile(&json), "<p>[<em>foo</em>]</p>\n");
    }

    #[test]
    fn test_image_shortcut_without_definition() {
        let json = paragraph(
            r#"{"type": "imageReference", "identifier": "pic", "referenceType": "shortcut",
                "alt": "pic"}"#,
        );
        assert_eq!(compile(&json), "<p>![pic]</p>\n");
    }

    #[test]
    fn test_reference_resolves_case_insensitively() {
        let json = r#"{"type": "root", "children": [
            {"type": "paragraph", "children": [
                {"type": "linkReference", "identifier": "Home", "referenceType": "full", "children": [{"type": "text", "value": "go"}]},
                {"type": "imageReference", "identifier": "home", "referenceType": "collapsed", "alt": "logo"}
            ]},
            {"type": "definition", "identifier": "HOME", "url": "/a b", "title": "T"}
        ]}"#;
        assert_eq!(
            compile(json),
            concat!(
                "<p><a href=\"/a%20b\" title=\"T\">go</a>",
                "<img src=\"/a%20b\" alt=\"logo\" title=\"T\"></p>\n",
            )
        );
    }

    #[test]
    fn test_full_reference_without_definition_is_empty_link() {
        let json = paragraph(
            r#"{"type": "linkReference", "identifier": "nope", "referenceType": "full", "children": [{"type": "text", "value": "x"}]}"#,
        );
        assert_eq!(compile(&json), "<p><a href=\"\">x</a></p>\n");
    }

    #[test]
    fn test_inline_footnote() {
        let json = paragraph(
            r#"{"type": "text", "value": "a"},
               {"type": "footnote", "children": [{"type": "text", "value": "x"}]}"#,
        );
        assert_eq!(
            compile(&json),
            concat!(
                "<p>a<sup id=\"fnref-1\"><a href=\"#fn-1\" class=\"footnote-ref\">1</a></sup>",
                "</p>\n<div class=\"footnotes\">\n<hr>\n<ol>\n<li id=\"fn-1\">\nx\n",
                "<a href=\"#fnref-1\" class=\"footnote-backref\">↩</a>\n</li>\n",
                "</ol>\n</div>\n",
            )
        );
    }

    #[test]
    fn test_inline_footnotes_get_increasing_identifiers() {
        let json = paragraph(
            r#"{"type": "footnote", "children": [{"type": "text", "value": "one"}]},
               {"type": "footnote", "children": [{"type": "text", "value": "two"}]}"#,
        );
        let root = Node::from_json(&json).unwrap();
        let nodes = Compiler::default().compile(&root);

        let footnotes = nodes
            .iter()
            .filter_map(RenderNode::as_element)
            .find(|element| element.tag_name == "div")
            .unwrap();
        let list = footnotes
            .child_elements()
            .find(|element| element.tag_name == "ol")
            .unwrap();
        let ids: Vec<_> = list
            .child_elements()
            .filter_map(|item| item.properties.get("id"))
            .filter_map(AttributeValue::as_str)
            .collect();
        assert_eq!(ids, ["fn-1", "fn-2"]);
    }

    #[test]
    fn test_footnote_definition_and_reference() {
        let json = r#"{"type": "root", "children": [
            {"type": "paragraph", "children": [{"type": "footnoteReference", "identifier": "n"}]},
            {"type": "footnoteDefinition", "identifier": "n", "children": [
                {"type": "paragraph", "children": [{"type": "text", "value": "note"}]}
            ]}
        ]}"#;
        let reference =
            "<p><sup id=\"fnref-n\"><a href=\"#fn-n\" class=\"footnote-ref\">n</a></sup></p>\n";
        let html = compile(json);
        assert!(html.starts_with(reference));
        assert!(html.contains("<li id=\"fn-n\">\n<p>note</p>\n<a href=\"#fnref-n\""));
    }

    #[test]
    fn test_break_trims_following_text() {
        let json = paragraph(
            r#"{"type": "text", "value": "a"},
               {"type": "break"},
               {"type": "text", "value": "   b"}"#,
        );
        assert_eq!(compile(&json), "<p>a<br>\nb</p>\n");
    }

    #[test]
    fn test_break_trims_first_text_of_element() {
        let json = paragraph(
            r#"{"type": "break"},
               {"type": "emphasis", "children": [{"type": "text", "value": "  b"}]}"#,
        );
        assert_eq!(compile(&json), "<p><br>\n<em>b</em></p>\n");
    }

    #[test]
    fn test_code_block() {
        let json = r#"{"type": "root", "children": [{"type": "code", "lang": "rust", "value": "\tfn x() {}"}]}"#;
        assert_eq!(
            compile(json),
            "<pre><code class=\"language-rust\">    fn x() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_tab_size() {
        let root = Node::from_json(r#"{"type": "code", "value": "\tx"}"#).unwrap();
        let nodes = Compiler::default().with_tab_size(2).compile(&root);
        assert_eq!(html::render(&nodes), "<pre><code>  x\n</code></pre>");
    }

    #[test]
    fn test_empty_code_block() {
        let json = r#"{"type": "root", "children": [{"type": "code", "value": ""}]}"#;
        assert_eq!(compile(json), "<pre><code></code></pre>\n");
    }

    #[test]
    fn test_code_data_applies_to_inner_element() {
        let json = r#"{"type": "code", "value": "x", "data": {"hProperties": {"dataLine": 1}}}"#;
        let root = Node::from_json(json).unwrap();
        let nodes = Compiler::default().compile(&root);
        assert_eq!(
            html::render(&nodes),
            "<pre><code data-line=\"1\">x\n</code></pre>"
        );
    }

    #[test]
    fn test_code_class_name_list() {
        let json = r#"{"type": "code", "lang": "rust", "value": "x", "data": {"hProperties": {"className": ["language-js", "x"]}}}"#;
        let root = Node::from_json(json).unwrap();
        let nodes = Compiler::default().compile(&root);
        assert_eq!(
            html::render(&nodes),
            "<pre><code class=\"language-js x\">x\n</code></pre>"
        );
    }

    #[test]
    fn test_inline_code_collapses_whitespace() {
        let json = paragraph(r#"{"type": "inlineCode", "value": "a  \n b"}"#);
        assert_eq!(compile(&json), "<p><code>a b</code></p>\n");
    }

    #[test]
    fn test_html_is_text() {
        let json = paragraph(r#"{"type": "html", "value": "<b>"}"#);
        assert_eq!(compile(&json), "<p>&lt;b&gt;</p>\n");
    }

    #[test]
    fn test_text_lines_are_trimmed() {
        let json = paragraph(r#"{"type": "text", "value": "a  \n  b"}"#);
        assert_eq!(compile(&json), "<p>a\nb</p>\n");
    }

    #[test]
    fn test_table() {
        let json = r#"{"type": "root", "children": [{"type": "table", "align": ["left", null], "children": [
            {"type": "tableRow", "children": [
                {"type": "tableCell", "children": [{"type": "text", "value": "a"}]},
                {"type": "tableCell", "children": [{"type": "text", "value": "b"}]}
            ]},
            {"type": "tableRow", "children": [
                {"type": "tableCell", "children": [{"type": "text", "value": "1"}]},
                {"type": "tableCell", "children": [{"type": "text", "value": "2"}]}
            ]}
        ]}]}"#;
        assert_eq!(
            compile(json),
            concat!(
                "<table>\n<thead>\n<tr>\n<th align=\"left\">a</th>\n<th>b</th>\n</tr>\n</thead>\n",
                "<tbody>\n<tr>\n<td align=\"left\">1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n",
            )
        );
    }

    #[test]
    fn test_table_pads_and_drops_cells() {
        let json = r#"{"type": "table", "align": [null, null], "children": [
            {"type": "tableRow", "children": [
                {"type": "tableCell", "children": [{"type": "text", "value": "only"}]}
            ]},
            {"type": "tableRow", "children": [
                {"type": "tableCell", "children": [{"type": "text", "value": "1"}]},
                {"type": "tableCell", "children": [{"type": "text", "value": "2"}]},
                {"type": "tableCell", "children": [{"type": "text", "value": "3"}]}
            ]}
        ]}"#;
        let root = Node::from_json(json).unwrap();
        let html = html::render(&Compiler::default().compile(&root));
        assert!(html.contains("<th>only</th>\n<th></th>"));
        assert!(html.contains("<td>1</td>\n<td>2</td>\n</tr>"));
        assert!(!html.contains('3'));
    }

    #[test]
    fn test_link_and_image() {
        let json = paragraph(
            r#"{"type": "link", "url": "https://example.com/a b", "title": "Go",
                "children": [{"type": "text", "value": "x"}]},
               {"type": "image", "url": "i.png"}"#,
        );
        assert_eq!(
            compile(&json),
            concat!(
                "<p><a href=\"https://example.com/a%20b\" title=\"Go\">x</a>",
                "<img src=\"i.png\" alt=\"\"></p>\n",
            )
        );
    }

    #[test]
    fn test_unknown_node() {
        let json = r#"{"type": "root", "children": [
            {"type": "alien", "value": "zap"},
            {"type": "alien", "children": [{"type": "text", "value": "kids"}]},
            {"type": "alien", "data": {"hName": "section"}},
            {"type": "alien"}
        ]}"#;
        assert_eq!(
            compile(json),
            "<div>zap</div>\n<div>kids</div>\n<section></section>\n<div></div>\n"
        );
    }

    #[test]
    fn test_ignored_nodes() {
        let json = r#"{"type": "root", "children": [
            {"type": "yaml", "value": "title: x"},
            {"type": "definition", "identifier": "a", "url": "/a"}
        ]}"#;
        assert_eq!(compile(json), "");
    }

    #[test]
    fn test_render_overrides() {
        let json = paragraph(
            r#"{"type": "emphasis", "data": {"hName": "i", "hProperties": {"className": "x"}},
                "children": [{"type": "text", "value": "y"}]}"#,
        );
        assert_eq!(compile(&json), "<p><i class=\"x\">y</i></p>\n");
    }

    struct Shout;

    impl UnknownHandler for Shout {
        fn compile<'a>(&self, _compiler: &mut Compiler<'a>, node: &'a Unknown) -> Vec<RenderNode> {
            vec![RenderNode::text(node.node_type.to_uppercase())]
        }
    }

    #[test]
    fn test_custom_unknown_handler() {
        let root = Node::from_json(r#"{"type": "alien"}"#).unwrap();
        let nodes = Compiler::new(&Shout).compile(&root);
        assert_eq!(nodes, vec![RenderNode::text("ALIEN")]);
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let json = paragraph(r#"{"type": "footnote", "children": []}"#);
        let root = Node::from_json(&json).unwrap();
        let first = Compiler::default().compile(&root);
        assert_eq!(first, Compiler::default().compile(&root));
    }
}
